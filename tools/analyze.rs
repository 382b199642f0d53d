/// Analyze: runs every analyzer over a snapshot and prints the result.
///
/// Usage: analyze <snapshot.json> [--config <analysis.ron>] [--project <id>]
///                [--roots <id,id,..>] [--json] [--verbose]

use lore_graph::core::analysis::{Analyzer, GraphAnalysis};
use lore_graph::schema::artifact::{Artifact, ArtifactId};
use lore_graph::schema::derived::FamilyTreeNode;
use lore_graph::schema::snapshot::ProjectSnapshot;
use std::path::Path;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let snapshot_path = args[1].clone();
    let mut config_path = None;
    let mut project = None;
    let mut roots: Option<Vec<ArtifactId>> = None;
    let mut json = false;
    let mut verbose = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--project" if i + 1 < args.len() => {
                i += 1;
                project = Some(args[i].clone());
            }
            "--roots" if i + 1 < args.len() => {
                i += 1;
                roots = Some(
                    args[i]
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(ArtifactId::from)
                        .collect(),
                );
            }
            "--json" => json = true,
            "--verbose" | "-v" => verbose = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    init_tracing(verbose);

    let snapshot = match ProjectSnapshot::load_json(Path::new(&snapshot_path)) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("ERROR: Failed to load snapshot: {}", e);
            process::exit(1);
        }
    };

    let mut builder = Analyzer::builder();
    if let Some(ref path) = config_path {
        builder = builder.config_file(Path::new(path));
    }
    let analyzer = match builder.build() {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let artifacts: Vec<Artifact> = match project.or(snapshot.project_id.clone()) {
        Some(id) => snapshot.scoped(&id),
        None => snapshot.artifacts.clone(),
    };

    let mut analysis = match analyzer.analyze(&artifacts) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };
    if let Some(ref roots) = roots {
        match analyzer.family_trees_from(&artifacts, roots) {
            Ok(trees) => analysis.family_trees = trees,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&analysis) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("ERROR: Failed to serialize analysis: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_summary(&analysis);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn print_usage() {
    println!("Analyze: derived views for a project snapshot.");
    println!();
    println!("Usage: analyze <snapshot.json> [--config <path>] [--project <id>] [--roots <ids>] [--json]");
    println!();
    println!("  --config <path>   Analysis config in RON (era names, lexicon overrides)");
    println!("  --project <id>    Only analyze artifacts from this project");
    println!("  --roots <ids>     Comma-separated character IDs to root family trees at");
    println!("  --json            Print the full analysis as JSON");
    println!("  --verbose         Debug logging on stderr");
}

fn print_summary(analysis: &GraphAnalysis) {
    println!("=== Family Trees ({}) ===", analysis.family_trees.len());
    for tree in &analysis.family_trees {
        print_tree(tree, 1);
    }

    println!("\n=== Factions ({}) ===", analysis.faction_summaries.len());
    for faction in &analysis.faction_summaries {
        println!(
            "  {} [{:?}]: {}",
            faction.faction_name, faction.stability, faction.summary
        );
    }

    let ages = &analysis.world_ages;
    println!("\n=== World Ages ({}) ===", ages.eras.len());
    for era in &ages.eras {
        println!(
            "  {} ({}..={}, {} events): {}",
            era.label, era.start, era.end, era.event_count, era.signature
        );
    }
    if let Some(ref current) = ages.current_age {
        println!("  Current: {}", current.label);
    }
    if let Some(ref upcoming) = ages.upcoming_age {
        println!("  Upcoming: {}", upcoming.label);
    }
    if ages.unparseable_event_count > 0 {
        println!("  ({} undated events)", ages.unparseable_event_count);
    }

    println!("\n=== Constraints ({}) ===", analysis.constraints.len());
    for constraint in &analysis.constraints {
        println!(
            "  [{}/{}] {}: {}",
            constraint.status.as_str(),
            constraint.constraint_type.as_str(),
            constraint.label,
            constraint.summary
        );
    }

    let integrity = &analysis.integrity;
    println!(
        "\nIntegrity: {} dangling relations, {} duplicate IDs, {} unrecognized kinds",
        integrity.dangling_relations.len(),
        integrity.duplicate_ids.len(),
        integrity.unrecognized_kinds.len()
    );
}

fn print_tree(node: &FamilyTreeNode, depth: usize) {
    let mut line = format!("{}{}", "  ".repeat(depth), node.character.display_title());
    if !node.partners.is_empty() {
        let partners: Vec<&str> = node.partners.iter().map(Artifact::display_title).collect();
        line.push_str(&format!(" + {}", partners.join(", ")));
    }
    println!("{}", line);
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}
