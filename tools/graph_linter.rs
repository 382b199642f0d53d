/// Graph Linter: reports data-integrity problems in project snapshots.
///
/// Usage: graph_linter <snapshot.json | snapshot_dir> [--project <id>] [--verbose]

use lore_graph::core::analysis::Analyzer;
use lore_graph::core::integrity::IntegrityReport;
use lore_graph::schema::artifact::Artifact;
use lore_graph::schema::snapshot::ProjectSnapshot;
use std::path::Path;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: graph_linter <snapshot.json | snapshot_dir> [--project <id>] [--verbose]");
        process::exit(0);
    }

    let snapshot_path = &args[1];
    let mut project = None;
    let mut verbose = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--project" if i + 1 < args.len() => {
                i += 1;
                project = Some(args[i].clone());
            }
            "--verbose" | "-v" => verbose = true,
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    init_tracing(verbose);

    let path = Path::new(snapshot_path);
    let mut snapshots = Vec::new();
    if path.is_file() {
        match ProjectSnapshot::load_json(path) {
            Ok(snapshot) => snapshots.push((path.display().to_string(), snapshot)),
            Err(e) => {
                eprintln!("ERROR: Failed to load snapshot: {}", e);
                process::exit(1);
            }
        }
    } else if path.is_dir() {
        load_snapshots_recursive(path, &mut snapshots);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", snapshot_path);
        process::exit(1);
    }

    let analyzer = Analyzer::default();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for (name, snapshot) in &snapshots {
        let artifacts: Vec<Artifact> = match project.as_deref().or(snapshot.project_id.as_deref()) {
            Some(id) => snapshot.scoped(id),
            None => snapshot.artifacts.clone(),
        };
        let analysis = match analyzer.analyze(&artifacts) {
            Ok(analysis) => analysis,
            Err(e) => {
                eprintln!("ERROR: {}: {}", name, e);
                total_errors += 1;
                continue;
            }
        };
        let (errors, warnings) = lint_report(&analysis.integrity);

        println!("\n=== {} ===\n", name);
        println!(
            "{} artifacts, {} relations",
            analysis.integrity.artifact_count, analysis.integrity.relation_count
        );

        if errors.is_empty() && warnings.is_empty() {
            println!("All checks passed!");
        }
        for warning in &warnings {
            println!("WARNING: {}", warning);
        }
        for error in &errors {
            println!("ERROR: {}", error);
        }

        total_errors += errors.len();
        total_warnings += warnings.len();
    }

    println!(
        "\nSummary: {} snapshots, {} errors, {} warnings",
        snapshots.len(),
        total_errors,
        total_warnings
    );

    if total_errors == 0 {
        process::exit(0);
    } else {
        process::exit(1);
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

fn load_snapshots_recursive(dir: &Path, snapshots: &mut Vec<(String, ProjectSnapshot)>) {
    let mut entries: Vec<_> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|e| e.path()).collect(),
        Err(e) => {
            eprintln!("  ERROR reading {}: {}", dir.display(), e);
            return;
        }
    };
    entries.sort();
    for path in entries {
        if path.is_dir() {
            load_snapshots_recursive(&path, snapshots);
        } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
            match ProjectSnapshot::load_json(&path) {
                Ok(snapshot) => {
                    println!("  Loaded: {}", path.display());
                    snapshots.push((path.display().to_string(), snapshot));
                }
                Err(e) => {
                    eprintln!("  ERROR loading {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Duplicate IDs and dangling targets are errors; everything else the
/// analyzers silently skipped is a warning.
fn lint_report(report: &IntegrityReport) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for id in &report.duplicate_ids {
        errors.push(format!("Artifact ID '{}' appears more than once", id));
    }

    for dangling in &report.dangling_relations {
        errors.push(format!(
            "'{}' has a '{}' relation to missing artifact '{}'",
            dangling.from_id, dangling.kind, dangling.to_id
        ));
    }

    for (kind, count) in &report.unrecognized_kinds {
        warnings.push(format!(
            "Relation kind '{}' is not recognized by any analyzer ({} uses)",
            kind, count
        ));
    }

    for undated in &report.unparseable_dates {
        warnings.push(format!(
            "Event '{}' on timeline '{}' has no usable year (date: {})",
            undated.title,
            undated.timeline_id,
            undated.date.as_deref().unwrap_or("missing")
        ));
    }

    for id in &report.characters_outside_trees {
        warnings.push(format!(
            "Character '{}' is unreachable from every family tree root (parent cycle?)",
            id
        ));
    }

    (errors, warnings)
}
