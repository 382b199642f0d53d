/// The analysis facade: artifacts in, every derived view out.
///
/// Wires together the relation index, family trees, faction network,
/// world ages, constraint annotations and the integrity report.
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::classifier::KeywordClassifier;
use crate::core::config::{AnalysisConfig, ConfigError};
use crate::core::constraints::ConstraintAnnotator;
use crate::core::faction_network::FactionNetworkAnalyzer;
use crate::core::family_tree::{FamilyTreeBuilder, FamilyTreeError};
use crate::core::integrity::IntegrityReport;
use crate::core::relation_index::{ArtifactLookup, RelationIndex};
use crate::core::world_age::{collect_events, WorldAgeSegmenter};
use crate::schema::artifact::{Artifact, ArtifactId};
use crate::schema::derived::{
    ConstraintAnnotation, FactionConflictSummary, FamilyTreeNode, WorldAgeProgression,
};
use crate::schema::snapshot::SnapshotError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("family tree error: {0}")]
    FamilyTree(#[from] FamilyTreeError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Every derived view for one snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAnalysis {
    pub family_trees: Vec<FamilyTreeNode>,
    pub faction_summaries: Vec<FactionConflictSummary>,
    pub world_ages: WorldAgeProgression,
    pub constraints: Vec<ConstraintAnnotation>,
    pub integrity: IntegrityReport,
}

/// Holds only immutable configuration; every call is independent.
#[derive(Debug, Clone)]
pub struct Analyzer {
    classifier: KeywordClassifier,
    era_names: Vec<String>,
}

/// Builder for constructing an `Analyzer`.
#[derive(Default)]
pub struct AnalyzerBuilder {
    config: Option<AnalysisConfig>,
    config_path: Option<PathBuf>,
    /// Directly provided classifier (overrides lexicons from config).
    classifier: Option<KeywordClassifier>,
}

impl Default for Analyzer {
    fn default() -> Self {
        let config = AnalysisConfig::default();
        Self {
            classifier: KeywordClassifier::default(),
            era_names: config.era_names,
        }
    }
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    pub fn classifier(&self) -> &KeywordClassifier {
        &self.classifier
    }

    /// Run every analyzer over `artifacts`.
    pub fn analyze(&self, artifacts: &[Artifact]) -> Result<GraphAnalysis, AnalysisError> {
        let lookup = ArtifactLookup::new(artifacts);
        let index = RelationIndex::build_with(artifacts, &lookup);

        let family_trees = FamilyTreeBuilder::new(artifacts, &index).build();
        let faction_summaries =
            FactionNetworkAnalyzer::new(&index, &lookup, &self.classifier).summarize(artifacts);

        let (dated, undated) = collect_events(artifacts);
        let mut world_ages = self.segmenter().segment_events(dated);
        world_ages.unparseable_event_count = undated.len();

        let constraints = ConstraintAnnotator::new(&self.classifier, &lookup).annotate(artifacts);

        let integrity = IntegrityReport::inspect(artifacts, &lookup)
            .with_undated(undated)
            .with_tree_coverage(artifacts, &family_trees);

        debug!(
            artifacts = artifacts.len(),
            trees = family_trees.len(),
            factions = faction_summaries.len(),
            eras = world_ages.eras.len(),
            constraints = constraints.len(),
            "analysis complete"
        );

        Ok(GraphAnalysis {
            family_trees,
            faction_summaries,
            world_ages,
            constraints,
            integrity,
        })
    }

    /// `analyze` over the artifacts belonging to `project_id` only.
    pub fn analyze_project(
        &self,
        artifacts: &[Artifact],
        project_id: &str,
    ) -> Result<GraphAnalysis, AnalysisError> {
        let scoped: Vec<Artifact> = artifacts
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect();
        self.analyze(&scoped)
    }

    pub fn family_trees(&self, artifacts: &[Artifact]) -> Vec<FamilyTreeNode> {
        let index = RelationIndex::build(artifacts);
        FamilyTreeBuilder::new(artifacts, &index).build()
    }

    /// Trees for explicit roots; an ID that is not a character in
    /// `artifacts` is a caller bug and fails the call.
    pub fn family_trees_from(
        &self,
        artifacts: &[Artifact],
        roots: &[ArtifactId],
    ) -> Result<Vec<FamilyTreeNode>, AnalysisError> {
        let index = RelationIndex::build(artifacts);
        Ok(FamilyTreeBuilder::new(artifacts, &index).build_from_roots(roots)?)
    }

    pub fn faction_summaries(&self, artifacts: &[Artifact]) -> Vec<FactionConflictSummary> {
        let lookup = ArtifactLookup::new(artifacts);
        let index = RelationIndex::build_with(artifacts, &lookup);
        FactionNetworkAnalyzer::new(&index, &lookup, &self.classifier).summarize(artifacts)
    }

    pub fn world_ages(&self, artifacts: &[Artifact]) -> WorldAgeProgression {
        self.segmenter().segment(artifacts)
    }

    pub fn constraints(&self, artifacts: &[Artifact]) -> Vec<ConstraintAnnotation> {
        let lookup = ArtifactLookup::new(artifacts);
        ConstraintAnnotator::new(&self.classifier, &lookup).annotate(artifacts)
    }

    fn segmenter(&self) -> WorldAgeSegmenter {
        WorldAgeSegmenter::new(self.era_names.clone())
    }
}

impl AnalyzerBuilder {
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a RON file at build time.
    pub fn config_file(mut self, path: &Path) -> Self {
        self.config_path = Some(path.to_path_buf());
        self
    }

    /// Provide a classifier directly (for custom lexicon strategies).
    pub fn with_classifier(mut self, classifier: KeywordClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn build(self) -> Result<Analyzer, AnalysisError> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => AnalysisConfig::load_from_ron(&path)?,
            (None, None) => AnalysisConfig::default(),
        };
        let classifier = match self.classifier {
            Some(classifier) => classifier,
            None => config.classifier()?,
        };
        Ok(Analyzer {
            classifier,
            era_names: config.era_names,
        })
    }
}

/// [`Analyzer::analyze`] with the default configuration.
pub fn analyze(artifacts: &[Artifact]) -> Result<GraphAnalysis, AnalysisError> {
    Analyzer::default().analyze(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::LexiconSet;
    use crate::schema::artifact::ArtifactType;
    use crate::schema::derived::ConstraintStatus;
    use crate::schema::relation::Relation;
    use serde_json::json;

    fn small_world() -> Vec<Artifact> {
        let mut elder = Artifact::new("c1", ArtifactType::Character, "Elder");
        elder.project_id = "p1".to_string();
        elder.relations = vec![Relation::new("c2", "PARENT_OF")];
        let mut heir = Artifact::new("c2", ArtifactType::Character, "Heir");
        heir.project_id = "p1".to_string();

        let mut guild = Artifact::new("f1", ArtifactType::Faction, "Guild");
        guild.project_id = "p1".to_string();
        guild.relations = vec![Relation::new("f2", "ENEMY_OF")];
        let mut crown = Artifact::new("f2", ArtifactType::Faction, "Crown");
        crown.project_id = "p2".to_string();

        let mut chronicle = Artifact::new("t1", ArtifactType::Timeline, "Chronicle");
        chronicle.project_id = "p1".to_string();
        chronicle.data = json!({"events": [
            {"id": "e1", "title": "Founding", "date": "1"},
            {"id": "e2", "title": "Storm years", "date": "80"},
            {"id": "e3", "title": "Rumour"}
        ]});

        vec![elder, heir, guild, crown, chronicle]
    }

    #[test]
    fn analyze_produces_every_view() {
        let analysis = analyze(&small_world()).unwrap();
        assert_eq!(analysis.family_trees.len(), 1);
        assert_eq!(analysis.family_trees[0].children[0].character.title, "Heir");
        assert_eq!(analysis.faction_summaries.len(), 2);
        assert_eq!(analysis.faction_summaries[0].faction_name, "Guild");
        assert_eq!(analysis.world_ages.eras.len(), 2);
        assert_eq!(analysis.world_ages.unparseable_event_count, 1);
        assert_eq!(analysis.integrity.unparseable_dates.len(), 1);
        assert_eq!(analysis.constraints.len(), 1);
        assert_eq!(analysis.constraints[0].label, "Storm years");
    }

    #[test]
    fn analyze_is_idempotent() {
        let world = small_world();
        let first = serde_json::to_string(&analyze(&world).unwrap()).unwrap();
        let second = serde_json::to_string(&analyze(&world).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn analyze_project_scopes_artifacts() {
        let analysis = Analyzer::default()
            .analyze_project(&small_world(), "p1")
            .unwrap();
        assert_eq!(analysis.faction_summaries.len(), 1);
        // Crown lives in another project, so the rivalry dangles.
        assert!(analysis.faction_summaries[0].rivalries.is_empty());
        assert_eq!(analysis.integrity.dangling_relations.len(), 1);
    }

    #[test]
    fn builder_applies_config() {
        let config = AnalysisConfig::parse_ron(r#"(era_names: ["Dawn", "Dusk"])"#).unwrap();
        let analyzer = Analyzer::builder().config(config).build().unwrap();
        let ages = analyzer.world_ages(&small_world());
        let labels: Vec<&str> = ages.eras.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Dawn", "Dusk"]);
    }

    #[test]
    fn builder_with_classifier() {
        let lexicons = LexiconSet::from_terms(&["rumour"], &[], &[], &[]).unwrap();
        let analyzer = Analyzer::builder()
            .with_classifier(KeywordClassifier::new(lexicons))
            .build()
            .unwrap();
        let constraints = analyzer.constraints(&small_world());
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].label, "Rumour");
        assert_eq!(constraints[0].status, ConstraintStatus::Forbidden);
    }

    #[test]
    fn builder_missing_config_file_fails() {
        let result = Analyzer::builder()
            .config_file(Path::new("tests/fixtures/nope.ron"))
            .build();
        assert!(matches!(result, Err(AnalysisError::Config(ConfigError::Io(_)))));
    }

    #[test]
    fn analyzer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();
    }

    #[test]
    fn explicit_unknown_root_surfaces_error() {
        let result =
            Analyzer::default().family_trees_from(&small_world(), &[ArtifactId::from("f1")]);
        assert!(matches!(
            result,
            Err(AnalysisError::FamilyTree(FamilyTreeError::UnknownCharacter(_)))
        ));
    }
}
