//! WASM bindings for lore-graph. Every call takes a snapshot as JSON text
//! and returns JSON text, so the host never shares memory with the engine.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use lore_graph::core::analysis::Analyzer;
use lore_graph::core::config::AnalysisConfig;
use lore_graph::core::world_age::parse_year;
use lore_graph::schema::artifact::{Artifact, ArtifactId};
use lore_graph::schema::derived::ConstraintStatus;
use lore_graph::schema::snapshot::ProjectSnapshot;

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Classification {
    status: &'static str,
    #[serde(rename = "type")]
    constraint_type: &'static str,
}

fn load_artifacts(snapshot_json: &str) -> Result<Vec<Artifact>, JsError> {
    let snapshot = ProjectSnapshot::from_json_str(snapshot_json)
        .map_err(|e| JsError::new(&format!("Invalid snapshot JSON: {e}")))?;
    Ok(match snapshot.project_id {
        Some(ref id) => snapshot.scoped(id),
        None => snapshot.artifacts,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// ProjectAnalyzer: a configured analyzer kept alive across calls
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct ProjectAnalyzer {
    analyzer: Analyzer,
}

#[wasm_bindgen]
impl ProjectAnalyzer {
    /// Create an analyzer from a RON config. An empty string uses defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_ron: &str) -> Result<ProjectAnalyzer, JsError> {
        let config = if config_ron.trim().is_empty() {
            AnalysisConfig::default()
        } else {
            AnalysisConfig::parse_ron(config_ron)
                .map_err(|e| JsError::new(&format!("Config parse error: {e}")))?
        };
        let analyzer = Analyzer::builder()
            .config(config)
            .build()
            .map_err(|e| JsError::new(&format!("Analyzer build error: {e}")))?;
        Ok(ProjectAnalyzer { analyzer })
    }

    /// Full analysis of a snapshot. Returns a JSON object with
    /// `familyTrees`, `factionSummaries`, `worldAges`, `constraints` and
    /// `integrity`.
    pub fn analyze(&self, snapshot_json: &str) -> Result<String, JsError> {
        let artifacts = load_artifacts(snapshot_json)?;
        let analysis = self
            .analyzer
            .analyze(&artifacts)
            .map_err(|e| JsError::new(&format!("Analysis error: {e}")))?;
        to_json(&analysis)
    }

    /// Family trees. `roots_json` is a JSON array of character IDs, or an
    /// empty string to root at every parentless character.
    #[wasm_bindgen(js_name = familyTrees)]
    pub fn family_trees(&self, snapshot_json: &str, roots_json: &str) -> Result<String, JsError> {
        let artifacts = load_artifacts(snapshot_json)?;
        if roots_json.trim().is_empty() {
            return to_json(&self.analyzer.family_trees(&artifacts));
        }
        let roots: Vec<ArtifactId> = serde_json::from_str(roots_json)
            .map_err(|e| JsError::new(&format!("Invalid roots JSON: {e}")))?;
        let trees = self
            .analyzer
            .family_trees_from(&artifacts, &roots)
            .map_err(|e| JsError::new(&format!("Family tree error: {e}")))?;
        to_json(&trees)
    }

    #[wasm_bindgen(js_name = factionSummaries)]
    pub fn faction_summaries(&self, snapshot_json: &str) -> Result<String, JsError> {
        let artifacts = load_artifacts(snapshot_json)?;
        to_json(&self.analyzer.faction_summaries(&artifacts))
    }

    #[wasm_bindgen(js_name = worldAges)]
    pub fn world_ages(&self, snapshot_json: &str) -> Result<String, JsError> {
        let artifacts = load_artifacts(snapshot_json)?;
        to_json(&self.analyzer.world_ages(&artifacts))
    }

    pub fn constraints(&self, snapshot_json: &str) -> Result<String, JsError> {
        let artifacts = load_artifacts(snapshot_json)?;
        to_json(&self.analyzer.constraints(&artifacts))
    }

    /// Classify a free-text snippet. Returns `{"status": .., "type": ..}`.
    #[wasm_bindgen(js_name = classifyText)]
    pub fn classify_text(&self, text: &str) -> Result<String, JsError> {
        let classifier = self.analyzer.classifier();
        to_json(&Classification {
            status: classifier.classify_status(text, ConstraintStatus::Stable).as_str(),
            constraint_type: classifier.classify_type(text, None).as_str(),
        })
    }
}

// ---------------------------------------------------------------------------
// Free functions with the default configuration
// ---------------------------------------------------------------------------
#[wasm_bindgen(js_name = analyzeSnapshot)]
pub fn analyze_snapshot(snapshot_json: &str) -> Result<String, JsError> {
    ProjectAnalyzer::new("")?.analyze(snapshot_json)
}

#[wasm_bindgen(js_name = familyTrees)]
pub fn family_trees(snapshot_json: &str) -> Result<String, JsError> {
    ProjectAnalyzer::new("")?.family_trees(snapshot_json, "")
}

#[wasm_bindgen(js_name = factionSummaries)]
pub fn faction_summaries(snapshot_json: &str) -> Result<String, JsError> {
    ProjectAnalyzer::new("")?.faction_summaries(snapshot_json)
}

#[wasm_bindgen(js_name = worldAges)]
pub fn world_ages(snapshot_json: &str) -> Result<String, JsError> {
    ProjectAnalyzer::new("")?.world_ages(snapshot_json)
}

#[wasm_bindgen]
pub fn constraints(snapshot_json: &str) -> Result<String, JsError> {
    ProjectAnalyzer::new("")?.constraints(snapshot_json)
}

#[wasm_bindgen(js_name = classifyText)]
pub fn classify_text(text: &str) -> Result<String, JsError> {
    ProjectAnalyzer::new("")?.classify_text(text)
}

/// Year extracted from a free-form date, or `undefined`.
#[wasm_bindgen(js_name = parseYear)]
pub fn parse_year_js(date: &str) -> Option<f64> {
    parse_year(date).map(|year| year as f64)
}
