use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use super::artifact::Artifact;
use super::lenient_items;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot must be an artifact list or an object with an `artifacts` list")]
    Shape,
}

/// A project's full artifact set, as handed over by the persistence layer.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub project_id: Option<String>,
    pub artifacts: Vec<Artifact>,
}

impl ProjectSnapshot {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self {
            project_id: None,
            artifacts,
        }
    }

    /// Parse either a bare artifact array or `{ "projectId": .., "artifacts": [..] }`.
    /// Artifacts that fail to decode (no id, no type) are skipped.
    pub fn from_json_str(input: &str) -> Result<Self, SnapshotError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        match value {
            serde_json::Value::Array(items) => Ok(Self::new(lenient_items(
                serde_json::Value::Array(items),
            ))),
            serde_json::Value::Object(mut map) => {
                let artifacts = map.remove("artifacts").ok_or(SnapshotError::Shape)?;
                let project_id = map
                    .get("projectId")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string);
                Ok(Self {
                    project_id,
                    artifacts: lenient_items(artifacts),
                })
            }
            _ => Err(SnapshotError::Shape),
        }
    }

    pub fn load_json(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Artifacts that belong to `project_id`.
    pub fn scoped(&self, project_id: &str) -> Vec<Artifact> {
        self.artifacts
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect()
    }
}
