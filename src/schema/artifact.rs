use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::lenient_vec;
use super::relation::Relation;

/// Newtype wrapper for artifact IDs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub String);

impl ArtifactId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ArtifactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The kind of content an artifact holds.
///
/// Unknown type strings are kept verbatim in `Other` so a newer editor can
/// hand the engine artifacts it does not analyze.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtifactType {
    Character,
    Location,
    Faction,
    MagicSystem,
    Timeline,
    Wiki,
    Task,
    Other(String),
}

impl ArtifactType {
    /// Wire name: "character", "magic_system", ...
    pub fn as_str(&self) -> &str {
        match self {
            Self::Character => "character",
            Self::Location => "location",
            Self::Faction => "faction",
            Self::MagicSystem => "magic_system",
            Self::Timeline => "timeline",
            Self::Wiki => "wiki",
            Self::Task => "task",
            Self::Other(raw) => raw,
        }
    }

    /// Case-insensitive; accepts `magic_system`, `magicSystem`, `Magic System`
    /// and similar spellings.
    pub fn parse(raw: &str) -> Self {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "character" => Self::Character,
            "location" => Self::Location,
            "faction" => Self::Faction,
            "magicsystem" | "magic" => Self::MagicSystem,
            "timeline" => Self::Timeline,
            "wiki" => Self::Wiki,
            "task" => Self::Task,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl From<String> for ArtifactType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ArtifactType> for String {
    fn from(value: ArtifactType) -> Self {
        value.as_str().to_string()
    }
}

/// A titled, typed content record owned by a project.
///
/// The engine treats artifacts as read-only input. Every list field
/// deserializes leniently: a malformed tag or relation is dropped, the
/// artifact is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: ArtifactId,
    #[serde(default)]
    pub project_id: String,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub relations: Vec<Relation>,
    /// Type-specific payload, read through [`Artifact::payload`].
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Artifact {
    /// Minimal constructor; the remaining fields start empty.
    pub fn new(id: impl Into<ArtifactId>, artifact_type: ArtifactType, title: &str) -> Self {
        Self {
            id: id.into(),
            project_id: String::new(),
            artifact_type,
            title: title.to_string(),
            summary: String::new(),
            tags: Vec::new(),
            relations: Vec::new(),
            data: serde_json::Value::Null,
        }
    }

    pub fn is(&self, artifact_type: &ArtifactType) -> bool {
        &self.artifact_type == artifact_type
    }

    /// Returns true if this artifact carries the given tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Decode the type-specific payload. A payload that does not match `T`
    /// decodes as `T::default()`.
    pub fn payload<T: DeserializeOwned + Default>(&self) -> T {
        if self.data.is_null() {
            return T::default();
        }
        match T::deserialize(&self.data) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(artifact = %self.id, %err, "payload did not decode, using empty default");
                T::default()
            }
        }
    }

    /// Title for display, falling back to the raw ID when blank.
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            self.id.as_str()
        } else {
            title
        }
    }
}

/// Ordering for anything sorted "by title".
///
/// Case-insensitive first, then exact, so "aiden" and "Aiden" stay adjacent
/// but still resolve the same way every time.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Title order with the artifact ID as the final tie-break.
pub fn compare_artifacts(a: &Artifact, b: &Artifact) -> Ordering {
    compare_titles(a.display_title(), b.display_title()).then_with(|| a.id.cmp(&b.id))
}
