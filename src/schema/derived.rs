//! Derived views. Recomputed on every analysis pass and never persisted.

use serde::{Deserialize, Serialize};

use super::artifact::{Artifact, ArtifactId};

/// How settled a constraint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintStatus {
    Stable,
    Volatile,
    Forbidden,
    Unknown,
}

impl ConstraintStatus {
    /// Sort rank, most urgent first.
    pub fn severity_rank(self) -> u8 {
        match self {
            Self::Forbidden => 0,
            Self::Volatile => 1,
            Self::Stable => 2,
            Self::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Volatile => "volatile",
            Self::Forbidden => "forbidden",
            Self::Unknown => "unknown",
        }
    }

    /// Parse an explicit stability tag from a source record. Blank tags are
    /// `None`; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(match label.to_ascii_lowercase().as_str() {
            "stable" => Self::Stable,
            "volatile" => Self::Volatile,
            "forbidden" => Self::Forbidden,
            _ => Self::Unknown,
        })
    }
}

/// Whether a constraint belongs to the physical or the metaphysical world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Physics,
    Metaphysics,
}

impl ConstraintType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physics => "physics",
            Self::Metaphysics => "metaphysics",
        }
    }
}

/// A rule, hazard or effect mined from an artifact's free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintAnnotation {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    pub status: ConstraintStatus,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub related_artifact_ids: Vec<ArtifactId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactionStability {
    Stable,
    Shifting,
    Volatile,
}

impl FactionStability {
    /// Sort rank, most concerning first.
    pub fn severity_rank(self) -> u8 {
        match self {
            Self::Volatile => 0,
            Self::Shifting => 1,
            Self::Stable => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionConflictSummary {
    pub id: ArtifactId,
    pub faction_name: String,
    pub alliances: Vec<String>,
    pub rivalries: Vec<String>,
    pub tensions: Vec<String>,
    pub stability: FactionStability,
    pub summary: String,
}

/// One character in a genealogical tree, with canonical descendants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyTreeNode {
    pub character: Artifact,
    pub children: Vec<FamilyTreeNode>,
    pub partners: Vec<Artifact>,
    pub siblings: Vec<Artifact>,
}

impl FamilyTreeNode {
    pub fn id(&self) -> &ArtifactId {
        &self.character.id
    }

    /// Depth-first walk over this node and all descendants.
    pub fn walk(&self) -> Vec<&FamilyTreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Number of generations below and including this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(FamilyTreeNode::depth).max().unwrap_or(0)
    }
}

/// A contiguous year range of the world's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldAgeSegment {
    pub label: String,
    pub start: i64,
    pub end: i64,
    pub event_count: usize,
    pub signature: String,
    pub related_event_titles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldAgeProgression {
    pub current_age: Option<WorldAgeSegment>,
    pub upcoming_age: Option<WorldAgeSegment>,
    pub eras: Vec<WorldAgeSegment>,
    pub last_recorded_year: Option<i64>,
    /// Events with a missing or unparseable date.
    pub unparseable_event_count: usize,
}
