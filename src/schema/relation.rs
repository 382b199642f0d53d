use serde::{Deserialize, Serialize};

use super::artifact::ArtifactId;

/// A typed, directional edge stored on its source artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub to_id: ArtifactId,
    #[serde(default)]
    pub kind: String,
}

impl Relation {
    pub fn new(to_id: impl Into<ArtifactId>, kind: &str) -> Self {
        Self {
            to_id: to_id.into(),
            kind: kind.to_string(),
        }
    }

    pub fn classify(&self) -> RelationKind {
        RelationKind::parse(&self.kind)
    }
}

/// The recognized relation vocabulary.
///
/// Kinds arrive as free text; anything outside the vocabulary is carried in
/// `Other` (already normalized) for generic consumers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// `PARENT_OF`: source is a parent of target.
    ParentOf,
    /// `CHILD_OF`: target is a parent of source.
    ChildOf,
    SiblingOf,
    /// `PARTNER_OF`, `MARRIED_TO`, `SPOUSE_OF`.
    PartnerOf,
    /// `ALLY_OF`, `SUPPORTS`, `TRADE_PARTNER`, `PROTECTS`.
    Alliance,
    /// `ENEMY_OF`, `AT_WAR_WITH`, `OPPOSED_TO`, `RIVAL`.
    Rivalry,
    /// `INFLUENCES`, `PRESSURES`, `TENSIONS_WITH`, `COMPETING_FOR`.
    Tension,
    Other(String),
}

impl RelationKind {
    /// Trim, uppercase, and fold spaces and hyphens into underscores.
    pub fn normalize(raw: &str) -> String {
        raw.trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other,
            })
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn parse(raw: &str) -> Self {
        let normalized = Self::normalize(raw);
        match normalized.as_str() {
            "PARENT_OF" => Self::ParentOf,
            "CHILD_OF" => Self::ChildOf,
            "SIBLING_OF" => Self::SiblingOf,
            "PARTNER_OF" | "MARRIED_TO" | "SPOUSE_OF" => Self::PartnerOf,
            "ALLY_OF" | "SUPPORTS" | "TRADE_PARTNER" | "PROTECTS" => Self::Alliance,
            "ENEMY_OF" | "AT_WAR_WITH" | "OPPOSED_TO" | "RIVAL" => Self::Rivalry,
            "INFLUENCES" | "PRESSURES" | "TENSIONS_WITH" | "COMPETING_FOR" => Self::Tension,
            _ => Self::Other(normalized),
        }
    }

    /// Canonical key used by the generic by-kind index.
    pub fn key(&self) -> &str {
        match self {
            Self::ParentOf => "PARENT_OF",
            Self::ChildOf => "CHILD_OF",
            Self::SiblingOf => "SIBLING_OF",
            Self::PartnerOf => "PARTNER_OF",
            Self::Alliance => "ALLY_OF",
            Self::Rivalry => "ENEMY_OF",
            Self::Tension => "TENSIONS_WITH",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_creation() {
        let rel = Relation::new("c2", "parent_of");
        assert_eq!(rel.to_id, ArtifactId::from("c2"));
        assert_eq!(rel.classify(), RelationKind::ParentOf);
    }

    #[test]
    fn parse_is_case_and_space_insensitive() {
        assert_eq!(RelationKind::parse("  married_to "), RelationKind::PartnerOf);
        assert_eq!(RelationKind::parse("At War With"), RelationKind::Rivalry);
        assert_eq!(RelationKind::parse("trade-partner"), RelationKind::Alliance);
        assert_eq!(RelationKind::parse("competing_for"), RelationKind::Tension);
    }

    #[test]
    fn unrecognized_kind_is_normalized_passthrough() {
        let kind = RelationKind::parse("mentor of");
        assert_eq!(kind, RelationKind::Other("MENTOR_OF".to_string()));
        assert_eq!(kind.key(), "MENTOR_OF");
        assert!(!kind.is_recognized());
    }

    #[test]
    fn aliases_share_a_key() {
        assert_eq!(RelationKind::parse("SPOUSE_OF").key(), "PARTNER_OF");
        assert_eq!(RelationKind::parse("protects").key(), "ALLY_OF");
    }
}
