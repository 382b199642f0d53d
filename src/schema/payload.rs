//! Type-specific artifact payloads, decoded on demand from `Artifact::data`.

use serde::{Deserialize, Serialize};

use super::lenient_vec;

/// A dated (or undated) entry on a timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Free-form: "1203", "-40", "2024-05-01", "Year 300 of the Reign".
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineData {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagicPrinciple {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit tag: "stable", "volatile" or "forbidden".
    #[serde(default)]
    pub stability: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagicSource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resonance: Option<String>,
    #[serde(default)]
    pub stability: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagicRitual {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub stability: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagicTaboo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub consequence: Option<String>,
}

/// A loose observation. Accepts either `"text"` or `{ "id": .., "text": .. }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "FieldNoteRepr")]
pub struct FieldNote {
    pub id: Option<String>,
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldNoteRepr {
    Text(String),
    Full {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        text: String,
    },
}

impl From<FieldNoteRepr> for FieldNote {
    fn from(repr: FieldNoteRepr) -> Self {
        match repr {
            FieldNoteRepr::Text(text) => Self { id: None, text },
            FieldNoteRepr::Full { id, text } => Self { id, text },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicSystemData {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub principles: Vec<MagicPrinciple>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub sources: Vec<MagicSource>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub rituals: Vec<MagicRitual>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub taboos: Vec<MagicTaboo>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub field_notes: Vec<FieldNote>,
}

/// A notable feature of a location. Accepts a bare name string too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "LocationFeatureRepr")]
pub struct LocationFeature {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocationFeatureRepr {
    Name(String),
    Full {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<LocationFeatureRepr> for LocationFeature {
    fn from(repr: LocationFeatureRepr) -> Self {
        match repr {
            LocationFeatureRepr::Name(name) => Self {
                id: None,
                name,
                description: None,
            },
            LocationFeatureRepr::Full {
                id,
                name,
                description,
            } => Self {
                id,
                name,
                description,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationData {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub features: Vec<LocationFeature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiData {
    #[serde(default)]
    pub content: Option<String>,
}

/// Trimmed, non-empty text or `None`.
pub(crate) fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
