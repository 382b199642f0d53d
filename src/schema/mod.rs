//! Input records (artifacts, relations, type-specific payloads) and the
//! derived records the analyzers produce.

pub mod artifact;
pub mod derived;
pub mod payload;
pub mod relation;
pub mod snapshot;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserialize a list, dropping elements that do not fit `T` instead of
/// failing the whole record. A non-list value yields an empty list.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_items(raw))
}

pub(crate) fn lenient_items<T: DeserializeOwned>(raw: serde_json::Value) -> Vec<T> {
    match raw {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::trace!(%err, "skipping malformed list element");
                    None
                }
            })
            .collect(),
        serde_json::Value::Null => Vec::new(),
        other => {
            tracing::trace!(value = %other, "expected a list, ignoring");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_items_skips_bad_elements() {
        let tags: Vec<String> = lenient_items(json!(["noble", 42, null, "exiled"]));
        assert_eq!(tags, vec!["noble".to_string(), "exiled".to_string()]);
    }

    #[test]
    fn lenient_items_non_list_is_empty() {
        let tags: Vec<String> = lenient_items(json!("noble"));
        assert!(tags.is_empty());
        let tags: Vec<String> = lenient_items(serde_json::Value::Null);
        assert!(tags.is_empty());
    }
}
