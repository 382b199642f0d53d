/// Constraint annotations mined from magic systems, locations, timelines
/// and wiki pages.
use std::cmp::Ordering;

use crate::core::classifier::KeywordClassifier;
use crate::core::relation_index::ArtifactLookup;
use crate::schema::artifact::{compare_titles, Artifact, ArtifactId, ArtifactType};
use crate::schema::derived::{ConstraintAnnotation, ConstraintStatus, ConstraintType};
use crate::schema::payload::{non_empty, LocationData, MagicSystemData, TimelineData, WikiData};

/// Longest wiki excerpt carried in an annotation summary, in characters.
pub const WIKI_EXCERPT_CHARS: usize = 240;

pub struct ConstraintAnnotator<'a> {
    classifier: &'a KeywordClassifier,
    lookup: &'a ArtifactLookup<'a>,
}

impl<'a> ConstraintAnnotator<'a> {
    pub fn new(classifier: &'a KeywordClassifier, lookup: &'a ArtifactLookup<'a>) -> Self {
        Self { classifier, lookup }
    }

    /// All annotations, most urgent first.
    pub fn annotate(&self, artifacts: &[Artifact]) -> Vec<ConstraintAnnotation> {
        let mut out = Vec::new();
        for artifact in artifacts {
            match artifact.artifact_type {
                ArtifactType::MagicSystem => self.magic_system(artifact, &mut out),
                ArtifactType::Location => self.location(artifact, &mut out),
                ArtifactType::Timeline => self.timeline(artifact, &mut out),
                ArtifactType::Wiki => self.wiki(artifact, &mut out),
                _ => {}
            }
        }
        out.sort_by(compare_annotations);
        tracing::debug!(annotations = out.len(), "constraints annotated");
        out
    }

    fn magic_system(&self, artifact: &Artifact, out: &mut Vec<ConstraintAnnotation>) {
        let data: MagicSystemData = artifact.payload();

        for (i, principle) in data.principles.iter().enumerate() {
            let summary = non_empty(principle.focus.as_deref())
                .or_else(|| non_empty(principle.description.as_deref()))
                .unwrap_or_default();
            out.push(self.annotation(
                artifact,
                item_id(artifact, "principle", &principle.id, i),
                &principle.title,
                summary,
                explicit_status(principle.stability.as_deref()),
            ));
        }
        for (i, source) in data.sources.iter().enumerate() {
            out.push(self.annotation(
                artifact,
                item_id(artifact, "source", &source.id, i),
                &source.name,
                non_empty(source.resonance.as_deref()).unwrap_or_default(),
                explicit_status(source.stability.as_deref()),
            ));
        }
        for (i, ritual) in data.rituals.iter().enumerate() {
            out.push(self.annotation(
                artifact,
                item_id(artifact, "ritual", &ritual.id, i),
                &ritual.name,
                non_empty(ritual.effect.as_deref()).unwrap_or_default(),
                explicit_status(ritual.stability.as_deref()),
            ));
        }
        for (i, taboo) in data.taboos.iter().enumerate() {
            out.push(self.annotation(
                artifact,
                item_id(artifact, "taboo", &taboo.id, i),
                &taboo.rule,
                non_empty(taboo.consequence.as_deref()).unwrap_or_default(),
                ConstraintStatus::Forbidden,
            ));
        }
        for (i, note) in data.field_notes.iter().enumerate() {
            if note.text.trim().is_empty() {
                continue;
            }
            out.push(self.annotation(
                artifact,
                item_id(artifact, "note", note.id.as_deref().unwrap_or_default(), i),
                "Field note",
                note.text.trim(),
                ConstraintStatus::Stable,
            ));
        }
    }

    fn location(&self, artifact: &Artifact, out: &mut Vec<ConstraintAnnotation>) {
        let data: LocationData = artifact.payload();
        if let Some(description) = non_empty(data.description.as_deref()) {
            out.push(self.annotation(
                artifact,
                format!("{}:environment", artifact.id),
                &format!("{} environment", artifact.display_title()),
                description,
                ConstraintStatus::Stable,
            ));
        }
        for (i, feature) in data.features.iter().enumerate() {
            if feature.name.trim().is_empty() {
                continue;
            }
            let summary = non_empty(feature.description.as_deref()).unwrap_or(feature.name.trim());
            out.push(self.annotation(
                artifact,
                item_id(artifact, "feature", feature.id.as_deref().unwrap_or_default(), i),
                feature.name.trim(),
                summary,
                ConstraintStatus::Stable,
            ));
        }
    }

    fn timeline(&self, artifact: &Artifact, out: &mut Vec<ConstraintAnnotation>) {
        let data: TimelineData = artifact.payload();
        for (i, event) in data.events.iter().enumerate() {
            let summary = non_empty(event.description.as_deref()).unwrap_or_default();
            let mut annotation = self.annotation(
                artifact,
                item_id(artifact, "event", &event.id, i),
                &event.title,
                summary,
                ConstraintStatus::Stable,
            );
            // Benign entries are noise on the constraints screen.
            if annotation.status == ConstraintStatus::Stable
                && annotation.constraint_type == ConstraintType::Metaphysics
            {
                continue;
            }
            if let Some(date) = non_empty(event.date.as_deref()) {
                annotation.detail = Some(format!("{} ({})", artifact.display_title(), date));
            }
            out.push(annotation);
        }
    }

    fn wiki(&self, artifact: &Artifact, out: &mut Vec<ConstraintAnnotation>) {
        let data: WikiData = artifact.payload();
        let content = non_empty(data.content.as_deref())
            .or_else(|| non_empty(Some(artifact.summary.as_str())));
        let Some(content) = content else {
            return;
        };
        let status = self
            .classifier
            .classify_status(content, ConstraintStatus::Stable);
        if status == ConstraintStatus::Stable {
            return;
        }
        out.push(ConstraintAnnotation {
            id: format!("{}:wiki", artifact.id),
            label: artifact.display_title().to_string(),
            constraint_type: self.classifier.classify_type(content, None),
            status,
            summary: excerpt(content, WIKI_EXCERPT_CHARS),
            detail: None,
            related_artifact_ids: self.related_ids(artifact),
        });
    }

    fn annotation(
        &self,
        artifact: &Artifact,
        id: String,
        label: &str,
        summary: &str,
        fallback: ConstraintStatus,
    ) -> ConstraintAnnotation {
        let label = label.trim();
        let text = format!("{label} {summary}");
        ConstraintAnnotation {
            id,
            label: if label.is_empty() {
                artifact.display_title().to_string()
            } else {
                label.to_string()
            },
            constraint_type: self.classifier.classify_type(&text, None),
            status: self.classifier.classify_status(&text, fallback),
            summary: summary.to_string(),
            detail: Some(artifact.display_title().to_string()),
            related_artifact_ids: self.related_ids(artifact),
        }
    }

    /// The source artifact plus every relation target that resolves.
    fn related_ids(&self, artifact: &Artifact) -> Vec<ArtifactId> {
        let mut ids = vec![artifact.id.clone()];
        for relation in &artifact.relations {
            if self.lookup.contains(&relation.to_id) && !ids.contains(&relation.to_id) {
                ids.push(relation.to_id.clone());
            }
        }
        ids
    }
}

fn explicit_status(label: Option<&str>) -> ConstraintStatus {
    label
        .and_then(ConstraintStatus::from_label)
        .unwrap_or(ConstraintStatus::Stable)
}

fn item_id(artifact: &Artifact, kind: &str, id: &str, position: usize) -> String {
    let id = id.trim();
    if id.is_empty() {
        format!("{}:{}:{}", artifact.id, kind, position)
    } else {
        format!("{}:{}:{}", artifact.id, kind, id)
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

fn compare_annotations(a: &ConstraintAnnotation, b: &ConstraintAnnotation) -> Ordering {
    a.status
        .severity_rank()
        .cmp(&b.status.severity_rank())
        .then_with(|| a.constraint_type.as_str().cmp(b.constraint_type.as_str()))
        .then_with(|| compare_titles(&a.label, &b.label))
        .then_with(|| a.id.cmp(&b.id))
}
