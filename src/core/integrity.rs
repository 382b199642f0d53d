/// Tally of everything the silent-skip policy dropped during a pass.
///
/// Analysis never fails on messy data; this report is how tooling finds
/// out what was ignored.
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::relation_index::ArtifactLookup;
use crate::core::world_age::UndatedEvent;
use crate::schema::artifact::{Artifact, ArtifactId, ArtifactType};
use crate::schema::derived::FamilyTreeNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingRelation {
    pub from_id: ArtifactId,
    pub to_id: ArtifactId,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnparseableDate {
    pub timeline_id: ArtifactId,
    pub event_id: String,
    pub title: String,
    pub date: Option<String>,
}

impl From<UndatedEvent> for UnparseableDate {
    fn from(event: UndatedEvent) -> Self {
        Self {
            timeline_id: event.timeline_id,
            event_id: event.event_id,
            title: event.title,
            date: event.date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub artifact_count: usize,
    pub relation_count: usize,
    pub duplicate_ids: Vec<ArtifactId>,
    pub dangling_relations: Vec<DanglingRelation>,
    /// Normalized kind → occurrences, for kinds no analyzer recognizes.
    pub unrecognized_kinds: BTreeMap<String, usize>,
    pub unparseable_dates: Vec<UnparseableDate>,
    /// Characters reachable from no family tree root (a parent cycle
    /// detached from every root).
    pub characters_outside_trees: Vec<ArtifactId>,
}

impl IntegrityReport {
    /// Relation-level checks over the raw artifact list.
    pub fn inspect(artifacts: &[Artifact], lookup: &ArtifactLookup<'_>) -> Self {
        let mut report = Self {
            artifact_count: artifacts.len(),
            ..Self::default()
        };

        let mut seen: FxHashSet<&ArtifactId> = FxHashSet::default();
        for artifact in artifacts {
            if !seen.insert(&artifact.id) && !report.duplicate_ids.contains(&artifact.id) {
                report.duplicate_ids.push(artifact.id.clone());
            }
            for relation in &artifact.relations {
                report.relation_count += 1;
                if !lookup.contains(&relation.to_id) {
                    report.dangling_relations.push(DanglingRelation {
                        from_id: artifact.id.clone(),
                        to_id: relation.to_id.clone(),
                        kind: relation.kind.clone(),
                    });
                    continue;
                }
                let kind = relation.classify();
                if !kind.is_recognized() {
                    *report
                        .unrecognized_kinds
                        .entry(kind.key().to_string())
                        .or_default() += 1;
                }
            }
        }
        report.duplicate_ids.sort();
        report
    }

    pub fn with_undated(mut self, undated: Vec<UndatedEvent>) -> Self {
        self.unparseable_dates = undated.into_iter().map(UnparseableDate::from).collect();
        self
    }

    /// Record characters that appear in none of `trees`.
    pub fn with_tree_coverage(mut self, artifacts: &[Artifact], trees: &[FamilyTreeNode]) -> Self {
        let covered: FxHashSet<&ArtifactId> = trees
            .iter()
            .flat_map(|tree| tree.walk())
            .map(|node| node.id())
            .collect();
        let mut outside: Vec<ArtifactId> = artifacts
            .iter()
            .filter(|a| a.is(&ArtifactType::Character) && !covered.contains(&a.id))
            .map(|a| a.id.clone())
            .collect();
        outside.sort();
        outside.dedup();
        self.characters_outside_trees = outside;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.dangling_relations.is_empty()
            && self.characters_outside_trees.is_empty()
    }
}
