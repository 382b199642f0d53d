/// Genealogical trees over Character artifacts.
///
/// Each child hangs under exactly one canonical parent, so a tree never
/// repeats a subtree; path-local visited sets keep data-error cycles from
/// recursing forever.
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

use crate::core::relation_index::RelationIndex;
use crate::schema::artifact::{compare_artifacts, Artifact, ArtifactId, ArtifactType};
use crate::schema::derived::FamilyTreeNode;

#[derive(Debug, Error)]
pub enum FamilyTreeError {
    /// A caller asked for a root that is not a character in this snapshot.
    #[error("unknown character: {0}")]
    UnknownCharacter(ArtifactId),
}

pub struct FamilyTreeBuilder<'a> {
    index: &'a RelationIndex,
    characters: FxHashMap<&'a ArtifactId, &'a Artifact>,
    /// child → canonical parent
    canonical: FxHashMap<&'a ArtifactId, &'a ArtifactId>,
}

impl<'a> FamilyTreeBuilder<'a> {
    pub fn new(artifacts: &'a [Artifact], index: &'a RelationIndex) -> Self {
        let mut characters: FxHashMap<&'a ArtifactId, &'a Artifact> = FxHashMap::default();
        for artifact in artifacts
            .iter()
            .filter(|a| a.is(&ArtifactType::Character))
        {
            characters.entry(&artifact.id).or_insert(artifact);
        }

        let mut builder = Self {
            index,
            characters,
            canonical: FxHashMap::default(),
        };
        let canonical: FxHashMap<&'a ArtifactId, &'a ArtifactId> = builder
            .characters
            .values()
            .copied()
            .filter_map(|child| {
                builder
                    .parents_of(&child.id)
                    .into_iter()
                    .next()
                    .map(|parent| (&child.id, &parent.id))
            })
            .collect();
        builder.canonical = canonical;
        builder
    }

    /// Character parents of `id`, alphabetically first (the canonical one) first.
    pub fn parents_of(&self, id: &ArtifactId) -> Vec<&'a Artifact> {
        let mut parents: Vec<&'a Artifact> = self
            .index
            .parents(id)
            .iter()
            .filter_map(|pid| self.characters.get(pid).copied())
            .collect();
        parents.sort_by(|a, b| compare_artifacts(a, b));
        parents
    }

    /// The parent `id` is drawn under, if it has any character parent.
    pub fn canonical_parent(&self, id: &ArtifactId) -> Option<&'a ArtifactId> {
        self.canonical.get(id).copied()
    }

    /// Characters without recorded parents, sorted by title. When every
    /// character has a parent (a cycle or a fully linked cast), every
    /// character is a root.
    pub fn roots(&self) -> Vec<&'a Artifact> {
        let mut roots: Vec<&'a Artifact> = self
            .characters
            .values()
            .copied()
            .filter(|c| !self.canonical.contains_key(&c.id))
            .collect();
        if roots.is_empty() {
            debug!(
                characters = self.characters.len(),
                "no parentless characters, rooting every character"
            );
            roots = self.characters.values().copied().collect();
        }
        roots.sort_by(|a, b| compare_artifacts(a, b));
        roots
    }

    /// One tree per root.
    pub fn build(&self) -> Vec<FamilyTreeNode> {
        let visited = FxHashSet::default();
        self.roots()
            .into_iter()
            .map(|root| self.expand(root, &visited))
            .collect()
    }

    /// Trees for caller-chosen roots, in the order given.
    pub fn build_from_roots(
        &self,
        roots: &[ArtifactId],
    ) -> Result<Vec<FamilyTreeNode>, FamilyTreeError> {
        let resolved = roots
            .iter()
            .map(|id| {
                self.characters
                    .get(id)
                    .copied()
                    .ok_or_else(|| FamilyTreeError::UnknownCharacter(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let visited = FxHashSet::default();
        Ok(resolved
            .into_iter()
            .map(|root| self.expand(root, &visited))
            .collect())
    }

    fn expand(
        &self,
        character: &'a Artifact,
        visited: &FxHashSet<&'a ArtifactId>,
    ) -> FamilyTreeNode {
        let mut path = visited.clone();
        path.insert(&character.id);

        let mut children: Vec<&'a Artifact> = self
            .index
            .children(&character.id)
            .iter()
            .filter_map(|cid| self.characters.get(cid).copied())
            .filter(|child| self.canonical_parent(&child.id) == Some(&character.id))
            .filter(|child| !path.contains(&child.id))
            .collect();
        children.sort_by(|a, b| compare_artifacts(a, b));

        FamilyTreeNode {
            character: character.clone(),
            children: children
                .into_iter()
                .map(|child| self.expand(child, &path))
                .collect(),
            partners: self.sorted_characters(self.index.partners(&character.id)),
            siblings: self.sorted_characters(self.index.siblings(&character.id)),
        }
    }

    fn sorted_characters(&self, ids: &FxHashSet<ArtifactId>) -> Vec<Artifact> {
        let mut found: Vec<&'a Artifact> = ids
            .iter()
            .filter_map(|id| self.characters.get(id).copied())
            .collect();
        found.sort_by(|a, b| compare_artifacts(a, b));
        found.into_iter().cloned().collect()
    }
}
