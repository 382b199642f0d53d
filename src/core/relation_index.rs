/// Typed adjacency over the artifact graph.
///
/// Built once per analysis pass from the flat relation lists embedded in
/// each artifact; every structural analyzer reads from here.
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::schema::artifact::{Artifact, ArtifactId};
use crate::schema::relation::RelationKind;

pub type Adjacency = FxHashMap<ArtifactId, FxHashSet<ArtifactId>>;

/// The relationship roles the structural analyzers consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `parents[x]` = recorded parents of x.
    Parent,
    /// `children[x]` = recorded children of x.
    Child,
    Partner,
    Sibling,
    /// Outbound alliances of the source artifact.
    Ally,
    Rival,
    Tension,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Parent,
        Role::Child,
        Role::Partner,
        Role::Sibling,
        Role::Ally,
        Role::Rival,
        Role::Tension,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Artifact-by-ID lookup, built once per call.
///
/// On duplicate IDs the first artifact wins.
#[derive(Debug, Clone, Default)]
pub struct ArtifactLookup<'a> {
    by_id: FxHashMap<&'a ArtifactId, &'a Artifact>,
}

impl<'a> ArtifactLookup<'a> {
    pub fn new(artifacts: &'a [Artifact]) -> Self {
        let mut by_id = FxHashMap::default();
        for artifact in artifacts {
            if by_id.contains_key(&artifact.id) {
                debug!(id = %artifact.id, "duplicate artifact id, keeping first");
                continue;
            }
            by_id.insert(&artifact.id, artifact);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&'a Artifact> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Title of `id`, or the raw ID when it is unknown or untitled.
    pub fn title_of(&self, id: &ArtifactId) -> String {
        self.get(id)
            .map(|a| a.display_title().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

/// Role-keyed adjacency maps plus a generic by-kind view.
///
/// Every known artifact has an entry (possibly empty) under every role, so
/// callers never distinguish "no entry" from "no edges".
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    roles: [Adjacency; 7],
    by_kind: FxHashMap<String, Adjacency>,
    empty: FxHashSet<ArtifactId>,
}

impl RelationIndex {
    pub fn build(artifacts: &[Artifact]) -> Self {
        let lookup = ArtifactLookup::new(artifacts);
        Self::build_with(artifacts, &lookup)
    }

    pub fn build_with(artifacts: &[Artifact], lookup: &ArtifactLookup<'_>) -> Self {
        let mut index = Self::default();
        for artifact in artifacts {
            for map in index.roles.iter_mut() {
                map.entry(artifact.id.clone()).or_default();
            }
        }

        let mut undirected: FxHashSet<(Role, ArtifactId, ArtifactId)> = FxHashSet::default();
        let mut dropped = 0usize;

        for artifact in artifacts {
            let source = &artifact.id;
            for relation in &artifact.relations {
                let target = &relation.to_id;
                if !lookup.contains(target) {
                    trace!(from = %source, to = %target, kind = %relation.kind, "dangling relation dropped");
                    dropped += 1;
                    continue;
                }

                let kind = relation.classify();
                index
                    .by_kind
                    .entry(kind.key().to_string())
                    .or_default()
                    .entry(source.clone())
                    .or_default()
                    .insert(target.clone());

                let is_family = matches!(
                    kind,
                    RelationKind::ParentOf
                        | RelationKind::ChildOf
                        | RelationKind::SiblingOf
                        | RelationKind::PartnerOf
                );
                if is_family && source == target {
                    trace!(id = %source, kind = kind.key(), "self-referential family edge dropped");
                    continue;
                }

                match kind {
                    RelationKind::ParentOf => {
                        index.link(Role::Parent, target, source);
                        index.link(Role::Child, source, target);
                    }
                    RelationKind::ChildOf => {
                        index.link(Role::Parent, source, target);
                        index.link(Role::Child, target, source);
                    }
                    RelationKind::PartnerOf => {
                        index.link_symmetric(Role::Partner, source, target, &mut undirected);
                    }
                    RelationKind::SiblingOf => {
                        index.link_symmetric(Role::Sibling, source, target, &mut undirected);
                    }
                    RelationKind::Alliance => index.link(Role::Ally, source, target),
                    RelationKind::Rivalry => index.link(Role::Rival, source, target),
                    RelationKind::Tension => index.link(Role::Tension, source, target),
                    RelationKind::Other(_) => {}
                }
            }
        }

        debug!(
            artifacts = artifacts.len(),
            kinds = index.by_kind.len(),
            dropped,
            "relation index built"
        );
        index
    }

    fn link(&mut self, role: Role, from: &ArtifactId, to: &ArtifactId) {
        self.roles[role.slot()]
            .entry(from.clone())
            .or_default()
            .insert(to.clone());
    }

    fn link_symmetric(
        &mut self,
        role: Role,
        a: &ArtifactId,
        b: &ArtifactId,
        seen: &mut FxHashSet<(Role, ArtifactId, ArtifactId)>,
    ) {
        let key = if a <= b {
            (role, a.clone(), b.clone())
        } else {
            (role, b.clone(), a.clone())
        };
        if !seen.insert(key) {
            return;
        }
        self.link(role, a, b);
        self.link(role, b, a);
    }

    /// Full adjacency map for a role.
    pub fn role(&self, role: Role) -> &Adjacency {
        &self.roles[role.slot()]
    }

    /// Targets of `id` under `role`; empty for unknown IDs.
    pub fn related(&self, role: Role, id: &ArtifactId) -> &FxHashSet<ArtifactId> {
        self.roles[role.slot()].get(id).unwrap_or(&self.empty)
    }

    pub fn parents(&self, id: &ArtifactId) -> &FxHashSet<ArtifactId> {
        self.related(Role::Parent, id)
    }

    pub fn children(&self, id: &ArtifactId) -> &FxHashSet<ArtifactId> {
        self.related(Role::Child, id)
    }

    pub fn partners(&self, id: &ArtifactId) -> &FxHashSet<ArtifactId> {
        self.related(Role::Partner, id)
    }

    pub fn siblings(&self, id: &ArtifactId) -> &FxHashSet<ArtifactId> {
        self.related(Role::Sibling, id)
    }

    /// Outbound targets of `id` for any relation kind, recognized or not.
    /// `kind` is normalized the same way relation kinds are.
    pub fn neighbors(&self, id: &ArtifactId, kind: &str) -> Vec<&ArtifactId> {
        let key = RelationKind::parse(kind);
        let mut out: Vec<&ArtifactId> = self
            .by_kind
            .get(key.key())
            .and_then(|adjacency| adjacency.get(id))
            .map(|targets| targets.iter().collect())
            .unwrap_or_default();
        out.sort();
        out
    }

    /// Every kind key seen with at least one resolvable edge, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.by_kind.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}
