/// Family tree integration tests against the relation index.

use lore_graph::core::family_tree::{FamilyTreeBuilder, FamilyTreeError};
use lore_graph::core::relation_index::RelationIndex;
use lore_graph::schema::artifact::{Artifact, ArtifactId, ArtifactType};
use lore_graph::schema::derived::FamilyTreeNode;
use lore_graph::schema::relation::Relation;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn character(id: &str, title: &str, relations: &[(&str, &str)]) -> Artifact {
    let mut artifact = Artifact::new(id, ArtifactType::Character, title);
    artifact.relations = relations
        .iter()
        .map(|(to, kind)| Relation::new(*to, kind))
        .collect();
    artifact
}

fn build(artifacts: &[Artifact]) -> Vec<FamilyTreeNode> {
    let index = RelationIndex::build(artifacts);
    FamilyTreeBuilder::new(artifacts, &index).build()
}

fn titles(nodes: &[FamilyTreeNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.character.title.as_str()).collect()
}

fn shape(forest: &[FamilyTreeNode]) -> String {
    serde_json::to_string(forest).unwrap()
}

#[test]
fn end_to_end_parent_with_two_siblings() {
    let artifacts = vec![
        character("a", "A", &[]),
        character("b", "B", &[("a", "CHILD_OF"), ("c", "SIBLING_OF")]),
        character("c", "C", &[("a", "CHILD_OF")]),
    ];
    let forest = build(&artifacts);

    assert_eq!(titles(&forest), vec!["A"]);
    let root = &forest[0];
    assert_eq!(titles(&root.children), vec!["B", "C"]);
    assert_eq!(root.children[0].siblings.len(), 1);
    assert_eq!(root.children[0].siblings[0].title, "C");
    assert_eq!(root.children[1].siblings.len(), 1);
    assert_eq!(root.children[1].siblings[0].title, "B");
    assert!(root.siblings.is_empty());
}

#[test]
fn child_of_and_parent_of_build_the_same_adjacency() {
    let via_child = vec![
        character("p", "Parent", &[]),
        character("k", "Kid", &[("p", "CHILD_OF")]),
    ];
    let via_parent = vec![
        character("p", "Parent", &[("k", "PARENT_OF")]),
        character("k", "Kid", &[]),
    ];
    let a = RelationIndex::build(&via_child);
    let b = RelationIndex::build(&via_parent);
    let parent = ArtifactId::from("p");
    let kid = ArtifactId::from("k");

    assert!(a.parents(&kid).contains(&parent));
    assert!(a.children(&parent).contains(&kid));
    assert_eq!(a.parents(&kid), b.parents(&kid));
    assert_eq!(a.children(&parent), b.children(&parent));
    assert_eq!(shape(&build(&via_child)), shape(&build(&via_parent)));
}

#[test]
fn canonical_parent_is_alphabetically_first_in_any_order() {
    let base = vec![
        character("z", "Zara", &[("kid", "PARENT_OF")]),
        character("a", "Aiden", &[("kid", "PARENT_OF")]),
        character("kid", "Kestrel", &[]),
    ];
    let expected = shape(&build(&base));

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..8 {
        let mut shuffled = base.clone();
        shuffled.shuffle(&mut rng);
        let forest = build(&shuffled);

        assert_eq!(titles(&forest), vec!["Aiden", "Zara"]);
        assert_eq!(titles(&forest[0].children), vec!["Kestrel"]);
        assert!(forest[1].children.is_empty());
        assert_eq!(shape(&forest), expected);
    }
}

#[test]
fn three_cycle_terminates_and_keeps_every_node() {
    let artifacts = vec![
        character("a", "A", &[("b", "PARENT_OF")]),
        character("b", "B", &[("c", "PARENT_OF")]),
        character("c", "C", &[("a", "PARENT_OF")]),
    ];
    let forest = build(&artifacts);

    // Every character has a parent, so each one roots its own tree.
    assert_eq!(titles(&forest), vec!["A", "B", "C"]);
    for tree in &forest {
        assert_eq!(tree.walk().len(), 3);
        assert_eq!(tree.depth(), 3);
    }
}

#[test]
fn partners_and_multi_generation_descent() {
    let artifacts = vec![
        character("g", "Gran", &[("m", "PARENT_OF"), ("gp", "married to")]),
        character("gp", "Grandpa", &[]),
        character("m", "Mother", &[("d", "PARENT_OF")]),
        character("d", "Daughter", &[]),
    ];
    let forest = build(&artifacts);

    assert_eq!(titles(&forest), vec!["Gran", "Grandpa"]);
    let gran = &forest[0];
    assert_eq!(gran.partners[0].title, "Grandpa");
    assert_eq!(forest[1].partners[0].title, "Gran");
    assert_eq!(gran.depth(), 3);
    let names: Vec<&str> = gran.walk().iter().map(|n| n.character.title.as_str()).collect();
    assert_eq!(names, vec!["Gran", "Mother", "Daughter"]);
}

#[test]
fn explicit_roots_validate_ids() {
    let artifacts = vec![
        character("a", "A", &[("b", "PARENT_OF")]),
        character("b", "B", &[]),
    ];
    let index = RelationIndex::build(&artifacts);
    let builder = FamilyTreeBuilder::new(&artifacts, &index);

    let forest = builder.build_from_roots(&[ArtifactId::from("b")]).unwrap();
    assert_eq!(titles(&forest), vec!["B"]);

    let err = builder
        .build_from_roots(&[ArtifactId::from("a"), ArtifactId::from("missing")])
        .unwrap_err();
    assert!(matches!(err, FamilyTreeError::UnknownCharacter(ref id) if id.as_str() == "missing"));
    assert_eq!(err.to_string(), "unknown character: missing");
}

#[test]
fn non_character_relations_are_ignored() {
    let mut guild = Artifact::new("f", ArtifactType::Faction, "Guild");
    guild.relations = vec![Relation::new("a", "PARENT_OF")];
    let artifacts = vec![character("a", "A", &[]), guild];
    let forest = build(&artifacts);

    assert_eq!(titles(&forest), vec!["A"]);
    assert!(forest[0].children.is_empty());
}
