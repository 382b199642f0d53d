/// Faction alliance / rivalry / tension summaries.
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

use crate::core::classifier::KeywordClassifier;
use crate::core::relation_index::{ArtifactLookup, RelationIndex, Role};
use crate::schema::artifact::{compare_titles, Artifact, ArtifactId, ArtifactType};
use crate::schema::derived::{FactionConflictSummary, FactionStability};

pub struct FactionNetworkAnalyzer<'a> {
    index: &'a RelationIndex,
    lookup: &'a ArtifactLookup<'a>,
    classifier: &'a KeywordClassifier,
}

impl<'a> FactionNetworkAnalyzer<'a> {
    pub fn new(
        index: &'a RelationIndex,
        lookup: &'a ArtifactLookup<'a>,
        classifier: &'a KeywordClassifier,
    ) -> Self {
        Self {
            index,
            lookup,
            classifier,
        }
    }

    /// One summary per faction, most concerning first.
    pub fn summarize(&self, artifacts: &[Artifact]) -> Vec<FactionConflictSummary> {
        let mut seen: FxHashSet<&ArtifactId> = FxHashSet::default();
        let mut summaries: Vec<FactionConflictSummary> = artifacts
            .iter()
            .filter(|a| a.is(&ArtifactType::Faction))
            .filter(|a| seen.insert(&a.id))
            .map(|faction| self.summarize_one(faction))
            .collect();
        summaries.sort_by(compare_summaries);
        summaries
    }

    pub fn summarize_one(&self, faction: &Artifact) -> FactionConflictSummary {
        let alliances = self.labels(Role::Ally, &faction.id);
        let rivalries = self.labels(Role::Rival, &faction.id);
        let tensions = self.labels(Role::Tension, &faction.id);
        let stability = self.stability(faction, alliances.len(), rivalries.len(), tensions.len());
        let summary = describe(alliances.len(), rivalries.len(), tensions.len());

        FactionConflictSummary {
            id: faction.id.clone(),
            faction_name: faction.display_title().to_string(),
            alliances,
            rivalries,
            tensions,
            stability,
            summary,
        }
    }

    fn labels(&self, role: Role, id: &ArtifactId) -> Vec<String> {
        let mut labels: Vec<String> = self
            .index
            .related(role, id)
            .iter()
            .map(|target| self.lookup.title_of(target))
            .collect();
        labels.sort_by(|a, b| compare_titles(a, b));
        labels
    }

    fn stability(
        &self,
        faction: &Artifact,
        alliances: usize,
        rivalries: usize,
        tensions: usize,
    ) -> FactionStability {
        let flagged = self.classifier.is_volatile(&faction.summary)
            || faction.tags.iter().any(|tag| self.classifier.is_volatile(tag));
        if flagged {
            return FactionStability::Volatile;
        }
        stability_from_counts(alliances, rivalries, tensions)
    }
}

/// Edge-count heuristic: rivalries weigh double against alliances.
pub fn stability_from_counts(alliances: usize, rivalries: usize, tensions: usize) -> FactionStability {
    let tension_score = 2 * rivalries + tensions;
    let alliance_score = alliances;
    if tension_score == 0 {
        FactionStability::Stable
    } else if tension_score > alliance_score + 1 {
        FactionStability::Volatile
    } else if tension_score > alliance_score {
        FactionStability::Shifting
    } else {
        FactionStability::Stable
    }
}

fn describe(alliances: usize, rivalries: usize, tensions: usize) -> String {
    if alliances + rivalries + tensions == 0 {
        return "No recorded alliances or rivalries".to_string();
    }
    format!(
        "{} {}, {} {}, {} {}",
        alliances,
        if alliances == 1 { "alliance" } else { "alliances" },
        rivalries,
        if rivalries == 1 { "rivalry" } else { "rivalries" },
        tensions,
        if tensions == 1 { "tension" } else { "tensions" },
    )
}

fn compare_summaries(a: &FactionConflictSummary, b: &FactionConflictSummary) -> Ordering {
    a.stability
        .severity_rank()
        .cmp(&b.stability.severity_rank())
        .then_with(|| compare_titles(&a.faction_name, &b.faction_name))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::relation::Relation;

    fn faction(id: &str, title: &str, relations: &[(&str, &str)]) -> Artifact {
        let mut artifact = Artifact::new(id, ArtifactType::Faction, title);
        artifact.relations = relations
            .iter()
            .map(|(to, kind)| Relation::new(*to, kind))
            .collect();
        artifact
    }

    fn summarize(artifacts: &[Artifact]) -> Vec<FactionConflictSummary> {
        let lookup = ArtifactLookup::new(artifacts);
        let index = RelationIndex::build_with(artifacts, &lookup);
        let classifier = KeywordClassifier::default();
        FactionNetworkAnalyzer::new(&index, &lookup, &classifier).summarize(artifacts)
    }

    #[test]
    fn heuristic_table() {
        assert_eq!(stability_from_counts(0, 0, 0), FactionStability::Stable);
        assert_eq!(stability_from_counts(5, 0, 0), FactionStability::Stable);
        assert_eq!(stability_from_counts(0, 2, 0), FactionStability::Volatile);
        assert_eq!(stability_from_counts(1, 0, 2), FactionStability::Shifting);
        assert_eq!(stability_from_counts(2, 1, 0), FactionStability::Stable);
        assert_eq!(stability_from_counts(0, 0, 1), FactionStability::Shifting);
        assert_eq!(stability_from_counts(1, 1, 1), FactionStability::Volatile);
    }

    #[test]
    fn two_rivalries_without_allies_is_volatile() {
        let artifacts = vec![
            faction("g", "Guild", &[("a", "ENEMY_OF"), ("b", "rival")]),
            faction("a", "Army", &[]),
            faction("b", "Brotherhood", &[]),
        ];
        let guild = summarize(&artifacts)
            .into_iter()
            .find(|s| s.id.as_str() == "g")
            .unwrap();
        assert_eq!(guild.rivalries, vec!["Army".to_string(), "Brotherhood".to_string()]);
        assert_eq!(guild.stability, FactionStability::Volatile);
        assert_eq!(guild.summary, "0 alliances, 2 rivalries, 0 tensions");
    }

    #[test]
    fn volatile_keywords_override_counts() {
        let mut cult = faction("c", "Cult", &[]);
        cult.tags = vec!["Unstable".to_string()];
        let mut order = faction("o", "Order", &[]);
        order.summary = "Faces a looming cataclysm".to_string();
        let summaries = summarize(&[cult, order]);
        assert!(summaries.iter().all(|s| s.stability == FactionStability::Volatile));
    }

    #[test]
    fn sorted_by_severity_then_name() {
        let artifacts = vec![
            faction("s2", "Bakers", &[]),
            faction("s1", "Archivists", &[]),
            faction("v", "Zealots", &[("s1", "AT_WAR_WITH"), ("s2", "AT_WAR_WITH")]),
            faction("sh", "Merchants", &[("s1", "PRESSURES")]),
        ];
        let names: Vec<String> = summarize(&artifacts)
            .into_iter()
            .map(|s| s.faction_name)
            .collect();
        assert_eq!(names, vec!["Zealots", "Merchants", "Archivists", "Bakers"]);
    }

    #[test]
    fn untitled_target_degrades_to_id() {
        let artifacts = vec![
            faction("g", "Guild", &[("x-17", "SUPPORTS"), ("nowhere", "SUPPORTS")]),
            faction("x-17", "", &[]),
        ];
        let guild = summarize(&artifacts)
            .into_iter()
            .find(|s| s.id.as_str() == "g")
            .unwrap();
        assert_eq!(guild.alliances, vec!["x-17".to_string()]);
        assert_eq!(guild.summary, "1 alliance, 0 rivalries, 0 tensions");
    }

    #[test]
    fn isolated_faction_summary_text() {
        let summaries = summarize(&[faction("q", "Quiet Ones", &[])]);
        assert_eq!(summaries[0].summary, "No recorded alliances or rivalries");
        assert_eq!(summaries[0].stability, FactionStability::Stable);
    }
}
