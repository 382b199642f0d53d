/// Keyword classification of free text into constraint status and type.
///
/// Lexicons are versioned constant tables. A `LexiconSet` is the strategy
/// object: swap it to change vocabulary without touching the rule order.
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::schema::derived::{ConstraintStatus, ConstraintType};

/// Bumped whenever a built-in table changes.
pub const LEXICON_VERSION: u32 = 1;

pub const FORBIDDEN_TERMS: &[&str] = &["forbidden", "taboo", "never", "prohibited", "ban", "do not"];

pub const VOLATILE_TERMS: &[&str] = &[
    "volatile",
    "unstable",
    "danger",
    "backlash",
    "cataclysm",
    "fracture",
    "feral",
    "sacrifice",
    "shatter",
    "scar",
    "threat",
];

pub const METAPHYSICS_TERMS: &[&str] = &[
    "magic", "thread", "ritual", "soul", "veil", "ley", "spirit", "arcane", "astral", "mana",
    "curse",
];

pub const PHYSICS_TERMS: &[&str] = &[
    "gravity",
    "storm",
    "pressure",
    "radiation",
    "tectonic",
    "clockwork",
    "gear",
    "machine",
    "technology",
    "desert",
    "flood",
    "climate",
];

static BUILT_IN: LazyLock<LexiconSet> = LazyLock::new(|| {
    LexiconSet::from_terms(FORBIDDEN_TERMS, VOLATILE_TERMS, METAPHYSICS_TERMS, PHYSICS_TERMS)
        .expect("built-in lexicons are valid patterns")
});

/// Inflections a term may carry and still match ("storms", "banned",
/// "shattered", "dangerous", "magical").
const INFLECTIONS: &str = "s|es|d|ed|ing|ous|al|ual|ic|ly|ned|red";

/// A fixed word list compiled into one case-insensitive matcher.
///
/// Terms match whole words, optionally inflected: "ban" matches "banned"
/// but neither "urban" nor "bandit".
#[derive(Debug, Clone)]
pub struct Lexicon {
    terms: Vec<String>,
    pattern: Option<Regex>,
}

impl Lexicon {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, regex::Error> {
        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Ok(Self {
                terms,
                pattern: None,
            });
        }
        let alternation = terms
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})(?:{INFLECTIONS})?\b"))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            terms,
            pattern: Some(pattern),
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// The four lexicons the classifier consults.
#[derive(Debug, Clone)]
pub struct LexiconSet {
    pub forbidden: Lexicon,
    pub volatile: Lexicon,
    pub metaphysics: Lexicon,
    pub physics: Lexicon,
}

impl LexiconSet {
    pub fn from_terms<S: AsRef<str>>(
        forbidden: &[S],
        volatile: &[S],
        metaphysics: &[S],
        physics: &[S],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            forbidden: Lexicon::new(forbidden)?,
            volatile: Lexicon::new(volatile)?,
            metaphysics: Lexicon::new(metaphysics)?,
            physics: Lexicon::new(physics)?,
        })
    }
}

impl Default for LexiconSet {
    fn default() -> Self {
        BUILT_IN.clone()
    }
}

/// Stateless text classifier. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    lexicons: LexiconSet,
}

impl KeywordClassifier {
    pub fn new(lexicons: LexiconSet) -> Self {
        Self { lexicons }
    }

    pub fn lexicons(&self) -> &LexiconSet {
        &self.lexicons
    }

    /// First match wins: forbidden, then volatile, then `fallback`.
    ///
    /// Callers pass a record's explicit status as the fallback when it has
    /// one, otherwise `Stable`.
    pub fn classify_status(&self, text: &str, fallback: ConstraintStatus) -> ConstraintStatus {
        if self.lexicons.forbidden.matches(text) {
            ConstraintStatus::Forbidden
        } else if self.lexicons.volatile.matches(text) {
            ConstraintStatus::Volatile
        } else {
            fallback
        }
    }

    /// An explicit type is returned unchanged. Otherwise metaphysics wins
    /// only without a physics match, physics alone is physics, and anything
    /// else defaults to metaphysics.
    pub fn classify_type(&self, text: &str, explicit: Option<ConstraintType>) -> ConstraintType {
        if let Some(explicit) = explicit {
            return explicit;
        }
        let metaphysical = self.lexicons.metaphysics.matches(text);
        let physical = self.lexicons.physics.matches(text);
        match (metaphysical, physical) {
            (true, false) => ConstraintType::Metaphysics,
            (false, true) => ConstraintType::Physics,
            _ => ConstraintType::Metaphysics,
        }
    }

    pub fn is_volatile(&self, text: &str) -> bool {
        self.lexicons.volatile.matches(text)
    }
}

/// [`KeywordClassifier::classify_status`] with the built-in lexicons.
pub fn classify_status(text: &str, fallback: ConstraintStatus) -> ConstraintStatus {
    KeywordClassifier::default().classify_status(text, fallback)
}

/// [`KeywordClassifier::classify_type`] with the built-in lexicons.
pub fn classify_type(text: &str, explicit: Option<ConstraintType>) -> ConstraintType {
    KeywordClassifier::default().classify_type(text, explicit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_beats_volatile() {
        assert_eq!(
            classify_status("A forbidden and volatile rite", ConstraintStatus::Stable),
            ConstraintStatus::Forbidden
        );
    }

    #[test]
    fn volatile_terms() {
        let classifier = KeywordClassifier::default();
        for text in ["Risk of BACKLASH", "the shattered moon", "a feral current", "threats abound"] {
            assert_eq!(
                classifier.classify_status(text, ConstraintStatus::Stable),
                ConstraintStatus::Volatile,
                "{text}"
            );
        }
    }

    #[test]
    fn forbidden_phrase_with_space() {
        assert_eq!(
            classify_status("Do not cross the river at night", ConstraintStatus::Stable),
            ConstraintStatus::Forbidden
        );
        assert_eq!(
            classify_status("Magic is banned in the capital", ConstraintStatus::Stable),
            ConstraintStatus::Forbidden
        );
    }

    #[test]
    fn fallback_when_nothing_matches() {
        assert_eq!(
            classify_status("A quiet orchard", ConstraintStatus::Stable),
            ConstraintStatus::Stable
        );
        assert_eq!(
            classify_status("A quiet orchard", ConstraintStatus::Volatile),
            ConstraintStatus::Volatile
        );
    }

    #[test]
    fn matches_whole_words_with_inflections() {
        for text in ["An urban district", "A bandit camp", "Scarce rain", "Nevertheless calm"] {
            assert_eq!(
                classify_status(text, ConstraintStatus::Stable),
                ConstraintStatus::Stable,
                "{text}"
            );
        }
        assert_eq!(
            classify_status("Dangerous currents", ConstraintStatus::Stable),
            ConstraintStatus::Volatile
        );
        assert_eq!(classify_type("The manager frowns", None), ConstraintType::Metaphysics);
        assert_eq!(classify_type("Storms every spring", None), ConstraintType::Physics);
        assert_eq!(classify_type("Magical wards", None), ConstraintType::Metaphysics);
    }

    #[test]
    fn type_inference() {
        assert_eq!(classify_type("The ley lines sing", None), ConstraintType::Metaphysics);
        assert_eq!(classify_type("Tectonic plates grind", None), ConstraintType::Physics);
        assert_eq!(
            classify_type("A ritual to calm the storm", None),
            ConstraintType::Metaphysics
        );
        assert_eq!(classify_type("Bread rises", None), ConstraintType::Metaphysics);
        assert_eq!(
            classify_type("The ley lines sing", Some(ConstraintType::Physics)),
            ConstraintType::Physics
        );
    }

    #[test]
    fn custom_lexicons_swap_vocabulary() {
        let lexicons = LexiconSet::from_terms(&["verboten"], &["wobbly"], &["aether"], &["steam"])
            .unwrap();
        let classifier = KeywordClassifier::new(lexicons);
        assert_eq!(
            classifier.classify_status("Verboten lore", ConstraintStatus::Stable),
            ConstraintStatus::Forbidden
        );
        assert_eq!(
            classifier.classify_status("forbidden lore", ConstraintStatus::Stable),
            ConstraintStatus::Stable
        );
        assert_eq!(classifier.classify_type("steam engines", None), ConstraintType::Physics);
    }

    #[test]
    fn empty_lexicon_never_matches() {
        let empty: &[&str] = &[];
        let lexicon = Lexicon::new(empty).unwrap();
        assert!(!lexicon.matches("anything at all"));
        assert!(lexicon.terms().is_empty());
    }

    #[test]
    fn built_in_tables_are_intact() {
        let lexicons = LexiconSet::default();
        assert_eq!(lexicons.forbidden.terms().len(), FORBIDDEN_TERMS.len());
        assert_eq!(lexicons.volatile.terms().len(), 11);
        assert_eq!(lexicons.metaphysics.terms().len(), 11);
        assert_eq!(lexicons.physics.terms().len(), 12);
        assert_eq!(LEXICON_VERSION, 1);
    }
}
