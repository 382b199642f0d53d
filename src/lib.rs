//! Lore Graph: relationship analytics for worldbuilding artifacts.
//!
//! Turns a flat snapshot of typed artifacts (characters, factions,
//! timelines, magic systems, locations, wiki pages) and their free-form
//! relations into derived views: family trees, faction conflict summaries,
//! world-age progressions and constraint annotations.

pub mod core;
pub mod schema;

pub use crate::core::analysis::{analyze, AnalysisError, Analyzer, GraphAnalysis};
