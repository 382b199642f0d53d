//! Graph analyzers. Each one is a pure function of an artifact slice.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod constraints;
pub mod faction_network;
pub mod family_tree;
pub mod integrity;
pub mod relation_index;
pub mod world_age;
