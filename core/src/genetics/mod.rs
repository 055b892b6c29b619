//! Genetisk trekkscore: payload -> GeneObservation -> påvirkning -> 0–100.

pub mod catalog;
pub mod payload;
pub mod scoring;

pub use catalog::{default_traits, normalize_gene, normalize_genotype, CategoryTable, GeneCatalog, GenotypeEntry};
pub use payload::{normalize_profile, parse_profile_json, CategorySummary};
pub use scoring::{score_impacts, GeneticTraitScorer, NEUTRAL_SCORE};
