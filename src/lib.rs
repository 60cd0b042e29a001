//! Genetic evolution of textual music patterns.
//!
//! A pattern is read into structured DNA (rhythm, melody, harmony,
//! texture and structure genes), varied with mutation and crossover
//! operators, scored by a heuristic fitness function and bred over a
//! number of generations. The winner is written back out as pattern code.

pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use config::{AppConfig, ConfigManager, EvolutionConfig, EvolutionStrategy};
pub use engines::evaluation::{FitnessBreakdown, FitnessEvaluator};
pub use engines::generation::{
    evolve_batch, EvolutionEngine, EvolutionOutcome, EvolutionReport, EvolutionSession, StopReason,
};
pub use engines::genome::{extract_dna, reconstruct, Dna};
pub use engines::mutation::{MutationConfig, MutationOperator, PatternMutator};
pub use error::{PatternEvoError, Result};
pub use types::{EvolvedPattern, Pattern, PatternMetadata, UserPreferences};
