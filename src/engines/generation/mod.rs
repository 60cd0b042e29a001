pub mod operators;
pub mod population;
pub mod history;
pub mod strategy;
pub mod evolution_engine;
pub mod progress;

pub use evolution_engine::{
    evolve_batch, experimental_evolve, guided_evolve, quick_evolve, EvolutionEngine,
    EvolutionOutcome, EvolutionReport, Improvements, ProgressCallback, StopReason,
};
pub use history::{EvolutionSession, EvolutionStats, GenerationRecord, StrategySnapshot};
pub use operators::{crossover, crossover_dna, tournament_selection};
pub use population::{Candidate, PopulationAnalysis};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage, SilentProgress};
pub use strategy::{BreedingPlan, ParentSelection};
