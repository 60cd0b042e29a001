pub mod complexity;
pub mod fitness;

pub use complexity::{estimate_complexity, estimate_dna_complexity};
pub use fitness::{FitnessBreakdown, FitnessEvaluator};
