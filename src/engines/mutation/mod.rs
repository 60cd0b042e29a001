pub mod elements;
pub mod templates;
pub mod operators;
pub mod selector;
pub mod mutator;

pub use mutator::{describe_variation, MutationOutcome, MutationReport, PatternMutator};
pub use operators::{MutationConfig, MutationOperator};
pub use selector::{adaptive_operator, select_operator, MutationSelection};
