pub mod genome;
pub mod mutation;
pub mod evaluation;
pub mod generation;
