pub mod traits;
pub mod evolution;
pub mod breeding;
pub mod fitness;
pub mod manager;

pub use breeding::BreedingConfig;
pub use evolution::{EvolutionConfig, EvolutionStrategy};
pub use fitness::{ComplexityWindow, FitnessConfig, FitnessWeights};
pub use manager::{AppConfig, ConfigManager};
pub use traits::{validate_section, ConfigSection};
