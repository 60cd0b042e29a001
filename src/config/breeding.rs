use super::traits::{check_unit_range, ConfigSection};
use crate::error::PatternEvoError;
use serde::{Deserialize, Serialize};

/// Tunables of seeding and the per-strategy breeding plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    pub tournament_size: usize,
    /// Seed variants draw their intensity from this range
    pub seed_intensity_min: f64,
    pub seed_intensity_max: f64,
    /// Chance a seed variant keeps structural genes untouched
    pub seed_structure_preservation: f64,
    pub mutation_intensity: f64,
    pub experimental_intensity: f64,
    pub guided_elite_rate: f64,
    pub experimental_elite_rate: f64,
    /// Guided breeding freezes structure below this population diversity
    pub diversity_threshold: f64,
    /// Guided breeding allows genre shifts below this average fitness
    pub fitness_threshold: f64,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            tournament_size: 3,
            seed_intensity_min: 0.1,
            seed_intensity_max: 0.6,
            seed_structure_preservation: 0.7,
            mutation_intensity: 0.3,
            experimental_intensity: 0.8,
            guided_elite_rate: 0.2,
            experimental_elite_rate: 0.1,
            diversity_threshold: 0.3,
            fitness_threshold: 0.5,
        }
    }
}

impl ConfigSection for BreedingConfig {
    fn section_name() -> &'static str {
        "breeding"
    }

    fn validate(&self) -> Result<(), PatternEvoError> {
        if self.tournament_size == 0 {
            return Err(PatternEvoError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        check_unit_range("Seed intensity min", self.seed_intensity_min)?;
        check_unit_range("Seed intensity max", self.seed_intensity_max)?;
        if self.seed_intensity_min > self.seed_intensity_max {
            return Err(PatternEvoError::Configuration(
                "Seed intensity min must not exceed max".to_string(),
            ));
        }
        check_unit_range("Seed structure preservation", self.seed_structure_preservation)?;
        check_unit_range("Mutation intensity", self.mutation_intensity)?;
        check_unit_range("Experimental intensity", self.experimental_intensity)?;
        check_unit_range("Guided elite rate", self.guided_elite_rate)?;
        check_unit_range("Experimental elite rate", self.experimental_elite_rate)?;
        check_unit_range("Diversity threshold", self.diversity_threshold)?;
        check_unit_range("Fitness threshold", self.fitness_threshold)?;
        Ok(())
    }
}
