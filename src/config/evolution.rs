use super::traits::{check_unit_range, ConfigSection};
use crate::error::PatternEvoError;
use crate::types::UserPreferences;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionStrategy {
    Natural,
    Guided,
    Experimental,
    UserDirected,
}

impl EvolutionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            EvolutionStrategy::Natural => "natural",
            EvolutionStrategy::Guided => "guided",
            EvolutionStrategy::Experimental => "experimental",
            EvolutionStrategy::UserDirected => "user_directed",
        }
    }
}

impl Default for EvolutionStrategy {
    fn default() -> Self {
        EvolutionStrategy::Natural
    }
}

impl fmt::Display for EvolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvolutionStrategy {
    type Err = PatternEvoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "natural" => Ok(EvolutionStrategy::Natural),
            "guided" => Ok(EvolutionStrategy::Guided),
            "experimental" => Ok(EvolutionStrategy::Experimental),
            "user_directed" => Ok(EvolutionStrategy::UserDirected),
            _ => Err(PatternEvoError::UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub strategy: EvolutionStrategy,
    pub generations: usize,
    /// Stop as soon as the best candidate reaches this score
    pub target_fitness: f64,
    pub user_preferences: UserPreferences,
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_rate: f64,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            strategy: EvolutionStrategy::Natural,
            generations: 5,
            target_fitness: 0.8,
            user_preferences: UserPreferences::default(),
            population_size: 50,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            elitism_rate: 0.1,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn quick() -> Self {
        Self {
            strategy: EvolutionStrategy::Natural,
            generations: 3,
            target_fitness: 0.7,
            ..Self::default()
        }
    }

    pub fn experimental() -> Self {
        Self {
            strategy: EvolutionStrategy::Experimental,
            generations: 5,
            target_fitness: 0.6,
            ..Self::default()
        }
    }

    pub fn guided(preferences: UserPreferences) -> Self {
        Self {
            strategy: EvolutionStrategy::Guided,
            generations: 4,
            target_fitness: 0.8,
            user_preferences: preferences,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Elites carried over unchanged under the natural strategy
    pub fn elite_count(&self) -> usize {
        self.elites_for_rate(self.elitism_rate)
    }

    /// Floor of the population share, at least one for any positive rate
    pub fn elites_for_rate(&self, rate: f64) -> usize {
        let count = (self.population_size as f64 * rate) as usize;
        let count = if rate > 0.0 { count.max(1) } else { count };
        count.min(self.population_size)
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), PatternEvoError> {
        if self.generations == 0 {
            return Err(PatternEvoError::Configuration(
                "Generations must be at least 1".to_string(),
            ));
        }
        if self.population_size < 2 {
            return Err(PatternEvoError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        check_unit_range("Target fitness", self.target_fitness)?;
        check_unit_range("Mutation rate", self.mutation_rate)?;
        check_unit_range("Crossover rate", self.crossover_rate)?;
        check_unit_range("Elitism rate", self.elitism_rate)?;
        if let Some(intensity) = self.user_preferences.mutation_intensity {
            check_unit_range("Preferred mutation intensity", intensity)?;
        }
        if let Some(target) = self.user_preferences.target_complexity {
            check_unit_range("Target complexity", target)?;
        }
        Ok(())
    }
}
