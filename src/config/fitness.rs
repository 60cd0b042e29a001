use super::traits::{check_unit_range, ConfigSection};
use crate::error::PatternEvoError;
use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    pub coherence: f64,
    pub rhythm: f64,
    pub melody: f64,
    pub harmony: f64,
    pub complexity: f64,
    pub preference: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            coherence: 0.30,
            rhythm: 0.20,
            melody: 0.20,
            harmony: 0.15,
            complexity: 0.10,
            preference: 0.05,
        }
    }
}

impl FitnessWeights {
    pub fn sum(&self) -> f64 {
        self.coherence + self.rhythm + self.melody + self.harmony + self.complexity + self.preference
    }
}

/// Closed interval of complexity estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityWindow {
    pub min: f64,
    pub max: f64,
}

impl ComplexityWindow {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub weights: FitnessWeights,
    pub optimal_complexity: ComplexityWindow,
    pub acceptable_complexity: ComplexityWindow,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            weights: FitnessWeights::default(),
            optimal_complexity: ComplexityWindow { min: 0.6, max: 0.8 },
            acceptable_complexity: ComplexityWindow { min: 0.4, max: 0.9 },
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), PatternEvoError> {
        let w = &self.weights;
        for (name, value) in [
            ("Coherence weight", w.coherence),
            ("Rhythm weight", w.rhythm),
            ("Melody weight", w.melody),
            ("Harmony weight", w.harmony),
            ("Complexity weight", w.complexity),
            ("Preference weight", w.preference),
        ] {
            check_unit_range(name, value)?;
        }
        if (w.sum() - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(PatternEvoError::Configuration(format!(
                "Fitness weights must sum to 1.0, got {:.4}",
                w.sum()
            )));
        }
        for (name, window) in [
            ("Optimal complexity", self.optimal_complexity),
            ("Acceptable complexity", self.acceptable_complexity),
        ] {
            check_unit_range(name, window.min)?;
            check_unit_range(name, window.max)?;
            if window.min > window.max {
                return Err(PatternEvoError::Configuration(format!(
                    "{} window is inverted",
                    name
                )));
            }
        }
        Ok(())
    }
}
