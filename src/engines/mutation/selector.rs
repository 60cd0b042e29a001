use super::operators::MutationOperator;
use crate::engines::genome::dna::Dna;
use crate::error::PatternEvoError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const SPARSE_COMPLEXITY: f64 = 0.3;
const DENSE_COMPLEXITY: f64 = 0.8;
const LOW_DIVERSITY: f64 = 0.4;

/// How an operator is chosen for a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationSelection {
    /// Driven by the DNA's complexity and diversity
    Adaptive,
    /// Uniform over all operators
    Random,
    Operator(MutationOperator),
}

impl Default for MutationSelection {
    fn default() -> Self {
        MutationSelection::Adaptive
    }
}

impl FromStr for MutationSelection {
    type Err = PatternEvoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adaptive" => Ok(MutationSelection::Adaptive),
            "random" => Ok(MutationSelection::Random),
            _ => s.parse().map(MutationSelection::Operator),
        }
    }
}

pub fn select_operator<R: Rng>(
    dna: &Dna,
    selection: MutationSelection,
    rng: &mut R,
) -> MutationOperator {
    let op = match selection {
        MutationSelection::Adaptive => adaptive_operator(dna, rng),
        MutationSelection::Random => MutationOperator::ALL
            .choose(rng)
            .copied()
            .unwrap_or(MutationOperator::Point),
        MutationSelection::Operator(op) => op,
    };
    log::debug!("Selected {} mutation", op);
    op
}

/// Grow sparse DNA, thin dense DNA, shuffle uniform DNA, otherwise refine
pub fn adaptive_operator<R: Rng>(dna: &Dna, rng: &mut R) -> MutationOperator {
    let complexity = dna.complexity();
    let diversity = dna.diversity();

    if complexity < SPARSE_COMPLEXITY {
        if rng.gen_bool(0.6) {
            MutationOperator::Insertion
        } else {
            MutationOperator::Duplication
        }
    } else if complexity > DENSE_COMPLEXITY {
        if rng.gen_bool(0.6) {
            MutationOperator::Deletion
        } else {
            MutationOperator::Substitution
        }
    } else if diversity < LOW_DIVERSITY {
        if rng.gen_bool(0.5) {
            MutationOperator::Inversion
        } else {
            MutationOperator::Translocation
        }
    } else if rng.gen_bool(0.5) {
        MutationOperator::Point
    } else {
        MutationOperator::Substitution
    }
}
