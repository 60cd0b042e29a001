use super::operators::{MutationConfig, MutationOperator};
use super::selector::{select_operator, MutationSelection};
use crate::engines::evaluation::complexity::estimate_complexity;
use crate::engines::genome::dna::Dna;
use crate::engines::genome::extractor::{extract_dna, extract_from_text};
use crate::engines::genome::gene::ChromosomeKind;
use crate::engines::genome::reconstructor::reconstruct;
use crate::types::{generate_pattern_id, Pattern, PatternMetadata};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Before/after summary of one mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationReport {
    pub operator: MutationOperator,
    /// Gene count delta per chromosome, only chromosomes that changed
    pub chromosome_changes: BTreeMap<ChromosomeKind, i64>,
    pub complexity_change: f64,
    pub diversity_change: f64,
    /// Reconstruction had to patch the mutated DNA
    pub repaired: bool,
}

impl MutationReport {
    pub fn compare(operator: MutationOperator, before: &Dna, after: &Dna, repaired: bool) -> Self {
        let chromosome_changes = ChromosomeKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let delta =
                    after.chromosome(kind).len() as i64 - before.chromosome(kind).len() as i64;
                (delta != 0).then_some((kind, delta))
            })
            .collect();
        Self {
            operator,
            chromosome_changes,
            complexity_change: after.complexity() - before.complexity(),
            diversity_change: after.diversity() - before.diversity(),
            repaired,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub pattern: Pattern,
    /// DNA re-read from the new pattern text
    pub dna: Dna,
    pub operator: MutationOperator,
    pub description: String,
    pub report: MutationReport,
}

/// Pattern-level entry point: extract, mutate, rebuild
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMutator {
    pub selection: MutationSelection,
    pub config: MutationConfig,
}

impl Default for PatternMutator {
    fn default() -> Self {
        Self::quick()
    }
}

impl PatternMutator {
    pub fn new(selection: MutationSelection, config: MutationConfig) -> Self {
        Self { selection, config }
    }

    pub fn quick() -> Self {
        Self::new(MutationSelection::Adaptive, MutationConfig::new(0.3))
    }

    pub fn experimental() -> Self {
        Self::new(
            MutationSelection::Random,
            MutationConfig {
                intensity: 0.7,
                allow_structural_changes: true,
                preserve_genre: false,
            },
        )
    }

    pub fn guided() -> Self {
        Self::new(MutationSelection::Adaptive, MutationConfig::new(0.4))
    }

    pub fn mutate_pattern<R: Rng>(&self, pattern: &Pattern, rng: &mut R) -> MutationOutcome {
        let dna = extract_dna(pattern);
        self.mutate_with_dna(pattern, &dna, rng)
    }

    /// Mutate when the caller already holds the pattern's DNA
    pub fn mutate_with_dna<R: Rng>(&self, pattern: &Pattern, dna: &Dna, rng: &mut R) -> MutationOutcome {
        let operator = select_operator(dna, self.selection, rng);
        let mutated = operator.apply(dna, &self.config, rng);
        let rebuilt = reconstruct(&mutated);
        let report = MutationReport::compare(operator, dna, &mutated, rebuilt.repaired);

        let description = describe_variation(self.config.intensity, pattern.base_description());
        let metadata = derived_metadata(&pattern.metadata, &rebuilt.text, rng);
        let mut new_dna = extract_from_text(&rebuilt.text);
        new_dna.source_metadata = metadata.clone();

        MutationOutcome {
            pattern: Pattern {
                text: rebuilt.text,
                description,
                metadata,
            },
            dna: new_dna,
            operator,
            description: operator.description().to_string(),
            report,
        }
    }
}

/// Wording scales with how hard the pattern was pushed
pub fn describe_variation(intensity: f64, base: &str) -> String {
    let prefix = if intensity < 0.3 {
        "Subtle evolution of"
    } else if intensity < 0.7 {
        "Creative variation of"
    } else {
        "Radical evolution of"
    };
    format!("{} {}", prefix, base)
}

fn derived_metadata<R: Rng>(parent: &PatternMetadata, text: &str, rng: &mut R) -> PatternMetadata {
    PatternMetadata {
        id: generate_pattern_id("mut", rng),
        genre: parent.genre.clone(),
        mood: parent.mood.clone(),
        energy_level: parent.energy_level,
        complexity_score: Some(estimate_complexity(text)),
        generation_index: parent.generation_index + 1,
        parent_ids: vec![parent.lineage_id()],
    }
}
