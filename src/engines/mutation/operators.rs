use super::elements::{mutate_effect_param, mutate_pitch, mutate_rhythm_token, mutate_structure_param};
use super::templates::random_gene;
use crate::engines::genome::dna::Dna;
use crate::engines::genome::gene::{ChromosomeKind, Gene, GenePayload};
use crate::error::PatternEvoError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Knobs shared by every operator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Per-element change probability for point mutations
    pub intensity: f64,
    pub allow_structural_changes: bool,
    /// Keep the rhythmic chromosome from losing genes
    pub preserve_genre: bool,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            intensity: 0.3,
            allow_structural_changes: false,
            preserve_genre: true,
        }
    }
}

impl MutationConfig {
    pub fn new(intensity: f64) -> Self {
        Self {
            intensity,
            ..Self::default()
        }
    }

    fn element_rate(&self) -> f64 {
        if self.intensity.is_finite() {
            self.intensity.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Chromosomes operators may touch
    pub fn eligible_chromosomes(&self) -> Vec<ChromosomeKind> {
        ChromosomeKind::ALL
            .into_iter()
            .filter(|kind| *kind != ChromosomeKind::Structural || self.allow_structural_changes)
            .collect()
    }

    /// Chromosomes operators may remove genes from
    pub fn removable_chromosomes(&self) -> Vec<ChromosomeKind> {
        self.eligible_chromosomes()
            .into_iter()
            .filter(|kind| *kind != ChromosomeKind::Rhythmic || !self.preserve_genre)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOperator {
    Point,
    Insertion,
    Deletion,
    Duplication,
    Inversion,
    Translocation,
    Substitution,
    Frameshift,
}

impl MutationOperator {
    pub const ALL: [MutationOperator; 8] = [
        MutationOperator::Point,
        MutationOperator::Insertion,
        MutationOperator::Deletion,
        MutationOperator::Duplication,
        MutationOperator::Inversion,
        MutationOperator::Translocation,
        MutationOperator::Substitution,
        MutationOperator::Frameshift,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MutationOperator::Point => "point",
            MutationOperator::Insertion => "insertion",
            MutationOperator::Deletion => "deletion",
            MutationOperator::Duplication => "duplication",
            MutationOperator::Inversion => "inversion",
            MutationOperator::Translocation => "translocation",
            MutationOperator::Substitution => "substitution",
            MutationOperator::Frameshift => "frameshift",
        }
    }

    /// Human readable summary of what the operator does to a pattern
    pub fn description(&self) -> &'static str {
        match self {
            MutationOperator::Point => "Made subtle changes to individual notes and sounds",
            MutationOperator::Insertion => "Added new musical elements",
            MutationOperator::Deletion => "Simplified the pattern by removing an element",
            MutationOperator::Duplication => "Repeated an existing element for emphasis",
            MutationOperator::Inversion => "Reversed the order of a musical phrase",
            MutationOperator::Translocation => "Moved an element to a different layer",
            MutationOperator::Substitution => "Replaced an element with a fresh variation",
            MutationOperator::Frameshift => "Shifted the rhythmic timing",
        }
    }

    /// Produce a mutated copy. Unmet preconditions return an unchanged copy.
    pub fn apply<R: Rng>(&self, dna: &Dna, config: &MutationConfig, rng: &mut R) -> Dna {
        let mut out = dna.clone();
        let applied = match self {
            MutationOperator::Point => point(&mut out, config, rng),
            MutationOperator::Insertion => insertion(&mut out, config, rng),
            MutationOperator::Deletion => deletion(&mut out, config, rng),
            MutationOperator::Duplication => duplication(&mut out, config, rng),
            MutationOperator::Inversion => inversion(&mut out, config, rng),
            MutationOperator::Translocation => translocation(&mut out, config, rng),
            MutationOperator::Substitution => substitution(&mut out, config, rng),
            MutationOperator::Frameshift => frameshift(&mut out, rng),
        };
        if !applied {
            log::debug!("{} mutation skipped, precondition not met", self.name());
        }
        out.normalize();
        out
    }
}

impl fmt::Display for MutationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MutationOperator {
    type Err = PatternEvoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MutationOperator::ALL
            .into_iter()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| PatternEvoError::UnknownOperator(s.to_string()))
    }
}

fn non_empty(dna: &Dna, kinds: Vec<ChromosomeKind>) -> Vec<ChromosomeKind> {
    kinds
        .into_iter()
        .filter(|kind| !dna.chromosome(*kind).is_empty())
        .collect()
}

/// Uniform chromosome, then uniform gene index inside it
fn pick_gene<R: Rng>(
    dna: &Dna,
    kinds: Vec<ChromosomeKind>,
    rng: &mut R,
) -> Option<(ChromosomeKind, usize)> {
    let kind = *non_empty(dna, kinds).choose(rng)?;
    let idx = rng.gen_range(0..dna.chromosome(kind).len());
    Some((kind, idx))
}

fn point<R: Rng>(dna: &mut Dna, config: &MutationConfig, rng: &mut R) -> bool {
    let Some((kind, idx)) = pick_gene(dna, config.eligible_chromosomes(), rng) else {
        return false;
    };
    let rate = config.element_rate();
    let gene = &mut dna.chromosome_mut(kind)[idx];

    match &mut gene.payload {
        GenePayload::Rhythm(rhythm) => {
            for token in rhythm.tokens.iter_mut() {
                if rng.gen_bool(rate) {
                    *token = mutate_rhythm_token(token, rng);
                }
            }
        }
        GenePayload::Melody(seq) | GenePayload::Harmony(seq) => {
            for note in seq.notes.iter_mut() {
                if rng.gen_bool(rate) {
                    *note = mutate_pitch(note, rng);
                }
            }
        }
        GenePayload::Texture(texture) => {
            if rng.gen_bool(rate) {
                texture.param = mutate_effect_param(&texture.effect, &texture.param, rng);
            }
        }
        GenePayload::Structure(structure) => {
            if config.allow_structural_changes && rng.gen_bool(rate) {
                structure.argument = mutate_structure_param(structure.op, &structure.argument, rng);
            }
        }
    }
    true
}

fn insertion<R: Rng>(dna: &mut Dna, config: &MutationConfig, rng: &mut R) -> bool {
    let Some(kind) = config.eligible_chromosomes().choose(rng).copied() else {
        return false;
    };
    let gene = random_gene(kind, rng);
    let chromosome = dna.chromosome_mut(kind);
    let at = rng.gen_range(0..=chromosome.len());
    chromosome.insert(at, gene);
    true
}

fn deletion<R: Rng>(dna: &mut Dna, config: &MutationConfig, rng: &mut R) -> bool {
    if dna.total_genes() <= 1 {
        return false;
    }
    let Some((kind, idx)) = pick_gene(dna, config.removable_chromosomes(), rng) else {
        return false;
    };
    dna.chromosome_mut(kind).remove(idx);
    true
}

fn duplication<R: Rng>(dna: &mut Dna, config: &MutationConfig, rng: &mut R) -> bool {
    let Some((kind, idx)) = pick_gene(dna, config.eligible_chromosomes(), rng) else {
        return false;
    };
    let chromosome = dna.chromosome_mut(kind);
    let copy = chromosome[idx].clone();
    let at = rng.gen_range(0..=chromosome.len());
    chromosome.insert(at, copy);
    true
}

fn inversion<R: Rng>(dna: &mut Dna, config: &MutationConfig, rng: &mut R) -> bool {
    let candidates: Vec<ChromosomeKind> = config
        .eligible_chromosomes()
        .into_iter()
        .filter(|kind| dna.chromosome(*kind).len() > 2)
        .collect();
    let Some(kind) = candidates.choose(rng).copied() else {
        return false;
    };
    let chromosome = dna.chromosome_mut(kind);
    let len = chromosome.len();
    let start = rng.gen_range(0..len - 1);
    let end = rng.gen_range(start + 2..=len);
    chromosome[start..end].reverse();
    true
}

fn translocation<R: Rng>(dna: &mut Dna, config: &MutationConfig, rng: &mut R) -> bool {
    let targets = non_empty(dna, config.eligible_chromosomes());
    if targets.len() < 2 {
        return false;
    }
    let sources: Vec<ChromosomeKind> = non_empty(dna, config.removable_chromosomes());
    let Some(from) = sources.choose(rng).copied() else {
        return false;
    };
    let destinations: Vec<ChromosomeKind> = targets.into_iter().filter(|kind| *kind != from).collect();
    let Some(to) = destinations.choose(rng).copied() else {
        return false;
    };

    let source = dna.chromosome_mut(from);
    let idx = rng.gen_range(0..source.len());
    let gene: Gene = source.remove(idx);
    let target = dna.chromosome_mut(to);
    let at = rng.gen_range(0..=target.len());
    target.insert(at, gene);
    true
}

fn substitution<R: Rng>(dna: &mut Dna, config: &MutationConfig, rng: &mut R) -> bool {
    let Some((kind, idx)) = pick_gene(dna, config.removable_chromosomes(), rng) else {
        return false;
    };
    dna.chromosome_mut(kind)[idx] = random_gene(kind, rng);
    true
}

fn frameshift<R: Rng>(dna: &mut Dna, rng: &mut R) -> bool {
    if dna.chromosomes.rhythmic.is_empty() {
        return false;
    }
    for gene in dna.chromosomes.rhythmic.iter_mut() {
        if let GenePayload::Rhythm(rhythm) = &mut gene.payload {
            let len = rhythm.tokens.len();
            if len > 1 {
                let offset = rng.gen_range(0..len);
                rhythm.tokens.rotate_left(offset);
            }
        }
    }
    true
}
