use super::population::Candidate;
use crate::engines::evaluation::complexity::estimate_complexity;
use crate::engines::genome::dna::Dna;
use crate::engines::genome::extractor::extract_from_text;
use crate::engines::genome::gene::ChromosomeKind;
use crate::engines::genome::reconstructor::reconstruct;
use crate::types::{generate_pattern_id, Pattern, PatternMetadata};
use rand::Rng;

/// Tournament selection: pick best of K random candidates
pub fn tournament_selection<'a, R: Rng>(
    population: &'a [Candidate],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Candidate {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].fitness;

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].fitness > best_fitness {
            best_idx = idx;
            best_fitness = population[idx].fitness;
        }
    }

    &population[best_idx]
}

/// Uniform pick, fitness ignored
pub fn random_member<'a, R: Rng>(population: &'a [Candidate], rng: &mut R) -> &'a Candidate {
    &population[rng.gen_range(0..population.len())]
}

/// Position-wise gene crossover, chromosome by chromosome.
///
/// At each index A's gene wins a coin flip when A has one; otherwise B's
/// gene is taken if B reaches that far. Offspring length never exceeds
/// the longer parent.
pub fn crossover_dna<R: Rng>(a: &Dna, b: &Dna, rng: &mut R) -> Dna {
    let mut child = Dna::new(a.source_metadata.clone());
    for kind in ChromosomeKind::ALL {
        let genes_a = a.chromosome(kind);
        let genes_b = b.chromosome(kind);
        let out = child.chromosome_mut(kind);
        for idx in 0..genes_a.len().max(genes_b.len()) {
            match (genes_a.get(idx), genes_b.get(idx)) {
                (Some(gene), _) if rng.gen_bool(0.5) => out.push(gene.clone()),
                (_, Some(gene)) => out.push(gene.clone()),
                _ => {}
            }
        }
    }
    child
}

/// Breed two candidates into a hybrid pattern
pub fn crossover<R: Rng>(a: &Candidate, b: &Candidate, rng: &mut R) -> Candidate {
    let mut dna = crossover_dna(&a.dna, &b.dna, rng);
    if dna.is_empty() {
        dna = a.dna.clone();
    }
    let text = reconstruct(&dna).text;

    let meta_a = &a.pattern.metadata;
    let meta_b = &b.pattern.metadata;
    let genre_label = |meta: &PatternMetadata| meta.genre.clone().unwrap_or_else(|| "unknown".to_string());
    let description = format!("Hybrid of {} and {}", genre_label(meta_a), genre_label(meta_b));

    let metadata = PatternMetadata {
        id: generate_pattern_id("cross", rng),
        genre: meta_a.genre.clone().or_else(|| meta_b.genre.clone()),
        mood: meta_a.mood.clone().or_else(|| meta_b.mood.clone()),
        energy_level: meta_a.energy_level.or(meta_b.energy_level),
        complexity_score: Some(estimate_complexity(&text)),
        generation_index: meta_a.generation_index.max(meta_b.generation_index) + 1,
        parent_ids: vec![meta_a.lineage_id(), meta_b.lineage_id()],
    };

    let mut child_dna = extract_from_text(&text);
    child_dna.source_metadata = metadata.clone();
    Candidate::new(
        Pattern {
            text,
            description,
            metadata,
        },
        child_dna,
    )
}
