use crate::config::breeding::BreedingConfig;
use crate::engines::genome::dna::Dna;
use crate::engines::genome::extractor::extract_dna;
use crate::engines::genome::reconstructor::DEFAULT_PATTERN;
use crate::engines::mutation::{MutationConfig, MutationSelection, PatternMutator};
use crate::types::Pattern;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static WORD_SPLIT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\W+").ok());

const DOMINANT_GENRES: usize = 3;

/// One member of a population
#[derive(Debug, Clone)]
pub struct Candidate {
    pub pattern: Pattern,
    pub dna: Dna,
    pub fitness: f64,
}

impl Candidate {
    pub fn new(pattern: Pattern, dna: Dna) -> Self {
        Self {
            pattern,
            dna,
            fitness: 0.0,
        }
    }

    pub fn from_pattern(pattern: Pattern) -> Self {
        let dna = extract_dna(&pattern);
        Self::new(pattern, dna)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationAnalysis {
    pub average_fitness: f64,
    pub max_fitness: f64,
    pub min_fitness: f64,
    /// One minus the mean pairwise word overlap of pattern texts
    pub diversity_score: f64,
    pub dominant_genres: Vec<String>,
}

impl PopulationAnalysis {
    pub fn analyze(population: &[Candidate]) -> Self {
        if population.is_empty() {
            return Self::default();
        }
        let fitness: Vec<f64> = population.iter().map(|c| c.fitness).collect();
        let max_fitness = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_fitness = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        // Summation error can push the mean a hair outside [min, max]
        let mean = fitness.iter().sum::<f64>() / fitness.len() as f64;
        let average_fitness = if min_fitness <= max_fitness {
            mean.clamp(min_fitness, max_fitness)
        } else {
            mean
        };

        Self {
            average_fitness,
            max_fitness,
            min_fitness,
            diversity_score: diversity(population),
            dominant_genres: dominant_genres(population),
        }
    }
}

fn words(text: &str) -> Vec<&str> {
    match WORD_SPLIT.as_ref() {
        Some(split) => split.split(text).filter(|w| !w.is_empty()).collect(),
        None => text.split_whitespace().collect(),
    }
}

/// Share of `a`'s words also present in `b`, over the longer word list
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let words_a = words(a);
    let words_b = words(b);
    let longest = words_a.len().max(words_b.len());
    if longest == 0 {
        return 1.0;
    }
    let common = words_a.iter().filter(|w| words_b.contains(w)).count();
    common as f64 / longest as f64
}

pub fn diversity(population: &[Candidate]) -> f64 {
    let mut total = 0.0;
    let mut comparisons = 0usize;
    for (i, a) in population.iter().enumerate() {
        for b in &population[i + 1..] {
            total += text_similarity(&a.pattern.text, &b.pattern.text);
            comparisons += 1;
        }
    }
    if comparisons == 0 {
        return 0.0;
    }
    (1.0 - total / comparisons as f64).clamp(0.0, 1.0)
}

/// Most frequent genres, ties broken alphabetically
pub fn dominant_genres(population: &[Candidate]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for genre in population.iter().filter_map(|c| c.pattern.metadata.genre.as_deref()) {
        *counts.entry(genre).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(DOMINANT_GENRES)
        .map(|(genre, _)| genre.to_string())
        .collect()
}

/// Source pattern, or the default pattern carrying the source's metadata
/// when nothing musical could be read from it
pub fn seed_source(source: &Pattern) -> Candidate {
    let candidate = Candidate::from_pattern(source.clone());
    if !candidate.dna.is_empty() {
        return candidate;
    }
    log::warn!("Source pattern has no readable genes, seeding from default pattern");
    let mut fallback = source.clone();
    fallback.text = DEFAULT_PATTERN.to_string();
    Candidate::from_pattern(fallback)
}

/// Source plus `size - 1` random-operator variants of it
pub fn seed_population<R: Rng>(
    source: &Pattern,
    size: usize,
    breeding: &BreedingConfig,
    rng: &mut R,
) -> Vec<Candidate> {
    let origin = seed_source(source);
    let mut population = Vec::with_capacity(size);

    while population.len() + 1 < size {
        let intensity = rng.gen_range(breeding.seed_intensity_min..=breeding.seed_intensity_max);
        let preserve_structure = rng.gen_bool(breeding.seed_structure_preservation);
        let mutator = PatternMutator::new(
            MutationSelection::Random,
            MutationConfig {
                intensity,
                allow_structural_changes: !preserve_structure,
                preserve_genre: true,
            },
        );
        let outcome = mutator.mutate_with_dna(&origin.pattern, &origin.dna, rng);
        population.push(Candidate::new(outcome.pattern, outcome.dna));
    }
    population.insert(0, origin);
    population.truncate(size);
    population
}
