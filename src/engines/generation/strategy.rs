use super::operators::{crossover, random_member, tournament_selection};
use super::population::{Candidate, PopulationAnalysis};
use crate::config::breeding::BreedingConfig;
use crate::config::evolution::{EvolutionConfig, EvolutionStrategy};
use crate::engines::mutation::{MutationConfig, MutationSelection, PatternMutator};
use crate::types::UserPreferences;
use rand::Rng;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSelection {
    Tournament,
    Uniform,
}

/// How one strategy fills the next generation
#[derive(Debug, Clone, PartialEq)]
pub struct BreedingPlan {
    pub elite_count: usize,
    pub parents: ParentSelection,
    /// Zero for mutation-only strategies
    pub crossover_rate: f64,
    /// Chance a crossover child is mutated once more
    pub offspring_mutation_rate: f64,
    pub mutator: PatternMutator,
}

impl BreedingPlan {
    pub fn for_strategy(
        config: &EvolutionConfig,
        breeding: &BreedingConfig,
        analysis: &PopulationAnalysis,
    ) -> Self {
        match config.strategy {
            EvolutionStrategy::Natural => Self {
                elite_count: config.elite_count(),
                parents: ParentSelection::Tournament,
                crossover_rate: config.crossover_rate,
                offspring_mutation_rate: config.mutation_rate,
                mutator: PatternMutator::new(
                    MutationSelection::Adaptive,
                    MutationConfig::new(breeding.mutation_intensity),
                ),
            },
            EvolutionStrategy::Guided => Self::guided(
                config.elites_for_rate(breeding.guided_elite_rate),
                MutationConfig {
                    intensity: breeding.mutation_intensity,
                    allow_structural_changes: analysis.diversity_score >= breeding.diversity_threshold,
                    preserve_genre: analysis.average_fitness >= breeding.fitness_threshold,
                },
            ),
            EvolutionStrategy::UserDirected => Self::guided(
                config.elites_for_rate(breeding.guided_elite_rate),
                user_mutation_config(&config.user_preferences, breeding, analysis),
            ),
            EvolutionStrategy::Experimental => Self {
                elite_count: config.elites_for_rate(breeding.experimental_elite_rate),
                parents: ParentSelection::Uniform,
                crossover_rate: 0.0,
                offspring_mutation_rate: 0.0,
                mutator: PatternMutator::new(
                    MutationSelection::Random,
                    MutationConfig {
                        intensity: breeding.experimental_intensity,
                        allow_structural_changes: true,
                        preserve_genre: false,
                    },
                ),
            },
        }
    }

    fn guided(elite_count: usize, mutation: MutationConfig) -> Self {
        Self {
            elite_count,
            parents: ParentSelection::Tournament,
            crossover_rate: 0.0,
            offspring_mutation_rate: 0.0,
            mutator: PatternMutator::new(MutationSelection::Adaptive, mutation),
        }
    }
}

/// Preferences win; population statistics fill whatever was left unset
fn user_mutation_config(
    preferences: &UserPreferences,
    breeding: &BreedingConfig,
    analysis: &PopulationAnalysis,
) -> MutationConfig {
    let preserve_structure = preferences
        .preserve_structure
        .unwrap_or(analysis.diversity_score < breeding.diversity_threshold);
    let allow_genre_shift = preferences
        .allow_genre_shift
        .unwrap_or(analysis.average_fitness < breeding.fitness_threshold);
    MutationConfig {
        intensity: preferences
            .mutation_intensity
            .unwrap_or(breeding.mutation_intensity),
        allow_structural_changes: !preserve_structure,
        preserve_genre: !allow_genre_shift,
    }
}

/// Indices sorted best first; ties keep population order
pub fn ranked_indices(population: &[Candidate]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..population.len()).collect();
    indices.sort_by(|a, b| {
        population[*b]
            .fitness
            .partial_cmp(&population[*a].fitness)
            .unwrap_or(Ordering::Equal)
    });
    indices
}

/// Build the next generation, same size as the evaluated one
pub fn breed<R: Rng>(
    population: &[Candidate],
    plan: &BreedingPlan,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Candidate> {
    let size = population.len();
    let mut next: Vec<Candidate> = ranked_indices(population)
        .into_iter()
        .take(plan.elite_count)
        .map(|idx| population[idx].clone())
        .collect();

    while next.len() < size {
        if plan.crossover_rate > 0.0 && rng.gen::<f64>() < plan.crossover_rate {
            let parent1 = select_parent(population, plan.parents, tournament_size, rng);
            let parent2 = select_parent(population, plan.parents, tournament_size, rng);
            let mut child = crossover(parent1, parent2, rng);
            if plan.offspring_mutation_rate > 0.0 && rng.gen_bool(plan.offspring_mutation_rate) {
                child = mutate(&plan.mutator, &child, rng);
            }
            next.push(child);
        } else {
            let parent = select_parent(population, plan.parents, tournament_size, rng);
            next.push(mutate(&plan.mutator, parent, rng));
        }
    }

    next.truncate(size);
    next
}

fn select_parent<'a, R: Rng>(
    population: &'a [Candidate],
    parents: ParentSelection,
    tournament_size: usize,
    rng: &mut R,
) -> &'a Candidate {
    match parents {
        ParentSelection::Tournament => tournament_selection(population, tournament_size, rng),
        ParentSelection::Uniform => random_member(population, rng),
    }
}

fn mutate<R: Rng>(mutator: &PatternMutator, parent: &Candidate, rng: &mut R) -> Candidate {
    let outcome = mutator.mutate_with_dna(&parent.pattern, &parent.dna, rng);
    Candidate::new(outcome.pattern, outcome.dna)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pattern;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population() -> Vec<Candidate> {
        [
            r#"sound("bd ~ sd ~")"#,
            r#"note("c4 e4 g4")"#,
            r#"stack(sound("hh*4"), note("c2 g2")).lpf(800)"#,
            r#"sound("bd*2 ~ sd ~").room(0.4)"#,
        ]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let mut c = Candidate::from_pattern(Pattern::new(*text));
            c.fitness = 0.2 * (i + 1) as f64;
            c
        })
        .collect()
    }

    fn analysis(diversity: f64, average: f64) -> PopulationAnalysis {
        PopulationAnalysis {
            diversity_score: diversity,
            average_fitness: average,
            ..PopulationAnalysis::default()
        }
    }

    #[test]
    fn test_natural_plan_uses_config_rates() {
        let config = EvolutionConfig::default();
        let plan = BreedingPlan::for_strategy(&config, &BreedingConfig::default(), &analysis(0.5, 0.5));
        assert_eq!(plan.elite_count, 5);
        assert_eq!(plan.crossover_rate, 0.7);
        assert_eq!(plan.parents, ParentSelection::Tournament);
    }

    #[test]
    fn test_guided_plan_reacts_to_population() {
        let config = EvolutionConfig {
            strategy: EvolutionStrategy::Guided,
            ..EvolutionConfig::default()
        };
        let breeding = BreedingConfig::default();
        let stale = BreedingPlan::for_strategy(&config, &breeding, &analysis(0.1, 0.3));
        assert!(!stale.mutator.config.allow_structural_changes);
        assert!(!stale.mutator.config.preserve_genre);
        assert_eq!(stale.elite_count, 10);

        let healthy = BreedingPlan::for_strategy(&config, &breeding, &analysis(0.6, 0.7));
        assert!(healthy.mutator.config.allow_structural_changes);
        assert!(healthy.mutator.config.preserve_genre);
    }

    #[test]
    fn test_user_directed_prefers_explicit_settings() {
        let config = EvolutionConfig {
            strategy: EvolutionStrategy::UserDirected,
            user_preferences: UserPreferences {
                mutation_intensity: Some(0.9),
                preserve_structure: Some(true),
                allow_genre_shift: Some(false),
                ..UserPreferences::default()
            },
            ..EvolutionConfig::default()
        };
        let plan = BreedingPlan::for_strategy(&config, &BreedingConfig::default(), &analysis(0.9, 0.1));
        assert_eq!(plan.mutator.config.intensity, 0.9);
        assert!(!plan.mutator.config.allow_structural_changes);
        assert!(plan.mutator.config.preserve_genre);
    }

    #[test]
    fn test_breed_keeps_size_and_elites() {
        let population = population();
        let config = EvolutionConfig {
            population_size: population.len(),
            elitism_rate: 0.25,
            ..EvolutionConfig::default()
        };
        let plan = BreedingPlan::for_strategy(&config, &BreedingConfig::default(), &analysis(0.5, 0.5));
        let mut rng = StdRng::seed_from_u64(17);
        let next = breed(&population, &plan, 3, &mut rng);
        assert_eq!(next.len(), population.len());
        assert_eq!(next[0].pattern, population[3].pattern);
    }

    #[test]
    fn test_experimental_breeding_mutates_everything_but_elites() {
        let population = population();
        let config = EvolutionConfig {
            strategy: EvolutionStrategy::Experimental,
            population_size: population.len(),
            ..EvolutionConfig::default()
        };
        let plan = BreedingPlan::for_strategy(&config, &BreedingConfig::default(), &analysis(0.5, 0.5));
        assert_eq!(plan.elite_count, 1);
        let mut rng = StdRng::seed_from_u64(23);
        let next = breed(&population, &plan, 3, &mut rng);
        assert_eq!(next.len(), 4);
        for child in &next[1..] {
            assert!(child.pattern.metadata.id.starts_with("mut_"));
        }
    }
}
