use crate::config::breeding::BreedingConfig;
use crate::config::evolution::{EvolutionConfig, EvolutionStrategy};
use crate::config::fitness::FitnessConfig;
use crate::config::manager::AppConfig;
use crate::config::traits::validate_section;
use crate::engines::evaluation::complexity::estimate_complexity;
use crate::engines::evaluation::fitness::{FitnessBreakdown, FitnessEvaluator};
use crate::engines::generation::{
    history::{EvolutionSession, GenerationRecord, StrategySnapshot},
    population::{seed_population, Candidate, PopulationAnalysis},
    progress::SilentProgress,
    strategy::{breed, ranked_indices, BreedingPlan},
};
use crate::engines::genome::reconstructor::DEFAULT_PATTERN;
use crate::error::PatternEvoError;
use crate::types::{EvolvedPattern, Pattern, UserPreferences};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, record: &GenerationRecord);
    fn on_candidate_evaluated(&mut self, current: usize, total: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation)
    }

    fn on_generation_complete(&mut self, record: &GenerationRecord) {
        (**self).on_generation_complete(record)
    }

    fn on_candidate_evaluated(&mut self, current: usize, total: usize) {
        (**self).on_candidate_evaluated(current, total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxGenerations,
    TargetReached,
    Cancelled,
}

/// Change from the source pattern to the winner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvements {
    pub code_length_change: i64,
    pub complexity_change: f64,
    pub generation_advancement: u32,
}

impl Improvements {
    pub fn between(source: &Pattern, best: &Pattern) -> Self {
        Self {
            code_length_change: best.text.len() as i64 - source.text.len() as i64,
            complexity_change: estimate_complexity(&best.text) - estimate_complexity(&source.text),
            generation_advancement: best
                .metadata
                .generation_index
                .saturating_sub(source.metadata.generation_index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub generations_run: usize,
    pub strategy: EvolutionStrategy,
    pub stop_reason: StopReason,
    pub best_fitness: f64,
    /// Records of this run only; the session keeps the rolling history
    pub records: Vec<GenerationRecord>,
    pub improvements: Improvements,
}

#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub best: Pattern,
    pub fitness: f64,
    pub breakdown: FitnessBreakdown,
    pub report: EvolutionReport,
    pub evolved: EvolvedPattern,
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    breeding: BreedingConfig,
    fitness: FitnessConfig,
    evaluator: FitnessEvaluator,
    rng: StdRng,
    cancel: Arc<AtomicBool>,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Self {
        Self::with_sections(config, BreedingConfig::default(), FitnessConfig::default())
    }

    pub fn from_app_config(app: &AppConfig) -> Self {
        Self::with_sections(app.evolution.clone(), app.breeding.clone(), app.fitness.clone())
    }

    pub fn with_sections(
        config: EvolutionConfig,
        breeding: BreedingConfig,
        fitness: FitnessConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let evaluator = FitnessEvaluator::new(fitness.clone(), config.user_preferences.clone());

        Self {
            config,
            breeding,
            fitness,
            evaluator,
            rng,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the RNG, e.g. with a pre-seeded one
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Set to true from any thread to stop after the current generation
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the evolution process
    pub fn evolve<C: ProgressCallback>(
        &mut self,
        source: &Pattern,
        session: &mut EvolutionSession,
        mut callback: C,
    ) -> Result<EvolutionOutcome, PatternEvoError> {
        validate_section(&self.config)?;
        validate_section(&self.breeding)?;
        validate_section(&self.fitness)?;

        log::info!(
            "Evolving pattern with {} strategy: {} generations of {}",
            self.config.strategy,
            self.config.generations,
            self.config.population_size
        );

        let snapshot = StrategySnapshot::from(&self.config);
        let mut population = self.initialize_population(source);
        let mut records = Vec::new();
        let mut generation = 0;

        let (best, stop_reason) = loop {
            callback.on_generation_start(generation);
            self.evaluate_population(&mut population, &mut callback);

            let analysis = PopulationAnalysis::analyze(&population);
            let record = session.record(generation, analysis.clone(), snapshot.clone());
            callback.on_generation_complete(&record);
            records.push(record);

            let best_idx = ranked_indices(&population).first().copied().unwrap_or(0);
            let best_fitness = population[best_idx].fitness;

            let stop = if best_fitness >= self.config.target_fitness {
                Some(StopReason::TargetReached)
            } else if generation + 1 >= self.config.generations {
                Some(StopReason::MaxGenerations)
            } else if self.cancel.load(Ordering::Relaxed) {
                Some(StopReason::Cancelled)
            } else {
                None
            };
            if let Some(reason) = stop {
                break (population.swap_remove(best_idx), reason);
            }

            population = self.create_next_generation(&population, &analysis);
            generation += 1;
        };

        log::info!(
            "Evolution stopped ({:?}) after {} generations, best fitness {:.4}",
            stop_reason,
            generation + 1,
            best.fitness
        );
        Ok(self.build_outcome(source, best, stop_reason, generation + 1, records))
    }

    fn initialize_population(&mut self, source: &Pattern) -> Vec<Candidate> {
        seed_population(source, self.config.population_size, &self.breeding, &mut self.rng)
    }

    fn evaluate_population<C: ProgressCallback>(
        &self,
        population: &mut [Candidate],
        callback: &mut C,
    ) {
        let total = population.len();
        for (i, candidate) in population.iter_mut().enumerate() {
            candidate.fitness = self.evaluator.score(&candidate.pattern);
            callback.on_candidate_evaluated(i + 1, total);
        }
    }

    fn create_next_generation(
        &mut self,
        evaluated: &[Candidate],
        analysis: &PopulationAnalysis,
    ) -> Vec<Candidate> {
        let plan = BreedingPlan::for_strategy(&self.config, &self.breeding, analysis);
        let next = breed(evaluated, &plan, self.breeding.tournament_size, &mut self.rng);

        if next.iter().all(|c| c.dna.is_empty()) {
            log::warn!("Breeding produced no usable genes, re-seeding from default pattern");
            let fallback = Pattern::new(DEFAULT_PATTERN);
            return seed_population(&fallback, self.config.population_size, &self.breeding, &mut self.rng);
        }
        next
    }

    fn build_outcome(
        &self,
        source: &Pattern,
        best: Candidate,
        stop_reason: StopReason,
        generations_run: usize,
        records: Vec<GenerationRecord>,
    ) -> EvolutionOutcome {
        let breakdown = self.evaluator.evaluate(&best.pattern);
        let improvements = Improvements::between(source, &best.pattern);
        let mut evolved = EvolvedPattern::from(&best.pattern);
        evolved.description = format!(
            "{} (evolved over {} generations)",
            best.pattern.base_description(),
            generations_run
        );

        EvolutionOutcome {
            fitness: best.fitness,
            breakdown,
            report: EvolutionReport {
                generations_run,
                strategy: self.config.strategy,
                stop_reason,
                best_fitness: best.fitness,
                records,
                improvements,
            },
            evolved,
            best: best.pattern,
        }
    }
}

/// Independent runs in parallel, one per source. Run `i` is seeded with
/// `seed + i`; records land in `session` in input order.
pub fn evolve_batch(
    sources: &[Pattern],
    app: &AppConfig,
    session: &Mutex<EvolutionSession>,
) -> Vec<Result<EvolutionOutcome, PatternEvoError>> {
    let template = session
        .lock()
        .map(|s| s.fresh())
        .unwrap_or_else(|poisoned| poisoned.into_inner().fresh());

    let runs: Vec<(Result<EvolutionOutcome, PatternEvoError>, EvolutionSession)> = sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            let mut config = app.clone();
            config.evolution.seed = app.evolution.seed.map(|seed| seed.wrapping_add(i as u64));
            let mut run_session = template.clone();
            let mut engine = EvolutionEngine::from_app_config(&config);
            let result = engine.evolve(source, &mut run_session, SilentProgress);
            (result, run_session)
        })
        .collect();

    let mut shared = session.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    runs.into_iter()
        .map(|(result, run_session)| {
            shared.merge(run_session);
            result
        })
        .collect()
}

fn run_preset(
    config: EvolutionConfig,
    source: &Pattern,
    seed: Option<u64>,
    session: &mut EvolutionSession,
) -> Result<EvolutionOutcome, PatternEvoError> {
    let config = match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    };
    EvolutionEngine::new(config).evolve(source, session, SilentProgress)
}

/// Natural strategy, 3 generations, stop at 0.7
pub fn quick_evolve(
    source: &Pattern,
    seed: Option<u64>,
    session: &mut EvolutionSession,
) -> Result<EvolutionOutcome, PatternEvoError> {
    run_preset(EvolutionConfig::quick(), source, seed, session)
}

/// Experimental strategy, 5 generations, stop at 0.6
pub fn experimental_evolve(
    source: &Pattern,
    seed: Option<u64>,
    session: &mut EvolutionSession,
) -> Result<EvolutionOutcome, PatternEvoError> {
    run_preset(EvolutionConfig::experimental(), source, seed, session)
}

/// Guided strategy, 4 generations, stop at 0.8
pub fn guided_evolve(
    source: &Pattern,
    preferences: UserPreferences,
    seed: Option<u64>,
    session: &mut EvolutionSession,
) -> Result<EvolutionOutcome, PatternEvoError> {
    run_preset(EvolutionConfig::guided(preferences), source, seed, session)
}
