use super::population::PopulationAnalysis;
use crate::config::evolution::{EvolutionConfig, EvolutionStrategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Source of generation timestamps; tests pin it to a fixed instant
pub type Clock = fn() -> DateTime<Utc>;

/// Breeding parameters in force when a generation was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySnapshot {
    pub strategy: EvolutionStrategy,
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_rate: f64,
    pub target_fitness: f64,
}

impl From<&EvolutionConfig> for StrategySnapshot {
    fn from(config: &EvolutionConfig) -> Self {
        Self {
            strategy: config.strategy,
            population_size: config.population_size,
            mutation_rate: config.mutation_rate,
            crossover_rate: config.crossover_rate,
            elitism_rate: config.elitism_rate,
            target_fitness: config.target_fitness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub population_analysis: PopulationAnalysis,
    pub strategy_config: StrategySnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStats {
    pub total_generations: usize,
    pub best_fitness: f64,
    pub average_fitness: f64,
    /// Best fitness of each retained generation, oldest first
    pub fitness_progression: Vec<f64>,
    pub diversity_progression: Vec<f64>,
}

/// Caller-owned history of evaluated generations, oldest trimmed first
#[derive(Debug, Clone)]
pub struct EvolutionSession {
    records: VecDeque<GenerationRecord>,
    capacity: usize,
    clock: Clock,
}

impl Default for EvolutionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionSession {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Empty session sharing this one's capacity and clock
    pub fn fresh(&self) -> Self {
        Self::with_capacity(self.capacity).with_clock(self.clock)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stamp and store a generation
    pub fn record(
        &mut self,
        index: usize,
        population_analysis: PopulationAnalysis,
        strategy_config: StrategySnapshot,
    ) -> GenerationRecord {
        let record = GenerationRecord {
            index,
            timestamp: (self.clock)(),
            population_analysis,
            strategy_config,
        };
        self.push(record.clone());
        record
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    /// Append another session's records in order
    pub fn merge(&mut self, other: EvolutionSession) {
        for record in other.records {
            self.push(record);
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn stats(&self) -> EvolutionStats {
        let fitness_progression: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.population_analysis.max_fitness)
            .collect();
        let diversity_progression = self
            .records
            .iter()
            .map(|r| r.population_analysis.diversity_score)
            .collect();
        let average_fitness = if self.records.is_empty() {
            0.0
        } else {
            self.records
                .iter()
                .map(|r| r.population_analysis.average_fitness)
                .sum::<f64>()
                / self.records.len() as f64
        };

        EvolutionStats {
            total_generations: self.records.len(),
            best_fitness: fitness_progression.iter().copied().fold(0.0, f64::max),
            average_fitness,
            fitness_progression,
            diversity_progression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn analysis(max: f64) -> PopulationAnalysis {
        PopulationAnalysis {
            average_fitness: max / 2.0,
            max_fitness: max,
            min_fitness: 0.0,
            diversity_score: 0.5,
            dominant_genres: Vec::new(),
        }
    }

    #[test]
    fn test_capacity_trims_oldest() {
        let snapshot = StrategySnapshot::from(&EvolutionConfig::default());
        let mut session = EvolutionSession::with_capacity(3).with_clock(fixed_clock);
        for i in 0..5 {
            session.record(i, analysis(i as f64 / 10.0), snapshot.clone());
        }
        assert_eq!(session.len(), 3);
        let indices: Vec<usize> = session.records().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(session.latest().unwrap().timestamp, fixed_clock());
    }

    #[test]
    fn test_stats() {
        let snapshot = StrategySnapshot::from(&EvolutionConfig::default());
        let mut session = EvolutionSession::new().with_clock(fixed_clock);
        session.record(0, analysis(0.4), snapshot.clone());
        session.record(1, analysis(0.8), snapshot);
        let stats = session.stats();
        assert_eq!(stats.total_generations, 2);
        assert_eq!(stats.best_fitness, 0.8);
        assert!((stats.average_fitness - 0.3).abs() < 1e-9);
        assert_eq!(stats.fitness_progression, vec![0.4, 0.8]);
    }
}
