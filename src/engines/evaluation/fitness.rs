//! Heuristic fitness of a pattern.
//!
//! Scores are a fixed weighting of structural features read from the
//! pattern's DNA. They reward layered, varied material; they say nothing
//! about how the pattern actually sounds.

use super::complexity::estimate_dna_complexity;
use crate::config::fitness::FitnessConfig;
use crate::engines::genome::dna::Dna;
use crate::engines::genome::extractor::extract_from_text;
use crate::engines::genome::gene::{GeneKind, GenePayload};
use crate::engines::genome::rhythm::{classify, Instrument};
use crate::types::{Pattern, UserPreferences};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

const FILTER_EFFECTS: [&str; 3] = ["lpf", "cutoff", "lowpass"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub coherence: f64,
    pub rhythm: f64,
    pub melody: f64,
    pub harmony: f64,
    pub complexity_fit: f64,
    pub preference: f64,
    /// Complexity estimate the fit was judged on
    pub complexity: f64,
    pub total: f64,
}

impl FitnessBreakdown {
    pub fn to_metrics(&self) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();
        metrics.insert("coherence".to_string(), self.coherence);
        metrics.insert("rhythm".to_string(), self.rhythm);
        metrics.insert("melody".to_string(), self.melody);
        metrics.insert("harmony".to_string(), self.harmony);
        metrics.insert("complexity_fit".to_string(), self.complexity_fit);
        metrics.insert("preference".to_string(), self.preference);
        metrics.insert("complexity".to_string(), self.complexity);
        metrics.insert("total".to_string(), self.total);
        metrics
    }
}

#[derive(Debug, Clone, Default)]
pub struct FitnessEvaluator {
    config: FitnessConfig,
    preferences: UserPreferences,
}

impl FitnessEvaluator {
    pub fn new(config: FitnessConfig, preferences: UserPreferences) -> Self {
        Self {
            config,
            preferences,
        }
    }

    pub fn config(&self) -> &FitnessConfig {
        &self.config
    }

    pub fn score(&self, pattern: &Pattern) -> f64 {
        self.evaluate(pattern).total
    }

    pub fn evaluate(&self, pattern: &Pattern) -> FitnessBreakdown {
        let dna = extract_from_text(&pattern.text);
        let complexity = estimate_dna_complexity(&dna, pattern.text.len());
        let genre = pattern.metadata.genre.as_deref();

        let coherence = unit(musical_coherence(&dna));
        let rhythm = unit(rhythmic_consistency(&dna));
        let melody = unit(melodic_interest(&dna));
        let harmony = unit(harmonic_richness(&dna));
        let complexity_fit = unit(self.complexity_fit(complexity));
        let preference = unit(self.preference_match(genre, complexity));

        let w = &self.config.weights;
        let total = unit(
            coherence * w.coherence
                + rhythm * w.rhythm
                + melody * w.melody
                + harmony * w.harmony
                + complexity_fit * w.complexity
                + preference * w.preference,
        );

        FitnessBreakdown {
            coherence,
            rhythm,
            melody,
            harmony,
            complexity_fit,
            preference,
            complexity,
            total,
        }
    }

    fn complexity_fit(&self, complexity: f64) -> f64 {
        if self.config.optimal_complexity.contains(complexity) {
            1.0
        } else if self.config.acceptable_complexity.contains(complexity) {
            0.8
        } else {
            0.5
        }
    }

    fn preference_match(&self, genre: Option<&str>, complexity: f64) -> f64 {
        let mut score = 0.5;
        if let Some(genre) = genre {
            if self
                .preferences
                .favorite_genres
                .iter()
                .any(|fav| fav.eq_ignore_ascii_case(genre))
            {
                score += 0.3;
            }
        }
        if let Some(target) = self.preferences.target_complexity {
            score += (0.2 - (complexity - target).abs()).max(0.0);
        }
        score
    }
}

fn musical_coherence(dna: &Dna) -> f64 {
    let mut score = 0.5;
    if dna.count_kind(GeneKind::Structure) > 0 {
        score += 0.2;
    }
    let has_pitch = dna.count_kind(GeneKind::Melody) + dna.count_kind(GeneKind::Harmony) > 0;
    if dna.count_kind(GeneKind::Rhythm) > 0 && has_pitch {
        score += 0.2;
    }
    if (1..=5).contains(&dna.count_kind(GeneKind::Texture)) {
        score += 0.1;
    }
    score
}

fn rhythmic_consistency(dna: &Dna) -> f64 {
    let classes: BTreeSet<Instrument> = dna.rhythm_tokens().filter_map(|t| classify(t)).collect();
    let mut score = 0.5;
    if classes.contains(&Instrument::Kick) && classes.contains(&Instrument::Snare) {
        score += 0.3;
    }
    if classes.contains(&Instrument::HiHat) {
        score += 0.2;
    }
    score
}

fn melodic_interest(dna: &Dna) -> f64 {
    let mut score = 0.3;
    let mut pitch_classes = BTreeSet::new();
    let mut melodies = 0;
    for gene in dna.genes() {
        if let GenePayload::Melody(seq) = &gene.payload {
            melodies += 1;
            pitch_classes.extend(seq.notes.iter().filter_map(|n| n.pitch_class()));
        }
    }
    if melodies > 0 {
        score += 0.3;
    }
    if pitch_classes.len() >= 3 {
        score += 0.4;
    }
    score
}

fn harmonic_richness(dna: &Dna) -> f64 {
    let has_harmony = dna.count_kind(GeneKind::Harmony) > 0;
    let filtered = dna.genes().any(|gene| {
        matches!(&gene.payload, GenePayload::Texture(t) if FILTER_EFFECTS.contains(&t.effect.as_str()))
    });
    let mut score = 0.4;
    if has_harmony {
        score += 0.3;
    }
    if filtered || has_harmony {
        score += 0.3;
    }
    score
}

fn unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_bare_drum_line() {
        let evaluator = FitnessEvaluator::default();
        let b = evaluator.evaluate(&Pattern::new(r#"sound("bd ~ sd ~")"#));
        assert!(approx(b.coherence, 0.5));
        assert!(approx(b.rhythm, 0.8));
        assert!(approx(b.melody, 0.3));
        assert!(approx(b.harmony, 0.4));
        assert!(approx(b.complexity_fit, 0.5));
        assert!(approx(b.preference, 0.5));
    }

    #[test]
    fn test_full_arrangement_scores_high() {
        let evaluator = FitnessEvaluator::default();
        let text = r#"stack(sound("bd ~ sd ~"), sound("hh*8"), note("c4 e4 g4 b4"), note("c2 g2")).lpf(900).slow(2)"#;
        let b = evaluator.evaluate(&Pattern::new(text));
        assert!(approx(b.coherence, 1.0));
        assert!(approx(b.rhythm, 1.0));
        assert!(approx(b.melody, 1.0));
        assert!(approx(b.harmony, 1.0));
        assert!(b.total > 0.8);
        assert!(b.total <= 1.0);
    }

    #[test]
    fn test_preferences_reward_genre_and_complexity() {
        let preferences = UserPreferences {
            favorite_genres: vec!["House".to_string()],
            target_complexity: Some(0.0),
            ..UserPreferences::default()
        };
        let evaluator = FitnessEvaluator::new(FitnessConfig::default(), preferences);
        let pattern = Pattern::new("").with_genre("house");
        let b = evaluator.evaluate(&pattern);
        assert!(approx(b.preference, 1.0));
    }

    #[test]
    fn test_garbage_is_bounded() {
        let evaluator = FitnessEvaluator::default();
        let score = evaluator.score(&Pattern::new("))((not code"));
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_metrics_map() {
        let b = FitnessEvaluator::default().evaluate(&Pattern::new(r#"note("c4 d4 e4")"#));
        let metrics = b.to_metrics();
        assert_eq!(metrics.len(), 8);
        assert!(approx(metrics["melody"], 1.0));
    }
}
