use rand::Rng;
use serde::{Deserialize, Serialize};

/// Metadata carried alongside pattern text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternMetadata {
    pub id: String,
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub energy_level: Option<f64>,
    pub complexity_score: Option<f64>,
    pub generation_index: u32,
    /// One id for mutants, two for crossover offspring
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

impl PatternMetadata {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_ids.first().map(String::as_str)
    }

    /// Id used when this pattern becomes somebody's parent
    pub fn lineage_id(&self) -> String {
        if self.id.is_empty() {
            "unknown".to_string()
        } else {
            self.id.clone()
        }
    }
}

/// Fresh pattern id drawn from the caller's RNG so seeded runs repeat
pub fn generate_pattern_id<R: Rng>(prefix: &str, rng: &mut R) -> String {
    format!("{}_{:012x}", prefix, rng.gen::<u64>() & 0xffff_ffff_ffff)
}

/// A playable pattern: code text plus metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: PatternMetadata,
}

impl Pattern {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: String::new(),
            metadata: PatternMetadata::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.id = id.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.metadata.genre = Some(genre.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn base_description(&self) -> &str {
        if self.description.is_empty() {
            "Musical pattern"
        } else {
            &self.description
        }
    }
}

/// Caller-supplied preferences used by fitness scoring and the
/// user-directed strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub favorite_genres: Vec<String>,
    /// Desired complexity in [0, 1]
    pub target_complexity: Option<f64>,
    pub mutation_intensity: Option<f64>,
    pub preserve_structure: Option<bool>,
    pub allow_genre_shift: Option<bool>,
}

/// Output shape shared with the pattern generator, consumed as-is by
/// playback and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolvedPattern {
    pub code: String,
    pub description: String,
    pub metadata: PatternMetadata,
}

impl From<&Pattern> for EvolvedPattern {
    fn from(pattern: &Pattern) -> Self {
        Self {
            code: pattern.text.clone(),
            description: pattern.description.clone(),
            metadata: pattern.metadata.clone(),
        }
    }
}
