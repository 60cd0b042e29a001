use serde::{Deserialize, Serialize};
use std::fmt;

const SHARP_NAMES: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// Octave assumed for notes written without one when they carry
pub const DEFAULT_OCTAVE: i8 = 4;
const MIN_OCTAVE: i8 = 1;
const MAX_OCTAVE: i8 = 8;
/// Octaves accepted when reading text; anything else stays raw
const READABLE_OCTAVES: std::ops::RangeInclusive<i8> = 0..=9;

/// One token of a `note("...")` sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchToken {
    Note { pitch_class: u8, octave: Option<i8> },
    Rest,
    /// Anything we could not read as a note (chord names, scale degrees...)
    Raw(String),
}

impl PitchToken {
    pub fn note(pitch_class: u8, octave: Option<i8>) -> Self {
        PitchToken::Note {
            pitch_class: pitch_class % 12,
            octave,
        }
    }

    pub fn parse(token: &str) -> Self {
        if token == "~" {
            return PitchToken::Rest;
        }

        let lower = token.to_ascii_lowercase();
        let mut chars = lower.chars();
        let base: i32 = match chars.next() {
            Some('c') => 0,
            Some('d') => 2,
            Some('e') => 4,
            Some('f') => 5,
            Some('g') => 7,
            Some('a') => 9,
            Some('b') => 11,
            _ => return PitchToken::Raw(token.to_string()),
        };

        let mut rest = chars.as_str();
        let mut offset = 0;
        if let Some(stripped) = rest.strip_prefix('#').or_else(|| rest.strip_prefix('s')) {
            offset = 1;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('b') {
            offset = -1;
            rest = stripped;
        }

        let octave = if rest.is_empty() {
            None
        } else if rest.chars().all(|c| c.is_ascii_digit()) {
            match rest.parse::<i8>() {
                Ok(octave) if READABLE_OCTAVES.contains(&octave) => Some(octave),
                _ => return PitchToken::Raw(token.to_string()),
            }
        } else {
            return PitchToken::Raw(token.to_string());
        };

        PitchToken::Note {
            pitch_class: (base + offset).rem_euclid(12) as u8,
            octave,
        }
    }

    pub fn pitch_class(&self) -> Option<u8> {
        match self {
            PitchToken::Note { pitch_class, .. } => Some(*pitch_class),
            _ => None,
        }
    }

    pub fn octave(&self) -> Option<i8> {
        match self {
            PitchToken::Note { octave, .. } => *octave,
            _ => None,
        }
    }

    /// Bass register: an explicit octave of 3 or lower
    pub fn is_low_register(&self) -> bool {
        self.octave().is_some_and(|octave| octave <= 3)
    }

    /// Move by `semitones`, carrying into the octave on wraparound
    pub fn transpose(&self, semitones: i8) -> Self {
        match self {
            PitchToken::Note { pitch_class, octave } => {
                let total = *pitch_class as i32 + semitones as i32;
                let carry = total.div_euclid(12) as i8;
                let new_class = total.rem_euclid(12) as u8;
                let new_octave = match (octave, carry) {
                    (octave, 0) => *octave,
                    (Some(octave), carry) => {
                        Some(octave.saturating_add(carry).clamp(MIN_OCTAVE, MAX_OCTAVE))
                    }
                    (None, carry) => Some(DEFAULT_OCTAVE.saturating_add(carry)),
                };
                PitchToken::Note {
                    pitch_class: new_class,
                    octave: new_octave,
                }
            }
            other => other.clone(),
        }
    }

    pub fn shift_octave(&self, delta: i8) -> Self {
        match self {
            PitchToken::Note { pitch_class, octave } => {
                let current = octave.unwrap_or(DEFAULT_OCTAVE);
                PitchToken::Note {
                    pitch_class: *pitch_class,
                    octave: Some(current.saturating_add(delta).clamp(MIN_OCTAVE, MAX_OCTAVE)),
                }
            }
            other => other.clone(),
        }
    }
}

impl fmt::Display for PitchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchToken::Note { pitch_class, octave } => {
                write!(f, "{}", SHARP_NAMES[(*pitch_class % 12) as usize])?;
                if let Some(octave) = octave {
                    write!(f, "{}", octave)?;
                }
                Ok(())
            }
            PitchToken::Rest => write!(f, "~"),
            PitchToken::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// Parse a whitespace separated note sequence
pub fn parse_sequence(text: &str) -> Vec<PitchToken> {
    text.split_whitespace().map(PitchToken::parse).collect()
}

pub fn format_sequence(notes: &[PitchToken]) -> String {
    notes
        .iter()
        .map(|note| note.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
