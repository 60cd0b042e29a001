use super::pitch::{format_sequence, PitchToken};
use super::rhythm::Instrument;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneKind {
    Rhythm,
    Melody,
    Harmony,
    Texture,
    Structure,
}

impl GeneKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeneKind::Rhythm => "rhythm",
            GeneKind::Melody => "melody",
            GeneKind::Harmony => "harmony",
            GeneKind::Texture => "texture",
            GeneKind::Structure => "structure",
        }
    }
}

/// The five chromosomes of a DNA value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromosomeKind {
    Rhythmic,
    Melodic,
    Harmonic,
    Textural,
    Structural,
}

impl ChromosomeKind {
    pub const ALL: [ChromosomeKind; 5] = [
        ChromosomeKind::Rhythmic,
        ChromosomeKind::Melodic,
        ChromosomeKind::Harmonic,
        ChromosomeKind::Textural,
        ChromosomeKind::Structural,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChromosomeKind::Rhythmic => "rhythmic",
            ChromosomeKind::Melodic => "melodic",
            ChromosomeKind::Harmonic => "harmonic",
            ChromosomeKind::Textural => "textural",
            ChromosomeKind::Structural => "structural",
        }
    }

    /// Kind of gene the extractor files into this chromosome
    pub fn gene_kind(&self) -> GeneKind {
        match self {
            ChromosomeKind::Rhythmic => GeneKind::Rhythm,
            ChromosomeKind::Melodic => GeneKind::Melody,
            ChromosomeKind::Harmonic => GeneKind::Harmony,
            ChromosomeKind::Textural => GeneKind::Texture,
            ChromosomeKind::Structural => GeneKind::Structure,
        }
    }

    pub fn for_gene(kind: GeneKind) -> Self {
        match kind {
            GeneKind::Rhythm => ChromosomeKind::Rhythmic,
            GeneKind::Melody => ChromosomeKind::Melodic,
            GeneKind::Harmony => ChromosomeKind::Harmonic,
            GeneKind::Texture => ChromosomeKind::Textural,
            GeneKind::Structure => ChromosomeKind::Structural,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhythmGene {
    pub tokens: Vec<String>,
    pub instrument: Instrument,
}

impl RhythmGene {
    pub fn pattern(&self) -> String {
        self.tokens.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchSequence {
    pub notes: Vec<PitchToken>,
}

impl PitchSequence {
    pub fn pattern(&self) -> String {
        format_sequence(&self.notes)
    }

    /// Any note in the bass register makes the sequence harmonic
    pub fn is_low_register(&self) -> bool {
        self.notes.iter().any(|note| note.is_low_register())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureGene {
    pub effect: String,
    /// Raw parameter text, numeric or enumerated
    pub param: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureOp {
    Stack,
    Seq,
    Slow,
    Fast,
    Every,
}

impl StructureOp {
    pub fn name(&self) -> &'static str {
        match self {
            StructureOp::Stack => "stack",
            StructureOp::Seq => "seq",
            StructureOp::Slow => "slow",
            StructureOp::Fast => "fast",
            StructureOp::Every => "every",
        }
    }

    pub fn from_call(name: &str) -> Option<Self> {
        match name {
            "stack" => Some(StructureOp::Stack),
            "seq" | "cat" | "sequence" => Some(StructureOp::Seq),
            "slow" => Some(StructureOp::Slow),
            "fast" => Some(StructureOp::Fast),
            "every" => Some(StructureOp::Every),
            _ => None,
        }
    }

    /// Stack and seq combine layers instead of chaining onto one
    pub fn is_wrapper(&self) -> bool {
        matches!(self, StructureOp::Stack | StructureOp::Seq)
    }

    pub fn is_speed_scale(&self) -> bool {
        matches!(self, StructureOp::Slow | StructureOp::Fast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureGene {
    pub op: StructureOp,
    pub argument: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenePayload {
    Rhythm(RhythmGene),
    Melody(PitchSequence),
    Harmony(PitchSequence),
    Texture(TextureGene),
    Structure(StructureGene),
}

/// One atomic musical element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub payload: GenePayload,
    /// Byte offset of the construct in the source text. Only a hint.
    pub source_offset: usize,
}

impl Gene {
    pub fn new(payload: GenePayload, source_offset: usize) -> Self {
        Self {
            payload,
            source_offset,
        }
    }

    pub fn rhythm(tokens: Vec<String>, instrument: Instrument) -> Self {
        Self::new(GenePayload::Rhythm(RhythmGene { tokens, instrument }), 0)
    }

    pub fn melody(notes: Vec<PitchToken>) -> Self {
        Self::new(GenePayload::Melody(PitchSequence { notes }), 0)
    }

    pub fn harmony(notes: Vec<PitchToken>) -> Self {
        Self::new(GenePayload::Harmony(PitchSequence { notes }), 0)
    }

    pub fn texture(effect: impl Into<String>, param: impl Into<String>) -> Self {
        Self::new(
            GenePayload::Texture(TextureGene {
                effect: effect.into(),
                param: param.into(),
            }),
            0,
        )
    }

    pub fn structure(op: StructureOp, argument: impl Into<String>) -> Self {
        Self::new(
            GenePayload::Structure(StructureGene {
                op,
                argument: argument.into(),
            }),
            0,
        )
    }

    pub fn kind(&self) -> GeneKind {
        match &self.payload {
            GenePayload::Rhythm(_) => GeneKind::Rhythm,
            GenePayload::Melody(_) => GeneKind::Melody,
            GenePayload::Harmony(_) => GeneKind::Harmony,
            GenePayload::Texture(_) => GeneKind::Texture,
            GenePayload::Structure(_) => GeneKind::Structure,
        }
    }

    /// Rhythm, melody and harmony genes each produce sound on their own
    pub fn is_layer(&self) -> bool {
        matches!(
            self.kind(),
            GeneKind::Rhythm | GeneKind::Melody | GeneKind::Harmony
        )
    }
}
