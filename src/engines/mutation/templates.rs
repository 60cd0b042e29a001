use crate::engines::genome::gene::{ChromosomeKind, Gene, StructureOp};
use crate::engines::genome::pitch::PitchToken;
use crate::engines::genome::rhythm::{tokenize, Instrument};
use rand::seq::SliceRandom;
use rand::Rng;

/// One instrument class each, so an inserted line is a single voice
const RHYTHM_TEMPLATES: [&str; 5] = ["bd ~ ~ ~", "bd*2 ~ bd ~", "~ sd ~ sd", "hh*4", "~ hh hh hh"];
const MELODY_POOL: [&str; 8] = ["c4", "d4", "e4", "f4", "g4", "a4", "b4", "~"];
const HARMONY_POOL: [&str; 4] = ["c2", "f2", "g2", "c3"];
const TEXTURE_TEMPLATES: [(&str, &str); 5] = [
    ("reverb", "0.5"),
    ("delay", "0.25"),
    ("gain", "0.8"),
    ("lpf", "800"),
    ("hpf", "200"),
];

/// Fresh gene of the kind a chromosome normally holds
pub fn random_gene<R: Rng>(chromosome: ChromosomeKind, rng: &mut R) -> Gene {
    match chromosome {
        ChromosomeKind::Rhythmic => {
            let template = RHYTHM_TEMPLATES.choose(rng).copied().unwrap_or("bd ~ ~ ~");
            Gene::rhythm(tokenize(template), Instrument::Generated)
        }
        ChromosomeKind::Melodic => {
            let len = rng.gen_range(2..=7);
            Gene::melody(draw_notes(&MELODY_POOL, len, rng))
        }
        ChromosomeKind::Harmonic => {
            let len = rng.gen_range(2..=4);
            Gene::harmony(draw_notes(&HARMONY_POOL, len, rng))
        }
        ChromosomeKind::Textural => {
            let (effect, param) = TEXTURE_TEMPLATES
                .choose(rng)
                .copied()
                .unwrap_or(("gain", "0.8"));
            Gene::texture(effect, param)
        }
        ChromosomeKind::Structural => Gene::structure(StructureOp::Slow, "2"),
    }
}

fn draw_notes<R: Rng>(pool: &[&str], len: usize, rng: &mut R) -> Vec<PitchToken> {
    (0..len)
        .filter_map(|_| pool.choose(rng))
        .map(|token| PitchToken::parse(token))
        .collect()
}
