use crate::engines::genome::dna::Dna;
use crate::engines::genome::extractor::extract_from_text;
use crate::engines::genome::gene::{GenePayload, StructureOp};

const RHYTHM_WEIGHT: f64 = 0.1;
const PITCH_WEIGHT: f64 = 0.15;
const MODIFIER_WEIGHT: f64 = 0.05;
const LAYERING_WEIGHT: f64 = 0.2;
const LENGTH_CAP: f64 = 0.2;
const LENGTH_SCALE: f64 = 1000.0;

/// Heuristic complexity of pattern text in [0, 1]
pub fn estimate_complexity(text: &str) -> f64 {
    estimate_dna_complexity(&extract_from_text(text), text.len())
}

pub fn estimate_dna_complexity(dna: &Dna, text_len: usize) -> f64 {
    let genes: f64 = dna
        .genes()
        .map(|gene| match &gene.payload {
            GenePayload::Rhythm(_) => RHYTHM_WEIGHT,
            GenePayload::Melody(_) | GenePayload::Harmony(_) => PITCH_WEIGHT,
            GenePayload::Texture(_) => MODIFIER_WEIGHT,
            GenePayload::Structure(s) => match s.op {
                StructureOp::Stack | StructureOp::Seq => LAYERING_WEIGHT,
                StructureOp::Slow | StructureOp::Fast | StructureOp::Every => MODIFIER_WEIGHT,
            },
        })
        .sum();
    let length = (text_len as f64 / LENGTH_SCALE).min(LENGTH_CAP);
    (genes + length).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_drum_line() {
        let text = r#"sound("bd ~ ~ ~")"#;
        let expected = 0.1 + text.len() as f64 / 1000.0;
        assert!((estimate_complexity(text) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_layered_pattern_scores_higher() {
        let simple = estimate_complexity(r#"sound("bd ~ ~ ~")"#);
        let layered = estimate_complexity(
            r#"stack(sound("bd ~ sd ~"), note("c4 e4 g4"), note("c2 g2")).lpf(800).slow(2)"#,
        );
        assert!(layered > simple);
        assert!(layered <= 1.0);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(estimate_complexity(""), 0.0);
    }
}
