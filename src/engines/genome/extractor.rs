use super::dna::Dna;
use super::gene::{
    ChromosomeKind, Gene, GenePayload, PitchSequence, StructureGene, StructureOp, TextureGene,
};
use super::pitch::parse_sequence;
use super::rhythm::{split_voices, tokenize};
use super::scanner::{scan_calls, CallSite};
use crate::types::Pattern;

/// Chained calls that describe a layer rather than an effect on it:
/// timbre hint and layer level.
const LAYER_ATTRIBUTES: [&str; 3] = ["sound", "s", "velocity"];

/// Parse a pattern into DNA. Best effort: text we cannot read simply
/// contributes no genes.
pub fn extract_dna(pattern: &Pattern) -> Dna {
    let mut dna = extract_from_text(&pattern.text);
    dna.source_metadata = pattern.metadata.clone();
    dna
}

pub fn extract_from_text(text: &str) -> Dna {
    let mut dna = Dna::default();
    // Calls nested inside a gene's own arguments belong to that gene
    let mut consumed_until = 0usize;

    for call in scan_calls(text) {
        if call.offset < consumed_until {
            continue;
        }
        let wrapper = classify_call(&call, &mut dna);
        if !wrapper {
            consumed_until = call.args_span.end;
        }
    }

    dna
}

/// File one call into `dna`. Returns true when the call is a layer
/// wrapper whose arguments still need scanning.
fn classify_call(call: &CallSite, dna: &mut Dna) -> bool {
    let name = call.name.as_str();

    if let Some(op) = StructureOp::from_call(name) {
        dna.chromosome_mut(ChromosomeKind::Structural).push(Gene::new(
            GenePayload::Structure(StructureGene {
                op,
                argument: call.args.trim().to_string(),
            }),
            call.offset,
        ));
        return op.is_wrapper();
    }

    match (call.is_method, name) {
        (true, attr) if LAYER_ATTRIBUTES.contains(&attr) => {}
        (false, "sound" | "s") => extract_rhythm(call, dna),
        (_, "note" | "n") => extract_pitches(call, dna),
        (true, effect) => {
            dna.chromosome_mut(ChromosomeKind::Textural).push(Gene::new(
                GenePayload::Texture(TextureGene {
                    effect: effect.to_string(),
                    param: call.args.trim().to_string(),
                }),
                call.offset,
            ));
        }
        (false, _) => {}
    }
    false
}

fn extract_rhythm(call: &CallSite, dna: &mut Dna) {
    let raw = call
        .string_argument()
        .unwrap_or_else(|| call.args.trim().to_string());
    let tokens = tokenize(&raw);
    if tokens.is_empty() {
        return;
    }
    for (instrument, voice) in split_voices(&tokens) {
        let mut gene = Gene::rhythm(voice, instrument);
        gene.source_offset = call.offset;
        dna.chromosome_mut(ChromosomeKind::Rhythmic).push(gene);
    }
}

fn extract_pitches(call: &CallSite, dna: &mut Dna) {
    let Some(raw) = call.string_argument() else {
        return;
    };
    let notes = parse_sequence(&raw);
    if notes.is_empty() {
        return;
    }
    let sequence = PitchSequence { notes };
    let (kind, payload) = if sequence.is_low_register() {
        (ChromosomeKind::Harmonic, GenePayload::Harmony(sequence))
    } else {
        (ChromosomeKind::Melodic, GenePayload::Melody(sequence))
    };
    dna.chromosome_mut(kind).push(Gene::new(payload, call.offset));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::genome::gene::GeneKind;
    use crate::engines::genome::rhythm::Instrument;

    #[test]
    fn test_drum_line_with_gain() {
        let dna = extract_from_text(r#"sound("bd ~ sd ~").gain(0.7)"#);
        assert_eq!(dna.chromosomes.rhythmic.len(), 2);
        assert_eq!(dna.chromosomes.textural.len(), 1);
        match &dna.chromosomes.textural[0].payload {
            GenePayload::Texture(texture) => {
                assert_eq!(texture.effect, "gain");
                assert_eq!(texture.param, "0.7");
            }
            other => panic!("unexpected payload {:?}", other),
        }
        match &dna.chromosomes.rhythmic[1].payload {
            GenePayload::Rhythm(rhythm) => {
                assert_eq!(rhythm.instrument, Instrument::Snare);
                assert_eq!(rhythm.pattern(), "~ ~ sd ~");
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_melody_and_bass_split() {
        let dna = extract_from_text(
            r#"stack(note("c4 e4 g4").sound("sine"), note("c2 g2").s("sawtooth").lpf(800))"#,
        );
        assert_eq!(dna.chromosomes.melodic.len(), 1);
        assert_eq!(dna.chromosomes.harmonic.len(), 1);
        assert_eq!(dna.chromosomes.structural.len(), 1);
        assert_eq!(dna.chromosomes.textural.len(), 1);
        assert!(dna.chromosomes.rhythmic.is_empty());
    }

    #[test]
    fn test_structural_calls() {
        let dna = extract_from_text(r#"sound("hh*8").slow(2).every(4, x => x.fast(2))"#);
        let ops: Vec<_> = dna
            .chromosomes
            .structural
            .iter()
            .filter_map(|g| match &g.payload {
                GenePayload::Structure(s) => Some((s.op, s.argument.clone())),
                _ => None,
            })
            .collect();
        // The fast() inside every's argument belongs to the every gene
        assert_eq!(
            ops,
            vec![
                (StructureOp::Slow, "2".to_string()),
                (StructureOp::Every, "4, x => x.fast(2)".to_string())
            ]
        );
    }

    #[test]
    fn test_garbage_yields_empty_dna() {
        assert!(extract_from_text("").is_empty());
        assert!(extract_from_text("this is not a pattern ((").is_empty());
        assert!(extract_from_text(r#"note("")"#).is_empty());
    }

    #[test]
    fn test_source_offsets() {
        let dna = extract_from_text(r#"note("c4 d4").room(0.3)"#);
        assert_eq!(dna.chromosomes.melodic[0].source_offset, 0);
        assert_eq!(dna.chromosomes.textural[0].source_offset, 13);
        assert_eq!(dna.count_kind(GeneKind::Melody), 1);
    }
}
