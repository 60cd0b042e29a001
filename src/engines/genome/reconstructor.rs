use super::dna::Dna;
use super::gene::{GenePayload, StructureGene};
use super::scanner::scan_calls;

/// Playable fallback whenever DNA has nothing that makes a sound
pub const DEFAULT_PATTERN: &str = r#"sound("bd ~ ~ bd").velocity(0.7)"#;
const DEFAULT_MELODY: &str = r#"note("c4 e4 g4")"#;

pub const RHYTHM_LEVEL: &str = "0.7";
pub const MELODY_LEVEL: &str = "0.6";
pub const HARMONY_LEVEL: &str = "0.5";
pub const MELODY_TIMBRE: &str = "sine";
pub const HARMONY_TIMBRE: &str = "sawtooth";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub text: String,
    /// True when validate-and-repair had to change the emitted text
    pub repaired: bool,
}

/// Serialize DNA back into pattern code. Deterministic, never fails.
pub fn reconstruct(dna: &Dna) -> Reconstruction {
    let mut layers: Vec<String> = Vec::new();
    let mut wrappers: Vec<&StructureGene> = Vec::new();
    let mut chained: Vec<String> = Vec::new();
    let mut effects: Vec<String> = Vec::new();

    for gene in dna.genes() {
        match &gene.payload {
            GenePayload::Rhythm(rhythm) => layers.push(format!(
                r#"sound("{}").velocity({})"#,
                rhythm.pattern(),
                RHYTHM_LEVEL
            )),
            GenePayload::Melody(seq) => layers.push(format!(
                r#"note("{}").sound("{}").velocity({})"#,
                seq.pattern(),
                MELODY_TIMBRE,
                MELODY_LEVEL
            )),
            GenePayload::Harmony(seq) => layers.push(format!(
                r#"note("{}").sound("{}").velocity({})"#,
                seq.pattern(),
                HARMONY_TIMBRE,
                HARMONY_LEVEL
            )),
            GenePayload::Structure(structure) if structure.op.is_wrapper() => {
                wrappers.push(structure)
            }
            GenePayload::Structure(structure) => {
                chained.push(format!(".{}({})", structure.op.name(), structure.argument))
            }
            GenePayload::Texture(texture) => {
                effects.push(format!(".{}({})", texture.effect, texture.param))
            }
        }
    }

    if layers.is_empty() {
        log::debug!("DNA has no sound layers, emitting default pattern");
        return Reconstruction {
            text: DEFAULT_PATTERN.to_string(),
            repaired: true,
        };
    }

    let mut code = match wrappers.split_first() {
        None if layers.len() == 1 => layers.remove(0),
        None => wrap("stack", &layers),
        Some((first, rest)) => {
            let mut code = wrap(first.op.name(), &layers);
            for outer in rest {
                code = wrap(outer.op.name(), std::slice::from_ref(&code));
            }
            code
        }
    };
    for call in chained.iter().chain(effects.iter()) {
        code.push_str(call);
    }

    validate_and_repair(&code)
}

fn wrap(op: &str, layers: &[String]) -> String {
    format!("{}(\n  {}\n)", op, layers.join(",\n  "))
}

/// Guarantee the text contains something playable
pub fn validate_and_repair(code: &str) -> Reconstruction {
    if !has_sound_source(code) {
        log::debug!("Pattern has no sound source, replacing with default");
        return Reconstruction {
            text: DEFAULT_PATTERN.to_string(),
            repaired: true,
        };
    }

    let repaired_code = code
        .replace(r#"note("")"#, DEFAULT_MELODY)
        .replace(r#"sound("")"#, r#"sound("bd ~ ~ bd")"#);
    let repaired = repaired_code != code;
    if repaired {
        log::debug!("Filled empty note/sound calls");
    }
    Reconstruction {
        text: repaired_code,
        repaired,
    }
}

pub fn has_sound_source(code: &str) -> bool {
    scan_calls(code)
        .iter()
        .any(|call| !call.is_method && matches!(call.name.as_str(), "sound" | "s" | "note" | "n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::genome::extractor::extract_from_text;
    use crate::engines::genome::gene::{Gene, StructureOp};
    use crate::engines::genome::pitch::parse_sequence;
    use crate::engines::genome::rhythm::{tokenize, Instrument};

    #[test]
    fn test_single_layer_emitted_directly() {
        let mut dna = Dna::default();
        dna.chromosomes
            .rhythmic
            .push(Gene::rhythm(tokenize("bd ~ ~ ~"), Instrument::Kick));
        dna.chromosomes.textural.push(Gene::texture("gain", "0.7"));

        let out = reconstruct(&dna);
        assert!(!out.repaired);
        assert_eq!(out.text, r#"sound("bd ~ ~ ~").velocity(0.7).gain(0.7)"#);
    }

    #[test]
    fn test_multiple_layers_are_stacked() {
        let mut dna = Dna::default();
        dna.chromosomes
            .rhythmic
            .push(Gene::rhythm(tokenize("hh*4"), Instrument::HiHat));
        dna.chromosomes
            .harmonic
            .push(Gene::harmony(parse_sequence("c2 g2")));
        dna.chromosomes
            .structural
            .push(Gene::structure(StructureOp::Slow, "2"));

        let out = reconstruct(&dna);
        assert!(out.text.starts_with("stack(\n  sound(\"hh*4\")"));
        assert!(out.text.contains(r#"note("c2 g2").sound("sawtooth").velocity(0.5)"#));
        assert!(out.text.ends_with(").slow(2)"));
    }

    #[test]
    fn test_seq_wrapper_gene_is_used() {
        let mut dna = Dna::default();
        dna.chromosomes
            .melodic
            .push(Gene::melody(parse_sequence("c4 d4")));
        dna.chromosomes
            .structural
            .push(Gene::structure(StructureOp::Seq, ""));

        let out = reconstruct(&dna);
        assert!(out.text.starts_with("seq(\n  note(\"c4 d4\")"));
    }

    #[test]
    fn test_empty_dna_repairs_to_default() {
        let out = reconstruct(&Dna::default());
        assert!(out.repaired);
        assert_eq!(out.text, DEFAULT_PATTERN);

        let mut effects_only = Dna::default();
        effects_only
            .chromosomes
            .textural
            .push(Gene::texture("room", "0.4"));
        assert_eq!(reconstruct(&effects_only).text, DEFAULT_PATTERN);
    }

    #[test]
    fn test_empty_note_is_filled() {
        let mut dna = Dna::default();
        dna.chromosomes.melodic.push(Gene::melody(Vec::new()));
        let out = reconstruct(&dna);
        assert!(out.repaired);
        assert!(out.text.starts_with(r#"note("c4 e4 g4")"#));
    }

    #[test]
    fn test_round_trip_keeps_kinds_and_counts() {
        let source = r#"stack(sound("bd ~ sd ~"), note("c4 e4 g4"), note("c2 f2")).lpf(900).room(0.3).slow(2)"#;
        let dna = extract_from_text(source);
        let again = extract_from_text(&reconstruct(&dna).text);
        assert_eq!(dna.kind_counts(), again.kind_counts());
        let layers_and_effects = |d: &Dna| {
            d.genes()
                .filter(|g| !matches!(&g.payload, GenePayload::Structure(s) if s.op.is_wrapper()))
                .map(|g| g.payload.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(layers_and_effects(&dna), layers_and_effects(&again));
    }
}
