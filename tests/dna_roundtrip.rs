use patternevo::engines::genome::{
    extract_from_text, reconstruct, ChromosomeKind, Dna, Gene, GeneKind, GenePayload, Instrument,
    PitchToken, StructureOp, DEFAULT_PATTERN,
};
use std::collections::BTreeMap;

const SOURCES: [&str; 6] = [
    r#"sound("bd ~ sd ~").gain(0.7)"#,
    r#"stack(sound("bd ~ sd ~"), note("c4 e4 g4")).room(0.3)"#,
    r#"note("c2 g2 c3").s("sawtooth").lpf(800).slow(2)"#,
    r#"cat(sound("bd*2 ~"), s("hh hh hh hh")).every(4, x => x.fast(2))"#,
    r#"stack(note("e4 ~ g4 b4").sound("sine"), note("c2 ~ g2").delay(0.25), sound("~ cp ~ cp"))"#,
    r#"n("c3 eb3").fast(2).pan(0.2)"#,
];

fn round_trip(dna: &Dna) -> Dna {
    extract_from_text(&reconstruct(dna).text)
}

fn counts(dna: &Dna) -> BTreeMap<GeneKind, usize> {
    dna.kind_counts()
}

#[test]
fn test_second_round_trip_keeps_gene_counts() {
    for source in SOURCES {
        let extracted = extract_from_text(source);
        let once = round_trip(&extracted);
        let twice = round_trip(&once);
        assert_eq!(counts(&once), counts(&twice), "source: {}", source);
    }
}

#[test]
fn test_wrapped_sources_are_already_canonical() {
    for source in [SOURCES[1], SOURCES[3], SOURCES[4]] {
        let extracted = extract_from_text(source);
        assert_eq!(counts(&extracted), counts(&round_trip(&extracted)), "source: {}", source);
    }
}

#[test]
fn test_multi_layer_dna_gains_a_stack() {
    let extracted = extract_from_text(SOURCES[0]);
    assert!(extracted.chromosomes.structural.is_empty());

    let text = reconstruct(&extracted).text;
    assert!(text.starts_with("stack("), "{}", text);
    let canonical = extract_from_text(&text);
    assert_eq!(canonical.count_kind(GeneKind::Structure), 1);
    assert_eq!(canonical.count_kind(GeneKind::Rhythm), 2);
    assert_eq!(canonical.count_kind(GeneKind::Texture), 1);
}

#[test]
fn test_drum_line_splits_into_voices() {
    let dna = extract_from_text(r#"sound("bd ~ sd ~").gain(0.7)"#);
    let voices: Vec<(Instrument, String)> = dna
        .chromosome(ChromosomeKind::Rhythmic)
        .iter()
        .filter_map(|gene| match &gene.payload {
            GenePayload::Rhythm(rhythm) => Some((rhythm.instrument, rhythm.pattern())),
            _ => None,
        })
        .collect();
    assert_eq!(
        voices,
        vec![
            (Instrument::Kick, "bd ~ ~ ~".to_string()),
            (Instrument::Snare, "~ ~ sd ~".to_string()),
        ]
    );
}

#[test]
fn test_low_notes_become_harmony() {
    let dna = extract_from_text(r#"stack(note("c4 e4"), note("a3 c5"), note("c2"))"#);
    assert_eq!(dna.count_kind(GeneKind::Melody), 1);
    assert_eq!(dna.count_kind(GeneKind::Harmony), 2);
}

#[test]
fn test_layer_attributes_are_not_effects() {
    let dna = extract_from_text(r#"note("c4 e4").sound("sine").velocity(0.6).room(0.4)"#);
    assert_eq!(dna.count_kind(GeneKind::Texture), 1);
    assert_eq!(dna.total_genes(), 2);
}

#[test]
fn test_unreadable_text_reconstructs_to_default() {
    for text in ["", "hello world", r#"note("")"#, "((((("] {
        let dna = extract_from_text(text);
        assert!(dna.is_empty(), "text: {:?}", text);
        let rebuilt = reconstruct(&dna);
        assert_eq!(rebuilt.text, DEFAULT_PATTERN);
        assert!(rebuilt.repaired);
    }
}

#[test]
fn test_effects_without_layers_fall_back_to_default() {
    let mut dna = Dna::default();
    dna.chromosomes.textural.push(Gene::texture("room", "0.5"));
    dna.chromosomes.structural.push(Gene::structure(StructureOp::Slow, "2"));
    assert_eq!(reconstruct(&dna).text, DEFAULT_PATTERN);
}

#[test]
fn test_hand_built_dna_reconstructs_in_canonical_order() {
    let mut dna = Dna::default();
    dna.chromosomes.harmonic.push(Gene::harmony(vec![
        PitchToken::parse("c2"),
        PitchToken::parse("g2"),
    ]));
    dna.chromosomes.melodic.push(Gene::melody(vec![PitchToken::parse("e4")]));
    dna.chromosomes.structural.push(Gene::structure(StructureOp::Slow, "2"));

    let rebuilt = reconstruct(&dna);
    assert!(!rebuilt.repaired);
    let melody_at = rebuilt.text.find(r#"note("e4")"#).unwrap();
    let harmony_at = rebuilt.text.find(r#"note("c2 g2")"#).unwrap();
    assert!(melody_at < harmony_at);
    assert!(rebuilt.text.ends_with(".slow(2)"), "{}", rebuilt.text);
}
