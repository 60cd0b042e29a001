use patternevo::engines::generation::operators::crossover;
use patternevo::engines::generation::population::Candidate;
use patternevo::engines::genome::reconstructor::has_sound_source;
use patternevo::engines::genome::{
    extract_from_text, reconstruct, ChromosomeKind, GeneKind, GenePayload,
};
use patternevo::engines::mutation::{
    MutationConfig, MutationOperator, MutationSelection, PatternMutator,
};
use patternevo::types::Pattern;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SOURCES: [&str; 5] = [
    r#"sound("bd ~ sd ~").gain(0.7)"#,
    r#"stack(sound("bd ~ sd ~"), note("c4 e4 g4")).room(0.3)"#,
    r#"note("c2 g2 c3").s("sawtooth").lpf(800).slow(2)"#,
    r#"sound("hh*8")"#,
    "",
];

fn permissive() -> MutationConfig {
    MutationConfig {
        intensity: 0.9,
        allow_structural_changes: true,
        preserve_genre: false,
    }
}

#[test]
fn test_deletion_removes_the_only_texture() {
    let dna = extract_from_text(r#"sound("bd ~ sd ~").gain(0.7)"#);
    assert_eq!(dna.count_kind(GeneKind::Rhythm), 2);
    assert_eq!(dna.count_kind(GeneKind::Texture), 1);

    // With the default config only the textural chromosome is removable
    let mut rng = StdRng::seed_from_u64(3);
    let mutated = MutationOperator::Deletion.apply(&dna, &MutationConfig::default(), &mut rng);
    assert_eq!(mutated.count_kind(GeneKind::Texture), 0);
    assert_eq!(
        mutated.chromosome(ChromosomeKind::Rhythmic),
        dna.chromosome(ChromosomeKind::Rhythmic)
    );
}

#[test]
fn test_every_operator_output_is_playable() {
    for source in SOURCES {
        let dna = extract_from_text(source);
        for op in MutationOperator::ALL {
            for config in [MutationConfig::default(), permissive()] {
                for seed in 0..10 {
                    let mut rng = StdRng::seed_from_u64(seed);
                    let mutated = op.apply(&dna, &config, &mut rng);
                    let text = reconstruct(&mutated).text;
                    assert!(!text.is_empty());
                    assert!(
                        has_sound_source(&text),
                        "{} on {:?} gave {:?}",
                        op,
                        source,
                        text
                    );
                }
            }
        }
    }
}

#[test]
fn test_operator_output_survives_reconstruction() {
    let dna = extract_from_text(
        r#"stack(sound("bd ~ sd ~"), note("c4 e4 g4"), note("c2 g2")).room(0.3).slow(2)"#,
    );
    for op in MutationOperator::ALL {
        for config in [MutationConfig::default(), permissive()] {
            for seed in 0..40 {
                let mut rng = StdRng::seed_from_u64(seed);
                let mutated = op.apply(&dna, &config, &mut rng);

                let layers = mutated.genes().filter(|gene| gene.is_layer()).count();
                let wrapped = mutated.genes().any(|gene| match &gene.payload {
                    GenePayload::Structure(structure) => structure.op.is_wrapper(),
                    _ => false,
                });
                if layers == 0 || (layers > 1 && !wrapped) {
                    continue;
                }

                let reread = extract_from_text(&reconstruct(&mutated).text);
                assert_eq!(
                    reread.kind_counts(),
                    mutated.kind_counts(),
                    "{} (seed {}) changed gene counts",
                    op,
                    seed
                );
            }
        }
    }
}

#[test]
fn test_crossover_output_is_playable() {
    let mut rng = StdRng::seed_from_u64(21);
    for a in SOURCES {
        for b in SOURCES {
            let parent_a = Candidate::from_pattern(Pattern::new(a).with_genre("house"));
            let parent_b = Candidate::from_pattern(Pattern::new(b));
            let child = crossover(&parent_a, &parent_b, &mut rng);
            assert!(has_sound_source(&child.pattern.text), "{:?}", child.pattern.text);
            assert_eq!(child.pattern.description, "Hybrid of house and unknown");
        }
    }
}

#[test]
fn test_repeated_mutation_keeps_lineage() {
    let mutator = PatternMutator::experimental();
    let mut rng = StdRng::seed_from_u64(99);
    let mut pattern = Pattern::new(SOURCES[1])
        .with_id("groove-1")
        .with_genre("techno")
        .with_description("Late night groove");

    for step in 1..=5u32 {
        let parent_id = pattern.metadata.id.clone();
        let outcome = mutator.mutate_pattern(&pattern, &mut rng);

        assert!(has_sound_source(&outcome.pattern.text));
        assert_eq!(outcome.pattern.metadata.generation_index, step);
        assert_eq!(outcome.pattern.metadata.parent_ids, vec![parent_id]);
        assert!(outcome.pattern.metadata.id.starts_with("mut_"));
        assert_eq!(outcome.pattern.metadata.genre.as_deref(), Some("techno"));
        assert_eq!(outcome.dna, {
            let mut dna = extract_from_text(&outcome.pattern.text);
            dna.source_metadata = outcome.pattern.metadata.clone();
            dna
        });
        pattern = outcome.pattern;
    }
    assert!(pattern.description.starts_with("Radical evolution of"));
}

#[test]
fn test_forced_operator_is_reported() {
    let mutator = PatternMutator::new(
        MutationSelection::Operator(MutationOperator::Insertion),
        MutationConfig::default(),
    );
    let mut rng = StdRng::seed_from_u64(5);
    let outcome = mutator.mutate_pattern(&Pattern::new(r#"note("c4 e4 g4")"#), &mut rng);

    assert_eq!(outcome.operator, MutationOperator::Insertion);
    assert_eq!(outcome.report.operator, MutationOperator::Insertion);
    let added: i64 = outcome.report.chromosome_changes.values().sum();
    assert_eq!(added, 1);
    assert_eq!(outcome.description, "Added new musical elements");
    assert!(outcome
        .pattern
        .description
        .starts_with("Creative variation of Musical pattern"));
}
