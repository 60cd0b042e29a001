use super::gene::{ChromosomeKind, Gene, GeneKind, GenePayload, RhythmGene};
use super::rhythm::split_voices;
use crate::types::PatternMetadata;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Five ordered gene lists; any of them may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosomes {
    pub rhythmic: Vec<Gene>,
    pub melodic: Vec<Gene>,
    pub harmonic: Vec<Gene>,
    pub textural: Vec<Gene>,
    pub structural: Vec<Gene>,
}

/// Structured "musical DNA" of a pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dna {
    pub chromosomes: Chromosomes,
    pub source_metadata: PatternMetadata,
}

impl Dna {
    pub fn new(source_metadata: PatternMetadata) -> Self {
        Self {
            chromosomes: Chromosomes::default(),
            source_metadata,
        }
    }

    pub fn chromosome(&self, kind: ChromosomeKind) -> &Vec<Gene> {
        match kind {
            ChromosomeKind::Rhythmic => &self.chromosomes.rhythmic,
            ChromosomeKind::Melodic => &self.chromosomes.melodic,
            ChromosomeKind::Harmonic => &self.chromosomes.harmonic,
            ChromosomeKind::Textural => &self.chromosomes.textural,
            ChromosomeKind::Structural => &self.chromosomes.structural,
        }
    }

    pub fn chromosome_mut(&mut self, kind: ChromosomeKind) -> &mut Vec<Gene> {
        match kind {
            ChromosomeKind::Rhythmic => &mut self.chromosomes.rhythmic,
            ChromosomeKind::Melodic => &mut self.chromosomes.melodic,
            ChromosomeKind::Harmonic => &mut self.chromosomes.harmonic,
            ChromosomeKind::Textural => &mut self.chromosomes.textural,
            ChromosomeKind::Structural => &mut self.chromosomes.structural,
        }
    }

    /// All genes, chromosome by chromosome in canonical order
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        ChromosomeKind::ALL
            .into_iter()
            .flat_map(move |kind| self.chromosome(kind).iter())
    }

    pub fn total_genes(&self) -> usize {
        ChromosomeKind::ALL
            .iter()
            .map(|kind| self.chromosome(*kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_genes() == 0
    }

    pub fn non_empty_chromosomes(&self) -> Vec<ChromosomeKind> {
        ChromosomeKind::ALL
            .into_iter()
            .filter(|kind| !self.chromosome(*kind).is_empty())
            .collect()
    }

    /// Gene count per gene kind, wherever the genes live
    pub fn kind_counts(&self) -> BTreeMap<GeneKind, usize> {
        let mut counts = BTreeMap::new();
        for gene in self.genes() {
            *counts.entry(gene.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_kind(&self, kind: GeneKind) -> usize {
        self.genes().filter(|gene| gene.kind() == kind).count()
    }

    pub fn rhythm_tokens(&self) -> impl Iterator<Item = &String> {
        self.genes().flat_map(|gene| {
            let tokens: &[String] = match &gene.payload {
                GenePayload::Rhythm(rhythm) => &rhythm.tokens,
                _ => &[],
            };
            tokens.iter()
        })
    }

    /// Gene count normalised to [0, 1], ten genes being "full"
    pub fn complexity(&self) -> f64 {
        (self.total_genes() as f64 * 0.1).min(1.0)
    }

    /// Share of the five gene kinds that are in use
    pub fn diversity(&self) -> f64 {
        let kinds: BTreeSet<GeneKind> = self.genes().map(Gene::kind).collect();
        kinds.len() as f64 / ChromosomeKind::ALL.len() as f64
    }

    /// Reshape genes the way extraction would read them back: one
    /// instrument class per rhythm gene, pitch genes typed by register.
    /// Genes stay in the chromosome they are in.
    pub fn normalize(&mut self) {
        for kind in ChromosomeKind::ALL {
            let genes = std::mem::take(self.chromosome_mut(kind));
            *self.chromosome_mut(kind) = genes.into_iter().flat_map(normalize_gene).collect();
        }
    }
}

fn normalize_gene(gene: Gene) -> Vec<Gene> {
    let offset = gene.source_offset;
    match gene.payload {
        GenePayload::Rhythm(rhythm) => {
            let voices = split_voices(&rhythm.tokens);
            if voices.len() <= 1 {
                return vec![Gene::new(GenePayload::Rhythm(rhythm), offset)];
            }
            voices
                .into_iter()
                .map(|(instrument, tokens)| {
                    Gene::new(GenePayload::Rhythm(RhythmGene { tokens, instrument }), offset)
                })
                .collect()
        }
        GenePayload::Melody(seq) if seq.is_low_register() => {
            vec![Gene::new(GenePayload::Harmony(seq), offset)]
        }
        GenePayload::Harmony(seq) if !seq.is_low_register() => {
            vec![Gene::new(GenePayload::Melody(seq), offset)]
        }
        payload => vec![Gene::new(payload, offset)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::genome::pitch::PitchToken;
    use crate::engines::genome::rhythm::Instrument;

    fn sample() -> Dna {
        let mut dna = Dna::default();
        dna.chromosomes
            .rhythmic
            .push(Gene::rhythm(vec!["bd".into(), "~".into()], Instrument::Kick));
        dna.chromosomes
            .melodic
            .push(Gene::melody(vec![PitchToken::parse("c4")]));
        dna.chromosomes.textural.push(Gene::texture("gain", "0.7"));
        dna
    }

    #[test]
    fn test_counts_and_metrics() {
        let dna = sample();
        assert_eq!(dna.total_genes(), 3);
        assert!((dna.complexity() - 0.3).abs() < 1e-9);
        assert!((dna.diversity() - 0.6).abs() < 1e-9);
        assert_eq!(dna.count_kind(GeneKind::Texture), 1);
        assert_eq!(
            dna.non_empty_chromosomes(),
            vec![
                ChromosomeKind::Rhythmic,
                ChromosomeKind::Melodic,
                ChromosomeKind::Textural
            ]
        );
    }

    #[test]
    fn test_kind_counts_follow_payload() {
        let mut dna = sample();
        // A gene moved into a foreign chromosome keeps its own kind
        let moved = dna.chromosomes.rhythmic.remove(0);
        dna.chromosomes.harmonic.push(moved);
        assert_eq!(dna.kind_counts().get(&GeneKind::Rhythm), Some(&1));
        assert_eq!(dna.count_kind(GeneKind::Harmony), 0);
    }

    #[test]
    fn test_normalize_splits_mixed_rhythm_and_retypes_pitches() {
        let mut dna = Dna::default();
        let tokens = ["bd", "sd", "hh", "sd"].map(String::from).to_vec();
        dna.chromosomes
            .rhythmic
            .push(Gene::rhythm(tokens, Instrument::Generated));
        dna.chromosomes
            .melodic
            .push(Gene::melody(vec![PitchToken::parse("c4"), PitchToken::parse("g3")]));
        dna.chromosomes
            .harmonic
            .push(Gene::harmony(vec![PitchToken::parse("c5")]));

        dna.normalize();
        assert_eq!(dna.count_kind(GeneKind::Rhythm), 3);
        assert_eq!(dna.chromosomes.rhythmic.len(), 3);
        // Retyped genes stay where they were
        assert_eq!(dna.chromosomes.melodic[0].kind(), GeneKind::Harmony);
        assert_eq!(dna.chromosomes.harmonic[0].kind(), GeneKind::Melody);

        let before = dna.clone();
        dna.normalize();
        assert_eq!(dna, before);
    }

    #[test]
    fn test_empty() {
        let dna = Dna::default();
        assert!(dna.is_empty());
        assert_eq!(dna.complexity(), 0.0);
        assert_eq!(dna.diversity(), 0.0);
    }
}
