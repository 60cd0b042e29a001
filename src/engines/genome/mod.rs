pub mod gene;
pub mod pitch;
pub mod rhythm;
pub mod dna;
pub mod scanner;
pub mod extractor;
pub mod reconstructor;

pub use dna::{Chromosomes, Dna};
pub use extractor::{extract_dna, extract_from_text};
pub use gene::{ChromosomeKind, Gene, GeneKind, GenePayload, StructureOp};
pub use pitch::PitchToken;
pub use reconstructor::{reconstruct, validate_and_repair, Reconstruction, DEFAULT_PATTERN};
pub use rhythm::Instrument;
