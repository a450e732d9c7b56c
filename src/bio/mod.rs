pub mod fasta;
pub mod sequence;
pub mod taxonomy;

pub use sequence::{Sequence, SequenceRecord};
pub use taxonomy::{DietRecord, Family, FamilyRecord, TaxonFilter};
