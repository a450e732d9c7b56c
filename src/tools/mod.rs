pub mod mafft;
pub mod traits;

pub use mafft::MafftAligner;
pub use traits::{Aligner, TreeJob, TreeMethod, TreeRequest};
