/// Turns parsed FASTA entries into sequence records carrying an organism name
use crate::bio::sequence::{Sequence, SequenceRecord};
use tracing::debug;

/// Binomial name from a FASTA header: its 2nd and 3rd whitespace-separated
/// tokens joined by one space. The `>id` token counts as the 1st.
///
/// `">AB123456.1 Liotyphlops beu 16S ribosomal RNA gene"` yields
/// `"Liotyphlops beu"`. Headers with fewer than three tokens yield `None`.
pub fn organism_name(header: &str) -> Option<String> {
    let mut tokens = header.split_whitespace().skip(1);
    let genus = tokens.next()?;
    let species = tokens.next()?;
    Some(format!("{} {}", genus, species))
}

/// One record per entry, in input order. Malformed headers are carried with no name.
pub fn load_sequences(sequences: &[Sequence]) -> Vec<SequenceRecord> {
    sequences
        .iter()
        .map(|seq| {
            let header = seq.header();
            let organism_name = organism_name(&header);
            if organism_name.is_none() {
                debug!("Header '{}' has no binomial name; it will not match", header);
            }
            SequenceRecord {
                header,
                sequence: seq.sequence_str(),
                organism_name,
            }
        })
        .collect()
}
