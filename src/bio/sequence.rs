use serde::{Deserialize, Serialize};

/// A raw FASTA entry as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn sequence_str(&self) -> String {
        String::from_utf8_lossy(&self.sequence).to_string()
    }

    /// Full header line including the leading `>`
    pub fn header(&self) -> String {
        let mut header = format!(">{}", self.id);

        if let Some(desc) = &self.description {
            header.push(' ');
            header.push_str(desc);
        }

        header
    }
}

/// One loaded sequence entry with its derived organism name.
///
/// `organism_name` is `None` when the header is too short to carry a
/// binomial; such records are kept and simply never match a diet record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub header: String,
    pub sequence: String,
    pub organism_name: Option<String>,
}

impl SequenceRecord {
    /// The organism name, or `None` when it is missing or empty
    pub fn name(&self) -> Option<&str> {
        self.organism_name.as_deref().filter(|n| !n.is_empty())
    }
}
