use crate::bio::sequence::Sequence;
use crate::core::reconciler::ReconciledRecord;
use crate::ScolecoError;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `"Genus species (Family)"`
pub fn display_label(organism_name: &str, family: &str) -> String {
    format!("{} ({})", organism_name, family)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub label: String,
    pub organism_name: String,
    pub family: String,
    pub sequence: String,
}

/// Insertion-ordered label → record map handed to alignment tools
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledSet {
    records: IndexMap<String, LabeledRecord>,
}

impl LabeledSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&LabeledRecord> {
        self.records.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabeledRecord> {
        self.records.values()
    }

    /// Label → raw sequence, in input order
    pub fn sequence_map(&self) -> IndexMap<String, String> {
        self.records
            .iter()
            .map(|(label, rec)| (label.clone(), rec.sequence.clone()))
            .collect()
    }

    /// FASTA entries whose header is exactly the display label
    pub fn to_sequences(&self) -> Vec<Sequence> {
        self.records
            .values()
            .map(|rec| Sequence::new(rec.label.clone(), rec.sequence.as_bytes().to_vec()))
            .collect()
    }
}

/// Label every reconciled record. Two records producing the same label is an error.
pub fn label_records(records: &[ReconciledRecord]) -> Result<LabeledSet, ScolecoError> {
    let mut set = LabeledSet::default();

    for rec in records {
        let label = display_label(&rec.organism_name, &rec.family);
        match set.records.entry(label) {
            Entry::Occupied(entry) => {
                return Err(ScolecoError::LabelCollision(entry.key().clone()));
            }
            Entry::Vacant(entry) => {
                let label = entry.key().clone();
                entry.insert(LabeledRecord {
                    label,
                    organism_name: rec.organism_name.clone(),
                    family: rec.family.clone(),
                    sequence: rec.sequence.clone(),
                });
            }
        }
    }

    Ok(set)
}
