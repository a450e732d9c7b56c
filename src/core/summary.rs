/// Prey counts per family for charting
use crate::bio::taxonomy::FamilyRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Pairs observed this many times or fewer are treated as noise
pub const PREY_COUNT_THRESHOLD: usize = 1;

/// Third-level lineage labels that pass target filtering without being families
pub const LEFTOVER_LABELS: [&str; 2] = ["Scolecophidia", "Serpentes"];

pub fn default_leftover_labels() -> Vec<String> {
    LEFTOVER_LABELS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PreySummary {
    pub family: String,
    pub prey: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct DietSummarizer {
    leftover_labels: Vec<String>,
}

impl Default for DietSummarizer {
    fn default() -> Self {
        Self::new(default_leftover_labels())
    }
}

impl DietSummarizer {
    pub fn new(leftover_labels: Vec<String>) -> Self {
        Self { leftover_labels }
    }

    /// Count (family, prey) pairs, ordered by family then prey.
    ///
    /// Leftover family labels, blank prey and counts at or below
    /// [`PREY_COUNT_THRESHOLD`] are left out.
    pub fn summarize(&self, records: &[FamilyRecord]) -> Vec<PreySummary> {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for rec in records {
            let prey = rec.record.prey.trim();
            if prey.is_empty() {
                continue;
            }
            *counts.entry((rec.family.as_str(), prey)).or_default() += 1;
        }

        counts
            .into_iter()
            .filter(|((family, prey), count)| {
                if self.leftover_labels.iter().any(|l| l.as_str() == *family) {
                    debug!("Skipping leftover label '{}' ({} x {})", family, count, prey);
                    return false;
                }
                *count > PREY_COUNT_THRESHOLD
            })
            .map(|((family, prey), count)| PreySummary {
                family: family.to_string(),
                prey: prey.to_string(),
                count,
            })
            .collect()
    }
}

/// Total retained observations per family, in family order
pub fn family_totals(summaries: &[PreySummary]) -> BTreeMap<String, usize> {
    let mut totals = BTreeMap::new();
    for s in summaries {
        *totals.entry(s.family.clone()).or_default() += s.count;
    }
    totals
}
