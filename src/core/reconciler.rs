/// Sequence-to-family reconciliation against filtered diet records
///
/// A sequence is associated with a family when its organism name occurs as
/// a case-sensitive substring of a diet record's predator taxonomy. Matching
/// is deliberately loose, so a name can hit records of several families;
/// [`MatchPolicy`] decides what happens then. Both matching and
/// deduplication depend on input order: callers must pass records in the
/// order they appear in their source files.
use crate::bio::sequence::SequenceRecord;
use crate::bio::taxonomy::FamilyRecord;
use crate::ScolecoError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Resolution rule for names whose matching diet records disagree on family
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Take the family of the first matching record in input order
    #[default]
    FirstMatch,
    /// Treat the sequence as unmatched
    ExcludeAmbiguous,
}

impl MatchPolicy {
    /// Family to assign for a match outcome, or `None` to drop the sequence
    pub fn resolve<'a>(&self, outcome: &'a MatchOutcome) -> Option<&'a str> {
        match (self, outcome) {
            (_, MatchOutcome::Unmatched) => None,
            (_, MatchOutcome::Unique(family)) => Some(family.as_str()),
            (Self::FirstMatch, MatchOutcome::Ambiguous { candidates }) => {
                candidates.first().map(String::as_str)
            }
            (Self::ExcludeAmbiguous, MatchOutcome::Ambiguous { .. }) => None,
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstMatch => write!(f, "first-match"),
            Self::ExcludeAmbiguous => write!(f, "exclude-ambiguous"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Unmatched,
    /// Every matching record names the same family
    Unique(String),
    /// Distinct families among the matches, in first-encounter order
    Ambiguous { candidates: Vec<String> },
}

/// Match one organism name against the filtered diet records.
///
/// An empty name never matches.
pub fn match_family(name: &str, records: &[FamilyRecord]) -> MatchOutcome {
    if name.is_empty() {
        return MatchOutcome::Unmatched;
    }

    let mut families: Vec<&str> = Vec::new();
    for rec in records
        .iter()
        .filter(|r| r.record.predator_taxonomy.contains(name))
    {
        if !families.contains(&rec.family.as_str()) {
            families.push(rec.family.as_str());
        }
    }

    match families.as_slice() {
        [] => MatchOutcome::Unmatched,
        [family] => MatchOutcome::Unique(family.to_string()),
        many => MatchOutcome::Ambiguous {
            candidates: many.iter().map(|f| f.to_string()).collect(),
        },
    }
}

/// A sequence with a resolved family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    pub header: String,
    pub sequence: String,
    pub organism_name: String,
    pub family: String,
}

/// Keep the first record per organism name, preserving order.
/// Returns the survivors and the number dropped.
pub fn dedup_by_organism(records: Vec<ReconciledRecord>) -> (Vec<ReconciledRecord>, usize) {
    let mut seen = HashSet::new();
    let before = records.len();
    let kept: Vec<ReconciledRecord> = records
        .into_iter()
        .filter(|r| {
            let first = seen.insert(r.organism_name.clone());
            if !first {
                debug!("Dropping duplicate '{}' ({})", r.organism_name, r.header);
            }
            first
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousMatch {
    pub organism_name: String,
    pub candidates: Vec<String>,
    pub chosen: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub total: usize,
    pub malformed_headers: usize,
    pub unmatched: usize,
    pub ambiguous: usize,
    pub duplicates_dropped: usize,
    pub retained: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub records: Vec<ReconciledRecord>,
    pub stats: ReconcileStats,
    pub unmatched_names: Vec<String>,
    pub ambiguous: Vec<AmbiguousMatch>,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: MatchPolicy,
}

impl Reconciler {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Assign families, drop unmatched sequences, then deduplicate by organism name.
    ///
    /// Fails with [`ScolecoError::EmptyReconciledSet`] when nothing survives.
    pub fn reconcile(
        &self,
        sequences: &[SequenceRecord],
        families: &[FamilyRecord],
    ) -> Result<Reconciliation, ScolecoError> {
        let mut stats = ReconcileStats {
            total: sequences.len(),
            ..Default::default()
        };
        let mut unmatched_names = Vec::new();
        let mut ambiguous = Vec::new();
        let mut matched = Vec::new();

        for seq in sequences {
            let Some(name) = seq.name() else {
                stats.malformed_headers += 1;
                stats.unmatched += 1;
                continue;
            };

            let outcome = match_family(name, families);
            let family = self.policy.resolve(&outcome).map(str::to_string);

            if let MatchOutcome::Ambiguous { candidates } = &outcome {
                warn!(
                    "'{}' matches diet records of several families ({}); policy {} chose {}",
                    name,
                    candidates.join(", "),
                    self.policy,
                    family.as_deref().unwrap_or("none")
                );
                stats.ambiguous += 1;
                ambiguous.push(AmbiguousMatch {
                    organism_name: name.to_string(),
                    candidates: candidates.clone(),
                    chosen: family.clone(),
                });
            }

            match family {
                Some(family) => matched.push(ReconciledRecord {
                    header: seq.header.clone(),
                    sequence: seq.sequence.clone(),
                    organism_name: name.to_string(),
                    family,
                }),
                None => {
                    debug!("No diet record resolves '{}'", name);
                    stats.unmatched += 1;
                    unmatched_names.push(name.to_string());
                }
            }
        }

        let (records, duplicates) = dedup_by_organism(matched);
        stats.duplicates_dropped = duplicates;
        stats.retained = records.len();

        if records.is_empty() {
            return Err(ScolecoError::EmptyReconciledSet { total: stats.total });
        }

        info!(
            "Reconciled {} of {} sequences ({} unmatched, {} duplicates dropped)",
            stats.retained, stats.total, stats.unmatched, stats.duplicates_dropped
        );

        Ok(Reconciliation {
            records,
            stats,
            unmatched_names,
            ambiguous,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::taxonomy::DietRecord;

    fn family_record(taxonomy: &str, family: &str) -> FamilyRecord {
        FamilyRecord {
            record: DietRecord::new(taxonomy, "Formicidae"),
            family: family.to_string(),
        }
    }

    fn seq(header: &str, name: Option<&str>) -> SequenceRecord {
        SequenceRecord {
            header: header.to_string(),
            sequence: "ACGT".to_string(),
            organism_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_match_family_outcomes() {
        let records = vec![
            family_record("Serpentes;Scolecophidia;Typhlopidae;Typhlops jamaicensis", "Typhlopidae"),
            family_record("Serpentes;Scolecophidia;Typhlopidae;Typhlops jamaicensis", "Typhlopidae"),
            family_record("Serpentes;Scolecophidia;Leptotyphlopidae;Typhlops jamaicensis", "Leptotyphlopidae"),
        ];
        assert_eq!(match_family("Rena dulcis", &records), MatchOutcome::Unmatched);
        assert_eq!(match_family("", &records), MatchOutcome::Unmatched);
        assert_eq!(
            match_family("Typhlops jamaicensis", &records[..2]),
            MatchOutcome::Unique("Typhlopidae".to_string())
        );
        assert_eq!(
            match_family("Typhlops jamaicensis", &records),
            MatchOutcome::Ambiguous {
                candidates: vec!["Typhlopidae".to_string(), "Leptotyphlopidae".to_string()]
            }
        );
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let records = vec![family_record("Serpentes;Scolecophidia;Anomalepididae;Liotyphlops beu", "Anomalepididae")];
        assert_eq!(match_family("liotyphlops beu", &records), MatchOutcome::Unmatched);
    }

    #[test]
    fn test_policies_resolve_ambiguity() {
        let outcome = MatchOutcome::Ambiguous {
            candidates: vec!["Typhlopidae".to_string(), "Leptotyphlopidae".to_string()],
        };
        assert_eq!(MatchPolicy::FirstMatch.resolve(&outcome), Some("Typhlopidae"));
        assert_eq!(MatchPolicy::ExcludeAmbiguous.resolve(&outcome), None);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let make = |header: &str| ReconciledRecord {
            header: header.to_string(),
            sequence: "A".to_string(),
            organism_name: "Typhlops jamaicensis".to_string(),
            family: "Typhlopidae".to_string(),
        };
        let (kept, dropped) = dedup_by_organism(vec![make(">first"), make(">second")]);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].header, ">first");
    }

    #[test]
    fn test_reconcile_drops_unmatched_and_malformed() {
        let families = vec![family_record(
            "Serpentes;Scolecophidia;Anomalepididae;Liotyphlops beu",
            "Anomalepididae",
        )];
        let sequences = vec![
            seq(">A1 Liotyphlops beu 16S", Some("Liotyphlops beu")),
            seq(">A2 Rena dulcis 16S", Some("Rena dulcis")),
            seq(">A3", None),
        ];
        let result = Reconciler::default().reconcile(&sequences, &families).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].family, "Anomalepididae");
        assert_eq!(result.stats.malformed_headers, 1);
        assert_eq!(result.stats.unmatched, 2);
        assert_eq!(result.unmatched_names, vec!["Rena dulcis".to_string()]);
    }

    #[test]
    fn test_empty_result_is_an_error() {
        let sequences = vec![seq(">A2 Rena dulcis", Some("Rena dulcis"))];
        let err = Reconciler::default().reconcile(&sequences, &[]).unwrap_err();
        assert!(matches!(err, ScolecoError::EmptyReconciledSet { total: 1 }));
    }

    #[test]
    fn test_exclude_ambiguous_policy() {
        let families = vec![
            family_record("X;Y;Typhlopidae;Typhlops lumbricalis", "Typhlopidae"),
            family_record("X;Y;Leptotyphlopidae;Typhlops lumbricalis", "Leptotyphlopidae"),
            family_record("X;Y;Anomalepididae;Liotyphlops beu", "Anomalepididae"),
        ];
        let sequences = vec![
            seq(">B1 Typhlops lumbricalis", Some("Typhlops lumbricalis")),
            seq(">B2 Liotyphlops beu", Some("Liotyphlops beu")),
        ];

        let first = Reconciler::new(MatchPolicy::FirstMatch)
            .reconcile(&sequences, &families)
            .unwrap();
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.records[0].family, "Typhlopidae");
        assert_eq!(first.ambiguous[0].chosen.as_deref(), Some("Typhlopidae"));

        let strict = Reconciler::new(MatchPolicy::ExcludeAmbiguous)
            .reconcile(&sequences, &families)
            .unwrap();
        assert_eq!(strict.records.len(), 1);
        assert_eq!(strict.records[0].organism_name, "Liotyphlops beu");
        assert_eq!(strict.stats.ambiguous, 1);
        assert_eq!(strict.ambiguous[0].chosen, None);
    }
}
