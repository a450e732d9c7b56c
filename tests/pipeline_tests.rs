/// End-to-end checks of filter → reconcile → label and the diet summary
///
/// These cover the documented scenarios plus the invariants that must hold
/// for any input: no empty families, no duplicate names, unique labels,
/// no summary row at or below the noise threshold, and deterministic output.
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scoleco::bio::fasta::{parse_fasta_from_bytes, write_fasta_to_writer};
use scoleco::bio::sequence::Sequence;
use scoleco::bio::taxonomy::{DietRecord, TaxonFilter};
use scoleco::core::config::default_config;
use scoleco::core::summary::PREY_COUNT_THRESHOLD;
use scoleco::{DietSummarizer, MatchPolicy, Pipeline, PreySummary, ScolecoError};
use std::collections::HashSet;

const FASTA: &[u8] = b">AB123456.1 Liotyphlops beu 16S ribosomal RNA gene
ACGTACGTAC
GTACGT
>AB000001.1 Typhlops jamaicensis voucher 1 16S
TTGACCA
>AB000002.1 Typhlops jamaicensis voucher 2 16S
TTGACCC
>AB000003.1 Rena dulcis 16S ribosomal RNA gene
GGGTTTAAA
>AB000004.1 Natrix natrix 16S
AAAA
>AB000005.1
CCCC
";

fn diet() -> Vec<DietRecord> {
    vec![
        DietRecord::new("Serpentes;Scolecophidia;Anomalepididae;Liotyphlops beu", "Formicidae"),
        DietRecord::new("Serpentes;Scolecophidia;Typhlopidae;Typhlops jamaicensis", "Formicidae"),
        DietRecord::new("Serpentes;Scolecophidia;Typhlopidae;Typhlops jamaicensis", "Isoptera"),
        DietRecord::new("Serpentes;Scolecophidia;Rena;Rena dulcis", "Formicidae"),
        DietRecord::new("Serpentes;Scolecophidia;Rena;Rena dulcis", "Formicidae"),
        DietRecord::new("Serpentes;Scolecophidia;Leptotyphlopidae;Epictia albifrons", "Formicidae"),
        DietRecord::new("Serpentes;Alethinophidia;Colubridae;Natrix natrix", "Anura"),
        DietRecord::new("Typhlopidae", "Isoptera"),
    ]
}

fn sequences() -> Vec<Sequence> {
    parse_fasta_from_bytes(FASTA).unwrap()
}

#[test]
fn test_full_pipeline_labels() {
    let pipeline = Pipeline::from_config(&default_config()).unwrap();
    let out = pipeline.run(&sequences(), &diet()).unwrap();

    let labels: Vec<&str> = out.labeled.labels().collect();
    assert_eq!(
        labels,
        vec![
            "Liotyphlops beu (Anomalepididae)",
            "Typhlops jamaicensis (Typhlopidae)",
            "Rena dulcis (Leptotyphlopidae)",
        ]
    );

    // First-seen Typhlops jamaicensis wins
    let typhlops = out.labeled.get("Typhlops jamaicensis (Typhlopidae)").unwrap();
    assert_eq!(typhlops.sequence, "TTGACCA");

    let stats = &out.reconciliation.stats;
    assert_eq!(stats.total, 6);
    assert_eq!(stats.malformed_headers, 1);
    assert_eq!(stats.unmatched, 2);
    assert_eq!(stats.duplicates_dropped, 1);
    assert_eq!(stats.retained, 3);

    assert_eq!(out.filter_stats.off_target, 1);
    assert_eq!(out.filter_stats.shallow_lineage, 1);
    assert_eq!(out.filter_stats.synonyms_rewritten, 2);
}

#[test]
fn test_no_matches_is_reported() {
    let pipeline = Pipeline::from_config(&default_config()).unwrap();
    let diet = vec![DietRecord::new(
        "Serpentes;Scolecophidia;Typhlopidae;Amerotyphlops brongersmianus",
        "Formicidae",
    )];
    let err = pipeline.run(&sequences(), &diet).unwrap_err();
    assert!(matches!(err, ScolecoError::EmptyReconciledSet { total: 6 }));
}

#[test]
fn test_blank_synonym_family_is_a_config_error() {
    let mut config = default_config();
    config
        .taxonomy
        .synonyms
        .insert("Rena".to_string(), String::new());
    let err = Pipeline::from_config(&config).err().unwrap();
    assert!(matches!(err, ScolecoError::Config(_)));
}

#[test]
fn test_labeled_output_is_deterministic() {
    let pipeline = Pipeline::from_config(&default_config()).unwrap();
    let render = || {
        let out = pipeline.run(&sequences(), &diet()).unwrap();
        let mut buf = Vec::new();
        write_fasta_to_writer(&mut buf, &out.labeled.to_sequences()).unwrap();
        buf
    };
    assert_eq!(render(), render());
}

#[test]
fn test_exclude_ambiguous_from_config() {
    let mut config = default_config();
    config.reconcile.match_policy = MatchPolicy::ExcludeAmbiguous;
    let pipeline = Pipeline::from_config(&config).unwrap();

    let mut diet = diet();
    diet.push(DietRecord::new(
        "Serpentes;Scolecophidia;Leptotyphlopidae;Liotyphlops beu",
        "Formicidae",
    ));
    let out = pipeline.run(&sequences(), &diet).unwrap();
    assert!(out.labeled.get("Liotyphlops beu (Anomalepididae)").is_none());
    assert_eq!(out.reconciliation.ambiguous.len(), 1);
}

#[test]
fn test_diet_summary_scenario() {
    let pipeline = Pipeline::from_config(&default_config()).unwrap();
    let mut diet = diet();
    diet.push(DietRecord::new(
        "Serpentes;Scolecophidia;Leptotyphlopidae;Epictia albifrons",
        "Formicidae",
    ));

    let out = pipeline.summarize_diet(&diet);
    // Anomalepididae × Formicidae was seen once and is left out
    assert_eq!(
        out.summaries,
        vec![PreySummary {
            family: "Leptotyphlopidae".to_string(),
            prey: "Formicidae".to_string(),
            count: 4,
        }]
    );
}

fn family_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "Anomalepididae",
        "Leptotyphlopidae",
        "Typhlopidae",
        "Rena",
        "Scolecophidia",
    ])
}

fn name_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["Typhlops", "Rena", "Liotyphlops", "Epictia"]),
        prop::sample::select(vec!["beu", "dulcis", "jamaicensis", "albifrons"]),
    )
        .prop_map(|(g, s)| format!("{} {}", g, s))
}

fn diet_strategy() -> impl Strategy<Value = Vec<DietRecord>> {
    prop::collection::vec(
        (
            family_strategy(),
            name_strategy(),
            prop::sample::select(vec!["Formicidae", "Isoptera", "Coleoptera"]),
            prop::bool::weighted(0.9),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(family, name, prey, deep)| {
                let taxonomy = if deep {
                    format!("Serpentes;Scolecophidia;{};{}", family, name)
                } else {
                    format!("{};{}", family, name)
                };
                DietRecord::new(taxonomy, prey)
            })
            .collect()
    })
}

fn sequence_strategy() -> impl Strategy<Value = Vec<Sequence>> {
    prop::collection::vec((name_strategy(), "[ACGT]{1,20}"), 1..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, seq))| {
                Sequence::new(format!("S{}", i), seq.into_bytes())
                    .with_description(format!("{} 16S", name))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_rena_never_survives_filtering(diet in diet_strategy()) {
        let filter = TaxonFilter::standard().unwrap();
        for rec in filter.filter(&diet).records {
            prop_assert_ne!(rec.family.as_str(), "Rena");
            prop_assert!(!rec.family.is_empty());
        }
    }

    #[test]
    fn prop_reconciled_records_are_unique_and_labeled(
        diet in diet_strategy(),
        seqs in sequence_strategy(),
    ) {
        for policy in [MatchPolicy::FirstMatch, MatchPolicy::ExcludeAmbiguous] {
            let mut config = default_config();
            config.reconcile.match_policy = policy;
            let pipeline = Pipeline::from_config(&config).unwrap();

            match pipeline.run(&seqs, &diet) {
                Ok(out) => {
                    let records = &out.reconciliation.records;
                    let names: HashSet<&str> =
                        records.iter().map(|r| r.organism_name.as_str()).collect();
                    prop_assert_eq!(names.len(), records.len());
                    prop_assert!(records.iter().all(|r| !r.family.is_empty()));
                    prop_assert_eq!(out.labeled.len(), records.len());

                    let labels: HashSet<&str> = out.labeled.labels().collect();
                    prop_assert_eq!(labels.len(), out.labeled.len());
                }
                Err(ScolecoError::EmptyReconciledSet { total }) => {
                    prop_assert_eq!(total, seqs.len());
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
        }
    }

    #[test]
    fn prop_summary_respects_threshold(diet in diet_strategy()) {
        let filter = TaxonFilter::standard().unwrap();
        let summaries = DietSummarizer::default().summarize(&filter.filter(&diet).records);
        for s in &summaries {
            prop_assert!(s.count > PREY_COUNT_THRESHOLD);
            prop_assert_ne!(s.family.as_str(), "Scolecophidia");
        }
        let mut sorted = summaries.clone();
        sorted.sort();
        prop_assert_eq!(sorted, summaries);
    }
}
