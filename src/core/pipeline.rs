/// End-to-end composition of the reconciliation and diet summary stages
use crate::bio::sequence::Sequence;
use crate::bio::taxonomy::{DietRecord, TaxonFilter, TaxonFilterStats};
use crate::core::config::Config;
use crate::core::labeler::{label_records, LabeledSet};
use crate::core::loader::load_sequences;
use crate::core::reconciler::{Reconciler, Reconciliation};
use crate::core::summary::{DietSummarizer, PreySummary};
use crate::ScolecoError;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub filter_stats: TaxonFilterStats,
    pub reconciliation: Reconciliation,
    pub labeled: LabeledSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct DietOutput {
    pub filter_stats: TaxonFilterStats,
    pub summaries: Vec<PreySummary>,
}

pub struct Pipeline {
    filter: TaxonFilter,
    reconciler: Reconciler,
    summarizer: DietSummarizer,
}

impl Pipeline {
    pub fn new(filter: TaxonFilter, reconciler: Reconciler, summarizer: DietSummarizer) -> Self {
        Self {
            filter,
            reconciler,
            summarizer,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ScolecoError> {
        let filter = TaxonFilter::new(
            &config.taxonomy.targets,
            config.taxonomy.family_depth,
            config.taxonomy.synonyms.clone(),
        )?;
        Ok(Self::new(
            filter,
            Reconciler::new(config.reconcile.match_policy),
            DietSummarizer::new(config.summary.leftover_labels.clone()),
        ))
    }

    /// Filter the diet table, reconcile the sequences against it and label the survivors
    pub fn run(
        &self,
        sequences: &[Sequence],
        diet: &[DietRecord],
    ) -> Result<PipelineOutput, ScolecoError> {
        let filtered = self.filter.filter(diet);
        info!(
            "Diet filter kept {} of {} records ({} shallow lineages, {} synonyms rewritten)",
            filtered.stats.retained,
            filtered.stats.total,
            filtered.stats.shallow_lineage,
            filtered.stats.synonyms_rewritten
        );

        let records = load_sequences(sequences);
        let reconciliation = self.reconciler.reconcile(&records, &filtered.records)?;
        let labeled = label_records(&reconciliation.records)?;

        Ok(PipelineOutput {
            filter_stats: filtered.stats,
            reconciliation,
            labeled,
        })
    }

    /// Prey counts per family, independent of any sequences
    pub fn summarize_diet(&self, diet: &[DietRecord]) -> DietOutput {
        let filtered = self.filter.filter(diet);
        let summaries = self.summarizer.summarize(&filtered.records);
        info!(
            "{} prey groups above threshold from {} target records",
            summaries.len(),
            filtered.stats.retained
        );
        DietOutput {
            filter_stats: filtered.stats,
            summaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_config;

    #[test]
    fn test_scenario_liotyphlops() {
        let pipeline = Pipeline::from_config(&default_config()).unwrap();
        let sequences = vec![Sequence::new("AB123456.1".to_string(), b"ACGT".to_vec())
            .with_description("Liotyphlops beu 16S ribosomal RNA gene".to_string())];
        let diet = vec![DietRecord::new(
            "Serpentes;Scolecophidia;Anomalepididae;Liotyphlops beu",
            "Formicidae",
        )];

        let out = pipeline.run(&sequences, &diet).unwrap();
        let rec = &out.reconciliation.records[0];
        assert_eq!(rec.organism_name, "Liotyphlops beu");
        assert_eq!(rec.family, "Anomalepididae");
        let labels: Vec<&str> = out.labeled.labels().collect();
        assert_eq!(labels, vec!["Liotyphlops beu (Anomalepididae)"]);
    }
}
