use crate::core::pipeline::{DietOutput, PipelineOutput};
use crate::core::summary::family_totals;
use crate::report::ReportOptions;
use anyhow::Result;
use std::fmt::Write;

const DETAIL_LIMIT: usize = 10;

pub fn generate_reconciliation_report(
    output: &PipelineOutput,
    options: &ReportOptions,
) -> Result<String> {
    let mut out = String::new();
    let filter = &output.filter_stats;
    let stats = &output.reconciliation.stats;

    writeln!(&mut out, "Reconciliation Report")?;
    writeln!(&mut out, "=====================")?;
    writeln!(&mut out)?;

    writeln!(&mut out, "Diet Records")?;
    writeln!(&mut out, "------------")?;
    writeln!(&mut out, "- Total:            {:6}", filter.total)?;
    writeln!(&mut out, "- Off target:       {:6}", filter.off_target)?;
    writeln!(&mut out, "- Shallow lineage:  {:6}", filter.shallow_lineage)?;
    writeln!(&mut out, "- Synonyms renamed: {:6}", filter.synonyms_rewritten)?;
    writeln!(&mut out, "- Retained:         {:6}", filter.retained)?;
    writeln!(&mut out)?;

    writeln!(&mut out, "Sequences")?;
    writeln!(&mut out, "---------")?;
    writeln!(&mut out, "- Total:             {:6}", stats.total)?;
    writeln!(&mut out, "- Malformed headers: {:6}", stats.malformed_headers)?;
    writeln!(&mut out, "- Unmatched:         {:6}", stats.unmatched)?;
    writeln!(&mut out, "- Ambiguous:         {:6}", stats.ambiguous)?;
    writeln!(&mut out, "- Duplicates:        {:6}", stats.duplicates_dropped)?;
    writeln!(&mut out, "- Labeled:           {:6}", output.labeled.len())?;
    writeln!(&mut out)?;

    writeln!(&mut out, "Labels")?;
    writeln!(&mut out, "------")?;
    for rec in output.labeled.iter() {
        writeln!(&mut out, "  {} ({} bp)", rec.label, rec.sequence.len())?;
    }
    writeln!(&mut out)?;

    if options.include_details {
        let unmatched = &output.reconciliation.unmatched_names;
        if !unmatched.is_empty() {
            writeln!(&mut out, "Unmatched Names (Top {})", DETAIL_LIMIT)?;
            writeln!(&mut out, "---------------------")?;
            for name in unmatched.iter().take(DETAIL_LIMIT) {
                writeln!(&mut out, "  {}", name)?;
            }
            if unmatched.len() > DETAIL_LIMIT {
                writeln!(&mut out, "  ... and {} more", unmatched.len() - DETAIL_LIMIT)?;
            }
            writeln!(&mut out)?;
        }

        let ambiguous = &output.reconciliation.ambiguous;
        if !ambiguous.is_empty() {
            writeln!(&mut out, "Ambiguous Matches")?;
            writeln!(&mut out, "-----------------")?;
            for amb in ambiguous {
                writeln!(
                    &mut out,
                    "  {}: {} -> {}",
                    amb.organism_name,
                    amb.candidates.join(" / "),
                    amb.chosen.as_deref().unwrap_or("excluded")
                )?;
            }
            writeln!(&mut out)?;
        }
    }

    Ok(out)
}

pub fn generate_diet_report(output: &DietOutput, options: &ReportOptions) -> Result<String> {
    let mut out = String::new();

    writeln!(&mut out, "Diet Summary")?;
    writeln!(&mut out, "============")?;
    writeln!(&mut out)?;
    writeln!(
        &mut out,
        "{} of {} diet records belong to target families",
        output.filter_stats.retained, output.filter_stats.total
    )?;
    writeln!(&mut out)?;

    if output.summaries.is_empty() {
        writeln!(&mut out, "No prey group observed more than once")?;
        return Ok(out);
    }

    let width = output
        .summaries
        .iter()
        .map(|s| s.prey.len())
        .max()
        .unwrap_or(0);

    for (family, total) in family_totals(&output.summaries) {
        writeln!(&mut out, "{} ({} observations)", family, total)?;
        writeln!(&mut out, "{}", "-".repeat(family.len()))?;
        for s in output.summaries.iter().filter(|s| s.family == family) {
            writeln!(&mut out, "  {:width$}  {:5}", s.prey, s.count, width = width)?;
        }
        writeln!(&mut out)?;
    }

    if options.include_details {
        writeln!(&mut out, "Groups: {}", output.summaries.len())?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::taxonomy::TaxonFilterStats;
    use crate::core::summary::PreySummary;

    #[test]
    fn test_diet_report_groups_by_family() {
        let output = DietOutput {
            filter_stats: TaxonFilterStats {
                total: 10,
                retained: 7,
                ..Default::default()
            },
            summaries: vec![
                PreySummary {
                    family: "Leptotyphlopidae".to_string(),
                    prey: "Formicidae".to_string(),
                    count: 3,
                },
                PreySummary {
                    family: "Typhlopidae".to_string(),
                    prey: "Isoptera".to_string(),
                    count: 4,
                },
            ],
        };
        let report = generate_diet_report(&output, &ReportOptions::default()).unwrap();
        assert!(report.contains("7 of 10 diet records"));
        assert!(report.contains("Leptotyphlopidae (3 observations)"));
        assert!(report.contains("Typhlopidae (4 observations)"));
    }

    #[test]
    fn test_empty_diet_report() {
        let output = DietOutput {
            filter_stats: TaxonFilterStats::default(),
            summaries: Vec::new(),
        };
        let report = generate_diet_report(&output, &ReportOptions::default()).unwrap();
        assert!(report.contains("No prey group"));
    }
}
