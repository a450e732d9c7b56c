use crate::bio::fasta::write_fasta;
use crate::cli::commands::{load_diet_file, load_sequences_file};
use crate::cli::output::*;
use crate::core::config::Config;
use crate::core::pipeline::{Pipeline, PipelineOutput};
use crate::core::reconciler::MatchPolicy;
use crate::report::{Format, ReportGenerator, ReportOptions};
use clap::Args;
use comfy_table::Cell;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ReconcileArgs {
    /// Input FASTA file (.gz supported)
    #[arg(short, long, value_name = "FILE")]
    pub sequences: PathBuf,

    /// Diet database (CSV or TSV, .gz supported)
    #[arg(short, long, value_name = "FILE")]
    pub diet: PathBuf,

    /// Write the labeled FASTA here
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Override the configured ambiguity policy
    #[arg(long, value_enum)]
    pub policy: Option<MatchPolicy>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

pub fn run(args: ReconcileArgs, config: &Config) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(args, config, &mut out)
}

/// Run the reconciliation; machine-readable reports go to `out` and nothing else does
pub fn execute<W: Write>(
    args: ReconcileArgs,
    config: &Config,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(policy) = args.policy {
        config.reconcile.match_policy = policy;
    }

    let sequences = load_sequences_file(&args.sequences)?;
    let diet = load_diet_file(&args.diet, &config)?;

    let pipeline = Pipeline::from_config(&config)?;
    let result = pipeline.run(&sequences, &diet)?;

    if let Some(path) = &args.output {
        write_fasta(path, &result.labeled.to_sequences())?;
    }

    match args.format {
        Format::Text => {
            print_summary(&result, &config);
            if let Some(path) = &args.output {
                success(&format!(
                    "Wrote {} labeled sequences to {}",
                    result.labeled.len(),
                    path.display()
                ));
            }
        }
        format => {
            let report = ReportGenerator::new(ReportOptions {
                format,
                include_details: true,
            })
            .reconciliation(&result)?;
            write!(out, "{}", report)?;
            out.flush()?;
            if let Some(path) = &args.output {
                info!(
                    "Wrote {} labeled sequences to {}",
                    result.labeled.len(),
                    path.display()
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn print_summary(result: &PipelineOutput, config: &Config) {
    let stats = &result.reconciliation.stats;

    section_header_with_line("Reconciliation");
    tree_item(false, "Policy", Some(&config.reconcile.match_policy.to_string()));
    tree_item(
        false,
        "Diet records in target families",
        Some(&format!(
            "{} / {}",
            format_number(result.filter_stats.retained),
            format_number(result.filter_stats.total)
        )),
    );
    tree_item(false, "Sequences", Some(&format_number(stats.total)));
    tree_item(false, "Unmatched", Some(&format_number(stats.unmatched)));
    tree_item(false, "Duplicates dropped", Some(&format_number(stats.duplicates_dropped)));
    tree_item(true, "Labeled", Some(&format_number(result.labeled.len())));

    if stats.ambiguous > 0 {
        warning(&format!(
            "{} organism names matched more than one family",
            stats.ambiguous
        ));
    }

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Family"),
        header_cell("Length"),
    ]);
    for rec in result.labeled.iter() {
        table.add_row(vec![
            Cell::new(&rec.label),
            Cell::new(&rec.family),
            Cell::new(format!("{} bp", rec.sequence.len())),
        ]);
    }
    println!("\n{}", table);
}
