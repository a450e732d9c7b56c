use crate::bio::fasta::write_fasta;
use crate::cli::commands::reconcile::print_summary;
use crate::cli::commands::{load_diet_file, load_sequences_file};
use crate::cli::output::*;
use crate::core::config::Config;
use crate::core::pipeline::Pipeline;
use crate::tools::{Aligner, MafftAligner, TreeJob};
use crate::ScolecoError;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const LABELED_FASTA: &str = "labeled.fasta";
pub const ALIGNED_FASTA: &str = "aligned.fasta";
pub const TREE_JOB: &str = "trees.json";
pub const RECONCILIATION_JSON: &str = "reconciliation.json";

#[derive(Args)]
pub struct AlignArgs {
    /// Input FASTA file (.gz supported)
    #[arg(short, long, value_name = "FILE")]
    pub sequences: PathBuf,

    /// Diet database (CSV or TSV, .gz supported)
    #[arg(short, long, value_name = "FILE")]
    pub diet: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// MAFFT binary (overrides config and PATH lookup)
    #[arg(long, value_name = "FILE")]
    pub mafft: Option<PathBuf>,

    /// Write inputs for the alignment step without running it
    #[arg(long)]
    pub skip_alignment: bool,
}

pub fn run(args: AlignArgs, config: &Config) -> anyhow::Result<()> {
    let sequences = load_sequences_file(&args.sequences)?;
    let diet = load_diet_file(&args.diet, config)?;

    let pipeline = Pipeline::from_config(config)?;
    let result = pipeline.run(&sequences, &diet)?;
    print_summary(&result, config);

    fs::create_dir_all(&args.output_dir)?;
    let labeled_path = args.output_dir.join(LABELED_FASTA);
    write_fasta(&labeled_path, &result.labeled.to_sequences())?;
    fs::write(
        args.output_dir.join(RECONCILIATION_JSON),
        serde_json::to_string_pretty(&result)?,
    )?;
    success(&format!("Labeled sequences: {}", labeled_path.display()));

    let alignment_path = if args.skip_alignment {
        warning("Alignment skipped; the tree job points at unaligned sequences");
        labeled_path
    } else {
        let configured = args
            .mafft
            .clone()
            .or_else(|| config.tools.mafft_path.as_ref().map(PathBuf::from));
        let aligner = MafftAligner::locate(configured.as_deref())
            .map_err(|e| ScolecoError::Tool(format!("{:#}", e)))?;
        aligner
            .verify_installation()
            .map_err(|e| ScolecoError::Tool(format!("{:#}", e)))?;

        action(&format!(
            "Aligning {} sequences with {}",
            result.labeled.len(),
            aligner.name()
        ));
        let aligned = aligner
            .align(&result.labeled.to_sequences())
            .map_err(|e| ScolecoError::Tool(format!("{:#}", e)))?;

        let aligned_path = args.output_dir.join(ALIGNED_FASTA);
        write_fasta(&aligned_path, &aligned)?;
        success(&format!("Alignment: {}", aligned_path.display()));
        aligned_path
    };

    let job = TreeJob {
        alignment: alignment_path,
        labels: result.labeled.labels().map(str::to_string).collect(),
        requests: config.tree.requests.clone(),
    };
    let job_path = args.output_dir.join(TREE_JOB);
    job.write(&job_path)?;
    info!("Wrote tree job with {} requests", job.requests.len());

    for request in &job.requests {
        tree_item(false, "Tree", Some(&request.to_string()));
    }
    success(&format!("Tree job: {}", job_path.display()));

    Ok(())
}
