pub mod charts;
pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scoleco",
    version,
    about = "Sequence-to-taxon reconciliation for blind-snake phylogenetics",
    long_about = "Scoleco matches FASTA sequences to blind-snake families through a predator/prey \
                  diet database, labels them for multiple sequence alignment, prepares the tree \
                  building step, and summarises prey counts per family."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, value_name = "FILE", global = true, env = "SCOLECO_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match sequences to families and write the labeled FASTA
    Reconcile(commands::reconcile::ReconcileArgs),

    /// Summarise prey counts per family from the diet database
    Diet(commands::diet::DietArgs),

    /// Reconcile, align with MAFFT and write the tree job manifest
    Align(commands::align::AlignArgs),

    /// Print or save the effective configuration
    Config(commands::config::ConfigArgs),
}
