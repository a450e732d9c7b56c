pub mod align;
pub mod config;
pub mod diet;
pub mod reconcile;

use crate::bio::fasta::parse_fasta;
use crate::bio::sequence::Sequence;
use crate::bio::taxonomy::DietRecord;
use crate::core::config::{default_config, load_config, Config};
use crate::core::diet::load_diet_records;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::debug;

/// Load `path` when given, otherwise the built-in defaults
pub fn resolve_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Ok(load_config(path)?)
        }
        None => Ok(default_config()),
    }
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb
}

pub fn load_sequences_file(path: &Path) -> anyhow::Result<Vec<Sequence>> {
    let pb = spinner(format!("Loading {}...", path.display()));
    let sequences = parse_fasta(path)?;
    pb.finish_with_message(format!("Loaded {} sequences", sequences.len()));
    Ok(sequences)
}

pub fn load_diet_file(path: &Path, config: &Config) -> anyhow::Result<Vec<DietRecord>> {
    let pb = spinner(format!("Loading {}...", path.display()));
    let records = load_diet_records(path, &config.diet)?;
    pb.finish_with_message(format!("Loaded {} diet records", records.len()));
    Ok(records)
}
