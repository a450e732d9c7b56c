pub mod bio;
pub mod cli;
pub mod core;
pub mod report;
pub mod tools;

pub use crate::core::{
    labeler::LabeledSet,
    pipeline::{Pipeline, PipelineOutput},
    reconciler::{MatchPolicy, Reconciler},
    summary::{DietSummarizer, PreySummary},
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScolecoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Diet database error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No sequence matched a diet record ({total} sequences examined); nothing to align")]
    EmptyReconciledSet { total: usize },

    #[error("Display label '{0}' is produced by more than one sequence")]
    LabelCollision(String),

    #[error("External tool error: {0}")]
    Tool(String),
}

pub type Result<T> = std::result::Result<T, ScolecoError>;
