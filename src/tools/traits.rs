/// Interfaces to the external alignment and tree-building collaborators
///
/// Alignment runs through the [`Aligner`] trait so a different program can
/// be swapped in. Tree inference is never run here: the pipeline emits a
/// [`TreeJob`] describing which trees to build from the alignment.
use crate::bio::sequence::Sequence;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Common interface for multiple sequence aligners
pub trait Aligner: Send + Sync {
    /// Align the given sequences; output ids must equal input ids
    fn align(&self, sequences: &[Sequence]) -> Result<Vec<Sequence>>;

    /// Verify that the tool is properly installed
    fn verify_installation(&self) -> Result<()>;

    /// Get the name of this aligner
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeMethod {
    #[serde(rename = "ML")]
    MaximumLikelihood,
    #[serde(rename = "NJ")]
    NeighborJoining,
}

impl fmt::Display for TreeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaximumLikelihood => write!(f, "ML"),
            Self::NeighborJoining => write!(f, "NJ"),
        }
    }
}

/// One tree to build: method plus its model or cutoff parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRequest {
    pub method: TreeMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<f64>,
}

impl fmt::Display for TreeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method)?;
        if let Some(model) = &self.model {
            write!(f, " model={}", model)?;
        }
        if let Some(cutoff) = self.cutoff {
            write!(f, " cutoff={}", cutoff)?;
        }
        Ok(())
    }
}

/// Manifest handed to the tree-building step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeJob {
    /// Aligned FASTA the trees are built from
    pub alignment: PathBuf,
    /// Taxon labels, in alignment order
    pub labels: Vec<String>,
    pub requests: Vec<TreeRequest>,
}

impl TreeJob {
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write tree job to {}", path.display()))?;
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree job from {}", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
