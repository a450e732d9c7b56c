use crate::bio::fasta::{parse_fasta_from_bytes, write_fasta};
use crate::bio::sequence::Sequence;
use crate::tools::traits::Aligner;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

pub const MAFFT_BINARY: &str = "mafft";

static INSTANCE: AtomicUsize = AtomicUsize::new(0);

/// Search PATH for an executable
pub fn find_in_path(binary: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

/// MAFFT integration: `mafft --auto --quiet <input>` with the alignment on stdout
pub struct MafftAligner {
    binary_path: PathBuf,
    temp_dir: PathBuf,
}

impl MafftAligner {
    pub fn new(binary_path: PathBuf) -> Result<Self> {
        if !binary_path.exists() {
            anyhow::bail!("MAFFT binary not found at {:?}", binary_path);
        }

        let temp_dir = std::env::temp_dir().join(format!(
            "scoleco-mafft-{}-{}",
            std::process::id(),
            INSTANCE.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            binary_path,
            temp_dir,
        })
    }

    /// Use the configured binary, or `mafft` from PATH
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        let binary = match configured {
            Some(path) => path.to_path_buf(),
            None => find_in_path(MAFFT_BINARY)
                .ok_or_else(|| anyhow::anyhow!("'{}' was not found on PATH", MAFFT_BINARY))?,
        };
        Self::new(binary)
    }
}

impl Aligner for MafftAligner {
    fn align(&self, sequences: &[Sequence]) -> Result<Vec<Sequence>> {
        if sequences.len() < 2 {
            anyhow::bail!("MAFFT needs at least two sequences, got {}", sequences.len());
        }

        let input = self.temp_dir.join("input.fasta");
        write_fasta(&input, sequences)?;

        info!("Aligning {} sequences with MAFFT", sequences.len());
        let output = Command::new(&self.binary_path)
            .arg("--auto")
            .arg("--quiet")
            .arg(&input)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {:?}", self.binary_path))?;

        if !output.status.success() {
            anyhow::bail!(
                "MAFFT exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let aligned = parse_fasta_from_bytes(&output.stdout)?;
        debug!("MAFFT returned {} aligned sequences", aligned.len());

        if aligned.len() != sequences.len() {
            anyhow::bail!(
                "MAFFT returned {} sequences for {} inputs",
                aligned.len(),
                sequences.len()
            );
        }

        if let Some((input, output)) = sequences
            .iter()
            .zip(&aligned)
            .find(|(input, output)| input.header() != output.header())
        {
            anyhow::bail!(
                "MAFFT output header '{}' does not match input '{}'",
                output.header(),
                input.header()
            );
        }

        Ok(aligned)
    }

    fn verify_installation(&self) -> Result<()> {
        let output = Command::new(&self.binary_path)
            .arg("--version")
            .output()
            .with_context(|| format!("Failed to run {:?}", self.binary_path))?;
        let version = String::from_utf8_lossy(&output.stderr);
        debug!("MAFFT version: {}", version.trim());
        Ok(())
    }

    fn name(&self) -> &str {
        "MAFFT"
    }
}

impl Drop for MafftAligner {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.temp_dir);
    }
}
