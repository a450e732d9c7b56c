use crate::bio::taxonomy::{default_synonyms, default_targets, FAMILY_LINEAGE_DEPTH};
use crate::core::reconciler::MatchPolicy;
use crate::core::summary::default_leftover_labels;
use crate::tools::traits::{TreeMethod, TreeRequest};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub diet: DietConfig,
    pub reconcile: ReconcileConfig,
    pub summary: SummaryConfig,
    pub tree: TreeConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Literal substrings; a diet record is kept when its taxonomy contains any of them
    pub targets: Vec<String>,
    /// 1-based lineage level holding the family name
    pub family_depth: usize,
    /// Lineage labels rewritten to a canonical family
    pub synonyms: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietConfig {
    pub taxonomy_column: String,
    pub prey_column: String,
    /// Field delimiter; inferred from the file extension when unset
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub match_policy: MatchPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Family labels that survive target filtering but are not families
    pub leftover_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub requests: Vec<TreeRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// MAFFT binary; looked up on PATH when unset
    pub mafft_path: Option<String>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            family_depth: FAMILY_LINEAGE_DEPTH,
            synonyms: default_synonyms(),
        }
    }
}

impl Default for DietConfig {
    fn default() -> Self {
        Self {
            taxonomy_column: "predator_taxonomy".to_string(),
            prey_column: "prey".to_string(),
            delimiter: None,
        }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::FirstMatch,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            leftover_labels: default_leftover_labels(),
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            requests: vec![
                TreeRequest {
                    method: TreeMethod::MaximumLikelihood,
                    model: Some("GTR".to_string()),
                    cutoff: None,
                },
                TreeRequest {
                    method: TreeMethod::NeighborJoining,
                    model: None,
                    cutoff: Some(0.5),
                },
            ],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy: TaxonomyConfig::default(),
            diet: DietConfig::default(),
            reconcile: ReconcileConfig::default(),
            summary: SummaryConfig::default(),
            tree: TreeConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::ScolecoError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::ScolecoError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::ScolecoError> {
    let contents = to_toml(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn to_toml(config: &Config) -> Result<String, crate::ScolecoError> {
    toml::to_string_pretty(config)
        .map_err(|e| crate::ScolecoError::Config(format!("Failed to serialize config: {}", e)))
}
