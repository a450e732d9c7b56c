/// Taxonomy lineage handling and the target-family filter for diet records
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Lineage position (1-based) of the family in a predator taxonomy string
pub const FAMILY_LINEAGE_DEPTH: usize = 3;

/// Separator between lineage levels
pub const LINEAGE_SEPARATOR: char = ';';

/// Blind-snake families the pipeline targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Family {
    Anomalepididae,
    Leptotyphlopidae,
    Typhlopidae,
}

impl Family {
    pub const ALL: [Family; 3] = [
        Family::Anomalepididae,
        Family::Leptotyphlopidae,
        Family::Typhlopidae,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anomalepididae => "Anomalepididae",
            Self::Leptotyphlopidae => "Leptotyphlopidae",
            Self::Typhlopidae => "Typhlopidae",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One predation event from the diet database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietRecord {
    pub predator_taxonomy: String,
    pub prey: String,
}

impl DietRecord {
    pub fn new(predator_taxonomy: impl Into<String>, prey: impl Into<String>) -> Self {
        Self {
            predator_taxonomy: predator_taxonomy.into(),
            prey: prey.into(),
        }
    }
}

/// A diet record annotated with its canonical family label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRecord {
    pub record: DietRecord,
    pub family: String,
}

/// Return the `depth`-th (1-based) lineage token, trimmed. Empty tokens count as missing.
pub fn lineage_token(taxonomy: &str, depth: usize) -> Option<&str> {
    if depth == 0 {
        return None;
    }
    taxonomy
        .split(LINEAGE_SEPARATOR)
        .nth(depth - 1)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Default synonym table: `Rena` is filed under Leptotyphlopidae
pub fn default_synonyms() -> IndexMap<String, String> {
    let mut synonyms = IndexMap::new();
    synonyms.insert(
        "Rena".to_string(),
        Family::Leptotyphlopidae.as_str().to_string(),
    );
    synonyms
}

/// Default taxonomy substrings selecting the target families
pub fn default_targets() -> Vec<String> {
    let mut targets: Vec<String> = Family::ALL.iter().map(|f| f.as_str().to_string()).collect();
    targets.extend(default_synonyms().into_keys());
    targets
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxonFilterStats {
    pub total: usize,
    pub off_target: usize,
    pub shallow_lineage: usize,
    pub synonyms_rewritten: usize,
    pub retained: usize,
}

#[derive(Debug, Clone)]
pub struct TaxonFilterOutput {
    pub records: Vec<FamilyRecord>,
    pub stats: TaxonFilterStats,
}

/// Selects diet records of the target families and assigns each its family label
#[derive(Debug, Clone)]
pub struct TaxonFilter {
    pattern: Regex,
    family_depth: usize,
    synonyms: IndexMap<String, String>,
}

impl TaxonFilter {
    /// Build a filter from plain taxonomy substrings; they are matched literally
    pub fn new(
        targets: &[String],
        family_depth: usize,
        synonyms: IndexMap<String, String>,
    ) -> Result<Self, crate::ScolecoError> {
        if targets.is_empty() {
            return Err(crate::ScolecoError::Config(
                "at least one target family substring is required".to_string(),
            ));
        }
        if targets.iter().any(|t| t.trim().is_empty()) {
            return Err(crate::ScolecoError::Config(
                "target family substrings must not be empty".to_string(),
            ));
        }
        if let Some((from, _)) = synonyms
            .iter()
            .find(|(from, to)| from.trim().is_empty() || to.trim().is_empty())
        {
            return Err(crate::ScolecoError::Config(format!(
                "synonym '{}' must map a non-empty label to a non-empty family",
                from
            )));
        }
        if family_depth == 0 {
            return Err(crate::ScolecoError::Config(
                "family lineage depth is 1-based and must be positive".to_string(),
            ));
        }

        let alternation = targets
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation)
            .map_err(|e| crate::ScolecoError::Config(format!("bad target pattern: {}", e)))?;

        Ok(Self {
            pattern,
            family_depth,
            synonyms,
        })
    }

    /// Filter over the three target families with the default synonym table
    pub fn standard() -> Result<Self, crate::ScolecoError> {
        Self::new(&default_targets(), FAMILY_LINEAGE_DEPTH, default_synonyms())
    }

    /// Canonical label for an extracted lineage token
    pub fn normalize<'a>(&'a self, label: &'a str) -> &'a str {
        self.synonyms.get(label).map(String::as_str).unwrap_or(label)
    }

    pub fn filter(&self, records: &[DietRecord]) -> TaxonFilterOutput {
        let mut stats = TaxonFilterStats {
            total: records.len(),
            ..Default::default()
        };
        let mut retained = Vec::new();

        for record in records {
            if !self.pattern.is_match(&record.predator_taxonomy) {
                stats.off_target += 1;
                continue;
            }

            let Some(raw) = lineage_token(&record.predator_taxonomy, self.family_depth) else {
                debug!(
                    "Dropping '{}': lineage has no level {}",
                    record.predator_taxonomy, self.family_depth
                );
                stats.shallow_lineage += 1;
                continue;
            };

            let family = self.normalize(raw);
            if family != raw {
                stats.synonyms_rewritten += 1;
            }

            retained.push(FamilyRecord {
                record: record.clone(),
                family: family.to_string(),
            });
        }

        stats.retained = retained.len();
        TaxonFilterOutput {
            records: retained,
            stats,
        }
    }
}
