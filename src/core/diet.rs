/// Diet database loading (CSV/TSV, optionally gzipped)
use crate::bio::taxonomy::DietRecord;
use crate::core::config::DietConfig;
use crate::ScolecoError;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Field delimiter for a diet table, from config or the file extension
pub fn delimiter_for(path: &Path, config: &DietConfig) -> Result<u8, ScolecoError> {
    if let Some(delim) = config.delimiter {
        if !delim.is_ascii() {
            return Err(ScolecoError::Config(format!(
                "diet delimiter {:?} is not a single-byte ASCII character",
                delim
            )));
        }
        return Ok(delim as u8);
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);

    if name.ends_with(".tsv") || name.ends_with(".tab") || name.ends_with(".txt") {
        Ok(b'\t')
    } else {
        Ok(b',')
    }
}

/// Load every diet record from `path`, in file order
pub fn load_diet_records<P: AsRef<Path>>(
    path: P,
    config: &DietConfig,
) -> Result<Vec<DietRecord>, ScolecoError> {
    let path = path.as_ref();
    let delimiter = delimiter_for(path, config)?;
    let file = File::open(path)?;

    let records = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        read_diet_records(GzDecoder::new(BufReader::new(file)), delimiter, config)?
    } else {
        read_diet_records(BufReader::new(file), delimiter, config)?
    };

    info!("Loaded {} diet records from {}", records.len(), path.display());
    Ok(records)
}

/// Read diet records from any reader with a header row
pub fn read_diet_records<R: Read>(
    reader: R,
    delimiter: u8,
    config: &DietConfig,
) -> Result<Vec<DietRecord>, ScolecoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                ScolecoError::Parse(format!(
                    "diet database has no '{}' column (found: {})",
                    name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
    };
    let taxonomy_idx = column(&config.taxonomy_column)?;
    let prey_idx = column(&config.prey_column)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let field = |idx: usize| row.get(idx).map(str::trim).unwrap_or_default().to_string();
        records.push(DietRecord {
            predator_taxonomy: field(taxonomy_idx),
            prey: field(prey_idx),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_read_with_extra_columns() {
        let data = "id,prey,predator_taxonomy,notes\n\
                    1,Formicidae,Serpentes;Scolecophidia;Anomalepididae;Liotyphlops beu,x\n\
                    2,Isoptera,Serpentes;Scolecophidia;Rena;Rena dulcis,\n";
        let records = read_diet_records(data.as_bytes(), b',', &DietConfig::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].prey, "Formicidae");
        assert_eq!(
            records[1].predator_taxonomy,
            "Serpentes;Scolecophidia;Rena;Rena dulcis"
        );
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let data = "taxonomy,prey\nA;B;C,x\n";
        let err = read_diet_records(data.as_bytes(), b',', &DietConfig::default()).unwrap_err();
        assert!(matches!(err, ScolecoError::Parse(_)));
    }

    #[test]
    fn test_delimiter_inference() {
        let config = DietConfig::default();
        assert_eq!(delimiter_for(&PathBuf::from("diet.tsv"), &config).unwrap(), b'\t');
        assert_eq!(delimiter_for(&PathBuf::from("diet.TSV.gz"), &config).unwrap(), b'\t');
        assert_eq!(delimiter_for(&PathBuf::from("diet.csv"), &config).unwrap(), b',');

        let explicit = DietConfig {
            delimiter: Some(';'),
            ..DietConfig::default()
        };
        assert_eq!(delimiter_for(&PathBuf::from("diet.tsv"), &explicit).unwrap(), b';');
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let config = DietConfig {
            delimiter: Some('é'),
            ..DietConfig::default()
        };
        let err = delimiter_for(&PathBuf::from("diet.csv"), &config).unwrap_err();
        assert!(matches!(err, ScolecoError::Config(_)));

        let err = load_diet_records("absent.csv", &config).unwrap_err();
        assert!(matches!(err, ScolecoError::Config(_)));
    }
}
