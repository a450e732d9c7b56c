use crate::core::pipeline::{DietOutput, PipelineOutput};
use anyhow::Result;

pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub format: Format,
    pub include_details: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: Format::Text,
            include_details: true,
        }
    }
}

pub struct ReportGenerator {
    options: ReportOptions,
}

impl ReportGenerator {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn reconciliation(&self, output: &PipelineOutput) -> Result<String> {
        match self.options.format {
            Format::Text => text::generate_reconciliation_report(output, &self.options),
            Format::Json => Ok(serde_json::to_string_pretty(output)?),
            Format::Csv => self.reconciliation_csv(output),
        }
    }

    pub fn diet(&self, output: &DietOutput) -> Result<String> {
        match self.options.format {
            Format::Text => text::generate_diet_report(output, &self.options),
            Format::Json => Ok(serde_json::to_string_pretty(&output.summaries)?),
            Format::Csv => self.diet_csv(output),
        }
    }

    fn reconciliation_csv(&self, output: &PipelineOutput) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["label", "organism_name", "family", "length"])?;
        for rec in output.labeled.iter() {
            let length = rec.sequence.len().to_string();
            wtr.write_record([
                rec.label.as_str(),
                rec.organism_name.as_str(),
                rec.family.as_str(),
                length.as_str(),
            ])?;
        }
        let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }

    fn diet_csv(&self, output: &DietOutput) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for summary in &output.summaries {
            wtr.serialize(summary)?;
        }
        // serialize only emits the header alongside the first row
        if output.summaries.is_empty() {
            wtr.write_record(["family", "prey", "count"])?;
        }
        let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}
