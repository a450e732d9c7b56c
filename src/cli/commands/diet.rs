use crate::cli::charts::create_prey_chart;
use crate::cli::commands::load_diet_file;
use crate::cli::output::*;
use crate::core::config::Config;
use crate::core::pipeline::Pipeline;
use crate::report::{Format, ReportGenerator, ReportOptions};
use clap::Args;
use comfy_table::Cell;
use std::path::PathBuf;

#[derive(Args)]
pub struct DietArgs {
    /// Diet database (CSV or TSV, .gz supported)
    #[arg(short, long, value_name = "FILE")]
    pub diet: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,

    /// Show a bar chart per family
    #[arg(long)]
    pub chart: bool,
}

pub fn run(args: DietArgs, config: &Config) -> anyhow::Result<()> {
    let diet = load_diet_file(&args.diet, config)?;
    let pipeline = Pipeline::from_config(config)?;
    let result = pipeline.summarize_diet(&diet);

    if args.format != Format::Text {
        let report = ReportGenerator::new(ReportOptions {
            format: args.format,
            include_details: false,
        })
        .diet(&result)?;
        print!("{}", report);
        return Ok(());
    }

    section_header_with_line("Prey per Family");
    info(&format!(
        "{} of {} records belong to target families",
        format_number(result.filter_stats.retained),
        format_number(result.filter_stats.total)
    ));

    if result.summaries.is_empty() {
        warning("No prey group was observed more than once");
        return Ok(());
    }

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Family"),
        header_cell("Prey"),
        header_cell("Count"),
    ]);
    for s in &result.summaries {
        table.add_row(vec![
            Cell::new(&s.family),
            Cell::new(&s.prey),
            Cell::new(s.count),
        ]);
    }
    println!("\n{}", table);

    if args.chart {
        println!("{}", create_prey_chart(&result.summaries));
    }

    Ok(())
}
