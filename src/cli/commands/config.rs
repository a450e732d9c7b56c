use crate::cli::output::success;
use crate::core::config::{save_config, to_toml, Config};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Save to this file instead of printing
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ConfigArgs, config: &Config) -> anyhow::Result<()> {
    match args.output {
        Some(path) => {
            save_config(&path, config)?;
            success(&format!("Configuration written to {}", path.display()));
        }
        None => print!("{}", to_toml(config)?),
    }
    Ok(())
}
