use anyhow::{bail, Result};
use clap::Parser;
use distill::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let options = cli.into_options()?;
    let result = distill::build(options)?;

    for file in &result.written_files {
        println!("- {}", file.display());
    }

    if !result.failures.is_empty() {
        bail!("{} file(s) failed to process", result.failures.len());
    }
    Ok(())
}
