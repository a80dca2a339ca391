//! CLI entry point for the seeded pattern generator

use clap::Parser;
use patterngen::io::cli::{Cli, FileProcessor};

#[tokio::main]
async fn main() -> patterngen::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process().await?;
    Ok(())
}
