//! Pastewatch CLI: keyword sweeps over the Pastebin public archive.
//!
//! Running `pastewatch` with no arguments performs one full sweep and writes
//! matches to `keyword_matches.jsonl` in the working directory.

mod commands;
mod logging;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::run(cli).await
}
