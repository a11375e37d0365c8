//! CLI command definitions and routing.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use pastewatch_core::pipeline::{ProgressReporter, SweepSummary, run_sweep};
use pastewatch_shared::{
    AppConfig, PasteId, SweepConfig, init_config, load_config, load_config_from,
};
use tracing::info;

use crate::logging;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Pastewatch: sweep Pastebin's public archive for sensitive keywords.
#[derive(Parser)]
#[command(
    name = "pastewatch",
    version,
    about = "Sweep recent public pastes for crypto and Telegram keywords.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Console log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.pastewatch/pastewatch.toml.
    #[arg(long, env = "PASTEWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `sweep`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run one sweep over the archive (the default).
    Sweep,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        None | Some(Command::Sweep) => cmd_sweep(&cli).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
    }
}

/// Load `--config` if given, else the user config (or defaults).
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

async fn cmd_sweep(cli: &Cli) -> Result<()> {
    let app = resolve_config(cli.config.as_deref())?;
    let _log_guard = logging::init_tracing(cli.verbose, &cli.log_format, &app.output.log_file)?;

    let sweep = SweepConfig::try_from(&app)?;

    info!(
        archive_url = %sweep.archive_url,
        max_pastes = sweep.max_pastes,
        matches_file = %sweep.matches_file.display(),
        "starting sweep"
    );

    let reporter = CliProgress::new();
    let summary = run_sweep(&sweep, &reporter).await?;

    println!();
    println!("  Crawling completed.");
    println!("  Discovered: {}", summary.pastes_discovered);
    println!("  Fetched:    {}", summary.pastes_fetched);
    println!("  Failed:     {}", summary.fetch_failures);
    if summary.empty_pastes > 0 {
        println!("  Empty:      {}", summary.empty_pastes);
    }
    println!("  Matched:    {}", summary.pastes_matched);
    println!("  Written:    {}", summary.records_written);
    if summary.records_lost > 0 {
        println!("  Lost:       {}", summary.records_lost);
    }
    println!("  Output:     {}", sweep.matches_file.display());
    println!("  Time:       {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn paste_started(&self, id: &PasteId, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Processing paste [{current}/{total}] {id}"));
    }

    fn done(&self, _summary: &SweepSummary) {
        self.spinner.finish_and_clear();
    }
}
