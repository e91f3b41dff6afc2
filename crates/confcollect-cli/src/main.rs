//! confcollect - Venue publication catalog and resumable document acquisition
//!
//! `catalog` builds per-venue, per-year record stores from dblp;
//! `acquire` feeds their identifiers to an external retrieval tool.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "confcollect")]
#[command(about = "Venue publication catalog and resumable document acquisition")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./confcollect.toml or ~/.config/confcollect/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Maximum retry attempts for transient HTTP failures
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Do not write a timestamped run log under the catalog root
    #[arg(long, global = true)]
    no_log_file: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Query dblp and write one record store per venue and year/volume
    Catalog(cmd::catalog::CatalogArgs),
    /// Retrieve documents for every cataloged work unit, resuming where left off
    Acquire(cmd::acquire::AcquireArgs),
    /// Show the state of every work unit
    Status(cmd::status::StatusArgs),
    /// Show current configuration
    Config,
}

impl Command {
    /// Name and catalog root for commands that keep a run log.
    ///
    /// `acquire` only logs into an existing root, so a mistyped root is
    /// reported by the command instead of being created here.
    fn run_log(&self, config: &Config) -> Option<(&'static str, PathBuf)> {
        match self {
            Self::Catalog(args) => Some(("catalog", args.root(config))),
            Self::Acquire(args) => {
                let root = args.root(config);
                root.is_dir().then_some(("acquire", root))
            }
            Self::Status(_) | Self::Config => None,
        }
    }
}

fn open_run_log(command: &str, root: &Path) -> Result<File> {
    std::fs::create_dir_all(root)
        .with_context(|| format!("Cannot create {}", root.display()))?;
    let path = root.join(confcollect_core::log_file_name(command, chrono::Local::now()));
    File::create(&path).with_context(|| format!("Cannot create run log {}", path.display()))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Configuration first: the run log lives under the configured root
    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    let progress = Arc::new(confcollect_core::ProgressContext::new());
    let multi = progress.is_tty().then(|| progress.multi());
    let log_file = match cli.command.run_log(&config) {
        Some((name, root)) if !cli.no_log_file => Some(open_run_log(name, &root)?),
        _ => None,
    };
    confcollect_core::init_logging(cli.quiet, cli.debug, multi, log_file)
        .context("Cannot install logger")?;

    match &config.source {
        Some(path) => log::info!("Loaded config from {}", path.display()),
        None => log::debug!("No config file found, using defaults"),
    }

    // Apply HTTP settings (config file defaults, CLI overrides)
    let mut http_config = config.http_config();
    if let Some(max_retries) = cli.max_retries {
        http_config.max_retries = max_retries;
    }
    confcollect_core::set_http_config(http_config);

    match cli.command {
        Command::Catalog(args) => cmd::catalog::run(args, &config, &progress),
        Command::Acquire(args) => cmd::acquire::run(args, &config, &progress),
        Command::Status(args) => cmd::status::run(args, &config),
        Command::Config => {
            cmd::print_config(&config);
            Ok(ExitCode::SUCCESS)
        }
    }
}
