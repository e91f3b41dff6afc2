//! Acquire subcommand - retrieve documents for cataloged work units

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use confcollect_core::{SharedProgress, fmt_num};

use super::{EXIT_INTERRUPTED, print_summary};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct AcquireArgs {
    /// Catalog root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Retrieval tool name or path
    #[arg(long)]
    pub tool: Option<String>,

    /// Extra directory to search for the tool (repeatable)
    #[arg(long = "search-path")]
    pub search_paths: Vec<PathBuf>,

    /// Venues to process first (comma-separated, replaces the configured list)
    #[arg(long, value_delimiter = ',')]
    pub priority: Option<Vec<String>>,
}

impl AcquireArgs {
    pub fn root(&self, config: &Config) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| config.catalog.root.clone())
    }
}

pub fn run(args: AcquireArgs, config: &Config, progress: &SharedProgress) -> Result<ExitCode> {
    let root = args.root(config);
    anyhow::ensure!(
        root.is_dir(),
        "Catalog root {} does not exist; run `confcollect catalog` first",
        root.display()
    );

    let mut search_paths = config.acquire.search_paths.clone();
    search_paths.extend(args.search_paths);
    let acquire_config = confcollect_acquire::Config {
        root,
        tool: args.tool.unwrap_or_else(|| config.acquire.tool.clone()),
        args: config.acquire.args.clone(),
        search_paths,
        no_result_marker: config.acquire.no_result_marker.clone(),
        request_failed_marker: config.acquire.request_failed_marker.clone(),
        priority: args
            .priority
            .unwrap_or_else(|| config.acquire.priority.clone()),
    };

    confcollect_core::install_signal_handlers()?;
    let summary = confcollect_acquire::run(&acquire_config, progress.clone())?;
    summary.log();

    print_summary(
        "Acquire",
        &[
            (
                "Units",
                format!(
                    "{} seen, {} processed, {} all failed, {} no identifiers, {} already done",
                    summary.units_seen,
                    summary.processed,
                    summary.all_failed,
                    summary.no_identifiers,
                    summary.already_done
                ),
            ),
            ("Errors", summary.unit_errors.to_string()),
            ("Attempted", fmt_num(summary.items_attempted)),
            ("Not acquired", fmt_num(summary.items_failed)),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );

    if summary.interrupted {
        log::warn!("Interrupted; progress is saved, rerun to resume");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}
