//! Catalog subcommand - build record stores from dblp

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use confcollect_core::{SharedProgress, fmt_num};

use super::{EXIT_INTERRUPTED, print_summary};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Catalog root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Venue list file (`<name> <dblp url>` per line)
    #[arg(short, long)]
    pub venues: Option<PathBuf>,

    /// First year (also the floor for journal volume discovery)
    #[arg(long)]
    pub min_year: Option<u32>,

    /// Last year
    #[arg(long)]
    pub max_year: Option<u32>,

    /// Do not keep the raw response as papers.json
    #[arg(long)]
    pub no_archive: bool,
}

impl CatalogArgs {
    pub fn root(&self, config: &Config) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| config.catalog.root.clone())
    }
}

pub fn run(args: CatalogArgs, config: &Config, progress: &SharedProgress) -> Result<ExitCode> {
    let catalog_args = confcollect_dblp::CatalogArgs {
        root: args.root(config),
        venue_list: args
            .venues
            .unwrap_or_else(|| config.catalog.venue_list.clone()),
        min_year: args.min_year.unwrap_or(config.catalog.min_year),
        max_year: args.max_year.unwrap_or(config.catalog.max_year),
        endpoint: config.catalog.endpoint.clone(),
        page_size: config.catalog.page_size,
        archive_raw: config.catalog.archive_raw && !args.no_archive,
    };
    let dblp_config = confcollect_dblp::Config::try_from(catalog_args)?;

    confcollect_core::install_signal_handlers()?;
    let summary = confcollect_dblp::run(&dblp_config, progress)?;
    summary.log();

    print_summary(
        "Catalog",
        &[
            (
                "Venues",
                format!(
                    "{} ({} journals not found)",
                    summary.venues, summary.venues_skipped
                ),
            ),
            (
                "Units",
                format!(
                    "{}/{} written ({} without results, {} failed)",
                    summary.units_written,
                    summary.units_queried,
                    summary.units_invalid,
                    summary.units_failed
                ),
            ),
            ("Records", fmt_num(summary.records)),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );

    if summary.interrupted {
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    if summary.units_failed > 0 {
        anyhow::bail!("Some work units could not be written");
    }
    Ok(ExitCode::SUCCESS)
}
