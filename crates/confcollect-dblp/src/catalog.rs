//! Catalog build: venue list × year range → one record store per work unit

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use confcollect_core::{ProgressContext, is_shutdown_requested};
use confcollect_store::layout::RAW_RESPONSE_FILE;
use confcollect_store::{VenueKind, WorkUnit};

use crate::config::Config;
use crate::discovery::{DiscoveryClient, HttpSource, SharedHttp};
use crate::response::{HitList, QueryOutcome};
use crate::venues::Venue;
use crate::volumes::VolumeEnumerator;

/// Run a catalog build against the live endpoint.
pub fn run(config: &Config, progress: &ProgressContext) -> anyhow::Result<CatalogSummary> {
    fs::create_dir_all(&config.root)
        .with_context(|| format!("Cannot create {}", config.root.display()))?;
    log::info!(
        "Cataloging {} venues, {}-{} into {}",
        config.venues.len(),
        config.years.start(),
        config.years.end(),
        config.root.display()
    );
    let client = DiscoveryClient::new(SharedHttp, config.endpoint.clone());
    CatalogBuilder::new(client, &config.root)
        .archive_raw(config.archive_raw)
        .build(&config.venues, config.years.clone(), progress)
}

pub struct CatalogBuilder<H> {
    client: DiscoveryClient<H>,
    root: PathBuf,
    archive_raw: bool,
}

impl<H: HttpSource> CatalogBuilder<H> {
    pub fn new(client: DiscoveryClient<H>, root: &Path) -> Self {
        Self {
            client,
            root: root.to_path_buf(),
            archive_raw: true,
        }
    }

    /// Keep the decoded response as `papers.json` next to the records.
    pub fn archive_raw(mut self, enabled: bool) -> Self {
        self.archive_raw = enabled;
        self
    }

    /// Query and persist every work unit. Per-unit failures are logged and
    /// counted; only filesystem setup errors abort.
    pub fn build(
        &self,
        venues: &[Venue],
        years: RangeInclusive<u32>,
        progress: &ProgressContext,
    ) -> anyhow::Result<CatalogSummary> {
        let start = Instant::now();
        let mut summary = CatalogSummary::default();
        let line = progress.stage_line("catalog");

        'venues: for venue in venues {
            let periods: Vec<u32> = match venue.kind {
                VenueKind::Conference => years.clone().collect(),
                VenueKind::Journal => {
                    match VolumeEnumerator::new(&self.client).enumerate(&venue.symbol, *years.start()) {
                        Some(volumes) => volumes,
                        None => {
                            summary.venues_skipped += 1;
                            continue;
                        }
                    }
                }
            };
            summary.venues += 1;

            for period in periods {
                if is_shutdown_requested() {
                    log::warn!("Shutdown requested, stopping catalog build");
                    summary.interrupted = true;
                    break 'venues;
                }
                let unit = WorkUnit::new(&venue.name, &venue.symbol, period, venue.kind);
                let label = unit.label();
                line.set_message(label.clone());
                summary.units_queried += 1;

                match self.client.query(&venue.symbol, period, venue.kind) {
                    QueryOutcome::Valid(list) => match self.persist(&unit, &list) {
                        Ok(count) => {
                            log::info!("{label}: {count} records");
                            summary.units_written += 1;
                            summary.records += count;
                        }
                        Err(e) => {
                            log::error!("{label}: {e:#}");
                            summary.units_failed += 1;
                        }
                    },
                    QueryOutcome::Invalid(reason) => {
                        log::warn!("{label}: no catalog ({reason})");
                        summary.units_invalid += 1;
                    }
                }
            }
        }

        line.finish_and_clear();
        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    fn persist(&self, unit: &WorkUnit, list: &HitList) -> anyhow::Result<usize> {
        let dir = unit.dir(&self.root);
        fs::create_dir_all(&dir).with_context(|| format!("Cannot create {}", dir.display()))?;

        if self.archive_raw {
            let path = dir.join(RAW_RESPONSE_FILE);
            let raw = serde_json::to_vec(&list.raw)?;
            fs::write(&path, raw).with_context(|| format!("Cannot write {}", path.display()))?;
        }

        let store = list.to_record_store(&unit.label());
        store.save(&dir)?;
        Ok(store.len())
    }
}

#[derive(Debug, Default)]
pub struct CatalogSummary {
    /// Venues with at least one period to query
    pub venues: usize,
    /// Journals whose stream could not be found
    pub venues_skipped: usize,
    pub units_queried: usize,
    pub units_written: usize,
    pub units_invalid: usize,
    pub units_failed: usize,
    pub records: usize,
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl CatalogSummary {
    pub fn log(&self) {
        log::info!("=== Catalog Summary ===");
        log::info!(
            "Venues: {} ({} journals not found)",
            self.venues,
            self.venues_skipped
        );
        log::info!(
            "Units: {}/{} written ({} without results, {} failed)",
            self.units_written,
            self.units_queried,
            self.units_invalid,
            self.units_failed
        );
        log::info!("Records: {}", self.records);
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
        if self.interrupted {
            log::warn!("Run interrupted; rerun to continue");
        }
    }
}
