//! Resumable acquisition over every work unit under the catalog root

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use confcollect_core::{SharedProgress, is_shutdown_requested};
use confcollect_store::layout::{QUEUE_FILE, documents_dir};
use confcollect_store::{
    FailureManifest, ProgressLedger, RecordStore, StatusMarker, UnitStatus, venue_dir_name,
};

use crate::classify::{Classifier, Outcome};
use crate::config::Config;
use crate::retriever::{CliRetriever, Retriever};

/// Resolve the retrieval tool and run the engine over `config.root`.
pub fn run(config: &Config, progress: SharedProgress) -> anyhow::Result<AcquireSummary> {
    let retriever =
        CliRetriever::resolve(&config.tool, config.args.clone(), &config.search_paths)?;
    let classifier = Classifier::new(
        config.no_result_marker.clone(),
        config.request_failed_marker.clone(),
    );
    AcquisitionEngine::new(retriever, classifier, progress).run(&config.root, &config.priority)
}

/// Result of one [`AcquisitionEngine::process_unit`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Marker already present; nothing touched
    AlreadyDone,
    NoIdentifiers,
    /// Queue exhausted; `failed` titles went to the failure manifest
    Processed { attempted: usize, failed: usize },
    /// Nothing acquired; `failed` counts every record of the unit
    AllFailed { attempted: usize, failed: usize },
    /// Stop requested; ledger holds `attempted` of `queued`
    Interrupted { attempted: usize, queued: usize },
}

pub struct AcquisitionEngine<R> {
    retriever: R,
    classifier: Classifier,
    progress: SharedProgress,
    stop: Arc<AtomicBool>,
}

impl<R: Retriever> AcquisitionEngine<R> {
    pub fn new(retriever: R, classifier: Classifier, progress: SharedProgress) -> Self {
        Self {
            retriever,
            classifier,
            progress,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Additional stop flag checked before every item, besides the process shutdown flag.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed) || is_shutdown_requested()
    }

    /// Process every `{root}/{venue}/{period}` directory: priority venues first
    /// (in the given order), then the rest sorted by name.
    pub fn run(&mut self, root: &Path, priority: &[String]) -> anyhow::Result<AcquireSummary> {
        let start = Instant::now();
        let mut summary = AcquireSummary::default();

        let venues = ordered_venues(&subdirs(root)?, priority);
        log::info!("Acquiring documents for {} venues under {}", venues.len(), root.display());

        'venues: for venue in &venues {
            let venue_dir = root.join(venue);
            let periods = match subdirs(&venue_dir) {
                Ok(p) => sort_periods(p),
                Err(e) => {
                    log::error!("{venue}: {e:#}");
                    continue;
                }
            };
            for period in periods {
                if self.should_stop() {
                    summary.interrupted = true;
                    break 'venues;
                }
                let label = format!("{venue}-{period}");
                let dir = venue_dir.join(&period);
                summary.units_seen += 1;
                match self.process_unit(&dir, &label) {
                    Ok(outcome) => {
                        summary.record(outcome);
                        if matches!(outcome, UnitOutcome::Interrupted { .. }) {
                            break 'venues;
                        }
                    }
                    Err(e) => {
                        log::error!("{label}: {e:#}");
                        summary.unit_errors += 1;
                    }
                }
            }
        }

        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    /// Drive one work unit to a terminal marker, resuming from its ledger.
    ///
    /// Errors (unreadable records, unwritable state) leave the unit without a
    /// marker so the next run picks it up again.
    pub fn process_unit(&mut self, dir: &Path, label: &str) -> anyhow::Result<UnitOutcome> {
        let marker = StatusMarker::open(dir);
        if marker.exists() {
            log::debug!("{label}: already done");
            return Ok(UnitOutcome::AlreadyDone);
        }

        let store = RecordStore::load(dir)
            .with_context(|| format!("Cannot load records in {}", dir.display()))?
            .unwrap_or_default();
        let (missing, queue) = store.partition_queue();
        if queue.is_empty() {
            log::warn!("{label}: no identifiers ({} records)", store.len());
            write_marker(&marker, &UnitStatus::NoIdentifiers)?;
            return Ok(UnitOutcome::NoIdentifiers);
        }

        write_queue(dir, queue.iter().map(|r| r.identifier.as_str()))?;
        let docs = documents_dir(dir);
        fs::create_dir_all(&docs).with_context(|| format!("Cannot create {}", docs.display()))?;

        let ledger = ProgressLedger::open(dir);
        let resume = usize::try_from(ledger.load()).unwrap_or(usize::MAX);
        if resume > queue.len() {
            log::warn!("{label}: ledger at {resume} beyond queue of {}", queue.len());
        } else if resume > 0 {
            log::info!("{label}: resuming at {resume}/{}", queue.len());
        }

        let bar = self.progress.unit_bar(label, queue.len() as u64);
        bar.set_position(resume.min(queue.len()) as u64);

        let mut failures = Vec::new();
        let mut attempted = 0;
        for (pos, record) in queue.iter().enumerate().skip(resume) {
            if self.should_stop() {
                bar.abandon();
                log::warn!("{label}: stopped at {pos}/{}", queue.len());
                return Ok(UnitOutcome::Interrupted {
                    attempted: pos,
                    queued: queue.len(),
                });
            }

            let outcome = match self.retriever.retrieve(&record.identifier, &docs) {
                Ok(diagnostics) => self.classifier.classify(&diagnostics),
                Err(e) => {
                    log::warn!("{label}: cannot run retrieval for {}: {e}", record.identifier);
                    Outcome::RequestFailed
                }
            };
            ledger
                .save(pos as u64 + 1)
                .with_context(|| format!("Cannot write {}", ledger.path().display()))?;
            attempted += 1;
            bar.inc(1);

            if outcome.is_success() {
                log::debug!("{label}: {} acquired", record.identifier);
            } else {
                log::warn!("{label}: {} ({outcome}): {}", record.identifier, record.title);
                failures.push(record.title.clone());
            }
        }
        bar.finish_and_clear();
        write_marker(&marker, &UnitStatus::Processed)?;

        let failed: Vec<String> = missing
            .iter()
            .map(|r| r.title.clone())
            .chain(failures)
            .collect();
        if failed.is_empty() {
            log::info!("{label}: all {} documents acquired", queue.len());
            return Ok(UnitOutcome::Processed {
                attempted,
                failed: 0,
            });
        }
        if failed.len() == store.len() {
            log::warn!("{label}: nothing acquired");
            write_marker(&marker, &UnitStatus::AllFailed)?;
            return Ok(UnitOutcome::AllFailed {
                attempted,
                failed: failed.len(),
            });
        }

        let manifest = FailureManifest::new(failed);
        manifest
            .write(dir)
            .with_context(|| format!("Cannot write failure manifest in {}", dir.display()))?;
        log::info!(
            "{label}: done, {} of {} records not acquired",
            manifest.len(),
            store.len()
        );
        Ok(UnitOutcome::Processed {
            attempted,
            failed: manifest.len(),
        })
    }
}

fn write_marker(marker: &StatusMarker, status: &UnitStatus) -> anyhow::Result<()> {
    marker
        .write(status)
        .with_context(|| format!("Cannot write {}", marker.path().display()))
}

/// Queue identifiers for inspection, newline-separated.
fn write_queue<'a>(dir: &Path, identifiers: impl Iterator<Item = &'a str>) -> anyhow::Result<()> {
    let path = dir.join(QUEUE_FILE);
    let content = identifiers.collect::<Vec<_>>().join("\n");
    fs::write(&path, content).with_context(|| format!("Cannot write {}", path.display()))
}

/// Names of visible subdirectories, sorted.
fn subdirs(dir: &Path) -> anyhow::Result<Vec<String>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Cannot read {}", dir.display()))?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    Ok(names)
}

/// Numeric periods ascending, anything else after them by name.
fn sort_periods(mut periods: Vec<String>) -> Vec<String> {
    periods.sort_by_key(|p| (p.parse::<u32>().unwrap_or(u32::MAX), p.clone()));
    periods
}

/// Priority venues (mapped to directory names) first, then the remaining ones.
pub fn ordered_venues(available: &[String], priority: &[String]) -> Vec<String> {
    let mut ordered = Vec::with_capacity(available.len());
    for name in priority {
        let dir = venue_dir_name(name);
        if ordered.contains(&dir) {
            continue;
        }
        if available.contains(&dir) {
            ordered.push(dir);
        } else {
            log::warn!("priority venue {name} has no catalog directory");
        }
    }
    for dir in available {
        if !ordered.contains(dir) {
            ordered.push(dir.clone());
        }
    }
    ordered
}

#[derive(Debug, Default)]
pub struct AcquireSummary {
    pub units_seen: usize,
    pub already_done: usize,
    pub no_identifiers: usize,
    pub processed: usize,
    pub all_failed: usize,
    /// Units left without a marker because of an error
    pub unit_errors: usize,
    pub items_attempted: usize,
    pub items_failed: usize,
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl AcquireSummary {
    fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::AlreadyDone => self.already_done += 1,
            UnitOutcome::NoIdentifiers => self.no_identifiers += 1,
            UnitOutcome::Processed { attempted, failed } => {
                self.processed += 1;
                self.items_attempted += attempted;
                self.items_failed += failed;
            }
            UnitOutcome::AllFailed { attempted, failed } => {
                self.all_failed += 1;
                self.items_attempted += attempted;
                self.items_failed += failed;
            }
            UnitOutcome::Interrupted { .. } => self.interrupted = true,
        }
    }

    pub fn log(&self) {
        log::info!("=== Acquisition Summary ===");
        log::info!(
            "Units: {} seen, {} already done, {} processed, {} all failed, {} without identifiers, {} errors",
            self.units_seen,
            self.already_done,
            self.processed,
            self.all_failed,
            self.no_identifiers,
            self.unit_errors
        );
        log::info!(
            "Items: {} attempted, {} titles not acquired",
            self.items_attempted,
            self.items_failed
        );
        log::info!("Time: {:.1}s", self.elapsed.as_secs_f64());
        if self.interrupted {
            log::warn!("Run interrupted; rerun to resume from the ledger");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn priority_first_then_sorted_rest() {
        let available = names(&["CGO", "ISCA", "MICRO", "USENIX_ATC"]);
        let priority = names(&["USENIX ATC", "HPCA", "CGO"]);
        assert_eq!(
            ordered_venues(&available, &priority),
            names(&["USENIX_ATC", "CGO", "ISCA", "MICRO"])
        );
    }

    #[test]
    fn repeated_priority_entries_ignored() {
        let available = names(&["A", "B"]);
        assert_eq!(
            ordered_venues(&available, &names(&["B", "B"])),
            names(&["B", "A"])
        );
    }

    #[test]
    fn periods_sort_numerically() {
        assert_eq!(
            sort_periods(names(&["2020", "9", "misc", "10"])),
            names(&["9", "10", "2020", "misc"])
        );
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut s = AcquireSummary::default();
        s.record(UnitOutcome::Processed {
            attempted: 3,
            failed: 1,
        });
        s.record(UnitOutcome::AllFailed {
            attempted: 2,
            failed: 3,
        });
        s.record(UnitOutcome::Interrupted {
            attempted: 0,
            queued: 4,
        });
        assert_eq!(s.items_attempted, 5);
        assert_eq!(s.items_failed, 4);
        assert!(s.interrupted);
    }
}
