//! Acquisition engine behavior with a scripted in-memory retriever

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use confcollect_acquire::{AcquisitionEngine, Classifier, Retriever, UnitOutcome};
use confcollect_core::ProgressContext;
use confcollect_store::{FailureManifest, ProgressLedger, StatusMarker, UnitStatus};

const NO_RESULT: &str = "your searching has no result, please check! ";
const REQUEST_FAILED: &str = "failed requests for url: https://sci-hub.se";

/// Returns canned diagnostics per identifier and records every call.
#[derive(Default)]
struct ScriptedRetriever {
    stderr: HashMap<String, String>,
    calls: Vec<String>,
    /// Raise `stop` after this many calls
    stop_after: Option<(usize, Arc<AtomicBool>)>,
}

impl ScriptedRetriever {
    fn with(mut self, id: &str, stderr: &str) -> Self {
        self.stderr.insert(id.to_string(), stderr.to_string());
        self
    }
}

impl Retriever for ScriptedRetriever {
    fn retrieve(&mut self, identifier: &str, output_dir: &Path) -> io::Result<String> {
        assert!(output_dir.is_dir(), "documents dir must exist before retrieval");
        self.calls.push(identifier.to_string());
        if let Some((n, stop)) = &self.stop_after {
            if self.calls.len() >= *n {
                stop.store(true, Ordering::Relaxed);
            }
        }
        Ok(self.stderr.get(identifier).cloned().unwrap_or_default())
    }
}

fn engine(retriever: ScriptedRetriever) -> AcquisitionEngine<ScriptedRetriever> {
    AcquisitionEngine::new(
        retriever,
        Classifier::default(),
        Arc::new(ProgressContext::hidden()),
    )
}

fn unit(root: &Path, venue: &str, period: &str, tsv: &str) -> std::path::PathBuf {
    let dir = root.join(venue).join(period);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("papers.csv"), tsv).unwrap();
    dir
}

const FOUR: &str = "P0\tA\t10.1/0\nP1\tA\t10.1/1\nP2\tA\t10.1/2\nP3\tA\t10.1/3\n";

#[test]
fn completed_unit_is_never_touched_again() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(root.path(), "ISCA", "2019", FOUR);

    let mut first = engine(ScriptedRetriever::default());
    let outcome = first.process_unit(&dir, "ISCA-2019").unwrap();
    assert_eq!(
        outcome,
        UnitOutcome::Processed {
            attempted: 4,
            failed: 0
        }
    );
    assert_eq!(first.retriever().calls.len(), 4);

    let mut second = engine(ScriptedRetriever::default());
    assert_eq!(
        second.process_unit(&dir, "ISCA-2019").unwrap(),
        UnitOutcome::AlreadyDone
    );
    assert!(second.retriever().calls.is_empty());
    assert_eq!(
        StatusMarker::open(&dir).read(),
        Some(UnitStatus::Processed)
    );
    assert!(!FailureManifest::path(&dir).exists());
}

#[test]
fn resume_attempts_only_remaining_positions() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(root.path(), "ISCA", "2019", FOUR);
    ProgressLedger::open(&dir).save(2).unwrap();

    let mut e = engine(ScriptedRetriever::default());
    e.process_unit(&dir, "ISCA-2019").unwrap();

    assert_eq!(e.retriever().calls, ["10.1/2", "10.1/3"]);
    assert_eq!(ProgressLedger::open(&dir).load(), 4);
}

#[test]
fn interruption_leaves_ledger_at_next_position() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(root.path(), "ISCA", "2019", FOUR);
    let stop = Arc::new(AtomicBool::new(false));

    let retriever = ScriptedRetriever {
        stop_after: Some((2, stop.clone())),
        ..Default::default()
    };
    let mut e = engine(retriever).with_stop_flag(stop.clone());
    let outcome = e.process_unit(&dir, "ISCA-2019").unwrap();

    assert_eq!(
        outcome,
        UnitOutcome::Interrupted {
            attempted: 2,
            queued: 4
        }
    );
    assert_eq!(ProgressLedger::open(&dir).load(), 2);
    assert!(!StatusMarker::open(&dir).exists());

    // Restart picks up exactly where the ledger left off
    let mut again = engine(ScriptedRetriever::default());
    again.process_unit(&dir, "ISCA-2019").unwrap();
    assert_eq!(again.retriever().calls, ["10.1/2", "10.1/3"]);
}

#[test]
fn failed_item_before_interruption_is_not_retried() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(root.path(), "MICRO", "2022", FOUR);
    let stop = Arc::new(AtomicBool::new(false));

    let retriever = ScriptedRetriever {
        stop_after: Some((2, stop.clone())),
        ..Default::default()
    }
    .with("10.1/1", REQUEST_FAILED);
    let mut e = engine(retriever).with_stop_flag(stop.clone());
    assert_eq!(
        e.process_unit(&dir, "MICRO-2022").unwrap(),
        UnitOutcome::Interrupted {
            attempted: 2,
            queued: 4
        }
    );
    assert_eq!(e.retriever().calls, ["10.1/0", "10.1/1"]);
    assert_eq!(ProgressLedger::open(&dir).load(), 2);
    assert!(!StatusMarker::open(&dir).exists());

    let mut again = engine(ScriptedRetriever::default());
    assert_eq!(
        again.process_unit(&dir, "MICRO-2022").unwrap(),
        UnitOutcome::Processed {
            attempted: 2,
            failed: 0
        }
    );
    assert_eq!(again.retriever().calls, ["10.1/2", "10.1/3"]);
    assert_eq!(ProgressLedger::open(&dir).load(), 4);
}

#[test]
fn failures_and_missing_identifiers_go_to_manifest() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(
        root.path(),
        "PLDI",
        "2020",
        "Good\tA\t10.1/g\nNo DOI\tB\t\nGone\tC\t10.1/x\nBroken\tD\t10.1/y\n",
    );
    let retriever = ScriptedRetriever::default()
        .with("10.1/x", NO_RESULT)
        .with("10.1/y", &format!("{NO_RESULT}\n{REQUEST_FAILED}"));

    let mut e = engine(retriever);
    let outcome = e.process_unit(&dir, "PLDI-2020").unwrap();

    assert_eq!(
        outcome,
        UnitOutcome::Processed {
            attempted: 3,
            failed: 3
        }
    );
    assert_eq!(StatusMarker::open(&dir).read(), Some(UnitStatus::Processed));
    // Failed attempts advance the ledger like successful ones
    assert_eq!(ProgressLedger::open(&dir).load(), 3);
    let manifest = fs::read_to_string(FailureManifest::path(&dir)).unwrap();
    assert_eq!(manifest, "No DOI\nGone\nBroken");
    assert_eq!(
        fs::read_to_string(dir.join("doi.txt")).unwrap(),
        "10.1/g\n10.1/x\n10.1/y"
    );
}

#[test]
fn every_record_failed_marks_all_failed() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(root.path(), "CGO", "2021", "A\t\t10.1/a\nB\t\t\n");
    let retriever = ScriptedRetriever::default().with("10.1/a", REQUEST_FAILED);

    let mut e = engine(retriever);
    assert_eq!(
        e.process_unit(&dir, "CGO-2021").unwrap(),
        UnitOutcome::AllFailed {
            attempted: 1,
            failed: 2
        }
    );
    assert_eq!(StatusMarker::open(&dir).read(), Some(UnitStatus::AllFailed));
    assert!(!FailureManifest::path(&dir).exists());
}

#[test]
fn units_without_identifiers() {
    let root = tempfile::tempdir().unwrap();
    let no_doi = unit(root.path(), "VEE", "2019", "A\t\t\n");
    let empty = root.path().join("VEE").join("2020");
    fs::create_dir_all(&empty).unwrap();

    let mut e = engine(ScriptedRetriever::default());
    assert_eq!(
        e.process_unit(&no_doi, "VEE-2019").unwrap(),
        UnitOutcome::NoIdentifiers
    );
    assert_eq!(
        e.process_unit(&empty, "VEE-2020").unwrap(),
        UnitOutcome::NoIdentifiers
    );
    assert_eq!(fs::read_to_string(no_doi.join("status.log")).unwrap(), "NoDOI");
    assert!(e.retriever().calls.is_empty());
}

#[test]
fn malformed_records_leave_unit_unmarked() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(root.path(), "VEE", "2021", "two\tfields\n");

    let mut e = engine(ScriptedRetriever::default());
    assert!(e.process_unit(&dir, "VEE-2021").is_err());
    assert!(!StatusMarker::open(&dir).exists());
}

#[test]
fn malformed_ledger_restarts_from_zero() {
    let root = tempfile::tempdir().unwrap();
    let dir = unit(root.path(), "ISCA", "2019", FOUR);
    fs::write(dir.join("progress.log"), "garbage").unwrap();

    let mut e = engine(ScriptedRetriever::default());
    e.process_unit(&dir, "ISCA-2019").unwrap();
    assert_eq!(e.retriever().calls.len(), 4);
}

#[test]
fn run_visits_priority_venues_first() {
    let root = tempfile::tempdir().unwrap();
    unit(root.path(), "ASPLOS", "2020", "A\t\t10.1/asplos\n");
    unit(root.path(), "HPCA", "2020", "H\t\t10.1/hpca\n");
    unit(root.path(), "USENIX_ATC", "2020", "U\t\t10.1/atc\n");
    unit(root.path(), "USENIX_ATC", "2019", "U0\t\t10.1/atc19\n");

    let mut e = engine(ScriptedRetriever::default());
    let priority = vec!["USENIX ATC".to_string(), "HPCA".to_string()];
    let summary = e.run(root.path(), &priority).unwrap();

    assert_eq!(
        e.retriever().calls,
        ["10.1/atc19", "10.1/atc", "10.1/hpca", "10.1/asplos"]
    );
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.units_seen, 4);

    // Second run skips everything
    let mut again = engine(ScriptedRetriever::default());
    let summary = again.run(root.path(), &priority).unwrap();
    assert_eq!(summary.already_done, 4);
    assert!(again.retriever().calls.is_empty());
}

#[test]
fn run_continues_past_broken_unit() {
    let root = tempfile::tempdir().unwrap();
    unit(root.path(), "A", "2019", "bad line\n");
    unit(root.path(), "B", "2019", "T\t\t10.1/b\n");

    let mut e = engine(ScriptedRetriever::default());
    let summary = e.run(root.path(), &[]).unwrap();
    assert_eq!(summary.unit_errors, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(e.retriever().calls, ["10.1/b"]);
}

#[test]
fn summary_counts_titles_of_all_failed_units() {
    let root = tempfile::tempdir().unwrap();
    unit(root.path(), "CGO", "2021", "A\t\t10.1/a\nB\t\t\n");
    unit(root.path(), "CGO", "2022", "C\t\t10.1/c\nD\t\t10.1/d\n");
    let retriever = ScriptedRetriever::default()
        .with("10.1/a", NO_RESULT)
        .with("10.1/d", REQUEST_FAILED);

    let mut e = engine(retriever);
    let summary = e.run(root.path(), &[]).unwrap();
    assert_eq!(summary.all_failed, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.items_attempted, 3);
    assert_eq!(summary.items_failed, 3);
}
