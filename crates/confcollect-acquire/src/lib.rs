//! confcollect-acquire: Resumable document acquisition for cataloged work units
//!
//! Each unit's identifier queue is fed one item at a time to an external
//! retrieval tool. The ledger is persisted after every item, so an
//! interrupted run loses at most the item in flight.

pub mod classify;
pub mod config;
pub mod engine;
pub mod report;
pub mod retriever;

pub use classify::{Classifier, Outcome};
pub use config::Config;
pub use engine::{AcquireSummary, AcquisitionEngine, UnitOutcome, run};
pub use report::{UnitReport, UnitState, scan};
pub use retriever::{CliRetriever, Retriever};
