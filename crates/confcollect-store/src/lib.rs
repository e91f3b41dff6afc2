//! confcollect-store: On-disk state shared by the catalog and acquisition pipelines
//!
//! Layout per work unit:
//! ```text
//! {root}/
//! └── {venue}/              # display name, spaces → '_'
//!     └── {year|volume}/
//!         ├── papers.csv    # RecordStore (title \t authors \t doi)
//!         ├── papers.json   # raw discovery response
//!         ├── progress.log  # ProgressLedger
//!         ├── status.log    # StatusMarker
//!         ├── doi.txt       # download queue
//!         └── PDF/
//!             ├── *.pdf
//!             └── nofile.txt  # FailureManifest
//! ```

pub mod failures;
pub mod layout;
pub mod ledger;
pub mod records;
pub mod status;
pub mod write;

pub use failures::FailureManifest;
pub use layout::{VenueKind, WorkUnit, venue_dir_name};
pub use ledger::ProgressLedger;
pub use records::{PublicationRecord, RecordStore, RecordStoreError, normalize_field};
pub use status::{StatusMarker, UnitStatus};
pub use write::write_atomic;
