//! confcollect-dblp: Publication catalog from the dblp search API
//!
//! Conferences are cataloged per year via their table of contents; journals
//! first enumerate volumes from their publication stream, then query each.

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod endpoint;
pub mod response;
pub mod venues;
pub mod volumes;

pub use catalog::{CatalogBuilder, CatalogSummary, run};
pub use config::{CatalogArgs, Config, validate_years};
pub use discovery::{DiscoveryClient, HttpSource, SharedHttp};
pub use endpoint::{DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE, Endpoint};
pub use response::{HitList, InvalidReason, QueryOutcome, normalize_authors, parse_response};
pub use venues::{Venue, VenueListError, load_venue_list, parse_venue_list};
pub use volumes::{VolumeEnumerator, collect_volumes};
