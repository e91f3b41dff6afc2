//! confcollect-core - Common infrastructure for the catalog and acquisition pipelines
//!
//! Blocking HTTP over a shared runtime, retry policy, logging with
//! progress-bar integration, and cooperative shutdown.

pub mod http;
pub mod logging;
pub mod progress;
pub mod retry;
pub mod shutdown;

// Re-exports for convenience
pub use http::{FetchError, HttpConfig, SHARED_RUNTIME, get_text, http_client, http_config, set_http_config};
pub use logging::{PipelineLogger, init_logging, log_file_name};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use retry::{backoff_duration, get_with_retry, retry_with_backoff};
pub use shutdown::{install_signal_handlers, is_shutdown_requested};
