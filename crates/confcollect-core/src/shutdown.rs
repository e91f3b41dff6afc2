//! Cooperative shutdown on SIGINT/SIGTERM
//!
//! Long loops poll [`is_shutdown_requested`] between items and stop cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use signal_hook::consts::TERM_SIGNALS;

/// Exit status when a second signal arrives before the run stopped.
const FORCED_EXIT_CODE: i32 = 130;

static FLAG: LazyLock<Arc<AtomicBool>> = LazyLock::new(|| Arc::new(AtomicBool::new(false)));

pub fn is_shutdown_requested() -> bool {
    FLAG.load(Ordering::Relaxed)
}

/// First signal sets the flag; a second one terminates with status 130.
pub fn install_signal_handlers() -> std::io::Result<()> {
    for &signal in TERM_SIGNALS {
        // Armed only once the flag is already set
        signal_hook::flag::register_conditional_shutdown(signal, FORCED_EXIT_CODE, Arc::clone(&FLAG))?;
        signal_hook::flag::register(signal, Arc::clone(&FLAG))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_visible_to_pollers() {
        // Only test in this binary touching the flag
        assert!(!is_shutdown_requested());
        FLAG.store(true, Ordering::Relaxed);
        assert!(is_shutdown_requested());
    }
}
