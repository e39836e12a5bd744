//! Global process state.
//!
//! Two flags:
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `WATCH_ACTIVE`: Is the watch loop running? (controls Ctrl+C behavior)

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Watch loop is running (Ctrl+C drains the loop instead of exiting)
static WATCH_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
///
/// Before `set_watch_active()` the process exits immediately; once the
/// watch loop is running the flag lets it finish the current pass and
/// leave the terminal in a clean state.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if WATCH_ACTIVE.load(Ordering::SeqCst) {
            crate::log!("watch"; "shutting down...");
        } else {
            // One-shot command, nothing to drain
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))
}

/// Mark the watch loop as running
pub fn set_watch_active() {
    WATCH_ACTIVE.store(true, Ordering::SeqCst);
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering for performance - worst case is one extra
/// debounce tick before stopping, which is acceptable
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
