//! Process-wide debug-log gate.
//!
//! A single atomic boolean, checked before formatting any hot-path debug
//! log line, layered underneath `tracing`'s own level filter so the
//! disabled path costs one relaxed load.

use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable or disable AI hot-path debug logging process-wide.
pub fn set_debug_enabled(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
}

#[must_use]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Emit a `tracing::debug!` call only if the gate is enabled. Mirrors
/// `tracing`'s own `debug!` call syntax.
#[macro_export]
macro_rules! gated_debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}
