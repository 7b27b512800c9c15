//! Monotonic millisecond clock.
//!
//! All "timeout" semantics in AI are expressed as comparisons against a
//! monotonic clock, not timers. A process-wide monotonic baseline,
//! established lazily on first use, keeps this immune to wall-clock
//! adjustments (NTP steps, DST) without needing an injected time source —
//! tests simply compare offsets from [`now_ms`], they never need to rewind
//! it.

use std::sync::OnceLock;
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Milliseconds elapsed since this process's AI core first asked for the
/// time. Strictly monotonic.
#[must_use]
pub fn now_ms() -> i64 {
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_millis() as i64
}
