//! Shared constants for the scan terminal.

use std::time::Duration;

/// Inactivity gap that marks the end of a keyboard-wedge burst.
///
/// Wedge scanners deliver their payload as a burst of keystrokes with no
/// reliable terminator (newline-equivalent keys may be swallowed by the
/// input surface), so a short idle window is the only boundary signal.
/// 100 ms absorbs inter-character jitter from slow readers while staying
/// below perceptible latency.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 100;

/// [`DEFAULT_IDLE_TIMEOUT_MS`] as a `Duration`.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(DEFAULT_IDLE_TIMEOUT_MS);
