//! Symbol accumulator for one scan attempt.

use std::time::Duration;

use scangate_core::constants::DEFAULT_IDLE_TIMEOUT;

/// Accumulates raw scanner symbols into one candidate scan code.
///
/// The buffer holds the symbols received since the last reset or completion
/// hand-off, in arrival order. It owns no clock; the inactivity decision is
/// made by [`ScanReader`](crate::ScanReader), which completes the buffer
/// when the configured idle gap elapses without new input.
///
/// # Examples
///
/// ```
/// use scangate_capture::CaptureBuffer;
///
/// let mut buffer = CaptureBuffer::new();
/// buffer.append('A');
/// buffer.append('7');
/// assert_eq!(buffer.complete(), "A7");
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    /// Symbols accumulated since the last reset, in arrival order.
    symbols: String,

    /// Idle gap after which the accumulated sequence counts as complete.
    idle_timeout: Duration,
}

impl CaptureBuffer {
    /// Create a buffer with the default 100 ms idle timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }

    /// Create a buffer with a custom idle timeout.
    ///
    /// The gap should stay below ~150 ms so completion adds no perceptible
    /// latency, while remaining long enough to absorb inter-character jitter
    /// from slow readers.
    #[must_use]
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            symbols: String::new(),
            idle_timeout,
        }
    }

    /// The configured idle gap.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Append one symbol to the pending sequence.
    ///
    /// Control characters are dropped: wedge scanners may or may not emit a
    /// trailing CR/LF, and the input surface cannot rely on it either way.
    pub fn append(&mut self, symbol: char) {
        if symbol.is_control() {
            return;
        }
        self.symbols.push(symbol);
    }

    /// Returns `true` if no symbols are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of pending symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.chars().count()
    }

    /// Take the accumulated sequence, leaving the buffer empty.
    ///
    /// This is the idle-completion hand-off. An empty result means the burst
    /// carried no printable symbols; the session layer treats that as a
    /// failed read, not as "no scan attempted".
    #[must_use]
    pub fn complete(&mut self) -> String {
        std::mem::take(&mut self.symbols)
    }

    /// Clear the pending sequence. Idempotent, callable at any time.
    pub fn reset(&mut self) {
        self.symbols.clear();
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = CaptureBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.idle_timeout(), DEFAULT_IDLE_TIMEOUT);
    }

    #[test]
    fn test_append_preserves_arrival_order() {
        let mut buffer = CaptureBuffer::new();
        for c in "VT-2024".chars() {
            buffer.append(c);
        }
        assert_eq!(buffer.len(), 7);
        assert_eq!(buffer.complete(), "VT-2024");
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let mut buffer = CaptureBuffer::new();
        for c in "AB\rC\n".chars() {
            buffer.append(c);
        }
        assert_eq!(buffer.complete(), "ABC");
    }

    #[test]
    fn test_complete_clears_the_buffer() {
        let mut buffer = CaptureBuffer::new();
        buffer.append('X');
        assert_eq!(buffer.complete(), "X");
        assert!(buffer.is_empty());
        assert_eq!(buffer.complete(), "");
    }

    #[test]
    fn test_reset_then_append_matches_fresh_buffer() {
        let mut buffer = CaptureBuffer::new();
        buffer.append('A');
        buffer.append('B');
        buffer.reset();
        buffer.append('Z');

        let mut fresh = CaptureBuffer::new();
        fresh.append('Z');

        assert_eq!(buffer.complete(), fresh.complete());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut buffer = CaptureBuffer::new();
        buffer.append('A');
        buffer.reset();
        buffer.reset();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_custom_idle_timeout() {
        let buffer = CaptureBuffer::with_idle_timeout(Duration::from_millis(40));
        assert_eq!(buffer.idle_timeout(), Duration::from_millis(40));
    }
}
