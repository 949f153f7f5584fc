//! Inactivity-debounce driver over a symbol channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use scangate_core::{Error, Result};

use crate::buffer::CaptureBuffer;

/// Capacity of the symbol channel. A wedge burst is a few dozen keystrokes;
/// back-pressure beyond that means the reader stopped being polled.
const SYMBOL_CHANNEL_CAPACITY: usize = 64;

/// Reads discrete scans out of a keystroke stream.
///
/// The reader owns a [`CaptureBuffer`] and applies the inactivity debounce:
/// [`next_scan`](ScanReader::next_scan) waits for the first symbol without
/// bound, then completes the buffer once the configured idle gap passes with
/// no new input. Each received symbol re-arms a single pending timeout, so
/// at most one timer is ever outstanding.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scangate_capture::ScanReader;
///
/// #[tokio::main]
/// async fn main() -> scangate_core::Result<()> {
///     let (mut reader, handle) = ScanReader::new(Duration::from_millis(100));
///
///     tokio::spawn(async move {
///         handle.send_str("VT777").await.unwrap();
///     });
///
///     let code = reader.next_scan().await?;
///     assert_eq!(code, "VT777");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ScanReader {
    /// Channel receiver for raw symbols.
    symbol_rx: mpsc::Receiver<char>,

    /// Accumulator for the scan in progress.
    buffer: CaptureBuffer,
}

impl ScanReader {
    /// Create a reader with the given idle timeout.
    ///
    /// Returns the reader and a cloneable [`ScanHandle`] the input surface
    /// feeds symbols through.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> (Self, ScanHandle) {
        let (symbol_tx, symbol_rx) = mpsc::channel(SYMBOL_CHANNEL_CAPACITY);

        let reader = Self {
            symbol_rx,
            buffer: CaptureBuffer::with_idle_timeout(idle_timeout),
        };

        (reader, ScanHandle { symbol_tx })
    }

    /// Create a reader with the default 100 ms idle timeout.
    #[must_use]
    pub fn with_default_timeout() -> (Self, ScanHandle) {
        Self::new(CaptureBuffer::new().idle_timeout())
    }

    /// Wait for the next completed scan.
    ///
    /// Blocks until at least one symbol arrives, then returns the
    /// accumulated sequence after an idle gap of `idle_timeout` with no new
    /// symbols. The returned string may be empty if the burst carried only
    /// control characters; callers classify that as a failed read.
    ///
    /// # Errors
    /// Returns `Error::ScannerDisconnected` if every handle has been dropped
    /// before any symbol arrived. A disconnect mid-burst emits whatever was
    /// captured.
    pub async fn next_scan(&mut self) -> Result<String> {
        let first = self
            .symbol_rx
            .recv()
            .await
            .ok_or_else(|| Error::ScannerDisconnected("symbol channel closed".to_string()))?;
        self.buffer.append(first);

        loop {
            match tokio::time::timeout(self.buffer.idle_timeout(), self.symbol_rx.recv()).await {
                Ok(Some(symbol)) => self.buffer.append(symbol),
                // Sender gone mid-burst: emit what we have.
                Ok(None) => break,
                // Idle gap elapsed: the scan is complete.
                Err(_) => break,
            }
        }

        let code = self.buffer.complete();
        debug!(symbols = code.len(), "scan burst completed");
        Ok(code)
    }

    /// Clear the buffer and discard any queued symbols.
    ///
    /// Called when a session (re)arms capture, so stray keystrokes from a
    /// previous attempt never leak into the next scan. Idempotent.
    pub fn reset(&mut self) {
        self.buffer.reset();
        while let Ok(symbol) = self.symbol_rx.try_recv() {
            trace!(?symbol, "discarding stray symbol on reset");
        }
    }

    /// The configured idle gap.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.buffer.idle_timeout()
    }
}

/// Handle for feeding symbols to a [`ScanReader`].
///
/// Clones share the same channel, so an input surface and a test harness can
/// both hold one.
#[derive(Debug, Clone)]
pub struct ScanHandle {
    /// Channel sender for raw symbols.
    symbol_tx: mpsc::Sender<char>,
}

impl ScanHandle {
    /// Send one raw symbol.
    ///
    /// # Errors
    /// Returns `Error::ScannerDisconnected` if the reader has been dropped.
    pub async fn send_symbol(&self, symbol: char) -> Result<()> {
        self.symbol_tx
            .send(symbol)
            .await
            .map_err(|_| Error::ScannerDisconnected("symbol channel closed".to_string()))
    }

    /// Send every character of `text` as an individual symbol.
    ///
    /// # Errors
    /// Returns `Error::ScannerDisconnected` if the reader has been dropped.
    pub async fn send_str(&self, text: &str) -> Result<()> {
        for symbol in text.chars() {
            self.send_symbol(symbol).await?;
        }
        Ok(())
    }
}
