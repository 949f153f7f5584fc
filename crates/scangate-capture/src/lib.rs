//! Scan capture for keyboard-wedge voucher readers.
//!
//! This crate turns an unbounded keystroke stream into discrete scan events.
//! Wedge scanners emit their payload as ordinary keystrokes with no reliable
//! terminator, so the only boundary signal is inactivity: a short idle gap
//! after a burst marks the end of one scan.
//!
//! [`CaptureBuffer`] is the pure accumulator; [`ScanReader`] drives the
//! inactivity debounce on the tokio clock and hands out a cloneable
//! [`ScanHandle`] that the input surface (or a test) feeds symbols through.

pub mod buffer;
pub mod reader;

pub use buffer::CaptureBuffer;
pub use reader::{ScanHandle, ScanReader};
