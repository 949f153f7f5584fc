//! Scan session orchestration.
//!
//! This crate owns the state machine that drives one interactive voucher
//! scan: person lookup, arming the capture surface, inactivity-debounced
//! scan completion, remote validation, and the confirm/reject outcome.
//!
//! The machine itself is pure: [`ScanSession::handle`] maps an event to a
//! list of [`Effect`]s without performing any I/O, which keeps every
//! transition table-testable. [`SessionDriver`] executes those effects
//! against the consumed service traits ([`PersonDirectory`],
//! [`VoucherValidator`], [`EntrySink`]) and feeds the results back in as
//! events. The [`mock`] module ships programmable in-memory services for
//! tests and development.

#![allow(async_fn_in_trait)]

pub mod config;
pub mod driver;
pub mod mock;
pub mod phase;
pub mod services;
pub mod session;
pub mod status;

pub use config::SessionConfig;
pub use driver::{SessionDriver, SessionOutcome};
pub use phase::SessionPhase;
pub use services::{EntrySink, PersonDirectory, VoucherValidator};
pub use session::{Effect, ScanSession, SessionEvent};
pub use status::{StatusLine, StatusTone, status_line};
