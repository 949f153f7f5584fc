//! Consumed service interfaces.
//!
//! These traits are the seams between the session and its external
//! collaborators. The wire format behind them is owned by the surrounding
//! application; the session only cares about the request/response shapes.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT), so no
//! `async_trait` macro is needed.

use scangate_core::{IdNumber, PersonRecord, Result, ValidationOutcome, VoucherCode};

/// Person lookup keyed by identification number.
pub trait PersonDirectory {
    /// Find a registered person.
    ///
    /// Returns `Ok(None)` for "not found". A transport error is returned as
    /// `Err`; the session driver collapses it into the not-found path.
    async fn find_by_id(&self, id: &IdNumber) -> Result<Option<PersonRecord>>;
}

/// Remote voucher validation.
pub trait VoucherValidator {
    /// Validate a normalized scan code.
    ///
    /// An explicit service rejection is `Ok` with a rejecting outcome;
    /// `Err` means the call itself failed (network or malformed response).
    async fn validate(&self, code: &VoucherCode) -> Result<ValidationOutcome>;
}

/// Sink that persists a confirmed entry.
///
/// Invoked exactly once per session, only after the voucher was accepted.
/// Fire-and-forget from the session's perspective: the result is logged but
/// never alters the outcome.
pub trait EntrySink {
    /// Submit the accepted voucher code.
    async fn submit(&self, code: &VoucherCode) -> Result<()>;
}
