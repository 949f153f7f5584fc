//! Session phases and transition rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents all possible phases of one interactive scan session.
///
/// The flow runs `Idle → Searching → Armed → Capturing → Validating` and
/// ends in `Confirmed` (accepted, entry submitted), `Rejected` (re-armed for
/// another attempt) or `LookupFailed` (redirect to the registration flow).
///
/// `Rejected` is armed-equivalent: the capture surface has been refocused
/// and the next symbol starts a fresh scan without operator interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for the operator to begin a scan.
    Idle,

    /// Person lookup in flight for the operator-entered id number.
    Searching,

    /// Lookup came back empty or failed; the session redirects to the
    /// registration flow. Terminal for this session.
    LookupFailed,

    /// Capture enabled and focused, waiting for the first symbol.
    Armed,

    /// Scanner burst in progress, buffer accumulating.
    Capturing,

    /// Voucher validation call in flight. The scan trigger is disabled for
    /// the whole phase, so at most one validation is ever outstanding.
    Validating,

    /// Voucher accepted; the entry has been handed to the submission sink.
    /// Terminal for this session.
    Confirmed,

    /// Voucher rejected (or scan empty); capture re-armed for a new attempt.
    Rejected,
}

impl SessionPhase {
    /// Check if a transition to `target` is valid from this phase.
    ///
    /// `Rejected` behaves like `Armed` for outgoing edges, including the
    /// self-loop for a second consecutive failed read.
    #[must_use]
    pub fn can_transition_to(&self, target: &SessionPhase) -> bool {
        matches!(
            (self, target),
            // From Idle
            (SessionPhase::Idle, SessionPhase::Searching | SessionPhase::LookupFailed)
            // From Searching
            | (SessionPhase::Searching, SessionPhase::Armed | SessionPhase::LookupFailed)
            // From Armed (a completed burst may arrive without an observed
            // first-symbol event, so Validating/Rejected are reachable directly)
            | (
                SessionPhase::Armed,
                SessionPhase::Capturing | SessionPhase::Validating | SessionPhase::Rejected
            )
            // From Capturing
            | (SessionPhase::Capturing, SessionPhase::Validating | SessionPhase::Rejected)
            // From Validating
            | (SessionPhase::Validating, SessionPhase::Confirmed | SessionPhase::Rejected)
            // From Rejected (armed-equivalent)
            | (
                SessionPhase::Rejected,
                SessionPhase::Capturing | SessionPhase::Validating | SessionPhase::Rejected
            )
        )
    }

    /// Returns `true` for phases the session never leaves except by reset.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Confirmed | SessionPhase::LookupFailed)
    }

    /// Returns `true` if the capture surface accepts symbols in this phase.
    #[must_use]
    pub fn accepts_symbols(&self) -> bool {
        matches!(
            self,
            SessionPhase::Armed | SessionPhase::Capturing | SessionPhase::Rejected
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase_str = match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Searching => "Searching",
            SessionPhase::LookupFailed => "LookupFailed",
            SessionPhase::Armed => "Armed",
            SessionPhase::Capturing => "Capturing",
            SessionPhase::Validating => "Validating",
            SessionPhase::Confirmed => "Confirmed",
            SessionPhase::Rejected => "Rejected",
        };
        write!(f, "{}", phase_str)
    }
}
