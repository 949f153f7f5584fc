//! The scan session state machine.
//!
//! [`ScanSession::handle`] is a pure transition function: it consumes one
//! event, mutates the session's phase and bookkeeping, and returns the side
//! effects the caller must perform. No I/O and no clock live here, which is
//! what makes every transition testable without a runtime.

use tracing::{debug, trace, warn};

use scangate_core::{IdNumber, PersonRecord, SessionId, ValidationOutcome, VoucherCode};

use crate::phase::SessionPhase;
use crate::status::{
    STATUS_SCAN_NOT_DETECTED, STATUS_VALIDATION_UNAVAILABLE, StatusLine, status_line,
};

/// An input event for the state machine.
///
/// Events arrive from three sources: the operator (begin/reset), the capture
/// layer (symbols, completed bursts) and the network (lookup and validation
/// results). All of them funnel through [`ScanSession::handle`] one at a
/// time; the machine never observes two events concurrently.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Operator pressed the scan trigger.
    BeginScan,

    /// Person lookup finished. `None` covers both "not found" and a
    /// transport failure — the driver collapses them before they get here.
    LookupResolved(Option<PersonRecord>),

    /// First symbol of a burst reached the capture surface.
    SymbolReceived,

    /// Capture buffer went idle and emitted the accumulated sequence.
    ScanCompleted(String),

    /// Validation service answered.
    ValidationResolved(ValidationOutcome),

    /// Validation call failed in transport or produced an unreadable
    /// response.
    ValidationErrored,

    /// Restart the session from scratch.
    Reset,
}

/// A side effect the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Re-render the operator-facing status.
    SetStatus(StatusLine),

    /// Enable or disable the scan trigger control.
    SetTriggerEnabled(bool),

    /// Call the person lookup service.
    LookupPerson(IdNumber),

    /// Reset and (re)focus the capture surface so the next burst lands in a
    /// clean buffer without operator interaction.
    ArmCapture,

    /// Call the validation service with the normalized code.
    ValidateVoucher(VoucherCode),

    /// Hand the accepted code to the form-submission sink. Emitted exactly
    /// once per session.
    SubmitEntry(VoucherCode),

    /// Route the operator into the registration flow.
    RedirectToRegistration,
}

/// State machine for one interactive scan session.
///
/// Owns the operator-entered identification number (immutable for the
/// session), the current phase, the participant record once the lookup
/// succeeded, the code pending validation, and the last status shown.
///
/// Events that are not meaningful in the current phase are ignored with a
/// trace log and zero effects. That single rule covers the concurrency
/// policy: a stale network response arriving after the session moved on is
/// dropped, and a scan completing while a validation is in flight cannot
/// start a second call (the disabled trigger is the only mutual exclusion
/// this design needs).
#[derive(Debug)]
pub struct ScanSession {
    /// Correlation id for logs.
    id: SessionId,

    /// Operator-entered identification number; may be empty.
    id_number: String,

    /// Current phase.
    phase: SessionPhase,

    /// Participant record once the lookup succeeded.
    person: Option<PersonRecord>,

    /// Code handed to the validation service, until it answers.
    pending_code: Option<VoucherCode>,

    /// Whether the scan trigger control is currently enabled.
    trigger_enabled: bool,

    /// Last status handed to the presentation layer.
    last_status: StatusLine,
}

impl ScanSession {
    /// Create a session for the given (possibly empty) identification
    /// number.
    #[must_use]
    pub fn new(id_number: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            id_number: id_number.into(),
            phase: SessionPhase::Idle,
            person: None,
            pending_code: None,
            trigger_enabled: true,
            last_status: status_line(SessionPhase::Idle, None),
        }
    }

    /// The session's correlation id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Participant record, once the lookup succeeded.
    #[must_use]
    pub fn person(&self) -> Option<&PersonRecord> {
        self.person.as_ref()
    }

    /// Whether the scan trigger control is enabled.
    #[must_use]
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    /// Last status handed to the presentation layer.
    #[must_use]
    pub fn last_status(&self) -> &StatusLine {
        &self.last_status
    }

    /// Apply one event and return the side effects to perform.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match (self.phase, event) {
            (SessionPhase::Idle, SessionEvent::BeginScan) => self.on_begin_scan(),
            (SessionPhase::Searching, SessionEvent::LookupResolved(person)) => {
                self.on_lookup_resolved(person)
            }
            (phase, SessionEvent::SymbolReceived) if phase.accepts_symbols() => {
                // Later symbols of the same burst are no-ops.
                if phase != SessionPhase::Capturing {
                    self.transition(SessionPhase::Capturing);
                }
                Vec::new()
            }
            (phase, SessionEvent::ScanCompleted(raw)) if phase.accepts_symbols() => {
                self.on_scan_completed(&raw)
            }
            (SessionPhase::Validating, SessionEvent::ValidationResolved(outcome)) => {
                self.on_validation_resolved(outcome)
            }
            (SessionPhase::Validating, SessionEvent::ValidationErrored) => {
                self.reject(Some(STATUS_VALIDATION_UNAVAILABLE.to_string()))
            }
            (_, SessionEvent::Reset) => {
                self.force_reset();
                Vec::new()
            }
            (phase, event) => {
                trace!(session = %self.id, %phase, ?event, "ignoring event in current phase");
                Vec::new()
            }
        }
    }

    fn on_begin_scan(&mut self) -> Vec<Effect> {
        match IdNumber::new(&self.id_number) {
            Err(_) => {
                // No id entered: skip the lookup entirely and route straight
                // into registration.
                debug!(session = %self.id, "begin scan without id number");
                self.transition(SessionPhase::LookupFailed);
                let mut effects = Vec::new();
                self.push_status(&mut effects, None);
                effects.push(Effect::RedirectToRegistration);
                effects
            }
            Ok(id) => {
                self.transition(SessionPhase::Searching);
                let mut effects = Vec::new();
                self.push_status(&mut effects, None);
                self.push_trigger(&mut effects, false);
                effects.push(Effect::LookupPerson(id));
                effects
            }
        }
    }

    fn on_lookup_resolved(&mut self, person: Option<PersonRecord>) -> Vec<Effect> {
        match person {
            None => {
                self.transition(SessionPhase::LookupFailed);
                let mut effects = Vec::new();
                self.push_status(&mut effects, None);
                self.push_trigger(&mut effects, true);
                effects.push(Effect::RedirectToRegistration);
                effects
            }
            Some(person) => {
                let name = person.display_name.clone();
                self.person = Some(person);
                self.transition(SessionPhase::Armed);
                let mut effects = Vec::new();
                self.push_status(&mut effects, name.as_deref());
                effects.push(Effect::ArmCapture);
                effects
            }
        }
    }

    fn on_scan_completed(&mut self, raw: &str) -> Vec<Effect> {
        match VoucherCode::new(raw) {
            Err(_) => {
                // Empty burst: a failed read, rejected locally without a
                // network call.
                debug!(session = %self.id, "empty scan rejected locally");
                self.reject(Some(STATUS_SCAN_NOT_DETECTED.to_string()))
            }
            Ok(code) => {
                self.pending_code = Some(code.clone());
                self.transition(SessionPhase::Validating);
                let mut effects = Vec::new();
                self.push_status(&mut effects, None);
                self.push_trigger(&mut effects, false);
                effects.push(Effect::ValidateVoucher(code));
                effects
            }
        }
    }

    fn on_validation_resolved(&mut self, outcome: ValidationOutcome) -> Vec<Effect> {
        if outcome.is_accepted() {
            let Some(code) = self.pending_code.take() else {
                warn!(session = %self.id, "accepted outcome with no pending code");
                return Vec::new();
            };
            self.transition(SessionPhase::Confirmed);
            let mut effects = Vec::new();
            self.push_status(&mut effects, outcome.message());
            effects.push(Effect::SubmitEntry(code));
            effects
        } else {
            self.reject(outcome.message().map(str::to_string))
        }
    }

    /// Shared rejection path: error status, trigger back on, capture
    /// re-armed so the operator can scan again immediately.
    fn reject(&mut self, message: Option<String>) -> Vec<Effect> {
        self.pending_code = None;
        self.transition(SessionPhase::Rejected);
        let mut effects = Vec::new();
        self.push_status(&mut effects, message.as_deref());
        self.push_trigger(&mut effects, true);
        effects.push(Effect::ArmCapture);
        effects
    }

    fn transition(&mut self, to: SessionPhase) {
        debug_assert!(
            self.phase.can_transition_to(&to),
            "invalid transition {} -> {}",
            self.phase,
            to
        );
        debug!(session = %self.id, from = %self.phase, to = %to, "session transition");
        self.phase = to;
    }

    fn force_reset(&mut self) {
        debug!(session = %self.id, from = %self.phase, "session reset");
        self.phase = SessionPhase::Idle;
        self.person = None;
        self.pending_code = None;
        self.trigger_enabled = true;
        self.last_status = status_line(SessionPhase::Idle, None);
    }

    fn push_status(&mut self, effects: &mut Vec<Effect>, message: Option<&str>) {
        let status = status_line(self.phase, message);
        self.last_status = status.clone();
        effects.push(Effect::SetStatus(status));
    }

    fn push_trigger(&mut self, effects: &mut Vec<Effect>, enabled: bool) {
        self.trigger_enabled = enabled;
        effects.push(Effect::SetTriggerEnabled(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{STATUS_INVALID_VOUCHER, STATUS_READY, StatusTone};

    fn armed_session() -> ScanSession {
        let mut session = ScanSession::new("12345");
        session.handle(SessionEvent::BeginScan);
        session.handle(SessionEvent::LookupResolved(Some(PersonRecord::named(
            "Ana",
        ))));
        session
    }

    fn validating_session() -> ScanSession {
        let mut session = armed_session();
        session.handle(SessionEvent::ScanCompleted("abc123".to_string()));
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ScanSession::new("12345");
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.trigger_enabled());
        assert!(session.person().is_none());
    }

    #[test]
    fn test_begin_scan_starts_lookup() {
        let mut session = ScanSession::new("12345");
        let effects = session.handle(SessionEvent::BeginScan);

        assert_eq!(session.phase(), SessionPhase::Searching);
        assert!(!session.trigger_enabled());
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::LookupPerson(id) if id.as_str() == "12345"))
        );
    }

    #[test]
    fn test_begin_scan_with_empty_id_redirects_without_lookup() {
        let mut session = ScanSession::new("   ");
        let effects = session.handle(SessionEvent::BeginScan);

        assert_eq!(session.phase(), SessionPhase::LookupFailed);
        assert!(effects.contains(&Effect::RedirectToRegistration));
        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, Effect::LookupPerson(_)))
        );
    }

    #[test]
    fn test_lookup_not_found_redirects() {
        let mut session = ScanSession::new("12345");
        session.handle(SessionEvent::BeginScan);
        let effects = session.handle(SessionEvent::LookupResolved(None));

        assert_eq!(session.phase(), SessionPhase::LookupFailed);
        assert!(effects.contains(&Effect::RedirectToRegistration));
    }

    #[test]
    fn test_lookup_success_arms_with_personalized_prompt() {
        let mut session = ScanSession::new("12345");
        session.handle(SessionEvent::BeginScan);
        let effects = session.handle(SessionEvent::LookupResolved(Some(PersonRecord::named(
            "Ana",
        ))));

        assert_eq!(session.phase(), SessionPhase::Armed);
        assert!(effects.contains(&Effect::ArmCapture));
        assert_eq!(session.last_status().text, "Ana. Escanea el voucher.");
        assert_eq!(session.last_status().tone, StatusTone::Info);
    }

    #[test]
    fn test_lookup_success_without_name_uses_generic_prompt() {
        let mut session = ScanSession::new("12345");
        session.handle(SessionEvent::BeginScan);
        session.handle(SessionEvent::LookupResolved(Some(PersonRecord::anonymous())));

        assert_eq!(session.last_status().text, STATUS_READY);
    }

    #[test]
    fn test_first_symbol_enters_capturing() {
        let mut session = armed_session();
        let effects = session.handle(SessionEvent::SymbolReceived);

        assert_eq!(session.phase(), SessionPhase::Capturing);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_completed_scan_is_normalized_and_validated_once() {
        let mut session = armed_session();
        session.handle(SessionEvent::SymbolReceived);
        let effects = session.handle(SessionEvent::ScanCompleted("abc123".to_string()));

        assert_eq!(session.phase(), SessionPhase::Validating);
        assert!(!session.trigger_enabled());
        let validations: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::ValidateVoucher(code) => Some(code.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(validations, vec!["ABC123"]);
    }

    #[test]
    fn test_empty_scan_is_rejected_locally() {
        let mut session = armed_session();
        let effects = session.handle(SessionEvent::ScanCompleted("  \r\n ".to_string()));

        assert_eq!(session.phase(), SessionPhase::Rejected);
        assert!(session.trigger_enabled());
        assert_eq!(session.last_status().text, STATUS_SCAN_NOT_DETECTED);
        assert_eq!(session.last_status().tone, StatusTone::Error);
        assert!(effects.contains(&Effect::ArmCapture));
        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, Effect::ValidateVoucher(_)))
        );
    }

    #[test]
    fn test_validation_accept_confirms_and_submits_once() {
        let mut session = validating_session();
        let effects = session.handle(SessionEvent::ValidationResolved(
            ValidationOutcome::accepted(None),
        ));

        assert_eq!(session.phase(), SessionPhase::Confirmed);
        let submissions: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::SubmitEntry(code) => Some(code.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(submissions, vec!["ABC123"]);
    }

    #[test]
    fn test_validation_reject_surfaces_service_message_verbatim() {
        let mut session = validating_session();
        session.handle(SessionEvent::ValidationResolved(
            ValidationOutcome::rejected(Some("Cupón No Pertenece a la Sala".to_string())),
        ));

        assert_eq!(session.phase(), SessionPhase::Rejected);
        assert!(session.trigger_enabled());
        assert_eq!(session.last_status().text, "Cupón No Pertenece a la Sala");
        assert_eq!(session.last_status().tone, StatusTone::Error);
    }

    #[test]
    fn test_validation_reject_without_message_uses_fallback() {
        let mut session = validating_session();
        session.handle(SessionEvent::ValidationResolved(
            ValidationOutcome::rejected(None),
        ));

        assert_eq!(session.last_status().text, STATUS_INVALID_VOUCHER);
    }

    #[test]
    fn test_validation_transport_error_uses_generic_fallback() {
        let mut session = validating_session();
        let effects = session.handle(SessionEvent::ValidationErrored);

        assert_eq!(session.phase(), SessionPhase::Rejected);
        assert_eq!(session.last_status().text, STATUS_VALIDATION_UNAVAILABLE);
        assert!(effects.contains(&Effect::ArmCapture));
    }

    #[test]
    fn test_rejected_session_can_scan_again() {
        let mut session = validating_session();
        session.handle(SessionEvent::ValidationResolved(
            ValidationOutcome::rejected(None),
        ));

        session.handle(SessionEvent::SymbolReceived);
        assert_eq!(session.phase(), SessionPhase::Capturing);

        let effects = session.handle(SessionEvent::ScanCompleted("second".to_string()));
        assert_eq!(session.phase(), SessionPhase::Validating);
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::ValidateVoucher(code) if code.as_str() == "SECOND"))
        );
    }

    #[test]
    fn test_scan_completed_while_validating_is_ignored() {
        let mut session = validating_session();
        let effects = session.handle(SessionEvent::ScanCompleted("other".to_string()));

        assert!(effects.is_empty());
        assert_eq!(session.phase(), SessionPhase::Validating);
        assert!(!session.trigger_enabled());
    }

    #[test]
    fn test_stale_validation_response_is_ignored() {
        let mut session = armed_session();
        let effects = session.handle(SessionEvent::ValidationResolved(
            ValidationOutcome::accepted(None),
        ));

        assert!(effects.is_empty());
        assert_eq!(session.phase(), SessionPhase::Armed);
    }

    #[test]
    fn test_stale_lookup_response_is_ignored() {
        let mut session = ScanSession::new("12345");
        let effects = session.handle(SessionEvent::LookupResolved(Some(PersonRecord::named(
            "Ana",
        ))));

        assert!(effects.is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_begin_scan_while_searching_is_ignored() {
        let mut session = ScanSession::new("12345");
        session.handle(SessionEvent::BeginScan);
        let effects = session.handle(SessionEvent::BeginScan);

        assert!(effects.is_empty());
        assert_eq!(session.phase(), SessionPhase::Searching);
    }

    #[test]
    fn test_reset_returns_to_idle_from_any_phase() {
        let mut session = validating_session();
        session.handle(SessionEvent::Reset);

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.trigger_enabled());
        assert!(session.person().is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = armed_session();
        session.handle(SessionEvent::Reset);
        let effects = session.handle(SessionEvent::Reset);

        assert!(effects.is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_double_consecutive_empty_scans() {
        let mut session = armed_session();
        session.handle(SessionEvent::ScanCompleted(String::new()));
        assert_eq!(session.phase(), SessionPhase::Rejected);

        let effects = session.handle(SessionEvent::ScanCompleted(String::new()));
        assert_eq!(session.phase(), SessionPhase::Rejected);
        assert!(effects.contains(&Effect::ArmCapture));
    }
}
