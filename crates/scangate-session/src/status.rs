//! Operator-facing status mapping.
//!
//! [`status_line`] is a pure function from (phase, optional service message)
//! to the text/tone pair shown to the operator. It has no side effects and
//! is exhaustively table-tested.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::phase::SessionPhase;

/// Prompt while idle.
pub const STATUS_IDLE: &str = "Presiona Escanear para iniciar.";

/// Ready prompt when the lookup returned no display name.
pub const STATUS_READY: &str = "Lector activo. Escanea el voucher.";

/// Shown while the person lookup is in flight.
pub const STATUS_SEARCHING: &str = "Buscando participante registrado...";

/// Shown on the way to the registration flow.
pub const STATUS_REDIRECTING: &str = "Participante no registrado. Redirigiendo al registro...";

/// Shown while the validation call is in flight.
pub const STATUS_VALIDATING: &str = "Validando voucher con la sala...";

/// Fallback success message when the service supplies none.
pub const STATUS_CONFIRMED: &str = "Cupón Generado Correctamente";

/// Fallback rejection message when the service supplies none.
pub const STATUS_INVALID_VOUCHER: &str = "Cupón No Pertenece a la Sala";

/// Local rejection for a burst that carried no usable symbols.
pub const STATUS_SCAN_NOT_DETECTED: &str = "No se detectó un voucher. Intenta nuevamente.";

/// Rejection when the validation service could not be reached.
pub const STATUS_VALIDATION_UNAVAILABLE: &str = "No se pudo validar. Intenta nuevamente.";

/// Visual tone of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

impl fmt::Display for StatusTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tone_str = match self {
            StatusTone::Info => "info",
            StatusTone::Success => "success",
            StatusTone::Error => "error",
        };
        write!(f, "{}", tone_str)
    }
}

/// One operator-facing status: display text plus tone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusLine {
    /// Create an informational status.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Info,
        }
    }

    /// Create a success status.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Success,
        }
    }

    /// Create an error status.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Error,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tone, self.text)
    }
}

/// Map a session phase and optional service message to a status line.
///
/// For `Armed`/`Capturing` the message is the participant's display name and
/// personalizes the ready prompt. For `Confirmed`/`Rejected` the message is
/// surfaced verbatim when present, otherwise a fixed fallback is used.
#[must_use]
pub fn status_line(phase: SessionPhase, message: Option<&str>) -> StatusLine {
    match phase {
        SessionPhase::Idle => StatusLine::info(STATUS_IDLE),
        SessionPhase::Searching => StatusLine::info(STATUS_SEARCHING),
        SessionPhase::LookupFailed => StatusLine::info(STATUS_REDIRECTING),
        SessionPhase::Armed | SessionPhase::Capturing => match message {
            Some(name) => StatusLine::info(format!("{name}. Escanea el voucher.")),
            None => StatusLine::info(STATUS_READY),
        },
        SessionPhase::Validating => StatusLine::info(STATUS_VALIDATING),
        SessionPhase::Confirmed => StatusLine::success(message.unwrap_or(STATUS_CONFIRMED)),
        SessionPhase::Rejected => StatusLine::error(message.unwrap_or(STATUS_INVALID_VOUCHER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SessionPhase::Idle, None, STATUS_IDLE, StatusTone::Info)]
    #[case(SessionPhase::Searching, None, STATUS_SEARCHING, StatusTone::Info)]
    #[case(SessionPhase::LookupFailed, None, STATUS_REDIRECTING, StatusTone::Info)]
    #[case(SessionPhase::Armed, None, STATUS_READY, StatusTone::Info)]
    #[case(SessionPhase::Capturing, None, STATUS_READY, StatusTone::Info)]
    #[case(SessionPhase::Validating, None, STATUS_VALIDATING, StatusTone::Info)]
    #[case(SessionPhase::Confirmed, None, STATUS_CONFIRMED, StatusTone::Success)]
    #[case(SessionPhase::Rejected, None, STATUS_INVALID_VOUCHER, StatusTone::Error)]
    fn test_status_table_without_message(
        #[case] phase: SessionPhase,
        #[case] message: Option<&str>,
        #[case] expected_text: &str,
        #[case] expected_tone: StatusTone,
    ) {
        let status = status_line(phase, message);
        assert_eq!(status.text, expected_text);
        assert_eq!(status.tone, expected_tone);
    }

    #[test]
    fn test_armed_prompt_is_personalized() {
        let status = status_line(SessionPhase::Armed, Some("Ana"));
        assert_eq!(status.text, "Ana. Escanea el voucher.");
        assert_eq!(status.tone, StatusTone::Info);
    }

    #[test]
    fn test_service_messages_are_surfaced_verbatim() {
        let rejected = status_line(SessionPhase::Rejected, Some("Cupón No Pertenece a la Sala"));
        assert_eq!(rejected.text, "Cupón No Pertenece a la Sala");
        assert_eq!(rejected.tone, StatusTone::Error);

        let confirmed = status_line(SessionPhase::Confirmed, Some("Cupón Generado Correctamente"));
        assert_eq!(confirmed.text, "Cupón Generado Correctamente");
        assert_eq!(confirmed.tone, StatusTone::Success);
    }

    #[test]
    fn test_empty_scan_message_passes_through() {
        let status = status_line(SessionPhase::Rejected, Some(STATUS_SCAN_NOT_DETECTED));
        assert_eq!(status.text, STATUS_SCAN_NOT_DETECTED);
        assert_eq!(status.tone, StatusTone::Error);
    }

    #[test]
    fn test_determinism() {
        assert_eq!(
            status_line(SessionPhase::Validating, None),
            status_line(SessionPhase::Validating, None)
        );
    }

    #[test]
    fn test_tone_serialization() {
        assert_eq!(
            serde_json::to_string(&StatusTone::Success).unwrap(),
            "\"success\""
        );
    }
}
