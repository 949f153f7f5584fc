use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Operator-supplied identification number for the person lookup.
///
/// Immutable for the lifetime of a scan session. Surrounding whitespace is
/// stripped at construction; an empty number is rejected so the session can
/// short-circuit to the registration flow without a network call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdNumber(String);

impl IdNumber {
    /// Create an identification number with validation.
    ///
    /// # Errors
    /// Returns `Error::EmptyIdentification` if the number is empty after
    /// trimming.
    pub fn new(number: &str) -> Result<Self> {
        let number = number.trim();
        if number.is_empty() {
            return Err(Error::EmptyIdentification);
        }
        Ok(IdNumber(number.to_string()))
    }

    /// Get the identification number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IdNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        IdNumber::new(s)
    }
}

/// Normalized voucher code reconstructed from one scanner burst.
///
/// Construction applies the same normalization the validation service
/// expects: CR/LF artifacts from the wedge scanner are stripped, the result
/// is trimmed and converted to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherCode(String);

impl VoucherCode {
    /// Create a voucher code with normalization.
    ///
    /// # Errors
    /// Returns `Error::EmptyScan` if nothing remains after stripping line
    /// terminators and whitespace — a failed read, not an absent scan.
    pub fn new(raw: &str) -> Result<Self> {
        let code: String = raw.chars().filter(|c| *c != '\r' && *c != '\n').collect();
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(Error::EmptyScan);
        }
        Ok(VoucherCode(code))
    }

    /// Get the voucher code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoucherCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VoucherCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        VoucherCode::new(s)
    }
}

/// Person record returned by the lookup service.
///
/// Only used to personalize the ready prompt; a missing display name is not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Display name for the operator prompt, if the service knows one.
    pub display_name: Option<String>,
}

impl PersonRecord {
    /// Create a record with a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
        }
    }

    /// Create a record without a display name.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Result of one remote voucher validation call.
///
/// Consumed once per scan attempt; never persisted. An absent accept flag
/// deserializes as a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    #[serde(default)]
    accepted: bool,
    #[serde(default)]
    message: Option<String>,
}

impl ValidationOutcome {
    /// Create an accepting outcome.
    #[must_use]
    pub fn accepted(message: Option<String>) -> Self {
        Self {
            accepted: true,
            message,
        }
    }

    /// Create a rejecting outcome.
    #[must_use]
    pub fn rejected(message: Option<String>) -> Self {
        Self {
            accepted: false,
            message,
        }
    }

    /// Returns `true` if the service accepted the voucher.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// The human-readable message supplied by the service, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Unique identifier for one interactive scan session (log correlation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh session identifier.
    #[must_use]
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
