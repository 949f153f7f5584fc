//! Mock service implementations for testing and development.
//!
//! These services can be programmed ahead of a run and inspected afterwards.
//! They are cloneable: every clone shares the same state, so a test can keep
//! a handle while the driver owns another.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use scangate_core::{Error, IdNumber, PersonRecord, Result, ValidationOutcome, VoucherCode};

use crate::services::{EntrySink, PersonDirectory, VoucherValidator};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned mock only means a test thread panicked; the data is still
    // usable for assertions.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory person directory.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    records: Arc<Mutex<HashMap<String, PersonRecord>>>,
    fail_transport: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a person under an identification number.
    pub fn insert(&self, id: &str, person: PersonRecord) {
        lock(&self.records).insert(id.to_string(), person);
    }

    /// Make every lookup fail at the transport level.
    pub fn fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    /// Number of lookup calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PersonDirectory for MockDirectory {
    async fn find_by_id(&self, id: &IdNumber) -> Result<Option<PersonRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(Error::Lookup("mock transport failure".to_string()));
        }
        Ok(lock(&self.records).get(id.as_str()).cloned())
    }
}

/// One scripted response for [`MockValidator`].
#[derive(Debug, Clone)]
pub enum ScriptedValidation {
    /// Return this outcome.
    Outcome(ValidationOutcome),
    /// Fail at the transport level.
    TransportFailure,
}

/// Scripted voucher validator.
///
/// Responses are consumed in FIFO order; with an empty script every call
/// accepts with no message.
#[derive(Debug, Clone, Default)]
pub struct MockValidator {
    script: Arc<Mutex<VecDeque<ScriptedValidation>>>,
    codes_seen: Arc<Mutex<Vec<VoucherCode>>>,
}

impl MockValidator {
    /// Create a validator that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next call.
    pub fn push_outcome(&self, outcome: ValidationOutcome) {
        lock(&self.script).push_back(ScriptedValidation::Outcome(outcome));
    }

    /// Queue a transport failure for the next call.
    pub fn push_transport_failure(&self) {
        lock(&self.script).push_back(ScriptedValidation::TransportFailure);
    }

    /// Every code submitted for validation, in call order.
    #[must_use]
    pub fn codes_seen(&self) -> Vec<VoucherCode> {
        lock(&self.codes_seen).clone()
    }

    /// Number of validation calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        lock(&self.codes_seen).len()
    }
}

impl VoucherValidator for MockValidator {
    async fn validate(&self, code: &VoucherCode) -> Result<ValidationOutcome> {
        lock(&self.codes_seen).push(code.clone());
        match lock(&self.script).pop_front() {
            Some(ScriptedValidation::Outcome(outcome)) => Ok(outcome),
            Some(ScriptedValidation::TransportFailure) => Err(Error::ValidationTransport(
                "mock transport failure".to_string(),
            )),
            None => Ok(ValidationOutcome::accepted(None)),
        }
    }
}

/// Recording entry sink.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    submissions: Arc<Mutex<Vec<VoucherCode>>>,
    fail: Arc<AtomicBool>,
}

impl MockSink {
    /// Create a sink that records submissions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every submission fail.
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All submitted codes, in call order.
    #[must_use]
    pub fn submissions(&self) -> Vec<VoucherCode> {
        lock(&self.submissions).clone()
    }
}

impl EntrySink for MockSink {
    async fn submit(&self, code: &VoucherCode) -> Result<()> {
        lock(&self.submissions).push(code.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Submission("mock sink failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_lookup_and_counting() {
        let directory = MockDirectory::new();
        directory.insert("12345", PersonRecord::named("Ana"));

        let known = IdNumber::new("12345").unwrap();
        let unknown = IdNumber::new("999").unwrap();

        assert_eq!(
            directory.find_by_id(&known).await.unwrap(),
            Some(PersonRecord::named("Ana"))
        );
        assert_eq!(directory.find_by_id(&unknown).await.unwrap(), None);
        assert_eq!(directory.calls(), 2);
    }

    #[tokio::test]
    async fn test_directory_transport_failure() {
        let directory = MockDirectory::new();
        directory.fail_transport(true);

        let id = IdNumber::new("1").unwrap();
        assert!(directory.find_by_id(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_validator_script_order() {
        let validator = MockValidator::new();
        validator.push_outcome(ValidationOutcome::rejected(Some("no".to_string())));
        validator.push_transport_failure();

        let code = VoucherCode::new("abc").unwrap();

        let first = validator.validate(&code).await.unwrap();
        assert!(!first.is_accepted());

        assert!(validator.validate(&code).await.is_err());

        // Script exhausted: default accept.
        assert!(validator.validate(&code).await.unwrap().is_accepted());
        assert_eq!(validator.calls(), 3);
    }

    #[tokio::test]
    async fn test_sink_records_submissions() {
        let sink = MockSink::new();
        let code = VoucherCode::new("abc").unwrap();

        sink.submit(&code).await.unwrap();
        assert_eq!(sink.submissions(), vec![code.clone()]);

        sink.fail(true);
        assert!(sink.submit(&code).await.is_err());
        assert_eq!(sink.submissions().len(), 2);
    }
}
