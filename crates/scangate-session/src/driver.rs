//! Async executor for session effects.

use std::collections::VecDeque;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use scangate_core::{Error, Result, VoucherCode};
use scangate_capture::ScanReader;

use crate::services::{EntrySink, PersonDirectory, VoucherValidator};
use crate::session::{Effect, ScanSession, SessionEvent};
use crate::status::StatusLine;

/// Terminal outcome of one driven session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Voucher accepted and handed to the submission sink.
    Submitted(VoucherCode),

    /// Session ended in the registration redirect (missing id, unknown
    /// participant, or lookup failure).
    RedirectToRegistration,
}

/// Drives one [`ScanSession`] to completion.
///
/// The driver pulls effects out of the pure state machine and performs them:
/// network calls go to the injected service implementations, `ArmCapture`
/// resets the [`ScanReader`] and awaits the next debounced scan, and status
/// lines are published on an optional watch channel for the presentation
/// layer.
///
/// All suspension points live here — the inactivity debounce inside the
/// reader and the two unbounded network calls. Everything in between runs
/// on discrete events, so the machine itself needs no locks.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scangate_capture::ScanReader;
/// use scangate_session::mock::{MockDirectory, MockSink, MockValidator};
/// use scangate_session::{SessionDriver, SessionOutcome};
/// use scangate_core::PersonRecord;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> scangate_core::Result<()> {
///     let directory = MockDirectory::new();
///     directory.insert("12345", PersonRecord::named("Ana"));
///
///     let (reader, scanner) = ScanReader::new(Duration::from_millis(100));
///     let driver = SessionDriver::new(
///         "12345",
///         reader,
///         directory,
///         MockValidator::new(),
///         MockSink::new(),
///     );
///
///     tokio::spawn(async move {
///         scanner.send_str("VT777").await.unwrap();
///     });
///
///     match driver.run().await? {
///         SessionOutcome::Submitted(code) => assert_eq!(code.as_str(), "VT777"),
///         other => panic!("unexpected outcome: {other:?}"),
///     }
///     Ok(())
/// }
/// ```
pub struct SessionDriver<D, V, S> {
    session: ScanSession,
    reader: ScanReader,
    directory: D,
    validator: V,
    sink: S,
    status_tx: Option<watch::Sender<StatusLine>>,
}

impl<D, V, S> SessionDriver<D, V, S>
where
    D: PersonDirectory,
    V: VoucherValidator,
    S: EntrySink,
{
    /// Create a driver for the given identification number and services.
    #[must_use]
    pub fn new(
        id_number: impl Into<String>,
        reader: ScanReader,
        directory: D,
        validator: V,
        sink: S,
    ) -> Self {
        Self {
            session: ScanSession::new(id_number),
            reader,
            directory,
            validator,
            sink,
            status_tx: None,
        }
    }

    /// Publish every status transition on the given watch channel.
    #[must_use]
    pub fn with_status_channel(mut self, status_tx: watch::Sender<StatusLine>) -> Self {
        self.status_tx = Some(status_tx);
        self
    }

    /// Read access to the underlying session.
    #[must_use]
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Run the session to a terminal outcome.
    ///
    /// # Errors
    /// Returns `Error::ScannerDisconnected` if the symbol source goes away
    /// before the session reaches a terminal phase. Service failures never
    /// surface here: lookup errors collapse into the redirect path and
    /// validation errors re-arm the session.
    pub async fn run(mut self) -> Result<SessionOutcome> {
        let mut effects = VecDeque::from(self.session.handle(SessionEvent::BeginScan));

        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::SetStatus(status) => {
                    debug!(session = %self.session.id(), %status, "status update");
                    if let Some(tx) = &self.status_tx {
                        // Presentation side may have gone away; not our problem.
                        let _ = tx.send(status);
                    }
                }
                Effect::SetTriggerEnabled(enabled) => {
                    debug!(session = %self.session.id(), enabled, "trigger control");
                }
                Effect::LookupPerson(id) => {
                    let person = match self.directory.find_by_id(&id).await {
                        Ok(person) => person,
                        Err(err) => {
                            // Collapsed into the not-found path on purpose:
                            // the operator sees the registration redirect
                            // either way. The warn below is the only place
                            // the distinction survives.
                            warn!(session = %self.session.id(), %err,
                                "person lookup transport failure treated as not found");
                            None
                        }
                    };
                    effects.extend(self.session.handle(SessionEvent::LookupResolved(person)));
                }
                Effect::ArmCapture => {
                    self.reader.reset();
                    let raw = self.reader.next_scan().await?;
                    effects.extend(self.session.handle(SessionEvent::ScanCompleted(raw)));
                }
                Effect::ValidateVoucher(code) => {
                    match self.validator.validate(&code).await {
                        Ok(outcome) => effects
                            .extend(self.session.handle(SessionEvent::ValidationResolved(outcome))),
                        Err(err) => {
                            warn!(session = %self.session.id(), %err, "validation call failed");
                            effects.extend(self.session.handle(SessionEvent::ValidationErrored));
                        }
                    };
                }
                Effect::SubmitEntry(code) => {
                    // Fire-and-forget: the surrounding page owns what happens
                    // after submission, so a sink failure is only logged.
                    if let Err(err) = self.sink.submit(&code).await {
                        warn!(session = %self.session.id(), %err, "entry submission failed");
                    }
                    info!(session = %self.session.id(), %code, "voucher confirmed and submitted");
                    return Ok(SessionOutcome::Submitted(code));
                }
                Effect::RedirectToRegistration => {
                    info!(session = %self.session.id(), "redirecting to registration");
                    return Ok(SessionOutcome::RedirectToRegistration);
                }
            }
        }

        // The effect queue only drains without a terminal effect if events
        // were ignored as stale, which cannot happen in this single-driver
        // loop. Treat it as a lost scanner rather than panicking.
        Err(Error::ScannerDisconnected(
            "session ended without a terminal outcome".to_string(),
        ))
    }
}
