//! HTTP voucher validation.

use serde::Deserialize;
use url::Url;

use scangate_core::{Error, Result, ValidationOutcome, VoucherCode};
use scangate_session::VoucherValidator;

/// JSON body of a validation answer.
#[derive(Debug, Deserialize)]
struct ValidationPayload {
    valid: Option<bool>,
    message: Option<String>,
}

/// Validator backed by the room's validation endpoint.
#[derive(Debug, Clone)]
pub struct HttpVoucherValidator {
    client: reqwest::Client,
    validation_url: Url,
}

impl HttpVoucherValidator {
    /// Create a validator over an existing HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, validation_url: Url) -> Self {
        Self {
            client,
            validation_url,
        }
    }
}

impl VoucherValidator for HttpVoucherValidator {
    async fn validate(&self, code: &VoucherCode) -> Result<ValidationOutcome> {
        let form = [("voucher_code", code.as_str())];
        let response = self
            .client
            .post(self.validation_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::ValidationTransport(e.to_string()))?;

        let success = response.status().is_success();
        let body = response
            .text()
            .await
            .map_err(|e| Error::ValidationTransport(e.to_string()))?;

        map_validation_body(success, &body)
    }
}

/// Map an HTTP status plus body to an outcome.
///
/// A non-success status is an explicit rejection carrying whatever message
/// the body holds. On a success status, an absent `valid` flag is a
/// rejection and an unreadable body is a transport-level failure.
fn map_validation_body(success: bool, body: &str) -> Result<ValidationOutcome> {
    let payload = serde_json::from_str::<ValidationPayload>(body);

    if !success {
        let message = payload.ok().and_then(|p| p.message);
        return Ok(ValidationOutcome::rejected(message));
    }

    match payload {
        Ok(payload) => {
            if payload.valid.unwrap_or(false) {
                Ok(ValidationOutcome::accepted(payload.message))
            } else {
                Ok(ValidationOutcome::rejected(payload.message))
            }
        }
        Err(err) => Err(Error::ValidationTransport(format!(
            "unreadable validation response: {err}"
        ))),
    }
}
