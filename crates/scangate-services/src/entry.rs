//! HTTP entry submission.

use tracing::debug;
use url::Url;

use scangate_core::{Error, Result, VoucherCode};
use scangate_session::EntrySink;

/// Submission sink backed by the room's entry endpoint.
///
/// Fire-and-forget from the session's point of view: the driver logs a
/// failure and still reports the session as submitted.
#[derive(Debug, Clone)]
pub struct HttpEntrySink {
    client: reqwest::Client,
    entry_url: Url,
}

impl HttpEntrySink {
    /// Create a sink over an existing HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, entry_url: Url) -> Self {
        Self { client, entry_url }
    }
}

impl EntrySink for HttpEntrySink {
    async fn submit(&self, code: &VoucherCode) -> Result<()> {
        let form = [("voucher_code", code.as_str())];
        let response = self
            .client
            .post(self.entry_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Submission(e.to_string()))?;

        debug!(status = %response.status(), "entry submitted");
        if !response.status().is_success() {
            return Err(Error::Submission(format!(
                "entry endpoint answered {}",
                response.status()
            )));
        }
        Ok(())
    }
}
