//! HTTP person lookup.

use serde::Deserialize;
use tracing::warn;
use url::Url;

use scangate_core::{Error, IdNumber, PersonRecord, Result};
use scangate_session::PersonDirectory;

/// JSON body of a successful lookup.
#[derive(Debug, Deserialize)]
struct PersonPayload {
    #[serde(rename = "fullName")]
    full_name: Option<String>,
}

/// Person directory backed by the room's lookup endpoint.
#[derive(Debug, Clone)]
pub struct HttpPersonDirectory {
    client: reqwest::Client,
    lookup_url: Url,
}

impl HttpPersonDirectory {
    /// Create a directory over an existing HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, lookup_url: Url) -> Self {
        Self { client, lookup_url }
    }
}

impl PersonDirectory for HttpPersonDirectory {
    async fn find_by_id(&self, id: &IdNumber) -> Result<Option<PersonRecord>> {
        let mut url = self.lookup_url.clone();
        url.query_pairs_mut().append_pair("id_number", id.as_str());

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Lookup(e.to_string()))?;

        // 404 and every other non-success status read as "not found".
        if !response.status().is_success() {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Lookup(e.to_string()))?;
        Ok(parse_person_body(&body))
    }
}

/// Map a successful response body to a record.
///
/// An unreadable body is treated as "not found", matching the upstream
/// contract where any malformed lookup answer routes to registration.
fn parse_person_body(body: &str) -> Option<PersonRecord> {
    match serde_json::from_str::<PersonPayload>(body) {
        Ok(payload) => Some(PersonRecord {
            display_name: payload.full_name,
        }),
        Err(err) => {
            warn!(%err, "unreadable person lookup body treated as not found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_is_mapped() {
        let record = parse_person_body(r#"{"fullName": "Ana Pérez"}"#).unwrap();
        assert_eq!(record.display_name.as_deref(), Some("Ana Pérez"));
    }

    #[test]
    fn test_missing_name_is_anonymous() {
        let record = parse_person_body("{}").unwrap();
        assert!(record.display_name.is_none());
    }

    #[test]
    fn test_unreadable_body_is_not_found() {
        assert!(parse_person_body("<html>oops</html>").is_none());
    }
}
