//! HTTP implementations of the consumed service interfaces.
//!
//! Thin transport layer only: no retry, no caching, no client-side timeout
//! (the session preserves the upstream behavior of waiting indefinitely on
//! a slow validation service). Response mapping follows the contracts the
//! surrounding application exposes today:
//!
//! - person lookup: `GET {url}?id_number=...`, JSON body with an optional
//!   `fullName`; 404 and any non-success status read as "not found"
//! - voucher validation: `POST {url}` form field `voucher_code`, JSON body
//!   `{valid, message}`; an absent `valid` flag is a rejection
//! - entry submission: `POST {url}` form field `voucher_code`, response
//!   ignored

pub mod config;
pub mod entry;
pub mod person;
pub mod validation;

pub use config::ServiceConfig;
pub use entry::HttpEntrySink;
pub use person::HttpPersonDirectory;
pub use validation::HttpVoucherValidator;

use scangate_core::{Error, Result};

/// Build the three HTTP services over one shared client.
///
/// # Errors
/// Returns `Error::Config` if the underlying HTTP client cannot be built.
pub fn build(
    config: &ServiceConfig,
) -> Result<(HttpPersonDirectory, HttpVoucherValidator, HttpEntrySink)> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;

    Ok((
        HttpPersonDirectory::new(client.clone(), config.person_lookup_url.clone()),
        HttpVoucherValidator::new(client.clone(), config.validation_url.clone()),
        HttpEntrySink::new(client, config.entry_url.clone()),
    ))
}
