use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("No identification number supplied")]
    EmptyIdentification,

    #[error("No voucher detected in scan")]
    EmptyScan,

    // Capture errors
    #[error("Scanner disconnected: {0}")]
    ScannerDisconnected(String),

    // Session errors
    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    // Remote service errors
    #[error("Person lookup failed: {0}")]
    Lookup(String),

    #[error("Voucher validation failed: {0}")]
    ValidationTransport(String),

    #[error("Entry submission failed: {0}")]
    Submission(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
