//! Unified application error type.
//! Every layer (backend, session, core screens, export, cli) returns AppError
//! so that the CLI can surface any failure the same way.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Backend
    // ---------------------------
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error returned by the backend, shown verbatim.
    #[error("{message}")]
    Backend { message: String },

    // ---------------------------
    // Validation (raised before any request)
    // ---------------------------
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Missing resources
    // ---------------------------
    #[error("{0} location not found")]
    LocationNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Export preconditions
    // ---------------------------
    #[error("No data: there are no sessions to export yet.")]
    NoData,

    #[error("Missing QR: no token yet. Try rotating once.")]
    MissingQr,

    #[error("QR encoding error: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Session
    // ---------------------------
    #[error("Not signed in. Run `gymdesk login` first.")]
    NotSignedIn,

    #[error("Session error: {0}")]
    Session(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Lifetime
    // ---------------------------
    #[error("Operation cancelled")]
    Cancelled,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        AppError::Backend {
            message: msg.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
