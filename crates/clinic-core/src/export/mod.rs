//! Document export: receipt layout and PDF rendering.

mod layout;
mod pdf;
mod receipt;

pub use layout::*;
pub use pdf::*;
pub use receipt::*;

use thiserror::Error;

use crate::db::DbError;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Unknown receipt kind: {0}")]
    UnknownKind(String),

    #[error("PDF error: {0}")]
    Pdf(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
