//! Shared handler state.

use std::sync::{Arc, Mutex, MutexGuard};

use clinic_core::{Database, ReceiptExporter};

use crate::error::ApiError;

/// The single SQLite connection plus the receipt exporter, shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    pub exporter: Arc<ReceiptExporter>,
}

impl AppState {
    pub fn new(db: Database, exporter: ReceiptExporter) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            exporter: Arc::new(exporter),
        }
    }

    /// Lock the database. Never hold the guard across an `.await`.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }
}
