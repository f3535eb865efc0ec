//! Clinic Core Library
//!
//! Clinic records store with inventory tracking and PDF receipt export.
//!
//! # Architecture
//!
//! ```text
//!   Registration ──► Patients ◄── Diagnoses / Prescriptions / Lab analyses
//!                        │
//!                        ▼
//!               AppointmentRecord (patient + latest visit records)
//!                        │
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//!   Layout (pure: sections,      Fingerprint (SHA-256
//!   wrapping, pagination)         of canonical JSON)
//!          │                           │
//!          ▼                           │
//!   PDF painter (printpdf) ────────────┴──► ReceiptDocument
//!                                            (filename, bytes)
//!
//!   Medicines ──► Inventory ──► InventoryHistory (append-only)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Patient, Medicine, Inventory, Diagnosis, etc.)
//! - [`export`]: Receipt layout and PDF rendering

pub mod db;
pub mod export;
pub mod models;

// Re-export commonly used types
pub use db::Database;
pub use export::{ClinicHeader, ReceiptDocument, ReceiptExporter, ReceiptKind};
pub use models::{
    AppointmentRecord, Clinic, Diagnosis, Disease, Inventory, InventoryHistory, InventoryLine,
    LabAnalysis, Medicine, Patient, Prescription, PrescriptionItem,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Export error: {0}")]
    ExportError(String),
}

impl From<db::DbError> for ClinicError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => ClinicError::NotFound(what),
            db::DbError::Constraint(msg) => ClinicError::InvalidInput(msg),
            other => ClinicError::DatabaseError(other.to_string()),
        }
    }
}

impl From<export::ExportError> for ClinicError {
    fn from(e: export::ExportError) -> Self {
        match e {
            export::ExportError::Database(db) => db.into(),
            export::ExportError::InvalidRecord(msg) | export::ExportError::UnknownKind(msg) => {
                ClinicError::InvalidInput(msg)
            }
            other => ClinicError::ExportError(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(ClinicCore::from_database(db)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ClinicCore>, ClinicError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ClinicCore::from_database(db)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
}

impl ClinicCore {
    /// Wrap an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Clinic & Patient Operations
    // =========================================================================

    /// Register a clinic.
    pub fn create_clinic(
        &self,
        name: String,
        address: String,
        phone: String,
        website: Option<String>,
    ) -> Result<FfiClinic, ClinicError> {
        let db = self.db.lock()?;
        let clinic = db.insert_clinic(&name, &address, &phone, website.as_deref())?;
        Ok(clinic.into())
    }

    /// Register a new patient.
    pub fn create_patient(
        &self,
        first_name: String,
        last_name: String,
        age: u32,
        gender: String,
        phone_number: String,
        clinic_id: Option<i64>,
    ) -> Result<FfiPatient, ClinicError> {
        let db = self.db.lock()?;
        let mut patient = Patient::new(first_name, last_name, age, gender, phone_number);
        patient.clinic_id = clinic_id;
        db.insert_patient(&patient)?;
        Ok(patient.into())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: String) -> Result<Option<FfiPatient>, ClinicError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Search patients by first or last name.
    pub fn search_patients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, ClinicError> {
        let db = self.db.lock()?;
        let patients = db.search_patients(&query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Medicine & Inventory Operations
    // =========================================================================

    /// Add a medicine to the catalogue.
    pub fn add_medicine(&self, name: String, price: i64) -> Result<FfiMedicine, ClinicError> {
        let db = self.db.lock()?;
        let medicine = db.insert_medicine(&name, price)?;
        Ok(medicine.into())
    }

    /// List all medicines.
    pub fn list_medicines(&self) -> Result<Vec<FfiMedicine>, ClinicError> {
        let db = self.db.lock()?;
        let medicines = db.list_medicines()?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Add stock of a medicine at a clinic, creating the inventory row if needed.
    pub fn add_stock(
        &self,
        clinic_id: i64,
        medicine_id: i64,
        amount: i64,
    ) -> Result<FfiInventoryHistory, ClinicError> {
        // Checked before ensure_inventory, which commits on its own
        if amount <= 0 {
            return Err(ClinicError::InvalidInput(format!(
                "Stock additions must be positive, got {amount}"
            )));
        }
        let db = self.db.lock()?;
        let inventory = db.ensure_inventory(clinic_id, medicine_id)?;
        let entry = db.add_stock(inventory.inventory_id, amount)?;
        Ok(entry.into())
    }

    /// Current stock for a clinic.
    pub fn list_inventory(&self, clinic_id: i64) -> Result<Vec<FfiInventoryLine>, ClinicError> {
        let db = self.db.lock()?;
        let lines = db.list_inventory(clinic_id)?;
        Ok(lines.into_iter().map(|l| l.into()).collect())
    }

    /// Stock additions for an inventory item, oldest first.
    pub fn inventory_history(
        &self,
        inventory_id: i64,
    ) -> Result<Vec<FfiInventoryHistory>, ClinicError> {
        let db = self.db.lock()?;
        let history = db.inventory_history(inventory_id)?;
        Ok(history.into_iter().map(|h| h.into()).collect())
    }

    // =========================================================================
    // Clinical Record Operations
    // =========================================================================

    /// Record a diagnosis; diseases are created on first use. Returns the diagnosis ID.
    pub fn record_diagnosis(
        &self,
        patient_id: String,
        disease_names: Vec<String>,
        note: String,
    ) -> Result<String, ClinicError> {
        let db = self.db.lock()?;
        let diseases = disease_names
            .iter()
            .map(|name| db.insert_disease(name))
            .collect::<Result<Vec<_>, _>>()?;
        let diagnosis = Diagnosis::new(patient_id, diseases, note);
        db.insert_diagnosis(&diagnosis)?;
        Ok(diagnosis.diagnosis_id)
    }

    /// Record a prescription at current medicine prices. Returns the prescription ID.
    pub fn record_prescription(
        &self,
        patient_id: String,
        lines: Vec<FfiPrescriptionLine>,
        note: String,
    ) -> Result<String, ClinicError> {
        let db = self.db.lock()?;
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let medicine = db
                .get_medicine(line.medicine_id)?
                .ok_or_else(|| ClinicError::NotFound(format!("medicine {}", line.medicine_id)))?;
            items.push(PrescriptionItem {
                medicine_id: medicine.medicine_id,
                medicine_name: medicine.name,
                unit_price: medicine.price,
                quantity: line.quantity,
                dosage: line.dosage,
            });
        }
        let prescription = Prescription::new(patient_id, items, note);
        db.insert_prescription(&prescription)?;
        Ok(prescription.prescription_id)
    }

    /// Record a lab result. Returns the analysis ID.
    pub fn record_lab_analysis(
        &self,
        patient_id: String,
        test_name: String,
        result: String,
    ) -> Result<String, ClinicError> {
        let db = self.db.lock()?;
        let analysis = LabAnalysis::new(patient_id, test_name, result);
        db.insert_lab_analysis(&analysis)?;
        Ok(analysis.analysis_id)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Render a patient's latest visit as a PDF.
    ///
    /// The header uses the given clinic's details, or the built-in header when `clinic_id` is `None`.
    pub fn export_receipt(
        &self,
        patient_id: String,
        kind: FfiReceiptKind,
        clinic_id: Option<i64>,
    ) -> Result<FfiReceiptDocument, ClinicError> {
        let db = self.db.lock()?;
        let header = match clinic_id {
            Some(id) => db
                .get_clinic(id)?
                .map(|c| ClinicHeader::from(&c))
                .ok_or_else(|| ClinicError::NotFound(format!("clinic {id}")))?,
            None => ClinicHeader::default(),
        };
        let exporter = ReceiptExporter::new(header);
        let document = exporter.export_patient(&db, &patient_id, kind.into())?;
        Ok(document.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe clinic.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinic {
    pub clinic_id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: Option<String>,
}

impl From<Clinic> for FfiClinic {
    fn from(clinic: Clinic) -> Self {
        Self {
            clinic_id: clinic.clinic_id,
            name: clinic.name,
            address: clinic.address,
            phone: clinic.phone,
            website: clinic.website,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub clinic_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: String,
    pub phone_number: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            patient_id: patient.patient_id,
            clinic_id: patient.clinic_id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            age: patient.age,
            gender: patient.gender,
            phone_number: patient.phone_number,
        }
    }
}

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub medicine_id: i64,
    pub name: String,
    pub price: i64,
}

impl From<Medicine> for FfiMedicine {
    fn from(medicine: Medicine) -> Self {
        Self {
            medicine_id: medicine.medicine_id,
            name: medicine.name,
            price: medicine.price,
        }
    }
}

/// FFI-safe inventory listing row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInventoryLine {
    pub inventory_id: i64,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub unit_price: i64,
    pub quantity: i64,
}

impl From<InventoryLine> for FfiInventoryLine {
    fn from(line: InventoryLine) -> Self {
        Self {
            inventory_id: line.inventory_id,
            medicine_id: line.medicine_id,
            medicine_name: line.medicine_name,
            unit_price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

/// FFI-safe stock addition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInventoryHistory {
    pub history_id: i64,
    pub inventory_id: i64,
    pub stock_added: i64,
    pub date_updated: String,
}

impl From<InventoryHistory> for FfiInventoryHistory {
    fn from(entry: InventoryHistory) -> Self {
        Self {
            history_id: entry.history_id,
            inventory_id: entry.inventory_id,
            stock_added: entry.stock_added,
            date_updated: entry.date_updated,
        }
    }
}

/// FFI-safe prescription line (price is taken from the catalogue).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionLine {
    pub medicine_id: i64,
    pub quantity: u32,
    pub dosage: Option<String>,
}

/// FFI-safe receipt kind.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiReceiptKind {
    PaymentReceipt,
    Appointment,
    LabReport,
}

impl From<FfiReceiptKind> for ReceiptKind {
    fn from(kind: FfiReceiptKind) -> Self {
        match kind {
            FfiReceiptKind::PaymentReceipt => ReceiptKind::PaymentReceipt,
            FfiReceiptKind::Appointment => ReceiptKind::Appointment,
            FfiReceiptKind::LabReport => ReceiptKind::LabReport,
        }
    }
}

/// FFI-safe rendered document.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReceiptDocument {
    pub filename: String,
    pub content_type: String,
    pub fingerprint: String,
    pub page_count: u32,
    pub bytes: Vec<u8>,
}

impl From<ReceiptDocument> for FfiReceiptDocument {
    fn from(doc: ReceiptDocument) -> Self {
        Self {
            filename: doc.filename,
            content_type: doc.content_type.to_string(),
            fingerprint: doc.fingerprint,
            page_count: doc.page_count as u32,
            bytes: doc.bytes,
        }
    }
}
