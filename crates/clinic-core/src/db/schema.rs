//! SQLite schema definition.

/// Complete database schema for the clinic records store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Clinics
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinics (
    clinic_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    website TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,
    clinic_id INTEGER REFERENCES clinics(clinic_id),
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age >= 0),
    gender TEXT NOT NULL,
    phone_number TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_clinic ON patients(clinic_id);
CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(last_name, first_name);

-- ============================================================================
-- Medicines & Inventory
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    medicine_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price INTEGER NOT NULL DEFAULT 0 CHECK (price >= 0),
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(name);

CREATE TABLE IF NOT EXISTS inventory (
    inventory_id INTEGER PRIMARY KEY AUTOINCREMENT,
    clinic_id INTEGER NOT NULL REFERENCES clinics(clinic_id),
    medicine_id INTEGER NOT NULL REFERENCES medicines(medicine_id),
    quantity INTEGER NOT NULL DEFAULT 0,
    UNIQUE (clinic_id, medicine_id)
);

-- Append-only stock log
CREATE TABLE IF NOT EXISTS inventory_history (
    history_id INTEGER PRIMARY KEY AUTOINCREMENT,
    inventory_id INTEGER NOT NULL REFERENCES inventory(inventory_id),
    stock_added INTEGER NOT NULL CHECK (stock_added > 0),
    date_updated TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_inventory ON inventory_history(inventory_id);

CREATE TRIGGER IF NOT EXISTS inventory_history_no_update BEFORE UPDATE ON inventory_history
BEGIN
    SELECT RAISE(ABORT, 'Inventory history is append-only');
END;

CREATE TRIGGER IF NOT EXISTS inventory_history_no_delete BEFORE DELETE ON inventory_history
BEGIN
    SELECT RAISE(ABORT, 'Inventory history is append-only');
END;

-- ============================================================================
-- Clinical Records
-- ============================================================================

CREATE TABLE IF NOT EXISTS diseases (
    disease_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS diagnoses (
    diagnosis_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id),
    note TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS diagnosis_diseases (
    diagnosis_id TEXT NOT NULL REFERENCES diagnoses(diagnosis_id),
    disease_id INTEGER NOT NULL REFERENCES diseases(disease_id),
    position INTEGER NOT NULL,
    PRIMARY KEY (diagnosis_id, disease_id)
);

CREATE INDEX IF NOT EXISTS idx_diagnoses_patient ON diagnoses(patient_id, created_at);

CREATE TABLE IF NOT EXISTS prescriptions (
    prescription_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id),
    note TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- unit_price is captured when prescribed so receipts stay stable across price changes
CREATE TABLE IF NOT EXISTS prescription_details (
    prescription_id TEXT NOT NULL REFERENCES prescriptions(prescription_id),
    position INTEGER NOT NULL,
    medicine_id INTEGER NOT NULL REFERENCES medicines(medicine_id),
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    unit_price INTEGER NOT NULL,
    dosage TEXT,
    PRIMARY KEY (prescription_id, position)
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_patient ON prescriptions(patient_id, created_at);

CREATE TABLE IF NOT EXISTS lab_analyses (
    analysis_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(patient_id),
    test_name TEXT NOT NULL,
    result TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_lab_patient ON lab_analyses(patient_id, created_at);
"#;
