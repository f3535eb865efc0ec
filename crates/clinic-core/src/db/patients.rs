//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str = "patient_id, clinic_id, first_name, last_name, age, gender, \
                               phone_number, created_at, updated_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        patient_id: row.get(0)?,
        clinic_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        age: row.get(4)?,
        gender: row.get(5)?,
        phone_number: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                patient_id, clinic_id, first_name, last_name, age, gender,
                phone_number, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                patient.patient_id,
                patient.clinic_id,
                patient.first_name,
                patient.last_name,
                patient.age,
                patient.gender,
                patient.phone_number,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                clinic_id = ?2,
                first_name = ?3,
                last_name = ?4,
                age = ?5,
                gender = ?6,
                phone_number = ?7,
                updated_at = ?8
            WHERE patient_id = ?1
            "#,
            params![
                patient.patient_id,
                patient.clinic_id,
                patient.first_name,
                patient.last_name,
                patient.age,
                patient.gender,
                patient.phone_number,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ?"),
                [patient_id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients by first or last name (prefix match).
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", query);
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE first_name LIKE ?1 OR last_name LIKE ?1
            ORDER BY last_name, first_name
            LIMIT ?2
            "#
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List all patients registered at a clinic.
    pub fn list_patients(&self, clinic_id: i64) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE clinic_id = ?
            ORDER BY last_name, first_name
            "#
        ))?;

        let rows = stmt.query_map([clinic_id], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
