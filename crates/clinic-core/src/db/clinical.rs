//! Clinical record database operations (diseases, diagnoses, prescriptions, lab analyses).

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{Diagnosis, Disease, LabAnalysis, Prescription, PrescriptionItem};

impl Database {
    // =========================================================================
    // Diseases
    // =========================================================================

    /// Insert a disease (or return the existing one with the same name).
    pub fn insert_disease(&self, name: &str) -> DbResult<Disease> {
        self.conn.execute(
            "INSERT INTO diseases (name) VALUES (?) ON CONFLICT(name) DO NOTHING",
            [name],
        )?;
        self.conn
            .query_row(
                "SELECT disease_id, name FROM diseases WHERE name = ?",
                [name],
                |row| {
                    Ok(Disease {
                        disease_id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .map_err(Into::into)
    }

    /// List all diseases by name.
    pub fn list_diseases(&self) -> DbResult<Vec<Disease>> {
        let mut stmt = self
            .conn
            .prepare("SELECT disease_id, name FROM diseases ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Disease {
                disease_id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // =========================================================================
    // Diagnoses
    // =========================================================================

    /// Insert a diagnosis and its disease references.
    pub fn insert_diagnosis(&self, diagnosis: &Diagnosis) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO diagnoses (diagnosis_id, patient_id, note, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                diagnosis.diagnosis_id,
                diagnosis.patient_id,
                diagnosis.note,
                diagnosis.created_at,
            ],
        )?;
        for (position, disease) in diagnosis.diseases.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO diagnosis_diseases (diagnosis_id, disease_id, position)
                VALUES (?1, ?2, ?3)
                "#,
                params![diagnosis.diagnosis_id, disease.disease_id, position as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Most recent diagnosis for a patient.
    pub fn latest_diagnosis(&self, patient_id: &str) -> DbResult<Option<Diagnosis>> {
        let header = self
            .conn
            .query_row(
                r#"
                SELECT diagnosis_id, patient_id, note, created_at
                FROM diagnoses
                WHERE patient_id = ?
                ORDER BY created_at DESC, rowid DESC
                LIMIT 1
                "#,
                [patient_id],
                diagnosis_header,
            )
            .optional()?;

        header.map(|d| self.with_diseases(d)).transpose()
    }

    /// All diagnoses for a patient, oldest first.
    pub fn list_diagnoses(&self, patient_id: &str) -> DbResult<Vec<Diagnosis>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT diagnosis_id, patient_id, note, created_at
            FROM diagnoses
            WHERE patient_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;
        let headers = stmt
            .query_map([patient_id], diagnosis_header)?
            .collect::<Result<Vec<_>, _>>()?;

        headers.into_iter().map(|d| self.with_diseases(d)).collect()
    }

    fn with_diseases(&self, mut diagnosis: Diagnosis) -> DbResult<Diagnosis> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.disease_id, d.name
            FROM diagnosis_diseases dd
            JOIN diseases d ON d.disease_id = dd.disease_id
            WHERE dd.diagnosis_id = ?
            ORDER BY dd.position
            "#,
        )?;
        diagnosis.diseases = stmt
            .query_map([&diagnosis.diagnosis_id], |row| {
                Ok(Disease {
                    disease_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(diagnosis)
    }

    // =========================================================================
    // Prescriptions
    // =========================================================================

    /// Insert a prescription and its detail rows.
    pub fn insert_prescription(&self, prescription: &Prescription) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO prescriptions (prescription_id, patient_id, note, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                prescription.prescription_id,
                prescription.patient_id,
                prescription.note,
                prescription.created_at,
            ],
        )?;
        for (position, item) in prescription.items.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO prescription_details (
                    prescription_id, position, medicine_id, quantity, unit_price, dosage
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    prescription.prescription_id,
                    position as i64,
                    item.medicine_id,
                    item.quantity,
                    item.unit_price,
                    item.dosage,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Most recent prescription for a patient.
    pub fn latest_prescription(&self, patient_id: &str) -> DbResult<Option<Prescription>> {
        let header = self
            .conn
            .query_row(
                r#"
                SELECT prescription_id, patient_id, note, created_at
                FROM prescriptions
                WHERE patient_id = ?
                ORDER BY created_at DESC, rowid DESC
                LIMIT 1
                "#,
                [patient_id],
                prescription_header,
            )
            .optional()?;

        header.map(|p| self.with_items(p)).transpose()
    }

    /// All prescriptions for a patient, oldest first.
    pub fn list_prescriptions(&self, patient_id: &str) -> DbResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT prescription_id, patient_id, note, created_at
            FROM prescriptions
            WHERE patient_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;
        let headers = stmt
            .query_map([patient_id], prescription_header)?
            .collect::<Result<Vec<_>, _>>()?;

        headers.into_iter().map(|p| self.with_items(p)).collect()
    }

    fn with_items(&self, mut prescription: Prescription) -> DbResult<Prescription> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT pd.medicine_id, m.name, pd.unit_price, pd.quantity, pd.dosage
            FROM prescription_details pd
            JOIN medicines m ON m.medicine_id = pd.medicine_id
            WHERE pd.prescription_id = ?
            ORDER BY pd.position
            "#,
        )?;
        prescription.items = stmt
            .query_map([&prescription.prescription_id], |row| {
                Ok(PrescriptionItem {
                    medicine_id: row.get(0)?,
                    medicine_name: row.get(1)?,
                    unit_price: row.get(2)?,
                    quantity: row.get(3)?,
                    dosage: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prescription)
    }

    // =========================================================================
    // Lab Analyses
    // =========================================================================

    /// Insert a lab analysis.
    pub fn insert_lab_analysis(&self, analysis: &LabAnalysis) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO lab_analyses (analysis_id, patient_id, test_name, result, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                analysis.analysis_id,
                analysis.patient_id,
                analysis.test_name,
                analysis.result,
                analysis.created_at,
            ],
        )?;
        Ok(())
    }

    /// All lab analyses for a patient, oldest first.
    pub fn list_lab_analyses(&self, patient_id: &str) -> DbResult<Vec<LabAnalysis>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT analysis_id, patient_id, test_name, result, created_at
            FROM lab_analyses
            WHERE patient_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;
        let rows = stmt.query_map([patient_id], |row| {
            Ok(LabAnalysis {
                analysis_id: row.get(0)?,
                patient_id: row.get(1)?,
                test_name: row.get(2)?,
                result: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn diagnosis_header(row: &rusqlite::Row<'_>) -> rusqlite::Result<Diagnosis> {
    Ok(Diagnosis {
        diagnosis_id: row.get(0)?,
        patient_id: row.get(1)?,
        diseases: Vec::new(),
        note: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn prescription_header(row: &rusqlite::Row<'_>) -> rusqlite::Result<Prescription> {
    Ok(Prescription {
        prescription_id: row.get(0)?,
        patient_id: row.get(1)?,
        items: Vec::new(),
        note: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::models::Patient;

    fn setup() -> (Database, Patient) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Amina".into(), "Mushi".into(), 34, "female".into(), "0700".into());
        db.insert_patient(&patient).unwrap();
        (db, patient)
    }

    #[test]
    fn test_insert_disease_deduplicates() {
        let (db, _) = setup();
        let first = db.insert_disease("Malaria").unwrap();
        let second = db.insert_disease("Malaria").unwrap();
        assert_eq!(first, second);
        assert_eq!(db.list_diseases().unwrap().len(), 1);
    }

    #[test]
    fn test_diagnosis_roundtrip_keeps_disease_order() {
        let (db, patient) = setup();
        let typhoid = db.insert_disease("Typhoid").unwrap();
        let malaria = db.insert_disease("Malaria").unwrap();

        let diagnosis = Diagnosis::new(
            patient.patient_id.clone(),
            vec![typhoid, malaria],
            "Rest and fluids".into(),
        );
        db.insert_diagnosis(&diagnosis).unwrap();

        let latest = db.latest_diagnosis(&patient.patient_id).unwrap().unwrap();
        assert_eq!(latest, diagnosis);
        assert_eq!(latest.details(), "Typhoid, Malaria");
    }

    #[test]
    fn test_latest_diagnosis_picks_newest() {
        let (db, patient) = setup();
        let malaria = db.insert_disease("Malaria").unwrap();

        let mut older = Diagnosis::new(patient.patient_id.clone(), vec![malaria.clone()], "old".into());
        older.created_at = "2024-01-01T00:00:00+00:00".into();
        let mut newer = Diagnosis::new(patient.patient_id.clone(), vec![malaria], "new".into());
        newer.created_at = "2024-02-01T00:00:00+00:00".into();

        db.insert_diagnosis(&newer).unwrap();
        db.insert_diagnosis(&older).unwrap();

        assert_eq!(db.latest_diagnosis(&patient.patient_id).unwrap().unwrap().note, "new");
        let all = db.list_diagnoses(&patient.patient_id).unwrap();
        assert_eq!(all.iter().map(|d| d.note.as_str()).collect::<Vec<_>>(), vec!["old", "new"]);
    }

    #[test]
    fn test_diagnosis_with_unknown_disease_rolls_back() {
        let (db, patient) = setup();
        let ghost = Disease { disease_id: 999, name: "Ghost".into() };
        let diagnosis = Diagnosis::new(patient.patient_id.clone(), vec![ghost], "x".into());

        assert!(matches!(db.insert_diagnosis(&diagnosis), Err(DbError::Sqlite(_))));
        assert!(db.latest_diagnosis(&patient.patient_id).unwrap().is_none());
    }

    #[test]
    fn test_prescription_roundtrip() {
        let (db, patient) = setup();
        let neem = db.insert_medicine("Neem Oil", 3_000).unwrap();
        let moringa = db.insert_medicine("Moringa Capsules", 2_500).unwrap();

        let prescription = Prescription::new(
            patient.patient_id.clone(),
            vec![
                PrescriptionItem {
                    medicine_id: neem.medicine_id,
                    medicine_name: neem.name.clone(),
                    unit_price: neem.price,
                    quantity: 2,
                    dosage: Some("apply twice daily".into()),
                },
                PrescriptionItem {
                    medicine_id: moringa.medicine_id,
                    medicine_name: moringa.name.clone(),
                    unit_price: moringa.price,
                    quantity: 1,
                    dosage: None,
                },
            ],
            "Drink plenty of water".into(),
        );
        db.insert_prescription(&prescription).unwrap();

        let latest = db.latest_prescription(&patient.patient_id).unwrap().unwrap();
        assert_eq!(latest, prescription);
        assert_eq!(db.list_prescriptions(&patient.patient_id).unwrap().len(), 1);
    }

    #[test]
    fn test_prescription_keeps_issued_price() {
        let (db, patient) = setup();
        let neem = db.insert_medicine("Neem Oil", 3_000).unwrap();
        let prescription = Prescription::new(
            patient.patient_id.clone(),
            vec![PrescriptionItem {
                medicine_id: neem.medicine_id,
                medicine_name: neem.name.clone(),
                unit_price: neem.price,
                quantity: 1,
                dosage: None,
            }],
            String::new(),
        );
        db.insert_prescription(&prescription).unwrap();
        db.update_medicine_price(neem.medicine_id, 9_000).unwrap();

        let latest = db.latest_prescription(&patient.patient_id).unwrap().unwrap();
        assert_eq!(latest.total(), Some(3_000));
    }

    #[test]
    fn test_lab_analyses() {
        let (db, patient) = setup();
        assert!(db.list_lab_analyses(&patient.patient_id).unwrap().is_empty());

        let cbc = LabAnalysis::new(patient.patient_id.clone(), "CBC".into(), "Normal".into());
        let mrdt = LabAnalysis::new(patient.patient_id.clone(), "mRDT".into(), "Positive".into());
        db.insert_lab_analysis(&cbc).unwrap();
        db.insert_lab_analysis(&mrdt).unwrap();

        let all = db.list_lab_analyses(&patient.patient_id).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&cbc));
        assert!(all.contains(&mrdt));
    }
}
