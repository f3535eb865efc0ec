//! Assembling appointment records for export.

use super::{Database, DbError, DbResult};
use crate::models::AppointmentRecord;

impl Database {
    /// Load a patient with their latest diagnosis, latest prescription and all lab analyses.
    pub fn load_appointment_record(&self, patient_id: &str) -> DbResult<AppointmentRecord> {
        let patient = self
            .get_patient(patient_id)?
            .ok_or_else(|| DbError::NotFound(format!("patient {patient_id}")))?;

        Ok(AppointmentRecord {
            diagnosis: self.latest_diagnosis(patient_id)?,
            prescription: self.latest_prescription(patient_id)?,
            lab_analyses: self.list_lab_analyses(patient_id)?,
            patient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LabAnalysis, Patient};

    #[test]
    fn test_unknown_patient_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.load_appointment_record("nobody"),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_patient_without_records() {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Amina".into(), "Mushi".into(), 34, "female".into(), "0700".into());
        db.insert_patient(&patient).unwrap();

        let record = db.load_appointment_record(&patient.patient_id).unwrap();
        assert_eq!(record, AppointmentRecord::for_patient(patient));
        assert_eq!(record.total_charges(), Some(0));
    }

    #[test]
    fn test_record_includes_lab_analyses() {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Amina".into(), "Mushi".into(), 34, "female".into(), "0700".into());
        db.insert_patient(&patient).unwrap();
        db.insert_lab_analysis(&LabAnalysis::new(
            patient.patient_id.clone(),
            "CBC".into(),
            "Normal".into(),
        ))
        .unwrap();

        let record = db.load_appointment_record(&patient.patient_id).unwrap();
        assert_eq!(record.lab_analyses.len(), 1);
        assert!(record.diagnosis.is_none());
    }
}
