//! Appointment record: everything a receipt is rendered from.

use serde::{Deserialize, Serialize};

use super::{Diagnosis, LabAnalysis, Patient, Prescription};

/// A patient together with the clinical records of one visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    pub patient: Patient,
    pub diagnosis: Option<Diagnosis>,
    pub prescription: Option<Prescription>,
    pub lab_analyses: Vec<LabAnalysis>,
}

impl AppointmentRecord {
    /// Record with no clinical entries yet.
    pub fn for_patient(patient: Patient) -> Self {
        Self {
            patient,
            diagnosis: None,
            prescription: None,
            lab_analyses: Vec::new(),
        }
    }

    /// Amount charged for the visit (prescribed medicines), `None` on overflow.
    pub fn total_charges(&self) -> Option<i64> {
        self.prescription.as_ref().map_or(Some(0), Prescription::total)
    }
}
