//! Clinical record models: diagnoses, prescriptions and lab analyses.

use serde::{Deserialize, Serialize};

/// A disease that can be referenced by a diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Disease {
    pub disease_id: i64,
    pub name: String,
}

/// A diagnosis made for a patient, referencing one or more diseases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnosis {
    /// Unique diagnosis ID
    pub diagnosis_id: String,
    /// Patient ID
    pub patient_id: String,
    /// Diagnosed diseases
    pub diseases: Vec<Disease>,
    /// Clinician's note
    pub note: String,
    /// Creation timestamp
    pub created_at: String,
}

impl Diagnosis {
    /// Create a new diagnosis.
    pub fn new(patient_id: String, diseases: Vec<Disease>, note: String) -> Self {
        Self {
            diagnosis_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            diseases,
            note,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Disease names joined for display.
    pub fn details(&self) -> String {
        self.diseases
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One prescribed medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionItem {
    /// Medicine reference
    pub medicine_id: i64,
    /// Medicine name at time of prescription
    pub medicine_name: String,
    /// Unit price at time of prescription
    pub unit_price: i64,
    /// Number of units
    pub quantity: u32,
    /// Dosage instructions
    pub dosage: Option<String>,
}

impl PrescriptionItem {
    /// quantity * unit price, `None` on overflow.
    pub fn subtotal(&self) -> Option<i64> {
        i64::from(self.quantity).checked_mul(self.unit_price)
    }

    /// e.g. `Neem Oil x 2 (apply twice daily)`.
    pub fn describe(&self) -> String {
        match self.dosage.as_deref().filter(|d| !d.is_empty()) {
            Some(dosage) => format!("{} x {} ({})", self.medicine_name, self.quantity, dosage),
            None => format!("{} x {}", self.medicine_name, self.quantity),
        }
    }
}

/// A prescription issued to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Unique prescription ID
    pub prescription_id: String,
    /// Patient ID
    pub patient_id: String,
    /// Prescribed medicines
    pub items: Vec<PrescriptionItem>,
    /// Doctor's note
    pub note: String,
    /// Creation timestamp
    pub created_at: String,
}

impl Prescription {
    /// Create a new prescription.
    pub fn new(patient_id: String, items: Vec<PrescriptionItem>, note: String) -> Self {
        Self {
            prescription_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            items,
            note,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Item descriptions joined for display.
    pub fn details(&self) -> String {
        self.items
            .iter()
            .map(PrescriptionItem::describe)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Sum of item subtotals, `None` on overflow.
    pub fn total(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.subtotal()?))
    }
}

/// A single lab test result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabAnalysis {
    pub analysis_id: String,
    pub patient_id: String,
    pub test_name: String,
    pub result: String,
    pub created_at: String,
}

impl LabAnalysis {
    /// Create a new lab analysis.
    pub fn new(patient_id: String, test_name: String, result: String) -> Self {
        Self {
            analysis_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            test_name,
            result,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: i64, quantity: u32, dosage: Option<&str>) -> PrescriptionItem {
        PrescriptionItem {
            medicine_id: 1,
            medicine_name: name.into(),
            unit_price: price,
            quantity,
            dosage: dosage.map(Into::into),
        }
    }

    #[test]
    fn test_diagnosis_details() {
        let diagnosis = Diagnosis::new(
            "p1".into(),
            vec![
                Disease { disease_id: 1, name: "Malaria".into() },
                Disease { disease_id: 2, name: "Typhoid".into() },
            ],
            "Follow up in a week".into(),
        );
        assert_eq!(diagnosis.details(), "Malaria, Typhoid");
    }

    #[test]
    fn test_prescription_details_and_total() {
        let prescription = Prescription::new(
            "p1".into(),
            vec![
                item("Neem Oil", 3_000, 2, Some("apply twice daily")),
                item("Moringa Capsules", 2_500, 1, None),
            ],
            "Drink plenty of water".into(),
        );
        assert_eq!(
            prescription.details(),
            "Neem Oil x 2 (apply twice daily); Moringa Capsules x 1"
        );
        assert_eq!(prescription.total(), Some(8_500));
    }

    #[test]
    fn test_empty_dosage_is_omitted() {
        assert_eq!(item("Aloe Gel", 100, 3, Some("")).describe(), "Aloe Gel x 3");
    }

    #[test]
    fn test_overflowing_amounts_are_none() {
        assert_eq!(item("Gold Leaf", i64::MAX / 2, 3, None).subtotal(), None);

        let prescription = Prescription::new(
            "p1".into(),
            vec![
                item("Gold Leaf", i64::MAX / 2, 1, None),
                item("Gold Leaf", i64::MAX / 2, 1, None),
                item("Neem Oil", 3_000, 1, None),
            ],
            String::new(),
        );
        assert_eq!(prescription.total(), None);
    }
}
