//! Patient models.

use serde::{Deserialize, Serialize};

/// A patient registered at a clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID, generated locally
    pub patient_id: String,
    /// Owning clinic (if assigned)
    pub clinic_id: Option<i64>,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Age in years
    pub age: u32,
    /// Gender as entered at registration (e.g. "female")
    pub gender: String,
    /// Primary phone number
    pub phone_number: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(
        first_name: String,
        last_name: String,
        age: u32,
        gender: String,
        phone_number: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            patient_id: uuid::Uuid::new_v4().to_string(),
            clinic_id: None,
            first_name,
            last_name,
            age,
            gender,
            phone_number,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Gender with the first letter upper-cased and the rest lower-cased.
    pub fn display_gender(&self) -> String {
        let mut chars = self.gender.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}
