//! Clinic database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::Clinic;

impl Database {
    /// Insert a clinic, returning it with its assigned ID.
    pub fn insert_clinic(
        &self,
        name: &str,
        address: &str,
        phone: &str,
        website: Option<&str>,
    ) -> DbResult<Clinic> {
        self.conn.execute(
            "INSERT INTO clinics (name, address, phone, website) VALUES (?1, ?2, ?3, ?4)",
            params![name, address, phone, website],
        )?;
        Ok(Clinic {
            clinic_id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
            website: website.map(str::to_string),
        })
    }

    /// Get a clinic by ID.
    pub fn get_clinic(&self, clinic_id: i64) -> DbResult<Option<Clinic>> {
        self.conn
            .query_row(
                "SELECT clinic_id, name, address, phone, website FROM clinics WHERE clinic_id = ?",
                [clinic_id],
                |row| {
                    Ok(Clinic {
                        clinic_id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        phone: row.get(3)?,
                        website: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();
        let clinic = db
            .insert_clinic(
                "Terra Natural Herbs",
                "P.O.BOX 222, Arusha, Arusha",
                "(123) 456-7890",
                Some("www.terranaturalherbs.co.tz"),
            )
            .unwrap();

        let retrieved = db.get_clinic(clinic.clinic_id).unwrap().unwrap();
        assert_eq!(retrieved, clinic);
        assert!(db.get_clinic(clinic.clinic_id + 1).unwrap().is_none());
    }
}
