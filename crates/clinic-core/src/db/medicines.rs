//! Medicine database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::Medicine;

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        medicine_id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl Database {
    /// Insert a medicine, returning it with its assigned ID.
    pub fn insert_medicine(&self, name: &str, price: i64) -> DbResult<Medicine> {
        if price < 0 {
            return Err(DbError::Constraint(format!(
                "Medicine price must not be negative: {price}"
            )));
        }
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO medicines (name, price, created_at) VALUES (?1, ?2, ?3)",
            params![name, price, created_at],
        )?;
        Ok(Medicine {
            medicine_id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            price,
            created_at,
        })
    }

    /// Get a medicine by ID.
    pub fn get_medicine(&self, medicine_id: i64) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                "SELECT medicine_id, name, price, created_at FROM medicines WHERE medicine_id = ?",
                [medicine_id],
                medicine_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find a medicine by exact name (case-insensitive).
    pub fn find_medicine_by_name(&self, name: &str) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                r#"
                SELECT medicine_id, name, price, created_at
                FROM medicines
                WHERE name = ? COLLATE NOCASE
                ORDER BY medicine_id
                LIMIT 1
                "#,
                [name],
                medicine_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all medicines by name.
    pub fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(
            "SELECT medicine_id, name, price, created_at FROM medicines ORDER BY name",
        )?;
        let rows = stmt.query_map([], medicine_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Change a medicine's price. Existing prescriptions keep the price they were issued at.
    pub fn update_medicine_price(&self, medicine_id: i64, price: i64) -> DbResult<bool> {
        if price < 0 {
            return Err(DbError::Constraint(format!(
                "Medicine price must not be negative: {price}"
            )));
        }
        let rows_affected = self.conn.execute(
            "UPDATE medicines SET price = ?2 WHERE medicine_id = ?1",
            params![medicine_id, price],
        )?;
        Ok(rows_affected > 0)
    }
}
