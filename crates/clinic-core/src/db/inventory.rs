//! Inventory database operations.
//!
//! Stock only ever grows through [`Database::add_stock`], which appends an
//! `inventory_history` row and bumps `inventory.quantity` in one transaction.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Inventory, InventoryHistory, InventoryLine};

fn inventory_from_row(row: &Row<'_>) -> rusqlite::Result<Inventory> {
    Ok(Inventory {
        inventory_id: row.get(0)?,
        clinic_id: row.get(1)?,
        medicine_id: row.get(2)?,
        quantity: row.get(3)?,
    })
}

impl Database {
    /// Get or create the inventory row for a medicine at a clinic.
    pub fn ensure_inventory(&self, clinic_id: i64, medicine_id: i64) -> DbResult<Inventory> {
        self.conn.execute(
            r#"
            INSERT INTO inventory (clinic_id, medicine_id, quantity)
            VALUES (?1, ?2, 0)
            ON CONFLICT(clinic_id, medicine_id) DO NOTHING
            "#,
            params![clinic_id, medicine_id],
        )?;

        self.conn
            .query_row(
                r#"
                SELECT inventory_id, clinic_id, medicine_id, quantity
                FROM inventory
                WHERE clinic_id = ?1 AND medicine_id = ?2
                "#,
                params![clinic_id, medicine_id],
                inventory_from_row,
            )
            .map_err(Into::into)
    }

    /// Get an inventory row by ID.
    pub fn get_inventory(&self, inventory_id: i64) -> DbResult<Option<Inventory>> {
        self.conn
            .query_row(
                r#"
                SELECT inventory_id, clinic_id, medicine_id, quantity
                FROM inventory
                WHERE inventory_id = ?
                "#,
                [inventory_id],
                inventory_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a clinic's inventory joined with medicine names.
    pub fn list_inventory(&self, clinic_id: i64) -> DbResult<Vec<InventoryLine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT i.inventory_id, i.medicine_id, m.name, m.price, i.quantity
            FROM inventory i
            JOIN medicines m ON m.medicine_id = i.medicine_id
            WHERE i.clinic_id = ?
            ORDER BY m.name
            "#,
        )?;

        let rows = stmt.query_map([clinic_id], |row| {
            Ok(InventoryLine {
                inventory_id: row.get(0)?,
                medicine_id: row.get(1)?,
                medicine_name: row.get(2)?,
                unit_price: row.get(3)?,
                quantity: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Add stock to an inventory item, recording the addition in its history.
    pub fn add_stock(&self, inventory_id: i64, amount: i64) -> DbResult<InventoryHistory> {
        if amount <= 0 {
            return Err(DbError::Constraint(format!(
                "Stock additions must be positive, got {amount}"
            )));
        }

        let tx = self.conn.unchecked_transaction()?;
        let date_updated = chrono::Utc::now().to_rfc3339();

        let updated = tx.execute(
            "UPDATE inventory SET quantity = quantity + ?2 WHERE inventory_id = ?1",
            params![inventory_id, amount],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(format!("inventory {inventory_id}")));
        }

        tx.execute(
            r#"
            INSERT INTO inventory_history (inventory_id, stock_added, date_updated)
            VALUES (?1, ?2, ?3)
            "#,
            params![inventory_id, amount, date_updated],
        )?;
        let history_id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(inventory_id, amount, "Stock added");

        Ok(InventoryHistory {
            history_id,
            inventory_id,
            stock_added: amount,
            date_updated,
        })
    }

    /// Stock additions for an inventory item, oldest first.
    pub fn inventory_history(&self, inventory_id: i64) -> DbResult<Vec<InventoryHistory>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT history_id, inventory_id, stock_added, date_updated
            FROM inventory_history
            WHERE inventory_id = ?
            ORDER BY history_id
            "#,
        )?;

        let rows = stmt.query_map([inventory_id], |row| {
            Ok(InventoryHistory {
                history_id: row.get(0)?,
                inventory_id: row.get(1)?,
                stock_added: row.get(2)?,
                date_updated: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
