//! Medicine and inventory models.

use serde::{Deserialize, Serialize};

/// A medicine the clinic can prescribe and stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Database row ID
    pub medicine_id: i64,
    /// Medicine name
    pub name: String,
    /// Unit price in whole currency units
    pub price: i64,
    /// Creation timestamp
    pub created_at: String,
}

/// Stock level of one medicine at one clinic.
///
/// `quantity` is the running sum of the item's [`InventoryHistory`] and is
/// only changed by `Database::add_stock`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    pub inventory_id: i64,
    pub clinic_id: i64,
    pub medicine_id: i64,
    pub quantity: i64,
}

/// Append-only record of a single stock addition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryHistory {
    pub history_id: i64,
    pub inventory_id: i64,
    /// Units added (always positive)
    pub stock_added: i64,
    /// When the stock was added (RFC 3339)
    pub date_updated: String,
}

/// Inventory row joined with its medicine, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLine {
    pub inventory_id: i64,
    pub medicine_id: i64,
    pub medicine_name: String,
    pub unit_price: i64,
    pub quantity: i64,
}

impl InventoryLine {
    /// Stock value at current prices.
    pub fn stock_value(&self) -> i64 {
        self.unit_price * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_value() {
        let line = InventoryLine {
            inventory_id: 1,
            medicine_id: 7,
            medicine_name: "Moringa Capsules".into(),
            unit_price: 2_500,
            quantity: 12,
        };
        assert_eq!(line.stock_value(), 30_000);
    }
}
