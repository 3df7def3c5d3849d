//! # Inventory Ledger
//!
//! Stock adjustments with a floor at zero, and the derived critical flag.
//!
//! ```text
//! adjust_stock(item, delta)
//!      │
//!      ├── delta not finite? ──► ValidationError (stock unchanged)
//!      │
//!      └── stock = max(0, stock + delta)
//!
//! is_critical(item) = stock < min_stock     (computed on read, never stored)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::InventoryItem;
use crate::validation::validate_stock_delta;

impl InventoryItem {
    /// Applies `delta` and returns the new stock.
    ///
    /// Over-withdrawal clamps to zero rather than failing.
    pub fn adjust_stock(&mut self, delta: f64) -> CoreResult<f64> {
        validate_stock_delta(delta)?;

        let requested = self.stock + delta;
        let next = requested.max(0.0);
        if requested < 0.0 {
            warn!(
                item_id = %self.id,
                stock = self.stock,
                delta,
                "Stock withdrawal exceeds quantity on hand, clamping to zero"
            );
        }

        debug!(item_id = %self.id, from = self.stock, to = next, "Stock adjusted");
        self.stock = next;
        Ok(next)
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        self.stock < self.min_stock
    }
}

pub fn find_item_mut<'a>(items: &'a mut [InventoryItem], id: &str) -> CoreResult<&'a mut InventoryItem> {
    items
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| CoreError::InventoryItemNotFound(id.to_string()))
}

/// Lines currently below their threshold.
pub fn critical_items(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|i| i.is_critical()).collect()
}

/// A store-room line with its derived flag, as shown on the stock screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLine {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub critical: bool,
}

impl From<&InventoryItem> for StockLine {
    fn from(item: &InventoryItem) -> Self {
        StockLine {
            item: item.clone(),
            critical: item.is_critical(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_inventory;

    #[test]
    fn test_adjust_stock() {
        let mut flour = seed_inventory().remove(0);
        assert_eq!(flour.adjust_stock(5.0).unwrap(), 55.0);
        assert_eq!(flour.adjust_stock(-10.5).unwrap(), 44.5);
    }

    #[test]
    fn test_adjust_stock_floors_at_zero() {
        let mut tomatoes = seed_inventory().remove(1);
        assert_eq!(tomatoes.adjust_stock(-1000.0).unwrap(), 0.0);
        assert_eq!(tomatoes.stock(), 0.0);
    }

    #[test]
    fn test_adjust_stock_rejects_nan() {
        let mut flour = seed_inventory().remove(0);
        assert!(flour.adjust_stock(f64::NAN).is_err());
        assert_eq!(flour.stock(), 50.0);
    }

    #[test]
    fn test_critical_is_derived() {
        let mut items = seed_inventory();
        assert_eq!(critical_items(&items).len(), 1);

        find_item_mut(&mut items, "i2").unwrap().adjust_stock(20.0).unwrap();
        assert!(critical_items(&items).is_empty());

        find_item_mut(&mut items, "i3").unwrap().adjust_stock(-8.0).unwrap();
        let critical = critical_items(&items);
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].id, "i3");

        assert!(find_item_mut(&mut items, "i9").is_err());
    }

    #[test]
    fn test_boundary_is_not_critical() {
        let mut wine = seed_inventory().remove(3);
        wine.adjust_stock(-12.0).unwrap();
        assert_eq!(wine.stock(), 12.0);
        assert!(!wine.is_critical());
    }
}
