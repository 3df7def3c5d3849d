//! # Restaurant Store
//!
//! The explicit store object every engine call goes through.
//!
//! ## Change Tracking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  caller ──► restaurant.close_order("o1", PAID)                          │
//! │                  │                                                      │
//! │                  ├── Err(..)  → nothing changed, nothing recorded       │
//! │                  │                                                      │
//! │                  └── Ok(..)   → version += 1                            │
//! │                                changes ∪= {nova_orders, nova_tables}    │
//! │                                                                         │
//! │  caller ──► restaurant.take_changes()  → {nova_orders, nova_tables}     │
//! │                  │                                                      │
//! │                  └── persists those keys (the store never does I/O)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::{seed_inventory, seed_tables, seed_users, Catalog};
use crate::error::{CoreError, CoreResult};
use crate::inventory::{critical_items, find_item_mut};
use crate::money::Money;
use crate::order::{close_order, create_order};
use crate::session::{CredentialCheck, NewUser, UserDirectory, UserUpdate};
use crate::table::{find_table, find_table_mut, next_table_number, validate_table_layout};
use crate::types::{
    CloseOutcome, InventoryItem, ItemStatus, Order, OrderItem, OrderStatus, StateKey, Table,
    TableStatus, User,
};
use crate::validation::{validate_currency_symbol, validate_table_capacity};
use crate::DEFAULT_CURRENCY_SYMBOL;

// =============================================================================
// Parts & Summary
// =============================================================================

/// Everything a restaurant is rebuilt from at boot.
#[derive(Debug, Clone, Default)]
pub struct RestaurantParts {
    pub tables: Vec<Table>,
    pub orders: Vec<Order>,
    pub inventory: Vec<InventoryItem>,
    pub users: Vec<User>,
    pub currency: String,
}

impl RestaurantParts {
    /// Fresh-install defaults.
    pub fn seeded() -> Self {
        RestaurantParts {
            tables: seed_tables(),
            orders: Vec::new(),
            inventory: seed_inventory(),
            users: seed_users(),
            currency: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of PAID order totals.
    pub revenue: Money,
    pub occupied_tables: usize,
    pub total_tables: usize,
    pub critical_stock: usize,
    pub open_orders: usize,
}

// =============================================================================
// Restaurant
// =============================================================================

#[derive(Debug, Clone)]
pub struct Restaurant {
    catalog: Catalog,
    tables: Vec<Table>,
    orders: Vec<Order>,
    inventory: Vec<InventoryItem>,
    directory: UserDirectory,
    currency: String,
    version: u64,
    changes: BTreeSet<StateKey>,
}

impl Restaurant {
    pub fn seeded() -> Self {
        Self::from_parts(Catalog::seeded(), RestaurantParts::seeded())
    }

    /// Rebuilds a restaurant from persisted parts.
    ///
    /// Persisted data may come from an older or damaged store, so the
    /// table/order binding is re-established here:
    /// - an order with an out-of-range quantity or a negative price is
    ///   dropped, and its table is freed by the next rule
    /// - totals are recomputed from lines
    /// - an OCCUPIED table without its open order becomes AVAILABLE
    /// - an open order its table does not point at is re-bound when the
    ///   table can seat it, otherwise cancelled
    pub fn from_parts(catalog: Catalog, parts: RestaurantParts) -> Self {
        let RestaurantParts {
            mut tables,
            mut orders,
            inventory,
            users,
            currency,
        } = parts;

        orders.retain(|order| match order.validate_lines() {
            Ok(()) => true,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Dropping order with damaged lines");
                false
            }
        });
        for order in &mut orders {
            order.recompute_total();
        }

        for table in &mut tables {
            let bound = table.current_order_id.as_deref().is_some_and(|id| {
                orders
                    .iter()
                    .any(|o| o.id == id && o.is_open() && o.table_id == table.id)
            });
            if table.status == TableStatus::Occupied && !bound {
                warn!(table_id = %table.id, "Occupied table has no open order, freeing it");
                table.status = TableStatus::Available;
            }
            if table.status != TableStatus::Occupied {
                table.current_order_id = None;
            }
        }

        for order in orders.iter_mut().filter(|o| o.is_open()) {
            let table = tables.iter_mut().find(|t| t.id == order.table_id);
            let rebound = match table {
                Some(t) if t.current_order_id() == Some(order.id.as_str()) => true,
                Some(t) => t.occupy(&order.id).is_ok(),
                None => false,
            };
            if !rebound {
                warn!(order_id = %order.id, table_id = %order.table_id, "Orphaned open order, cancelling");
                order.status = OrderStatus::Cancelled;
                order.closed_at = Some(chrono::Utc::now());
            }
        }

        let currency = if currency.trim().is_empty() {
            DEFAULT_CURRENCY_SYMBOL.to_string()
        } else {
            currency
        };

        Restaurant {
            catalog,
            tables,
            orders,
            inventory: inventory
                .into_iter()
                .map(|mut i| {
                    i.stock = i.stock.max(0.0);
                    i
                })
                .collect(),
            directory: UserDirectory::new(users),
            currency,
            version: 0,
            changes: BTreeSet::new(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: &str) -> CoreResult<&Table> {
        find_table(&self.tables, id)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, id: &str) -> CoreResult<&Order> {
        self.orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    /// The open order bound to `table_id`, if any.
    pub fn open_order_for_table(&self, table_id: &str) -> Option<&Order> {
        let table = self.tables.iter().find(|t| t.id == table_id)?;
        let order_id = table.current_order_id()?;
        self.orders.iter().find(|o| o.id == order_id && o.is_open())
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Bumped by every successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// OPEN orders in creation order: the kitchen board.
    pub fn tickets(&self) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.is_open()).collect()
    }

    pub fn critical_stock(&self) -> Vec<&InventoryItem> {
        critical_items(&self.inventory)
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            revenue: self
                .orders
                .iter()
                .filter(|o| o.status() == OrderStatus::Paid)
                .map(Order::total)
                .sum(),
            occupied_tables: self
                .tables
                .iter()
                .filter(|t| t.status() == TableStatus::Occupied)
                .count(),
            total_tables: self.tables.len(),
            critical_stock: self.critical_stock().len(),
            open_orders: self.orders.iter().filter(|o| o.is_open()).count(),
        }
    }

    /// Snapshot handed to the advisory service.
    pub fn advisory_context(&self) -> serde_json::Value {
        serde_json::json!({
            "tables": self.tables,
            "orders": self.orders,
            "inventory": self.inventory,
        })
    }

    pub fn inventory_snapshot(&self) -> serde_json::Value {
        serde_json::json!(self.inventory)
    }

    // =========================================================================
    // Change Tracking
    // =========================================================================

    /// Drains the keys changed since the last call.
    pub fn take_changes(&mut self) -> BTreeSet<StateKey> {
        std::mem::take(&mut self.changes)
    }

    fn record(&mut self, keys: &[StateKey]) {
        self.version += 1;
        self.changes.extend(keys.iter().copied());
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Opens an order on `table_id`. Order creation and the table flip to
    /// OCCUPIED happen together or not at all.
    pub fn create_order(&mut self, table_id: &str, items: Vec<OrderItem>) -> CoreResult<Order> {
        let table = find_table_mut(&mut self.tables, table_id)?;
        let order = create_order(table, items)?;
        self.orders.push(order.clone());
        self.record(&[StateKey::Orders, StateKey::Tables]);
        Ok(order)
    }

    pub fn add_item(&mut self, order_id: &str, menu_item_id: &str, quantity: i64) -> CoreResult<Order> {
        let item = self
            .catalog
            .menu_item(menu_item_id)
            .cloned()
            .ok_or_else(|| CoreError::MenuItemNotFound(menu_item_id.to_string()))?;
        self.mutate_order(order_id, |order| order.add_item(&item, quantity))
    }

    pub fn remove_item(&mut self, order_id: &str, menu_item_id: &str) -> CoreResult<Order> {
        self.mutate_order(order_id, |order| order.remove_item(menu_item_id))
    }

    pub fn advance_item(&mut self, order_id: &str, item_id: &str, to: ItemStatus) -> CoreResult<Order> {
        self.mutate_order(order_id, |order| order.advance_item(item_id, to))
    }

    pub fn serve_ticket(&mut self, order_id: &str) -> CoreResult<Order> {
        self.mutate_order(order_id, Order::serve_ticket)
    }

    /// Closes the order and sends its table to bussing.
    pub fn close_order(&mut self, order_id: &str, outcome: CloseOutcome) -> CoreResult<Order> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;
        order.ensure_open()?;
        let table = find_table_mut(&mut self.tables, &order.table_id)?;

        close_order(order, table, outcome)?;
        let closed = order.clone();
        self.record(&[StateKey::Orders, StateKey::Tables]);
        Ok(closed)
    }

    fn mutate_order<F>(&mut self, order_id: &str, mutate: F) -> CoreResult<Order>
    where
        F: FnOnce(&mut Order) -> CoreResult<()>,
    {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;
        mutate(order)?;
        let updated = order.clone();
        self.record(&[StateKey::Orders]);
        Ok(updated)
    }

    // =========================================================================
    // Tables
    // =========================================================================

    pub fn clean_table(&mut self, table_id: &str) -> CoreResult<Table> {
        self.mutate_table(table_id, Table::clean)
    }

    pub fn reserve_table(&mut self, table_id: &str) -> CoreResult<Table> {
        self.mutate_table(table_id, Table::reserve)
    }

    pub fn release_table(&mut self, table_id: &str) -> CoreResult<Table> {
        self.mutate_table(table_id, Table::release)
    }

    /// Adds an AVAILABLE table numbered after the highest one.
    pub fn add_table(&mut self, capacity: u32) -> CoreResult<Table> {
        validate_table_capacity(capacity)?;
        let number = next_table_number(&self.tables);
        let table = Table::new(Uuid::new_v4().to_string(), number, capacity);
        self.tables.push(table.clone());
        self.record(&[StateKey::Tables]);
        info!(table_id = %table.id, number, capacity, "Table added");
        Ok(table)
    }

    pub fn update_table(&mut self, table_id: &str, number: u32, capacity: u32) -> CoreResult<Table> {
        validate_table_layout(&self.tables, number, capacity, Some(table_id))?;
        self.mutate_table(table_id, |table| {
            table.number = number;
            table.capacity = capacity;
            Ok(())
        })
    }

    /// Removes a table from the floor. Refused while it holds an open order.
    pub fn remove_table(&mut self, table_id: &str) -> CoreResult<Table> {
        let index = self
            .tables
            .iter()
            .position(|t| t.id == table_id)
            .ok_or_else(|| CoreError::TableNotFound(table_id.to_string()))?;

        let in_use = self.tables[index].status() == TableStatus::Occupied
            || self.orders.iter().any(|o| o.table_id == table_id && o.is_open());
        if in_use {
            return Err(CoreError::TableInUse {
                table_id: table_id.to_string(),
            });
        }

        let table = self.tables.remove(index);
        self.record(&[StateKey::Tables]);
        info!(table_id = %table.id, number = table.number, "Table removed");
        Ok(table)
    }

    fn mutate_table<F>(&mut self, table_id: &str, mutate: F) -> CoreResult<Table>
    where
        F: FnOnce(&mut Table) -> CoreResult<()>,
    {
        let table = find_table_mut(&mut self.tables, table_id)?;
        mutate(table)?;
        let updated = table.clone();
        self.record(&[StateKey::Tables]);
        Ok(updated)
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub fn adjust_stock(&mut self, item_id: &str, delta: f64) -> CoreResult<InventoryItem> {
        let item = find_item_mut(&mut self.inventory, item_id)?;
        item.adjust_stock(delta)?;
        let updated = item.clone();
        self.record(&[StateKey::Inventory]);
        Ok(updated)
    }

    // =========================================================================
    // Users & Settings
    // =========================================================================

    pub fn add_user(&mut self, new: NewUser, check: &dyn CredentialCheck) -> CoreResult<User> {
        let user = self.directory.add_user(new, check)?;
        self.record(&[StateKey::Users]);
        Ok(user)
    }

    pub fn update_user(
        &mut self,
        id: &str,
        update: UserUpdate,
        check: &dyn CredentialCheck,
    ) -> CoreResult<User> {
        let user = self.directory.update_user(id, update, check)?;
        self.record(&[StateKey::Users]);
        Ok(user)
    }

    pub fn remove_user(&mut self, id: &str) -> CoreResult<User> {
        let user = self.directory.remove_user(id)?;
        self.record(&[StateKey::Users]);
        Ok(user)
    }

    /// Re-stores credentials not yet in `check`'s stored form, for
    /// directories seeded with plaintext PINs and served with a hashing
    /// check. Returns how many were converted.
    pub fn prepare_credentials(&mut self, check: &dyn CredentialCheck) -> CoreResult<usize> {
        let mut prepared = self.directory.users().to_vec();
        let mut converted = 0;
        for user in prepared.iter_mut().filter(|u| !check.is_prepared(&u.credential)) {
            user.credential = check.prepare(&user.credential)?;
            converted += 1;
        }

        if converted > 0 {
            self.directory = UserDirectory::new(prepared);
            self.record(&[StateKey::Users]);
            info!(converted, "Stored credentials converted");
        }
        Ok(converted)
    }

    pub fn set_currency(&mut self, symbol: &str) -> CoreResult<()> {
        validate_currency_symbol(symbol)?;
        self.currency = symbol.trim().to_string();
        self.record(&[StateKey::Currency]);
        info!(currency = %self.currency, "Currency changed");
        Ok(())
    }
}

impl Default for Restaurant {
    fn default() -> Self {
        Restaurant::seeded()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::order::OrderDraft;
    use crate::session::PlaintextCredentials;

    fn draft(restaurant: &Restaurant, ids: &[&str]) -> Vec<OrderItem> {
        let mut draft = OrderDraft::new();
        for id in ids {
            draft.add(restaurant.catalog().menu_item(id).unwrap()).unwrap();
        }
        draft.into_items()
    }

    #[test]
    fn test_create_order_records_changes() {
        let mut r = Restaurant::seeded();
        let items = draft(&r, &["m1", "m1"]);
        let order = r.create_order("t2", items).unwrap();

        assert_eq!(order.total().cents(), 2500);
        assert_eq!(r.table("t2").unwrap().status(), TableStatus::Occupied);
        assert_eq!(r.version(), 1);
        assert_eq!(
            r.take_changes().into_iter().collect::<Vec<_>>(),
            vec![StateKey::Tables, StateKey::Orders]
        );
        assert!(r.take_changes().is_empty());
    }

    #[test]
    fn test_failed_operation_records_nothing() {
        let mut r = Restaurant::seeded();
        let items = draft(&r, &["m1"]);
        let err = r.create_order("t5", items).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(r.version(), 0);
        assert!(r.take_changes().is_empty());
        assert!(r.orders().is_empty());

        assert!(r.create_order("t99", Vec::new()).is_err());
        assert!(r.adjust_stock("i9", 1.0).is_err());
        assert_eq!(r.version(), 0);
    }

    #[test]
    fn test_reserved_table_is_consumed_by_order() {
        let mut r = Restaurant::seeded();
        let items = draft(&r, &["m3"]);
        let order = r.create_order("t4", items).unwrap();
        let table = r.table("t4").unwrap();
        assert_eq!(table.status(), TableStatus::Occupied);
        assert_eq!(table.current_order_id(), Some(order.id.as_str()));
    }

    #[test]
    fn test_full_service_cycle() {
        let mut r = Restaurant::seeded();
        let items = draft(&r, &["m1", "m1"]);
        let order = r.create_order("t1", items).unwrap();

        let order = r.add_item(&order.id, "m1", 1).unwrap();
        assert_eq!(order.items()[0].quantity, 3);
        assert_eq!(order.total().cents(), 3750);

        let line = order.items()[0].id.clone();
        r.advance_item(&order.id, &line, ItemStatus::Cooking).unwrap();
        r.advance_item(&order.id, &line, ItemStatus::Ready).unwrap();
        r.serve_ticket(&order.id).unwrap();
        assert!(r.tickets().iter().any(|t| t.id == order.id));

        let closed = r.close_order(&order.id, CloseOutcome::Paid).unwrap();
        assert_eq!(closed.status(), OrderStatus::Paid);
        assert!(r.tickets().is_empty());
        assert_eq!(r.table("t1").unwrap().status(), TableStatus::Dirty);
        assert!(r.open_order_for_table("t1").is_none());

        assert_eq!(r.summary().revenue.cents(), 3750);

        r.clean_table("t1").unwrap();
        assert_eq!(r.table("t1").unwrap().status(), TableStatus::Available);
    }

    #[test]
    fn test_cancel_counts_no_revenue() {
        let mut r = Restaurant::seeded();
        let items = draft(&r, &["m5"]);
        let order = r.create_order("t6", items).unwrap();
        r.close_order(&order.id, CloseOutcome::Cancelled).unwrap();

        let summary = r.summary();
        assert!(summary.revenue.is_zero());
        assert_eq!(summary.open_orders, 0);
        assert_eq!(r.table("t6").unwrap().status(), TableStatus::Dirty);
    }

    #[test]
    fn test_add_unknown_menu_item() {
        let mut r = Restaurant::seeded();
        let items = draft(&r, &["m1"]);
        let order = r.create_order("t1", items).unwrap();
        let err = r.add_item(&order.id, "m42", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_summary_of_seeded_restaurant() {
        let r = Restaurant::seeded();
        let summary = r.summary();
        assert_eq!(summary.occupied_tables, 0);
        assert_eq!(summary.total_tables, 6);
        assert_eq!(summary.critical_stock, 1);
        assert_eq!(summary.open_orders, 0);
    }

    #[test]
    fn test_floor_configuration() {
        let mut r = Restaurant::seeded();
        let added = r.add_table(4).unwrap();
        assert_eq!(added.number, 7);
        assert_eq!(added.status(), TableStatus::Available);

        assert!(r.update_table(&added.id, 1, 4).is_err());
        let updated = r.update_table(&added.id, 12, 10).unwrap();
        assert_eq!((updated.number, updated.capacity), (12, 10));
        assert!(r.add_table(0).is_err());

        let items = draft(&r, &["m2"]);
        r.create_order(&added.id, items).unwrap();
        let err = r.remove_table(&added.id).unwrap_err();
        assert!(matches!(err, CoreError::TableInUse { .. }));

        r.remove_table("t3").unwrap();
        assert_eq!(r.tables().len(), 6);
        assert!(r.table("t3").is_err());
    }

    #[test]
    fn test_adjust_stock_through_store() {
        let mut r = Restaurant::seeded();
        let item = r.adjust_stock("i2", -1000.0).unwrap();
        assert_eq!(item.stock(), 0.0);
        assert!(r.take_changes().contains(&StateKey::Inventory));
    }

    #[test]
    fn test_currency() {
        let mut r = Restaurant::seeded();
        assert_eq!(r.currency(), "€");
        r.set_currency("$").unwrap();
        assert_eq!(r.currency(), "$");
        assert!(r.set_currency("").is_err());
        assert_eq!(r.currency(), "$");
    }

    #[test]
    fn test_users_through_store() {
        let mut r = Restaurant::seeded();
        let admin = r.directory().authenticate("admin", "1234", &PlaintextCredentials).unwrap();
        assert_eq!(admin.id, "u1");

        r.remove_user("u4").unwrap();
        assert!(r.directory().authenticate("saraservice", "000", &PlaintextCredentials).is_err());
        assert!(r.take_changes().contains(&StateKey::Users));
    }

    #[test]
    fn test_prepare_credentials_converts_once() {
        use crate::session::Argon2Credentials;

        let mut r = Restaurant::seeded();
        assert_eq!(r.prepare_credentials(&Argon2Credentials).unwrap(), 4);
        assert!(r.take_changes().contains(&StateKey::Users));
        assert!(r.directory().authenticate("admin", "1234", &Argon2Credentials).is_ok());

        assert_eq!(r.prepare_credentials(&Argon2Credentials).unwrap(), 0);
        assert!(r.take_changes().is_empty());
        assert!(r.directory().authenticate("chefbernie", "789", &Argon2Credentials).is_ok());
    }

    #[test]
    fn test_from_parts_repairs_bindings() {
        let mut parts = RestaurantParts::seeded();
        // t2 claims an order that does not exist
        parts.tables[1].status = TableStatus::Occupied;
        parts.tables[1].current_order_id = Some("o1".to_string());

        let r = Restaurant::from_parts(Catalog::seeded(), parts);
        let t2 = r.table("t2").unwrap();
        assert_eq!(t2.status(), TableStatus::Available);
        assert!(t2.current_order_id().is_none());
    }

    #[test]
    fn test_from_parts_rebinds_or_cancels_open_orders() {
        let mut source = Restaurant::seeded();
        let items = draft(&source, &["m1"]);
        let on_t1 = source.create_order("t1", items).unwrap();
        let items = draft(&source, &["m2"]);
        let on_t6 = source.create_order("t6", items).unwrap();

        let mut parts = RestaurantParts::seeded();
        parts.orders = source.orders().to_vec();
        // t6 was bussed and left DIRTY in the stored floor plan
        parts.tables[5].status = TableStatus::Dirty;

        let r = Restaurant::from_parts(Catalog::seeded(), parts);
        assert_eq!(
            r.table("t1").unwrap().current_order_id(),
            Some(on_t1.id.as_str())
        );
        assert_eq!(r.order(&on_t6.id).unwrap().status(), OrderStatus::Cancelled);
        assert_eq!(r.tickets().len(), 1);
    }

    #[test]
    fn test_from_parts_drops_orders_with_damaged_lines() {
        let mut source = Restaurant::seeded();
        let items = draft(&source, &["m1"]);
        source.create_order("t1", items).unwrap();
        let items = draft(&source, &["m3"]);
        source.create_order("t2", items).unwrap();

        let mut parts = RestaurantParts::seeded();
        parts.tables = source.tables().to_vec();
        parts.orders = source.orders().to_vec();
        parts.orders[0].items[0].quantity = 9_000_000_000_000_000;
        parts.orders[1].items[0].unit_price_cents = i64::MAX;

        let r = Restaurant::from_parts(Catalog::seeded(), parts);
        assert_eq!(r.orders().len(), 1);
        assert_eq!(r.orders()[0].total().cents(), i64::MAX);
        assert_eq!(r.table("t1").unwrap().status(), TableStatus::Available);
        assert_eq!(r.table("t2").unwrap().status(), TableStatus::Occupied);
    }

    #[test]
    fn test_advisory_context_shape() {
        let r = Restaurant::seeded();
        let ctx = r.advisory_context();
        assert_eq!(ctx["tables"].as_array().unwrap().len(), 6);
        assert_eq!(ctx["inventory"].as_array().unwrap().len(), 4);
        assert!(ctx["orders"].as_array().unwrap().is_empty());
    }
}
