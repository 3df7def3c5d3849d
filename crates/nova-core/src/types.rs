//! # Domain Types
//!
//! Core domain types used throughout NovaResto.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Table       │   │     Order       │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, number     │──►│  id, table_id   │──►│  menu_item_id   │       │
//! │  │  capacity       │   │  items (owned)  │   │  name snapshot  │       │
//! │  │  status         │   │  total (derived)│   │  price snapshot │       │
//! │  │  current_order  │   │  status         │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │ InventoryItem   │   │      User       │       │
//! │  │  (catalog)      │   │  stock, unit    │   │  username, role │       │
//! │  │  price_cents    │   │  min_stock      │   │  credential     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fields that only the engines may change (table status, order items and
//! totals) are crate-private and exposed through accessors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Table
// =============================================================================

/// Occupancy state of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    /// Closed and waiting to be bussed.
    Dirty,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TableStatus::Available => "AVAILABLE",
            TableStatus::Occupied => "OCCUPIED",
            TableStatus::Reserved => "RESERVED",
            TableStatus::Dirty => "DIRTY",
        };
        f.write_str(label)
    }
}

/// A dining table on the floor.
///
/// `status` and `current_order_id` move together and only through the
/// table engine: `OCCUPIED` iff an open order is bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    /// Number painted on the table, unique on the floor.
    pub number: u32,
    /// Seats.
    pub capacity: u32,
    pub(crate) status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) current_order_id: Option<String>,
}

impl Table {
    /// Creates an available table.
    pub fn new(id: impl Into<String>, number: u32, capacity: u32) -> Self {
        Table {
            id: id.into(),
            number,
            capacity,
            status: TableStatus::Available,
            current_order_id: None,
        }
    }

    #[inline]
    pub fn status(&self) -> TableStatus {
        self.status
    }

    #[inline]
    pub fn current_order_id(&self) -> Option<&str> {
        self.current_order_id.as_deref()
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An entry of the static menu catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Tax-inclusive unit price in cents.
    pub price_cents: i64,
    pub category: String,
    /// Display image reference.
    pub image: String,
}

impl MenuItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// Kitchen progress of a single ticket line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    Cooking,
    Ready,
    Served,
}

impl ItemStatus {
    /// The only status a cook may move this line to.
    ///
    /// `Served` is deliberately absent: it is reached through the whole
    /// ticket serve, never by advancing a single line.
    pub fn next_in_kitchen(&self) -> Option<ItemStatus> {
        match self {
            ItemStatus::Pending => Some(ItemStatus::Cooking),
            ItemStatus::Cooking => Some(ItemStatus::Ready),
            ItemStatus::Ready | ItemStatus::Served => None,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemStatus::Pending => "PENDING",
            ItemStatus::Cooking => "COOKING",
            ItemStatus::Ready => "READY",
            ItemStatus::Served => "SERVED",
        };
        f.write_str(label)
    }
}

/// A line on an order.
/// Name and price are frozen when the line is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    /// Menu name at time of ordering (frozen).
    pub name: String,
    /// Unit price in cents at time of ordering (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub status: ItemStatus,
}

impl OrderItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// Lifecycle of an order. `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Open,
    Paid,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// How an order leaves the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloseOutcome {
    Paid,
    Cancelled,
}

impl From<CloseOutcome> for OrderStatus {
    fn from(outcome: CloseOutcome) -> Self {
        match outcome {
            CloseOutcome::Paid => OrderStatus::Paid,
            CloseOutcome::Cancelled => OrderStatus::Cancelled,
        }
    }
}

/// An order attached to a table.
///
/// Items are in ticket order. `total_cents` is recomputed by every item
/// mutation and is never written on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub table_id: String,
    pub(crate) items: Vec<OrderItem>,
    pub(crate) total_cents: i64,
    pub(crate) status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) closed_at: Option<DateTime<Utc>>,
}

impl Order {
    #[inline]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    #[inline]
    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stock line in the kitchen store room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Current quantity; never negative. Fractional for weighed goods.
    pub(crate) stock: f64,
    /// Unit label ("kg", "bottles", ...).
    pub unit: String,
    /// Threshold below which the item is critical.
    pub min_stock: f64,
    #[ts(as = "String")]
    pub last_ordered: NaiveDate,
}

impl InventoryItem {
    /// Creates an inventory line. Negative starting stock is floored to zero.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        stock: f64,
        unit: impl Into<String>,
        min_stock: f64,
        last_ordered: NaiveDate,
    ) -> Self {
        InventoryItem {
            id: id.into(),
            name: name.into(),
            stock: stock.max(0.0),
            unit: unit.into(),
            min_stock,
            last_ordered,
        }
    }

    #[inline]
    pub fn stock(&self) -> f64 {
        self.stock
    }
}

// =============================================================================
// Users & Roles
// =============================================================================

/// Staff role. The only input to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    /// Restaurant manager.
    Gerant,
    /// Cook.
    Cuisinier,
    /// Waiter.
    Serveur,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Gerant, Role::Cuisinier, Role::Serveur];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Gerant => "GERANT",
            Role::Cuisinier => "CUISINIER",
            Role::Serveur => "SERVEUR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            })
    }
}

/// A staff account in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login name, unique in the directory.
    pub username: String,
    /// Stored credential: plaintext or a PHC hash depending on the
    /// configured `CredentialCheck`.
    #[serde(default)]
    pub credential: String,
    pub role: Role,
    pub email: String,
    pub active: bool,
}

// =============================================================================
// Persisted State Keys
// =============================================================================

/// Stable keys of the persisted state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateKey {
    Tables,
    Orders,
    Inventory,
    Users,
    Currency,
    /// Active-session marker.
    Session,
}

impl StateKey {
    /// Keys restored when the process starts.
    pub const ALL: [StateKey; 6] = [
        StateKey::Tables,
        StateKey::Orders,
        StateKey::Inventory,
        StateKey::Users,
        StateKey::Currency,
        StateKey::Session,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::Tables => "nova_tables",
            StateKey::Orders => "nova_orders",
            StateKey::Inventory => "nova_inventory",
            StateKey::Users => "nova_users",
            StateKey::Currency => "nova_currency",
            StateKey::Session => "nova_auth_user",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&TableStatus::Available).unwrap(),
            "\"AVAILABLE\""
        );
        assert_eq!(serde_json::to_string(&Role::Gerant).unwrap(), "\"GERANT\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Open).unwrap(), "\"OPEN\"");
    }

    #[test]
    fn test_table_serializes_camel_case() {
        let mut table = Table::new("t1", 1, 4);
        table.status = TableStatus::Occupied;
        table.current_order_id = Some("o1".to_string());

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["currentOrderId"], "o1");
        assert_eq!(json["status"], "OCCUPIED");
    }

    #[test]
    fn test_item_status_kitchen_progression() {
        assert_eq!(ItemStatus::Pending.next_in_kitchen(), Some(ItemStatus::Cooking));
        assert_eq!(ItemStatus::Cooking.next_in_kitchen(), Some(ItemStatus::Ready));
        assert_eq!(ItemStatus::Ready.next_in_kitchen(), None);
        assert_eq!(ItemStatus::Served.next_in_kitchen(), None);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("CUISINIER".parse::<Role>().unwrap(), Role::Cuisinier);
        assert!("chef".parse::<Role>().is_err());
    }

    #[test]
    fn test_inventory_item_floors_initial_stock() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
        let item = InventoryItem::new("i1", "Flour", -3.0, "kg", 10.0, date);
        assert_eq!(item.stock(), 0.0);
    }
}
