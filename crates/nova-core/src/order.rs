//! # Order Engine
//!
//! Builds orders from a draft, mutates their lines and drives the kitchen
//! status of each line.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   OrderDraft (cart)                                                     │
//! │   add(menu item) / remove(menu item)                                    │
//! │        │                                                                │
//! │        │ create_order(table, lines)                                     │
//! │        ▼                                                                │
//! │   ┌─────────┐  add_item / remove_item / advance_item / serve_ticket    │
//! │   │  OPEN   │◄────────────────────────────────────────────────┐        │
//! │   └────┬────┘─────────────────────────────────────────────────┘        │
//! │        │ close_order(outcome)                                           │
//! │        ├───────────────► PAID        (terminal)                         │
//! │        └───────────────► CANCELLED   (terminal)                         │
//! │                                                                         │
//! │   Every line mutation recomputes the total from the lines.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Kitchen Progression (per line)
//! ```text
//! PENDING ──► COOKING ──► READY ──(serve_ticket, whole order)──► SERVED
//! ```
//!
//! Joint transitions with the table engine check every precondition first
//! and only then mutate, so a rejected call leaves both entities untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate};
use crate::types::{
    CloseOutcome, ItemStatus, MenuItem, Order, OrderItem, OrderStatus, Table, TableStatus,
};
use crate::validation::{validate_price_cents, validate_quantity, ValidationResult};

// =============================================================================
// Order Draft
// =============================================================================

/// The cart a waiter builds before sending a ticket to the kitchen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    lines: Vec<OrderItem>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `item`, accumulating on an existing line.
    pub fn add(&mut self, item: &MenuItem) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            validate_quantity(line.quantity + 1)?;
            line.quantity += 1;
            return Ok(());
        }

        validate_price_cents(item.price_cents)?;
        self.lines.push(new_line(item, 1));
        Ok(())
    }

    /// Drops every line for `menu_item_id`. Returns whether anything went.
    pub fn remove(&mut self, menu_item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.menu_item_id != menu_item_id);
        self.lines.len() != before
    }

    pub fn lines(&self) -> &[OrderItem] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(OrderItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn into_items(self) -> Vec<OrderItem> {
        self.lines
    }
}

fn new_line(item: &MenuItem, quantity: i64) -> OrderItem {
    OrderItem {
        id: Uuid::new_v4().to_string(),
        menu_item_id: item.id.clone(),
        name: item.name.clone(),
        unit_price_cents: item.price_cents,
        quantity,
        status: ItemStatus::Pending,
    }
}

// =============================================================================
// Creation & Closing (joint with the table engine)
// =============================================================================

/// Opens an order on `table` with `items`.
///
/// An empty item list is accepted here; callers that want to forbid empty
/// tickets do so before calling. Fails without touching the table when a
/// line is malformed or the table cannot be occupied.
pub fn create_order(table: &mut Table, items: Vec<OrderItem>) -> CoreResult<Order> {
    for item in &items {
        validate_quantity(item.quantity)?;
        validate_price_cents(item.unit_price_cents)?;
    }

    let mut order = Order {
        id: Uuid::new_v4().to_string(),
        table_id: table.id.clone(),
        items,
        total_cents: 0,
        status: OrderStatus::Open,
        created_at: Utc::now(),
        closed_at: None,
    };
    order.recompute_total();

    table.occupy(&order.id)?;

    info!(
        order_id = %order.id,
        table_id = %order.table_id,
        lines = order.items.len(),
        total = order.total_cents,
        "Order created"
    );
    Ok(order)
}

/// Closes `order` with `outcome` and sends its table to bussing.
pub fn close_order(order: &mut Order, table: &mut Table, outcome: CloseOutcome) -> CoreResult<()> {
    order.ensure_open()?;

    let bound = table.status() == TableStatus::Occupied
        && table.current_order_id() == Some(order.id.as_str());
    if !bound {
        return Err(CoreError::InvalidTableTransition {
            table_id: table.id.clone(),
            current: table.status(),
            action: "release the order",
        });
    }

    table.vacate()?;
    order.status = outcome.into();
    order.closed_at = Some(Utc::now());

    info!(
        order_id = %order.id,
        table_id = %table.id,
        status = %order.status,
        total = order.total_cents,
        "Order closed"
    );
    Ok(())
}

// =============================================================================
// Line Mutations
// =============================================================================

impl Order {
    /// Adds `quantity` of `item`. Accumulates on the existing line for the
    /// same menu item instead of adding a second row.
    pub fn add_item(&mut self, item: &MenuItem, quantity: i64) -> CoreResult<()> {
        self.ensure_open()?;
        validate_quantity(quantity)?;

        match self.items.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => {
                let accumulated = line.quantity + quantity;
                validate_quantity(accumulated)?;
                line.quantity = accumulated;
            }
            None => {
                validate_price_cents(item.price_cents)?;
                self.items.push(new_line(item, quantity));
            }
        }

        self.recompute_total();
        debug!(order_id = %self.id, menu_item_id = %item.id, quantity, total = self.total_cents, "Item added");
        Ok(())
    }

    /// Removes every line referencing `menu_item_id`.
    pub fn remove_item(&mut self, menu_item_id: &str) -> CoreResult<()> {
        self.ensure_open()?;

        let before = self.items.len();
        self.items.retain(|l| l.menu_item_id != menu_item_id);
        if self.items.len() == before {
            return Err(CoreError::OrderItemNotFound {
                order_id: self.id.clone(),
                item_id: menu_item_id.to_string(),
            });
        }

        self.recompute_total();
        debug!(order_id = %self.id, menu_item_id, total = self.total_cents, "Item removed");
        Ok(())
    }

    /// Moves one line forward in the kitchen. Only PENDING → COOKING and
    /// COOKING → READY are accepted.
    pub fn advance_item(&mut self, item_id: &str, to: ItemStatus) -> CoreResult<()> {
        self.ensure_open()?;

        let order_id = self.id.clone();
        let line = self
            .items
            .iter_mut()
            .find(|l| l.id == item_id)
            .ok_or_else(|| CoreError::OrderItemNotFound {
                order_id: order_id.clone(),
                item_id: item_id.to_string(),
            })?;

        if line.status.next_in_kitchen() != Some(to) {
            return Err(CoreError::InvalidItemTransition {
                item_id: item_id.to_string(),
                from: line.status,
                to,
            });
        }

        debug!(order_id = %order_id, item_id, from = %line.status, %to, "Ticket line advanced");
        line.status = to;
        Ok(())
    }

    /// Serves the whole ticket. Every line must be READY.
    pub fn serve_ticket(&mut self) -> CoreResult<()> {
        self.ensure_open()?;

        let pending = self
            .items
            .iter()
            .filter(|l| l.status != ItemStatus::Ready)
            .count();
        if pending > 0 {
            return Err(CoreError::TicketNotReady {
                order_id: self.id.clone(),
                pending,
            });
        }

        for line in &mut self.items {
            line.status = ItemStatus::Served;
        }
        debug!(order_id = %self.id, "Ticket served");
        Ok(())
    }

    /// Footer figures for the ticket.
    pub fn totals(&self, rate: TaxRate) -> OrderTotals {
        OrderTotals::from_total(self.total(), rate)
    }

    /// Lines the kitchen still has to deal with.
    pub fn kitchen_lines(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|l| l.status != ItemStatus::Served)
    }

    pub(crate) fn ensure_open(&self) -> CoreResult<()> {
        if self.status != OrderStatus::Open {
            return Err(CoreError::OrderNotOpen {
                order_id: self.id.clone(),
                current: self.status,
            });
        }
        Ok(())
    }

    /// Re-checks every line against the rules `add_item` enforces.
    pub(crate) fn validate_lines(&self) -> ValidationResult<()> {
        self.items.iter().try_for_each(|line| {
            validate_quantity(line.quantity)?;
            validate_price_cents(line.unit_price_cents)
        })
    }

    pub(crate) fn recompute_total(&mut self) {
        self.total_cents = self.items.iter().map(OrderItem::line_total).sum::<Money>().cents();
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Ticket footer: prices are tax-inclusive, so VAT is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Net of VAT.
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    pub fn from_total(total: Money, rate: TaxRate) -> Self {
        let (subtotal, tax) = total.split_inclusive_tax(rate);
        OrderTotals {
            subtotal,
            tax,
            total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
