//! # POS Commands
//!
//! Table service from the waiter's screen.
//!
//! ## Table Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌───────────┐ submit_order ┌──────────┐ close_order ┌─────────┐        │
//! │  │ AVAILABLE │─────────────►│ OCCUPIED │────────────►│  DIRTY  │        │
//! │  └───────────┘              └──────────┘             └─────────┘        │
//! │     ▲     │ reserve_table        │ add_item               │             │
//! │     │     ▼                      │ remove_item            │             │
//! │  ┌──────────┐                    ▼                         │             │
//! │  │ RESERVED │─── release ───► AVAILABLE ◄── clean_table ───┘             │
//! │  └──────────┘                                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Draft
//! The draft is the order being composed before it reaches the kitchen.
//! It lives in memory only and is cleared when an order is submitted or a
//! user signs in.

use nova_core::{
    CloseOutcome, CoreError, MenuItem, Order, OrderTotals, Operation, Table, View,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::app::App;
use crate::error::{ApiError, ApiResult};
use crate::state::DraftView;

/// An order with its tax breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order: Order,
    pub totals: OrderTotals,
}

impl OrderResponse {
    fn new(app: &App, order: Order) -> Self {
        let totals = order.totals(app.config().vat_rate());
        OrderResponse { order, totals }
    }
}

/// What the POS shows after a table is picked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSelection {
    pub table: Table,
    /// The running order when the table is occupied.
    pub open_order: Option<OrderResponse>,
}

// =============================================================================
// Floor & Menu
// =============================================================================

/// Picks a table on the floor plan.
///
/// Cooks see the floor on the dashboard but cannot open a ticket.
pub fn select_table(app: &App, table_id: &str) -> ApiResult<TableSelection> {
    debug!(table_id = %table_id, "select_table command");
    app.authorize(Operation::SelectTable)?;

    let (table, open_order) = app.restaurant().with_restaurant(|r| {
        let table = r.table(table_id)?.clone();
        let open_order = r.open_order_for_table(table_id).cloned();
        Ok::<_, CoreError>((table, open_order))
    })?;

    Ok(TableSelection {
        table,
        open_order: open_order.map(|order| OrderResponse::new(app, order)),
    })
}

pub fn menu(app: &App) -> ApiResult<Vec<MenuItem>> {
    app.authorize_view(View::Pos)?;
    Ok(app
        .restaurant()
        .with_restaurant(|r| r.catalog().items().to_vec()))
}

// =============================================================================
// Draft
// =============================================================================

pub fn get_draft(app: &App) -> ApiResult<DraftView> {
    app.authorize_view(View::Pos)?;
    Ok(app.draft().with_draft(|d| DraftView::from(d)))
}

/// Adds one unit of a menu item to the draft.
pub fn add_to_draft(app: &App, menu_item_id: &str) -> ApiResult<DraftView> {
    debug!(menu_item_id = %menu_item_id, "add_to_draft command");
    app.authorize(Operation::SubmitOrder)?;

    let item = app
        .restaurant()
        .with_restaurant(|r| r.catalog().menu_item(menu_item_id).cloned())
        .ok_or_else(|| CoreError::MenuItemNotFound(menu_item_id.to_string()))?;

    app.draft().with_draft_mut(|d| {
        d.add(&item)?;
        Ok(DraftView::from(&*d))
    })
}

pub fn remove_from_draft(app: &App, menu_item_id: &str) -> ApiResult<DraftView> {
    debug!(menu_item_id = %menu_item_id, "remove_from_draft command");
    app.authorize(Operation::SubmitOrder)?;

    app.draft().with_draft_mut(|d| {
        if !d.remove(menu_item_id) {
            return Err(CoreError::MenuItemNotFound(menu_item_id.to_string()).into());
        }
        Ok(DraftView::from(&*d))
    })
}

pub fn clear_draft(app: &App) -> ApiResult<DraftView> {
    app.authorize(Operation::SubmitOrder)?;
    Ok(app.draft().with_draft_mut(|d| {
        d.clear();
        DraftView::from(&*d)
    }))
}

// =============================================================================
// Orders
// =============================================================================

/// Sends the draft to the kitchen as a new order on `table_id`.
///
/// ## Flow
/// ```text
/// 1. draft empty?              ──► VALIDATION_ERROR, nothing changes
/// 2. create_order(table, lines)
///      table not AVAILABLE     ──► CONFLICT, draft kept
/// 3. table OCCUPIED, order OPEN, lines PENDING on the kitchen screen
/// 4. draft cleared
/// ```
pub async fn submit_order(app: &App, table_id: &str) -> ApiResult<OrderResponse> {
    debug!(table_id = %table_id, "submit_order command");
    app.authorize(Operation::SubmitOrder)?;

    let items = app.draft().with_draft(|d| d.lines().to_vec());
    if items.is_empty() {
        return Err(ApiError::validation("Cannot submit an empty order"));
    }

    let order = app
        .commit(Operation::SubmitOrder, |r| r.create_order(table_id, items))
        .await?;
    app.draft().with_draft_mut(|d| d.clear());

    info!(
        order_id = %order.id,
        table_id = %table_id,
        lines = order.items().len(),
        "Order submitted"
    );
    Ok(OrderResponse::new(app, order))
}

/// Adds `quantity` of a menu item to an open order.
pub async fn add_item(
    app: &App,
    order_id: &str,
    menu_item_id: &str,
    quantity: Option<i64>,
) -> ApiResult<OrderResponse> {
    let quantity = quantity.unwrap_or(1);
    debug!(order_id = %order_id, menu_item_id = %menu_item_id, quantity, "add_item command");

    let order = app
        .commit(Operation::ModifyOrder, |r| {
            r.add_item(order_id, menu_item_id, quantity)
        })
        .await?;
    Ok(OrderResponse::new(app, order))
}

pub async fn remove_item(app: &App, order_id: &str, menu_item_id: &str) -> ApiResult<OrderResponse> {
    debug!(order_id = %order_id, menu_item_id = %menu_item_id, "remove_item command");

    let order = app
        .commit(Operation::ModifyOrder, |r| r.remove_item(order_id, menu_item_id))
        .await?;
    Ok(OrderResponse::new(app, order))
}

/// Settles or cancels an order. Its table goes to DIRTY either way.
pub async fn close_order(
    app: &App,
    order_id: &str,
    outcome: CloseOutcome,
) -> ApiResult<OrderResponse> {
    debug!(order_id = %order_id, ?outcome, "close_order command");

    let order = app
        .commit(Operation::CloseOrder, |r| r.close_order(order_id, outcome))
        .await?;
    info!(order_id = %order.id, status = %order.status(), total = %order.total(), "Order closed");
    Ok(OrderResponse::new(app, order))
}

// =============================================================================
// Tables
// =============================================================================

pub async fn clean_table(app: &App, table_id: &str) -> ApiResult<Table> {
    debug!(table_id = %table_id, "clean_table command");
    app.commit(Operation::BusTable, |r| r.clean_table(table_id))
        .await
}

pub async fn reserve_table(app: &App, table_id: &str) -> ApiResult<Table> {
    debug!(table_id = %table_id, "reserve_table command");
    app.commit(Operation::ReserveTable, |r| r.reserve_table(table_id))
        .await
}

pub async fn release_table(app: &App, table_id: &str) -> ApiResult<Table> {
    debug!(table_id = %table_id, "release_table command");
    app.commit(Operation::ReserveTable, |r| r.release_table(table_id))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::app_as;
    use crate::error::ErrorCode;
    use nova_core::{ItemStatus, Money, OrderStatus, StateKey, TableStatus};

    #[tokio::test]
    async fn test_full_table_cycle() {
        let (app, store) = app_as("saraservice", "000").await;

        add_to_draft(&app, "m1").unwrap();
        add_to_draft(&app, "m1").unwrap();
        let draft = add_to_draft(&app, "m5").unwrap();
        assert_eq!(draft.total, Money::from_cents(3100));

        let submitted = submit_order(&app, "t2").await.unwrap();
        let order_id = submitted.order.id.clone();
        assert_eq!(submitted.order.total(), Money::from_cents(3100));
        assert_eq!(submitted.totals.total, Money::from_cents(3100));
        assert!(submitted
            .order
            .items()
            .iter()
            .all(|i| i.status == ItemStatus::Pending));
        assert!(get_draft(&app).unwrap().lines.is_empty());

        let selection = select_table(&app, "t2").unwrap();
        assert_eq!(selection.table.status(), TableStatus::Occupied);
        assert_eq!(
            selection.open_order.map(|o| o.order.id),
            Some(order_id.clone())
        );

        let closed = close_order(&app, &order_id, CloseOutcome::Paid)
            .await
            .unwrap();
        assert_eq!(closed.order.status(), OrderStatus::Paid);
        assert_eq!(
            select_table(&app, "t2").unwrap().table.status(),
            TableStatus::Dirty
        );

        let table = clean_table(&app, "t2").await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);

        assert!(store.contains(StateKey::Orders));
        assert!(store.contains(StateKey::Tables));
        assert!(store
            .get_raw(StateKey::Orders)
            .is_some_and(|raw| raw.contains("\"PAID\"")));
    }

    #[tokio::test]
    async fn test_empty_draft_is_rejected() {
        let (app, store) = app_as("saraservice", "000").await;
        let err = submit_order(&app, "t1").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!store.contains(StateKey::Orders));
        assert_eq!(
            select_table(&app, "t1").unwrap().table.status(),
            TableStatus::Available
        );
    }

    #[tokio::test]
    async fn test_occupied_table_keeps_draft() {
        let (app, _) = app_as("saraservice", "000").await;
        add_to_draft(&app, "m2").unwrap();
        submit_order(&app, "t3").await.unwrap();

        add_to_draft(&app, "m4").unwrap();
        let err = submit_order(&app, "t3").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(get_draft(&app).unwrap().item_count, 1);
    }

    #[tokio::test]
    async fn test_cook_cannot_select_table() {
        let (app, _) = app_as("chefbernie", "789").await;
        let err = select_table(&app, "t1").unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
    }

    #[tokio::test]
    async fn test_modify_order_lines() {
        let (app, _) = app_as("jmanager", "456").await;
        add_to_draft(&app, "m1").unwrap();
        let order_id = submit_order(&app, "t6").await.unwrap().order.id;

        let updated = add_item(&app, &order_id, "m3", Some(2)).await.unwrap();
        assert_eq!(updated.order.total(), Money::from_cents(1250 + 2 * 2800));

        let updated = remove_item(&app, &order_id, "m1").await.unwrap();
        assert_eq!(updated.order.total(), Money::from_cents(5600));

        let err = add_item(&app, &order_id, "m99", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_closed_order_rejects_changes() {
        let (app, _) = app_as("saraservice", "000").await;
        add_to_draft(&app, "m4").unwrap();
        let order_id = submit_order(&app, "t1").await.unwrap().order.id;
        close_order(&app, &order_id, CloseOutcome::Cancelled)
            .await
            .unwrap();

        let err = add_item(&app, &order_id, "m4", Some(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        let err = close_order(&app, &order_id, CloseOutcome::Paid)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_reserve_and_release() {
        let (app, _) = app_as("saraservice", "000").await;
        let table = reserve_table(&app, "t1").await.unwrap();
        assert_eq!(table.status(), TableStatus::Reserved);

        let table = release_table(&app, "t4").await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);

        let err = clean_table(&app, "t1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_unknown_menu_item_in_draft() {
        let (app, _) = app_as("saraservice", "000").await;
        let err = add_to_draft(&app, "m42").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = remove_from_draft(&app, "m1").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
