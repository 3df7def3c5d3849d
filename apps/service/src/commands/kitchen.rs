//! # Kitchen Commands
//!
//! The kitchen display: one ticket per open order, oldest first.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ TABLE 2            19:42      │
//! │ 2x Margherita Pizza  COOKING  │   advance_item ──► READY
//! │ 1x Red Wine (Glass)  READY    │
//! │ [ Serve ]                     │   serve_ticket (all READY)
//! └───────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use nova_core::{ItemStatus, Operation, OrderItem, View};
use serde::Serialize;
use tracing::debug;

use crate::app::App;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub order_id: String,
    /// Floor number, 0 when the table was removed from the plan.
    pub table_number: u32,
    pub created_at: DateTime<Utc>,
    /// Lines not yet served.
    pub items: Vec<OrderItem>,
}

pub fn kitchen_tickets(app: &App) -> ApiResult<Vec<Ticket>> {
    app.authorize_view(View::Kitchen)?;

    let tickets = app.restaurant().with_restaurant(|r| {
        r.tickets()
            .into_iter()
            .map(|order| Ticket {
                order_id: order.id.clone(),
                table_number: r.table(&order.table_id).map(|t| t.number).unwrap_or(0),
                created_at: order.created_at,
                items: order.kitchen_lines().cloned().collect(),
            })
            .collect::<Vec<_>>()
    });
    debug!(count = tickets.len(), "kitchen_tickets command");
    Ok(tickets)
}

/// Moves one line to its next kitchen status.
pub async fn advance_item(
    app: &App,
    order_id: &str,
    item_id: &str,
    to: ItemStatus,
) -> ApiResult<Ticket> {
    debug!(order_id = %order_id, item_id = %item_id, %to, "advance_item command");
    let order = app
        .commit(Operation::AdvanceTicket, |r| r.advance_item(order_id, item_id, to))
        .await?;
    Ok(ticket_for(app, order))
}

/// Marks every line of a READY ticket as served.
pub async fn serve_ticket(app: &App, order_id: &str) -> ApiResult<Ticket> {
    debug!(order_id = %order_id, "serve_ticket command");
    let order = app
        .commit(Operation::AdvanceTicket, |r| r.serve_ticket(order_id))
        .await?;
    Ok(ticket_for(app, order))
}

fn ticket_for(app: &App, order: nova_core::Order) -> Ticket {
    let table_number = app
        .restaurant()
        .with_restaurant(|r| r.table(&order.table_id).map(|t| t.number).unwrap_or(0));
    Ticket {
        table_number,
        created_at: order.created_at,
        items: order.kitchen_lines().cloned().collect(),
        order_id: order.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::app_as;
    use crate::commands::{pos, session};
    use crate::error::ErrorCode;

    async fn order_on_t2(app: &App) -> (String, Vec<String>) {
        pos::add_to_draft(app, "m1").unwrap();
        pos::add_to_draft(app, "m5").unwrap();
        let order = pos::submit_order(app, "t2").await.unwrap().order;
        let lines = order.items().iter().map(|i| i.id.clone()).collect();
        (order.id, lines)
    }

    #[tokio::test]
    async fn test_ticket_progress() {
        let (app, _) = app_as("saraservice", "000").await;
        let (order_id, lines) = order_on_t2(&app).await;

        session::login(&app, "chefbernie", "789").await.unwrap();
        let tickets = kitchen_tickets(&app).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].table_number, 2);

        let err = serve_ticket(&app, &order_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        for line in &lines {
            advance_item(&app, &order_id, line, ItemStatus::Cooking)
                .await
                .unwrap();
            advance_item(&app, &order_id, line, ItemStatus::Ready)
                .await
                .unwrap();
        }
        let ticket = serve_ticket(&app, &order_id).await.unwrap();
        assert!(ticket.items.is_empty());
        assert_eq!(kitchen_tickets(&app).unwrap()[0].items.len(), 0);
    }

    #[tokio::test]
    async fn test_item_cannot_skip_or_serve() {
        let (app, _) = app_as("admin", "1234").await;
        let (order_id, lines) = order_on_t2(&app).await;

        let err = advance_item(&app, &order_id, &lines[0], ItemStatus::Ready)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = advance_item(&app, &order_id, &lines[0], ItemStatus::Served)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_waiter_has_no_kitchen() {
        let (app, _) = app_as("saraservice", "000").await;
        let (order_id, lines) = order_on_t2(&app).await;

        assert!(kitchen_tickets(&app).is_err());
        let err = advance_item(&app, &order_id, &lines[0], ItemStatus::Cooking)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
    }
}
