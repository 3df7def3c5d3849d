//! # Dashboard Commands
//!
//! ```text
//! ┌────────────────┬────────────────┬────────────────┬────────────────┐
//! │ Revenue        │ Tables         │ Critical stock │ Open orders    │
//! │ 31.00 €        │ 2 / 6          │ 1              │ 2              │
//! └────────────────┴────────────────┴────────────────┴────────────────┘
//! ```

use nova_core::{DashboardSummary, Table, View};
use serde::Serialize;
use tracing::debug;

use crate::app::App;
use crate::error::ApiResult;
use crate::state::currency_code;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub restaurant_name: String,
    pub summary: DashboardSummary,
    /// Revenue in display form (`"31.00 €"`).
    pub revenue_display: String,
    pub currency_symbol: String,
    pub currency_code: &'static str,
    /// The floor plan.
    pub tables: Vec<Table>,
}

pub fn dashboard_summary(app: &App) -> ApiResult<DashboardResponse> {
    debug!("dashboard_summary command");
    app.authorize_view(View::Dashboard)?;

    let (summary, currency, tables) = app.restaurant().with_restaurant(|r| {
        (r.summary(), r.currency().to_string(), r.tables().to_vec())
    });

    Ok(DashboardResponse {
        restaurant_name: app.config().restaurant_name.clone(),
        revenue_display: app
            .config()
            .format_currency(summary.revenue.cents(), &currency),
        currency_code: currency_code(&currency),
        currency_symbol: currency,
        summary,
        tables,
    })
}
