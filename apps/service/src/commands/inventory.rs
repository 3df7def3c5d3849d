//! # Inventory Commands
//!
//! Stock levels with their critical flag, manual adjustments, and the
//! advisory forecast.
//!
//! ```text
//! adjust_stock(i2, -3.0)   5.0 kg ──► 2.0 kg   (critical: 2.0 < 15.0)
//! adjust_stock(i2, -9.0)   2.0 kg ──► 0.0 kg   (floored at zero)
//! ```

use nova_core::advisory::predict_needs;
use nova_core::inventory::StockLine;
use nova_core::{Operation, StockForecast, View};
use tracing::debug;

use crate::app::App;
use crate::error::ApiResult;

pub fn inventory(app: &App) -> ApiResult<Vec<StockLine>> {
    app.authorize_view(View::Inventory)?;
    Ok(app
        .restaurant()
        .with_restaurant(|r| r.inventory().iter().map(StockLine::from).collect()))
}

/// Items below their minimum level.
pub fn critical_stock(app: &App) -> ApiResult<Vec<StockLine>> {
    app.authorize_view(View::Inventory)?;
    Ok(app.restaurant().with_restaurant(|r| {
        r.critical_stock()
            .into_iter()
            .map(StockLine::from)
            .collect()
    }))
}

/// Adds `delta` (negative to consume) to an item's quantity.
pub async fn adjust_stock(app: &App, item_id: &str, delta: f64) -> ApiResult<StockLine> {
    debug!(item_id = %item_id, delta, "adjust_stock command");
    let item = app
        .commit(Operation::AdjustStock, |r| r.adjust_stock(item_id, delta))
        .await?;
    Ok(StockLine::from(&item))
}

/// Next-week stock forecast. Advisory failures come back as the fixed
/// fallback forecast, never as an error.
pub async fn forecast_stock(app: &App) -> ApiResult<StockForecast> {
    debug!("forecast_stock command");
    app.authorize(Operation::ForecastStock)?;

    let snapshot = app.restaurant().with_restaurant(|r| r.inventory_snapshot());
    Ok(predict_needs(app.advisor(), &snapshot).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{app_as, boot_with};
    use crate::commands::session;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;
    use nova_core::advisory::FORECAST_FAILED_SUMMARY;
    use nova_core::StateKey;
    use nova_db::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_adjust_stock_floors_at_zero() {
        let (app, store) = app_as("chefbernie", "789").await;

        let line = adjust_stock(&app, "i2", -3.0).await.unwrap();
        assert_eq!(line.item.stock(), 2.0);
        assert!(line.critical);

        let line = adjust_stock(&app, "i2", -9.0).await.unwrap();
        assert_eq!(line.item.stock(), 0.0);
        assert!(store.contains(StateKey::Inventory));
    }

    #[tokio::test]
    async fn test_restock_clears_critical() {
        let (app, _) = app_as("jmanager", "456").await;
        assert_eq!(critical_stock(&app).unwrap().len(), 1);

        adjust_stock(&app, "i2", 20.0).await.unwrap();
        assert!(critical_stock(&app).unwrap().is_empty());
        assert!(inventory(&app).unwrap().iter().all(|l| !l.critical));
    }

    #[tokio::test]
    async fn test_adjust_rejects_bad_input() {
        let (app, _) = app_as("admin", "1234").await;
        let err = adjust_stock(&app, "i9", 1.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = adjust_stock(&app, "i1", f64::NAN).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_forecast_passes_through() {
        let (app, _) = app_as("chefbernie", "789").await;
        let forecast = forecast_stock(&app).await.unwrap();
        assert_eq!(forecast.summary, "Advice");
        assert_eq!(forecast.alerts.len(), 1);
    }

    #[tokio::test]
    async fn test_forecast_failure_falls_back() {
        let store = Arc::new(MemoryStore::new());
        let app = boot_with(ConfigState::default(), store, None).await;
        session::login(&app, "admin", "1234").await.unwrap();

        let forecast = forecast_stock(&app).await.unwrap();
        assert_eq!(forecast.summary, FORECAST_FAILED_SUMMARY);
        assert!(forecast.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_waiter_has_no_inventory() {
        let (app, _) = app_as("saraservice", "000").await;
        assert_eq!(inventory(&app).unwrap_err().code, ErrorCode::AccessDenied);
        assert!(forecast_stock(&app).await.is_err());
    }
}
