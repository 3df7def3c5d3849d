//! # Navigation Commands
//!
//! A denied request is not an error: the presentation layer renders the
//! fallback view the outcome names.

use nova_core::access;
use nova_core::{Navigation, View};
use serde::Serialize;
use tracing::debug;

use crate::app::App;
use crate::error::ApiResult;

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEntry {
    pub view: View,
    pub label: &'static str,
}

/// Resolves a request to open `view` for the signed-in role.
pub fn navigate(app: &App, view: View) -> ApiResult<Navigation> {
    let role = app.role()?;
    let outcome = access::navigate(role, view);
    debug!(%role, requested = %view, granted = outcome.is_granted(), "navigate command");
    Ok(outcome)
}

pub fn visible_views(app: &App) -> ApiResult<Vec<ViewEntry>> {
    let role = app.role()?;
    Ok(access::visible_views(role)
        .into_iter()
        .map(|view| ViewEntry {
            view,
            label: view.label(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{app, app_as};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_waiter_cannot_open_settings() {
        let (app, _) = app_as("saraservice", "000").await;
        let outcome = navigate(&app, View::Settings).unwrap();
        assert_eq!(
            outcome,
            Navigation::Denied {
                requested: View::Settings,
                fallback: View::Dashboard,
            }
        );
        assert_eq!(outcome.view(), View::Dashboard);
    }

    #[tokio::test]
    async fn test_admin_sees_every_view() {
        let (app, _) = app_as("admin", "1234").await;
        let entries = visible_views(&app).unwrap();
        assert_eq!(entries.len(), View::ALL.len());
        assert_eq!(entries[1].label, "Service (POS)");
        assert!(navigate(&app, View::Settings).unwrap().is_granted());
    }

    #[tokio::test]
    async fn test_signed_out_navigation_is_denied() {
        let (app, _) = app().await;
        assert_eq!(
            navigate(&app, View::Dashboard).unwrap_err().code,
            ErrorCode::AccessDenied
        );
    }
}
