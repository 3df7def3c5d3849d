//! # Settings Commands
//!
//! Administrator screen: floor plan, staff accounts and the currency.
//!
//! ## Account Edits and the Active Session
//! ```text
//! update_user / remove_user
//!      │
//!      ├── directory changed, Users key persisted
//!      └── refresh_session
//!             ├── signed-in user still active ──► cached copy refreshed
//!             └── removed or deactivated      ──► signed out, marker cleared
//! ```

use nova_core::session::{NewUser, UserUpdate};
use nova_core::{Operation, Table, View};
use serde::Serialize;
use tracing::{debug, info};

use crate::app::App;
use crate::commands::session::UserProfile;
use crate::error::ApiResult;
use crate::state::{currency_code, CredentialMode};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub restaurant_name: String,
    pub currency_symbol: String,
    pub currency_code: &'static str,
    /// VAT included in menu prices, in percent.
    pub vat_rate: f64,
    pub credential_mode: CredentialMode,
    pub tables: Vec<Table>,
}

pub fn get_settings(app: &App) -> ApiResult<SettingsResponse> {
    debug!("get_settings command");
    app.authorize_view(View::Settings)?;

    let (currency, tables) = app
        .restaurant()
        .with_restaurant(|r| (r.currency().to_string(), r.tables().to_vec()));
    let config = app.config();

    Ok(SettingsResponse {
        restaurant_name: config.restaurant_name.clone(),
        currency_code: currency_code(&currency),
        currency_symbol: currency,
        vat_rate: config.vat_rate().percentage(),
        credential_mode: config.credential_mode,
        tables,
    })
}

// =============================================================================
// Floor Plan
// =============================================================================

/// Adds a table numbered after the highest one on the floor.
pub async fn add_table(app: &App, capacity: u32) -> ApiResult<Table> {
    debug!(capacity, "add_table command");
    app.commit(Operation::ConfigureFloor, |r| r.add_table(capacity))
        .await
}

pub async fn update_table(app: &App, table_id: &str, number: u32, capacity: u32) -> ApiResult<Table> {
    debug!(table_id = %table_id, number, capacity, "update_table command");
    app.commit(Operation::ConfigureFloor, |r| {
        r.update_table(table_id, number, capacity)
    })
    .await
}

/// Refused while the table holds an open order.
pub async fn remove_table(app: &App, table_id: &str) -> ApiResult<Table> {
    debug!(table_id = %table_id, "remove_table command");
    app.commit(Operation::ConfigureFloor, |r| r.remove_table(table_id))
        .await
}

// =============================================================================
// Currency
// =============================================================================

pub async fn set_currency(app: &App, symbol: &str) -> ApiResult<SettingsResponse> {
    debug!(symbol = %symbol, "set_currency command");
    app.commit(Operation::ChangeCurrency, |r| r.set_currency(symbol))
        .await?;
    get_settings(app)
}

// =============================================================================
// Users
// =============================================================================

pub fn list_users(app: &App) -> ApiResult<Vec<UserProfile>> {
    app.authorize(Operation::ManageUsers)?;
    Ok(app.restaurant().with_restaurant(|r| {
        r.directory().users().iter().map(UserProfile::from).collect()
    }))
}

pub async fn add_user(app: &App, new: NewUser) -> ApiResult<UserProfile> {
    debug!(username = %new.username, role = %new.role, "add_user command");
    let user = app
        .commit(Operation::ManageUsers, |r| r.add_user(new, app.credentials()))
        .await?;
    Ok(UserProfile::from(&user))
}

pub async fn update_user(app: &App, user_id: &str, update: UserUpdate) -> ApiResult<UserProfile> {
    debug!(user_id = %user_id, "update_user command");
    let user = app
        .commit(Operation::ManageUsers, |r| {
            r.update_user(user_id, update, app.credentials())
        })
        .await?;
    app.refresh_session().await;
    Ok(UserProfile::from(&user))
}

pub async fn remove_user(app: &App, user_id: &str) -> ApiResult<UserProfile> {
    debug!(user_id = %user_id, "remove_user command");
    let user = app
        .commit(Operation::ManageUsers, |r| r.remove_user(user_id))
        .await?;
    info!(user_id = %user.id, "Account removed from settings");
    app.refresh_session().await;
    Ok(UserProfile::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::app_as;
    use crate::commands::{pos, session};
    use crate::error::ErrorCode;
    use nova_core::{Role, StateKey, TableStatus};

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            name: "Lina Bar".to_string(),
            username: username.to_string(),
            credential: "2468".to_string(),
            role,
            email: "lina@novaresto.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_floor_plan_edits() {
        let (app, store) = app_as("admin", "1234").await;

        let table = add_table(&app, 4).await.unwrap();
        assert_eq!(table.number, 7);
        assert_eq!(table.status(), TableStatus::Available);

        let table = update_table(&app, &table.id, 12, 6).await.unwrap();
        assert_eq!((table.number, table.capacity), (12, 6));

        let err = update_table(&app, &table.id, 1, 6).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        remove_table(&app, &table.id).await.unwrap();
        assert_eq!(get_settings(&app).unwrap().tables.len(), 6);
        assert!(store.contains(StateKey::Tables));
    }

    #[tokio::test]
    async fn test_occupied_table_cannot_be_removed() {
        let (app, _) = app_as("admin", "1234").await;
        pos::add_to_draft(&app, "m2").unwrap();
        pos::submit_order(&app, "t1").await.unwrap();

        let err = remove_table(&app, "t1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_currency_change_persists() {
        let (app, store) = app_as("admin", "1234").await;
        let settings = set_currency(&app, "DH").await.unwrap();
        assert_eq!(settings.currency_symbol, "DH");
        assert_eq!(settings.currency_code, "MAD");
        assert_eq!(store.get_raw(StateKey::Currency).as_deref(), Some("\"DH\""));

        let err = set_currency(&app, "  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_manager_cannot_configure() {
        let (app, store) = app_as("jmanager", "456").await;
        let err = add_table(&app, 4).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
        assert!(list_users(&app).is_err());
        assert!(!store.contains(StateKey::Tables));
    }

    #[tokio::test]
    async fn test_new_user_can_sign_in() {
        let (app, store) = app_as("admin", "1234").await;
        let profile = add_user(&app, new_user("lina", Role::Serveur)).await.unwrap();
        assert_eq!(list_users(&app).unwrap().len(), 5);
        assert!(store.contains(StateKey::Users));

        let err = add_user(&app, new_user("lina", Role::Gerant)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let response = session::login(&app, "lina", "2468").await.unwrap();
        assert_eq!(response.user.id, profile.id);
    }

    #[tokio::test]
    async fn test_last_admin_is_protected() {
        let (app, _) = app_as("admin", "1234").await;
        let err = remove_user(&app, "u1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let demote = UserUpdate {
            role: Some(Role::Gerant),
            ..UserUpdate::default()
        };
        let err = update_user(&app, "u1", demote).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_deactivating_self_ends_session() {
        let (app, store) = app_as("admin", "1234").await;
        let promote = UserUpdate {
            role: Some(Role::Admin),
            ..UserUpdate::default()
        };
        update_user(&app, "u2", promote).await.unwrap();

        let deactivate = UserUpdate {
            active: Some(false),
            ..UserUpdate::default()
        };
        update_user(&app, "u1", deactivate).await.unwrap();

        assert!(session::current_user(&app).is_none());
        assert!(!store.contains(StateKey::Session));
        assert!(session::login(&app, "admin", "1234").await.is_err());
    }

    #[tokio::test]
    async fn test_rename_refreshes_session() {
        let (app, _) = app_as("admin", "1234").await;
        let rename = UserUpdate {
            name: Some("Chef de Salle".to_string()),
            ..UserUpdate::default()
        };
        update_user(&app, "u1", rename).await.unwrap();
        assert_eq!(
            session::current_user(&app).map(|u| u.name),
            Some("Chef de Salle".to_string())
        );
    }
}
