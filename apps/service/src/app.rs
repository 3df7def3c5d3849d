//! # Application Handle
//!
//! Owns every state object and the two collaborators (state store and
//! advisory service). Commands receive `&App` the way a UI shell would
//! inject managed state.
//!
//! ## Command Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  commit(Operation::CloseOrder, |r| r.close_order(id, PAID))             │
//! │       │                                                                 │
//! │       ├── 1. session role?          none ──► ACCESS_DENIED             │
//! │       ├── 2. permits_operation?     no   ──► ACCESS_DENIED             │
//! │       ├── 3. lock restaurant, run engine  Err ──► mapped ApiError      │
//! │       ├── 4. take_changes + pending_writes (still locked)              │
//! │       ├── 5. unlock                                                     │
//! │       └── 6. sequenced writes       stale skipped, failures logged     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use nova_core::access::{permits, permits_operation};
use nova_core::session::{Argon2Credentials, PlaintextCredentials};
use nova_core::{
    AdvisoryService, Catalog, CoreError, CoreResult, CredentialCheck, Operation, Restaurant,
    Role, StateKey, View,
};
use nova_db::{
    load_restaurant, load_session, pending_writes, session_write, PendingWrite, StateStore,
    WriteSequencer,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::{ConfigState, CredentialMode, DraftState, RestaurantState, SessionState};

/// Boot report, readable without a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub restaurant_name: String,
    pub currency_symbol: String,
    pub tables: usize,
    pub open_orders: usize,
    pub critical_stock: usize,
    /// Username of the restored session, if any.
    pub signed_in: Option<String>,
    /// Increments on every engine mutation since boot.
    pub version: u64,
}

pub struct App {
    restaurant: RestaurantState,
    session: SessionState,
    draft: DraftState,
    config: ConfigState,
    store: Arc<dyn StateStore>,
    writes: WriteSequencer,
    advisor: Arc<dyn AdvisoryService>,
    credentials: Arc<dyn CredentialCheck>,
}

impl App {
    /// Loads every key (each falling back to its seeded default), prepares
    /// credentials for the configured mode and restores the last session.
    ///
    /// ## Startup Sequence
    /// ```text
    /// 1. load_restaurant(store)       tables, orders, inventory, users, currency
    /// 2. prepare_credentials          argon2 mode: hash remaining plaintext PINs
    /// 3. fresh-install currency       NOVA_CURRENCY when nothing is persisted
    /// 4. persist anything 2-3 changed
    /// 5. restore session              dropped if the user is gone or inactive
    /// ```
    pub async fn boot(
        config: ConfigState,
        store: Arc<dyn StateStore>,
        advisor: Arc<dyn AdvisoryService>,
    ) -> Self {
        let mut restaurant = load_restaurant(store.as_ref(), Catalog::seeded()).await;

        let credentials: Arc<dyn CredentialCheck> = match config.credential_mode {
            CredentialMode::Plaintext => Arc::new(PlaintextCredentials),
            CredentialMode::Argon2 => Arc::new(Argon2Credentials),
        };
        if let Err(e) = restaurant.prepare_credentials(credentials.as_ref()) {
            warn!(error = %e, "Failed to convert stored credentials");
        }

        let currency_persisted = matches!(store.load_raw(StateKey::Currency).await, Ok(Some(_)));
        if !currency_persisted && restaurant.currency() != config.currency_symbol {
            if let Err(e) = restaurant.set_currency(&config.currency_symbol) {
                warn!(error = %e, "Ignoring configured currency symbol");
            }
        }

        let changes = restaurant.take_changes();
        let writes = writes_for(&restaurant, changes);

        let app = App {
            restaurant: RestaurantState::new(restaurant),
            session: SessionState::new(),
            draft: DraftState::new(),
            config,
            store,
            writes: WriteSequencer::new(),
            advisor,
            credentials,
        };
        app.persist(writes).await;
        app.restore_persisted_session().await;

        info!(
            restaurant = %app.config.restaurant_name,
            signed_in = app.session.role().is_some(),
            "Service ready"
        );
        app
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }

    pub fn restaurant(&self) -> &RestaurantState {
        &self.restaurant
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    pub fn status(&self) -> ServiceStatus {
        let (summary, currency, version) = self
            .restaurant
            .with_restaurant(|r| (r.summary(), r.currency().to_string(), r.version()));
        ServiceStatus {
            restaurant_name: self.config.restaurant_name.clone(),
            currency_symbol: currency,
            tables: summary.total_tables,
            open_orders: summary.open_orders,
            critical_stock: summary.critical_stock,
            signed_in: self.session.current_user().map(|u| u.username),
            version,
        }
    }

    pub(crate) fn advisor(&self) -> &dyn AdvisoryService {
        self.advisor.as_ref()
    }

    pub(crate) fn credentials(&self) -> &dyn CredentialCheck {
        self.credentials.as_ref()
    }

    /// Owned handle for checks that run off the async worker.
    pub(crate) fn shared_credentials(&self) -> Arc<dyn CredentialCheck> {
        Arc::clone(&self.credentials)
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// The signed-in role, or `NotAuthenticated`.
    pub(crate) fn role(&self) -> ApiResult<Role> {
        self.session
            .role()
            .ok_or_else(|| CoreError::NotAuthenticated.into())
    }

    /// Checks that the session may run `operation`.
    pub(crate) fn authorize(&self, operation: Operation) -> ApiResult<Role> {
        let role = self.role()?;
        if !permits_operation(role, operation) {
            warn!(%role, %operation, "Operation denied");
            return Err(CoreError::AccessDenied {
                role: role.to_string(),
                operation: operation.to_string(),
            }
            .into());
        }
        Ok(role)
    }

    /// Checks that the session may open `view` (read-only commands).
    pub(crate) fn authorize_view(&self, view: View) -> ApiResult<Role> {
        let role = self.role()?;
        if !permits(role, view) {
            warn!(%role, %view, "View denied");
            return Err(CoreError::AccessDenied {
                role: role.to_string(),
                operation: view.to_string(),
            }
            .into());
        }
        Ok(role)
    }

    // =========================================================================
    // Mutation & Persistence
    // =========================================================================

    /// Runs an engine mutation gated by `operation`, then persists the keys
    /// it changed.
    pub(crate) async fn commit<T, F>(&self, operation: Operation, mutate: F) -> ApiResult<T>
    where
        F: FnOnce(&mut Restaurant) -> CoreResult<T>,
    {
        self.authorize(operation)?;

        let (value, writes) = self.restaurant.with_restaurant_mut(|restaurant| {
            let value = mutate(restaurant)?;
            let changes = restaurant.take_changes();
            Ok::<_, ApiError>((value, writes_for(restaurant, changes)))
        })?;

        debug!(%operation, writes = writes.len(), "Command committed");
        self.persist(writes).await;
        Ok(value)
    }

    /// Applies writes. A document older than the one already stored for its
    /// key is skipped. The in-memory state stays authoritative when the
    /// store fails.
    pub(crate) async fn persist(&self, writes: Vec<PendingWrite>) {
        if writes.is_empty() {
            return;
        }
        let failed = self.writes.apply(self.store.as_ref(), writes).await;
        if failed > 0 {
            warn!(failed, "Some state was not persisted");
        }
    }

    /// Writes the current session marker (or clears it when signed out).
    pub(crate) async fn persist_session(&self) {
        let record = self.session.with_session(|s| s.record());
        match session_write(record.as_ref()) {
            Ok(write) => self.persist(vec![write]).await,
            Err(e) => error!(error = %e, "Failed to serialize session"),
        }
    }

    /// Re-resolves the persisted session marker. Returns whether a user is
    /// now signed in.
    pub(crate) async fn restore_persisted_session(&self) -> bool {
        let Some(record) = load_session(self.store.as_ref()).await else {
            return false;
        };

        let directory = self.restaurant.with_restaurant(|r| r.directory().clone());
        let restored = self
            .session
            .with_session_mut(|s| s.restore(&record, &directory));
        if !restored {
            self.persist_session().await;
        }
        restored
    }

    /// Follows a user-directory edit into the session. A signed-in user who
    /// was removed or deactivated is signed out.
    pub(crate) async fn refresh_session(&self) {
        let directory = self.restaurant.with_restaurant(|r| r.directory().clone());
        let ended = self.session.with_session_mut(|s| {
            let was_signed_in = s.current().is_some();
            s.refresh(&directory);
            was_signed_in && s.current().is_none()
        });
        if ended {
            self.persist_session().await;
        }
    }
}

/// Serializes `changes`. A failure here is logged; the mutation has
/// already happened and stays.
fn writes_for<I>(restaurant: &Restaurant, changes: I) -> Vec<PendingWrite>
where
    I: IntoIterator<Item = StateKey>,
{
    pending_writes(restaurant, changes).unwrap_or_else(|e| {
        error!(error = %e, "Failed to serialize changed state");
        Vec::new()
    })
}

// =============================================================================
// Test Support
// =============================================================================


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::error::ErrorCode;
    use nova_core::SessionRecord;
    use nova_db::MemoryStore;

    #[tokio::test]
    async fn test_boot_empty_store_is_seeded() {
        let (app, store) = app().await;
        assert_eq!(app.restaurant().with_restaurant(|r| r.tables().len()), 6);
        assert!(app.session().role().is_none());
        assert!(!store.contains(StateKey::Tables));
    }

    #[tokio::test]
    async fn test_commit_requires_session() {
        let (app, _) = app().await;
        let err = app
            .commit(Operation::BusTable, |r| r.clean_table("t5"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);
        assert_eq!(
            app.restaurant()
                .with_restaurant(|r| r.table("t5").unwrap().status()),
            nova_core::TableStatus::Dirty
        );
    }

    #[tokio::test]
    async fn test_commit_persists_changed_keys() {
        let (app, store) = app_as("saraservice", "000").await;
        app.commit(Operation::BusTable, |r| r.clean_table("t5"))
            .await
            .unwrap();
        assert!(store.contains(StateKey::Tables));
        assert!(!store.contains(StateKey::Orders));
    }

    #[tokio::test]
    async fn test_late_older_snapshot_does_not_overwrite_newer() {
        let (app, store) = app_as("saraservice", "000").await;
        let older = app.restaurant().with_restaurant_mut(|r| {
            r.clean_table("t5").unwrap();
            let changes = r.take_changes();
            writes_for(r, changes)
        });
        app.commit(Operation::ReserveTable, |r| r.reserve_table("t1"))
            .await
            .unwrap();
        app.persist(older).await;

        let tables: Vec<nova_core::Table> =
            serde_json::from_str(&store.get_raw(StateKey::Tables).unwrap()).unwrap();
        let status = |id: &str| tables.iter().find(|t| t.id == id).unwrap().status();
        assert_eq!(status("t1"), nova_core::TableStatus::Reserved);
        assert_eq!(status("t5"), nova_core::TableStatus::Available);
    }

    #[tokio::test]
    async fn test_boot_restores_session() {
        let store = Arc::new(MemoryStore::new());
        let record = SessionRecord {
            user_id: "u2".to_string(),
            started_at: chrono::Utc::now(),
        };
        store.insert_raw(StateKey::Session, serde_json::to_string(&record).unwrap());

        let app = boot_with(ConfigState::default(), store, None).await;
        assert_eq!(app.session().role(), Some(Role::Gerant));
    }

    #[tokio::test]
    async fn test_boot_drops_stale_session() {
        let store = Arc::new(MemoryStore::new());
        store.insert_raw(
            StateKey::Session,
            r#"{"userId":"ghost","startedAt":"2024-05-01T10:00:00Z"}"#,
        );

        let app = boot_with(ConfigState::default(), store.clone(), None).await;
        assert!(app.session().role().is_none());
        assert!(!store.contains(StateKey::Session));
    }

    #[tokio::test]
    async fn test_boot_applies_fresh_install_currency_once() {
        let store = Arc::new(MemoryStore::new());
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            ..ConfigState::default()
        };
        let app = boot_with(config.clone(), store.clone(), None).await;
        assert_eq!(app.restaurant().with_restaurant(|r| r.currency().to_string()), "$");
        assert_eq!(store.get_raw(StateKey::Currency).as_deref(), Some("\"$\""));

        store.insert_raw(StateKey::Currency, "\"£\"");
        let app = boot_with(config, store, None).await;
        assert_eq!(app.restaurant().with_restaurant(|r| r.currency().to_string()), "£");
    }

    #[tokio::test]
    async fn test_boot_argon2_mode_hashes_pins() {
        let store = Arc::new(MemoryStore::new());
        let config = ConfigState {
            credential_mode: CredentialMode::Argon2,
            ..ConfigState::default()
        };
        let app = boot_with(config, store.clone(), None).await;

        let stored = store.get_raw(StateKey::Users).unwrap();
        assert!(stored.contains("$argon2"));
        assert!(!stored.contains("\"credential\":\"1234\""));

        crate::commands::session::login(&app, "admin", "1234")
            .await
            .unwrap();
        assert_eq!(app.session().role(), Some(Role::Admin));
    }
}
