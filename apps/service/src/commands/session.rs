//! # Session Commands
//!
//! ```text
//! ┌──────────┐  login(ok)   ┌──────────────┐
//! │ Signed   │─────────────►│ Signed in    │──► views for the role
//! │ out      │◄─────────────│ (persisted)  │
//! └──────────┘   logout     └──────────────┘
//!      ▲                          │
//!      └── restore fails ◄────────┘ restart: marker re-resolved
//! ```
//!
//! Logging out never touches orders, tables or the draft.

use nova_core::access::visible_views;
use nova_core::{Role, User, View};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::App;
use crate::error::{ApiError, ApiResult};

/// A user as shown to the presentation layer. The stored credential
/// never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub active: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
            email: user.email.clone(),
            active: user.active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    /// Menu entries for the role, in menu order.
    pub views: Vec<View>,
}

impl From<&User> for LoginResponse {
    fn from(user: &User) -> Self {
        LoginResponse {
            user: UserProfile::from(user),
            views: visible_views(user.role),
        }
    }
}

/// Signs a user in and persists the session marker.
///
/// Unknown usernames, wrong credentials and inactive accounts all fail
/// with the same `NOT_FOUND` error. The credential is verified on a
/// blocking thread against a copy of the directory, so an Argon2 check
/// neither stalls the runtime nor holds the restaurant lock.
pub async fn login(app: &App, username: &str, credential: &str) -> ApiResult<LoginResponse> {
    debug!(username = %username, "login command");

    let directory = app.restaurant().with_restaurant(|r| r.directory().clone());
    let check = app.shared_credentials();
    let (name, secret) = (username.to_string(), credential.to_string());
    let verified = tokio::task::spawn_blocking(move || {
        directory.authenticate(&name, &secret, check.as_ref()).cloned()
    })
    .await
    .map_err(|e| ApiError::internal(format!("Credential check did not complete: {e}")))?;

    let user = verified.map_err(|e| {
        warn!(username = %username, "Login rejected");
        e
    })?;

    app.session().with_session_mut(|s| s.login(user.clone()));
    app.persist_session().await;
    app.draft().with_draft_mut(|d| d.clear());

    Ok(LoginResponse::from(&user))
}

pub async fn logout(app: &App) {
    debug!("logout command");
    app.session().with_session_mut(|s| s.logout());
    app.persist_session().await;
}

/// Re-reads the persisted session marker, as the presentation layer does
/// on start.
pub async fn restore_session(app: &App) -> Option<LoginResponse> {
    debug!("restore_session command");
    if !app.restore_persisted_session().await {
        return None;
    }
    let user = app.session().current_user()?;
    info!(user_id = %user.id, "Session resumed");
    Some(LoginResponse::from(&user))
}

pub fn current_user(app: &App) -> Option<UserProfile> {
    app.session()
        .current_user()
        .map(|user| UserProfile::from(&user))
}
