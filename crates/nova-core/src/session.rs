//! # Session & Identity
//!
//! User directory, credential checks and the active session.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  authenticate("admin", "1234")                                          │
//! │       │                                                                 │
//! │       ├── username empty?            ──► ValidationError                │
//! │       │                                                                 │
//! │       ├── for each ACTIVE user with that exact username:               │
//! │       │       CredentialCheck::verify(input, stored)                   │
//! │       │                                                                 │
//! │       ├── match  ──► User ──► Session::login ──► SessionRecord (saved) │
//! │       └── none   ──► UserNotFound                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Credential Seam
//! Stored credentials are compared through [`CredentialCheck`]. The
//! plaintext implementation keeps default PIN accounts working; the argon2
//! implementation verifies PHC strings and hashes new credentials. Call
//! sites never look at the stored value themselves.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Role, User};
use crate::validation::{
    validate_credential, validate_display_name, validate_email, validate_username,
};

// =============================================================================
// Credential Check
// =============================================================================

/// Compares a submitted credential with the stored one.
pub trait CredentialCheck: Send + Sync {
    /// Whether `submitted` matches `stored`.
    fn verify(&self, submitted: &str, stored: &str) -> bool;

    /// Turns a new credential into its stored form.
    fn prepare(&self, credential: &str) -> CoreResult<String>;

    /// Whether `stored` is already in this check's stored form.
    fn is_prepared(&self, _stored: &str) -> bool {
        true
    }
}

/// Exact string match. Kept for compatibility with PIN accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCredentials;

impl CredentialCheck for PlaintextCredentials {
    fn verify(&self, submitted: &str, stored: &str) -> bool {
        submitted == stored
    }

    fn prepare(&self, credential: &str) -> CoreResult<String> {
        Ok(credential.to_string())
    }
}

/// Argon2id PHC verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Credentials;

impl CredentialCheck for Argon2Credentials {
    fn verify(&self, submitted: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            warn!("Stored credential is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(submitted.as_bytes(), &parsed)
            .is_ok()
    }

    fn prepare(&self, credential: &str) -> CoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(credential.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                ValidationError::InvalidFormat {
                    field: "credential".to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn is_prepared(&self, stored: &str) -> bool {
        PasswordHash::new(stored).is_ok()
    }
}

// =============================================================================
// User Directory
// =============================================================================

/// Input for a new account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub credential: String,
    pub role: Role,
    pub email: String,
}

/// Partial update of an account. `None` leaves the field alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub credential: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

/// Staff accounts, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        UserDirectory { users }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Finds the active user whose username and credential both match.
    ///
    /// A wrong credential and an unknown username are the same failure.
    pub fn authenticate(
        &self,
        username: &str,
        credential: &str,
        check: &dyn CredentialCheck,
    ) -> CoreResult<&User> {
        if username.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "username".to_string(),
            }
            .into());
        }

        let found = self
            .users
            .iter()
            .filter(|u| u.active && u.username == username)
            .find(|u| check.verify(credential, &u.credential));

        match found {
            Some(user) => {
                debug!(user_id = %user.id, role = %user.role, "Credential accepted");
                Ok(user)
            }
            None => {
                warn!(username, "Authentication failed");
                Err(CoreError::UserNotFound)
            }
        }
    }

    pub fn add_user(&mut self, new: NewUser, check: &dyn CredentialCheck) -> CoreResult<User> {
        let username = new.username.trim().to_string();
        validate_username(&username)?;
        validate_display_name(&new.name)?;
        validate_email(&new.email)?;
        validate_credential(&new.credential)?;

        if self.find_by_username(&username).is_some() {
            return Err(ValidationError::Duplicate {
                field: "username".to_string(),
                value: username,
            }
            .into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            username,
            credential: check.prepare(&new.credential)?,
            role: new.role,
            email: new.email.trim().to_string(),
            active: true,
        };
        self.users.push(user.clone());

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User added");
        Ok(user)
    }

    /// Applies `update` to user `id`. Demoting or deactivating the last
    /// active administrator is refused.
    pub fn update_user(
        &mut self,
        id: &str,
        update: UserUpdate,
        check: &dyn CredentialCheck,
    ) -> CoreResult<User> {
        let index = self.index_of(id)?;
        let mut user = self.users[index].clone();

        if let Some(name) = update.name {
            validate_display_name(&name)?;
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            validate_email(&email)?;
            user.email = email.trim().to_string();
        }
        if let Some(credential) = update.credential {
            validate_credential(&credential)?;
            user.credential = check.prepare(&credential)?;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(active) = update.active {
            user.active = active;
        }

        let stays_admin = user.role == Role::Admin && user.active;
        if !stays_admin && self.is_last_admin(id) {
            return Err(CoreError::LastAdmin);
        }

        self.users[index] = user.clone();
        info!(user_id = %user.id, role = %user.role, active = user.active, "User updated");
        Ok(user)
    }

    pub fn remove_user(&mut self, id: &str) -> CoreResult<User> {
        let index = self.index_of(id)?;
        if self.is_last_admin(id) {
            return Err(CoreError::LastAdmin);
        }

        let user = self.users.remove(index);
        info!(user_id = %user.id, username = %user.username, "User removed");
        Ok(user)
    }

    fn index_of(&self, id: &str) -> CoreResult<usize> {
        self.users
            .iter()
            .position(|u| u.id == id)
            .ok_or(CoreError::UserNotFound)
    }

    /// Whether `id` is the only active administrator.
    fn is_last_admin(&self, id: &str) -> bool {
        let mut admins = self
            .users
            .iter()
            .filter(|u| u.role == Role::Admin && u.active);
        match (admins.next(), admins.next()) {
            (Some(only), None) => only.id == id,
            _ => false,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// What is persisted for the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: String,
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
}

/// The currently authenticated user, if any.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<(User, DateTime<Utc>)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, user: User) -> SessionRecord {
        let started_at = Utc::now();
        info!(user_id = %user.id, role = %user.role, "Session started");
        let record = SessionRecord {
            user_id: user.id.clone(),
            started_at,
        };
        self.current = Some((user, started_at));
        record
    }

    /// Ends the session. Orders and tables are not touched.
    pub fn logout(&mut self) {
        if let Some((user, _)) = self.current.take() {
            info!(user_id = %user.id, "Session ended");
        }
    }

    /// Re-resolves a persisted session against the directory. Missing or
    /// inactive users leave the session logged out.
    pub fn restore(&mut self, record: &SessionRecord, directory: &UserDirectory) -> bool {
        match directory.find_by_id(&record.user_id) {
            Some(user) if user.active => {
                debug!(user_id = %user.id, "Session restored");
                self.current = Some((user.clone(), record.started_at));
                true
            }
            _ => {
                warn!(user_id = %record.user_id, "Persisted session no longer valid");
                self.current = None;
                false
            }
        }
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref().map(|(user, _)| user)
    }

    pub fn role(&self) -> Option<Role> {
        self.current().map(|u| u.role)
    }

    pub fn record(&self) -> Option<SessionRecord> {
        self.current.as_ref().map(|(user, started_at)| SessionRecord {
            user_id: user.id.clone(),
            started_at: *started_at,
        })
    }

    /// Refreshes the cached user after a directory edit. A user that was
    /// removed or deactivated is logged out.
    pub fn refresh(&mut self, directory: &UserDirectory) {
        let Some((user, started_at)) = self.current.take() else {
            return;
        };
        match directory.find_by_id(&user.id) {
            Some(updated) if updated.active => {
                self.current = Some((updated.clone(), started_at));
            }
            _ => info!(user_id = %user.id, "Session closed after account change"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
