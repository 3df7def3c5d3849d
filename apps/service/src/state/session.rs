//! # Session State
//!
//! The signed-in user. Read by every command to resolve the role that
//! access control is checked against.

use nova_core::{Role, Session, User};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct SessionState {
    session: Mutex<Session>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    pub fn role(&self) -> Option<Role> {
        self.with_session(Session::role)
    }

    pub fn current_user(&self) -> Option<User> {
        self.with_session(|s| s.current().cloned())
    }
}
