//! Session store for the console user
//!
//! One `SessionStore` is created at start-up and handed to everything that
//! needs to know who is logged in. The token and role are persisted to
//! durable storage so a later run can rehydrate the session with
//! [`SessionStore::check_auth`].

use std::sync::{Arc, RwLock};

use chrono::Utc;
use common::error::StorageError;
use common::storage::{AUTH_TOKEN_KEY, DurableStorage, USER_ROLE_KEY};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Role, User};
use crate::token;

/// Snapshot of the session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub role: Option<Role>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

/// Errors raised by session mutations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session could not be written to durable storage
    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

/// Shared handle on the console session
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    storage: Arc<dyn DurableStorage>,
}

impl SessionStore {
    /// Create an empty session backed by `storage`
    pub fn create(storage: Arc<dyn DurableStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::default())),
            storage,
        }
    }

    /// Drop this handle. Persisted keys are left in place.
    pub fn dispose(self) {
        drop(self);
    }

    /// Current session state
    pub fn snapshot(&self) -> Session {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Token to send as `Authorization: Bearer`, if any
    pub fn bearer_token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .token
            .clone()
    }

    fn replace(&self, session: Session) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    /// Record a successful authentication and persist it.
    ///
    /// The token is not validated; the caller obtained it from the backend.
    pub fn login(&self, token: &str, user: User, role: Role) -> Result<(), SessionError> {
        self.storage.set(AUTH_TOKEN_KEY, token)?;
        self.storage.set(USER_ROLE_KEY, role.as_str())?;

        info!("Session opened for {} as {}", user.email, role);
        self.replace(Session {
            user: Some(user),
            token: Some(token.to_string()),
            role: Some(role),
            is_authenticated: true,
            is_loading: false,
        });
        Ok(())
    }

    /// Clear the session and its persisted keys. Safe to call repeatedly.
    pub fn logout(&self) {
        self.replace(Session::default());

        for key in [AUTH_TOKEN_KEY, USER_ROLE_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove persisted key {}: {}", key, e);
            }
        }
    }

    /// Logout triggered by the backend rejecting the token
    pub fn force_logout(&self) {
        warn!("Backend rejected the session token; logging out");
        self.logout();
    }

    /// Rehydrate the session from durable storage.
    ///
    /// Returns whether the session is authenticated afterwards. Every failure
    /// clears the session.
    pub fn check_auth(&self) -> bool {
        self.check_auth_at(Utc::now().timestamp())
    }

    /// [`SessionStore::check_auth`] against an explicit clock (epoch seconds)
    pub fn check_auth_at(&self, now: i64) -> bool {
        let persisted_token = self.read_persisted(AUTH_TOKEN_KEY);
        let persisted_role = self
            .read_persisted(USER_ROLE_KEY)
            .and_then(|name| name.parse::<Role>().ok());

        let (Some(token), Some(role)) = (persisted_token, persisted_role) else {
            self.logout();
            return false;
        };

        if !token::is_valid_at(&token, now) {
            info!("Persisted token is expired or malformed");
            self.logout();
            return false;
        }

        let Some(claims) = token::decode(&token) else {
            self.logout();
            return false;
        };

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if !state.is_authenticated {
            info!("Session rehydrated for {}", claims.email);
            let is_loading = state.is_loading;
            *state = Session {
                user: Some(User::placeholder(&claims.email, role)),
                token: Some(token),
                role: Some(role),
                is_authenticated: true,
                is_loading,
            };
        }

        true
    }

    fn read_persisted(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to read persisted key {}: {}", key, e);
                None
            }
        }
    }

    /// Swap the rehydrated placeholder for the profile fetched from the backend.
    ///
    /// The profile's role replaces the persisted one when they disagree.
    pub fn reconcile_profile(&self, user: User) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if !state.is_authenticated {
            return;
        }
        let mut next = state.clone();
        if let Some(role) = user.role().filter(|role| state.role != Some(*role)) {
            info!("Profile of {} carries role {}; replacing the persisted role", user.email, role);
            if let Err(e) = self.storage.set(USER_ROLE_KEY, role.as_str()) {
                warn!("Failed to persist role {}: {}", role, e);
            }
            next.role = Some(role);
        }
        next.user = Some(user);
        *state = next;
    }

    /// Whether the current user is still the rehydration placeholder
    pub fn has_placeholder_user(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .user
            .as_ref()
            .is_some_and(User::is_placeholder)
    }

    /// Set the busy flag shown while the session is being resolved
    pub fn set_loading(&self, loading: bool) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut next = state.clone();
        next.is_loading = loading;
        *state = next;
    }
}
