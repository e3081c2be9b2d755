//! Route guard deciding whether a session may see a route

use tracing::debug;

use crate::models::Role;
use crate::session::Session;

/// Default route unauthenticated users are sent to
pub const LOGIN_PATH: &str = "/login";

/// Outcome of guarding a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still being resolved; show a loading indicator
    Loading,
    /// Show the guarded content
    Render,
    /// Send the user to the login screen, remembering where they were going
    RedirectToLogin { to: String, from: String },
    /// Send the user to their role's landing page
    RedirectToLanding(&'static str),
}

/// Guard wrapping a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    allowed_roles: Option<Vec<Role>>,
    redirect_to: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            allowed_roles: None,
            redirect_to: LOGIN_PATH.to_string(),
        }
    }
}

impl RouteGuard {
    /// Guard that only requires an authenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the route to the given roles
    pub fn allow(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    /// Send unauthenticated users somewhere other than the login screen
    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }

    /// Roles allowed through, if restricted
    pub fn allowed_roles(&self) -> Option<&[Role]> {
        self.allowed_roles.as_deref()
    }

    /// Decide what to do with a request for `requested` under `session`
    pub fn evaluate(&self, session: &Session, requested: &str) -> GuardDecision {
        if session.is_loading {
            return GuardDecision::Loading;
        }

        if !session.is_authenticated {
            debug!("Unauthenticated request for {}", requested);
            return GuardDecision::RedirectToLogin {
                to: self.redirect_to.clone(),
                from: requested.to_string(),
            };
        }

        if let (Some(allowed), Some(role)) = (&self.allowed_roles, session.role) {
            if !allowed.contains(&role) {
                debug!("Role {} may not open {}", role, requested);
                return GuardDecision::RedirectToLanding(role.landing_page());
            }
        }

        GuardDecision::Render
    }
}
