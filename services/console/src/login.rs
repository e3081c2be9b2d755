//! Console login and session rehydration

use api::{ApiClient, ApiError};
use auth::models::{LoginCredentials, Role, User};
use auth::session::SessionError;
use auth::{token, validation};
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while logging in
#[derive(Debug, Error)]
pub enum LoginError {
    /// The credentials were rejected before reaching the backend
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("The backend issued a token the console cannot read")]
    UnreadableToken,

    /// The credentials were accepted but the issued token was refused
    #[error("The backend refused the token it just issued")]
    TokenRejected,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl LoginError {
    /// One-line message to show the user
    pub fn notice(&self) -> String {
        match self {
            LoginError::Invalid(msg) => msg.clone(),
            LoginError::Api(ApiError::Unauthorized) => "Invalid email or password.".to_string(),
            LoginError::Api(e) => e.notice(),
            LoginError::UnreadableToken | LoginError::TokenRejected => self.to_string(),
            LoginError::Session(e) => e.to_string(),
        }
    }
}

/// Role guessed from the email when no profile is available
pub fn role_from_email(email: &str) -> Role {
    let email = email.to_lowercase();
    if email.contains("admin") {
        Role::Admin
    } else if email.contains("mecanico") || email.contains("mecánico") {
        Role::Mechanic
    } else {
        Role::Receptionist
    }
}

/// Authenticate against the backend and open the session.
///
/// Returns the landing page of the user's role.
pub async fn login(api: &ApiClient, credentials: &LoginCredentials) -> Result<&'static str, LoginError> {
    validation::validate_credentials(credentials).map_err(LoginError::Invalid)?;

    let token = api.login(credentials).await?;
    let claims = token::decode(&token).ok_or(LoginError::UnreadableToken)?;

    let session = api.session();
    let guessed = role_from_email(&claims.email);
    session.login(&token, User::placeholder(&claims.email, guessed), guessed)?;

    let role = match api.find_user_by_email(&claims.email).await {
        Ok(Some(profile)) => {
            let role = profile.role().unwrap_or(guessed);
            session.login(&token, profile, role)?;
            role
        }
        Ok(None) => {
            warn!("No profile registered for {}; keeping the guessed role", claims.email);
            guessed
        }
        Err(ApiError::Unauthorized) => return Err(LoginError::TokenRejected),
        Err(e) => {
            warn!("Failed to fetch profile for {}: {}", claims.email, e);
            guessed
        }
    };

    info!("{} logged in as {}", claims.email, role);
    Ok(role.landing_page())
}

/// Restore the persisted session and swap the placeholder user for the
/// backend profile.
///
/// Returns whether a session is open afterwards. A failed profile fetch
/// keeps the placeholder.
pub async fn rehydrate(api: &ApiClient) -> bool {
    let session = api.session();
    session.set_loading(true);

    if session.check_auth() && session.has_placeholder_user() {
        let email = session.snapshot().user.map(|u| u.email).unwrap_or_default();
        match api.find_user_by_email(&email).await {
            Ok(Some(profile)) => session.reconcile_profile(profile),
            Ok(None) => warn!("No profile registered for {}", email),
            Err(e) => warn!("Failed to fetch profile for {}: {}", email, e),
        }
    }

    session.set_loading(false);
    session.snapshot().is_authenticated
}
