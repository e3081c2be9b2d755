//! Session subcommands: login, logout, whoami, open.
//!
//! User-facing output uses writeln! to stdout; logs go to stderr.

use std::io::{self, Write};

use anyhow::Result;
use auth::guard::GuardDecision;
use auth::models::LoginCredentials;
use auth::token;

use crate::context::Console;
use crate::{login, prompt};

/// Log in, prompting for whatever was not given on the command line
pub async fn login(console: &Console, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt::email()?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt::password()?,
    };

    let landing = login::login(&console.api, &LoginCredentials { email, password })
        .await
        .map_err(|e| anyhow::anyhow!(e.notice()))?;

    let session = console.session.snapshot();
    let mut out = io::stdout();
    if let (Some(user), Some(role)) = (&session.user, session.role) {
        writeln!(out, "Logged in as {} ({})", user.name, role)?;
    }
    writeln!(out, "Landing page: {}", landing)?;
    Ok(())
}

pub fn logout(console: &Console) -> Result<()> {
    console.session.logout();
    writeln!(io::stdout(), "Logged out")?;
    Ok(())
}

pub async fn whoami(console: &Console) -> Result<()> {
    let mut out = io::stdout();
    if !login::rehydrate(&console.api).await {
        writeln!(out, "Not logged in")?;
        return Ok(());
    }

    let session = console.session.snapshot();
    if let Some(user) = &session.user {
        writeln!(out, "Name: {}", user.name)?;
        writeln!(out, "Email: {}", user.email)?;
        if !user.is_placeholder() {
            writeln!(out, "User ID: {}", user.id)?;
        }
    }
    if let Some(role) = session.role {
        writeln!(out, "Role: {}", role)?;
        writeln!(out, "Landing page: {}", role.landing_page())?;
    }
    let expires = session
        .token
        .as_deref()
        .and_then(token::decode)
        .and_then(|claims| claims.expires_at());
    if let Some(expires) = expires {
        writeln!(out, "Token expires: {}", expires.to_rfc3339())?;
    }
    Ok(())
}

/// Show where opening `path` leads for the current session
pub async fn open(console: &Console, path: &str) -> Result<()> {
    let decision = console.enter(path).await;
    writeln!(io::stdout(), "{}", describe(&decision, path))?;
    Ok(())
}

fn describe(decision: &GuardDecision, path: &str) -> String {
    match decision {
        GuardDecision::Loading => format!("{path}: session is still loading"),
        GuardDecision::Render => format!("{path}: allowed"),
        GuardDecision::RedirectToLogin { to, from } => {
            format!("{from}: not logged in, redirecting to {to}")
        }
        GuardDecision::RedirectToLanding(landing) => {
            format!("{path}: not allowed for your role, redirecting to {landing}")
        }
    }
}
