//! Authentication for the Taller console
//!
//! Holds everything that decides who the console user is and where they may
//! go: the bearer-token codec, the role model and its landing pages, the
//! persisted session store, the route guard and the application route table.

pub mod guard;
pub mod models;
pub mod routes;
pub mod session;
pub mod token;
pub mod validation;

pub use guard::{GuardDecision, RouteGuard};
pub use models::{LoginCredentials, Role, User};
pub use session::{Session, SessionError, SessionStore};
pub use token::DecodedToken;
