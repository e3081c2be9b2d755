//! Authentication models

pub mod role;
pub mod user;

// Re-export for convenience
pub use role::{Role, UnknownRole};
pub use user::{LoginCredentials, User};
