//! Taller shop console
//!
//! Terminal front end for the Taller REST backend: logs users in, restores
//! their session between runs, guards each page by role and walks
//! receptionists through creating service orders.

pub mod catalog_cmd;
pub mod context;
pub mod login;
pub mod order_cmd;
pub mod prompt;
pub mod session_cmd;
pub mod wizard;

pub use context::Console;
