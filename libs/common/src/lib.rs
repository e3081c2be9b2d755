//! Common library for the Taller console
//!
//! This crate provides shared functionality used across the console crates:
//! durable key/value storage for the persisted session, storage errors and
//! tracing initialisation.

pub mod error;
pub mod logging;
pub mod storage;

/// Example usage of the storage module
///
/// ```rust,no_run
/// use common::storage::{DurableStorage, FileStorage, StorageConfig};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StorageConfig::from_env()?;
///     let storage = FileStorage::open(&config)?;
///     storage.set("authToken", "eyJ...")?;
///     println!("token: {:?}", storage.get("authToken")?);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
