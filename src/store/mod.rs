//! Persistent credential store.
//!
//! A small string-keyed store that survives process restarts. It holds a
//! serialized copy of the session for hydration, never the source of truth.

pub mod file;
pub mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use crate::error::AppError;

/// Store keys as constants.
pub mod keys {
    pub const TOKEN: &str = "@GoBarber:token";
    /// Serialized JSON user record
    pub const USER: &str = "@GoBarber:user";
}

/// String-keyed storage for the session token and user record.
///
/// Calls are synchronous: hydration happens while the session manager is
/// being constructed.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}
