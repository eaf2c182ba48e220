//! Key/value persistence for the credential and user preferences.
//!
//! Two scopes are used:
//! - Session: the bearer token, cleared on logout
//! - Durable: preferences such as the UI language
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── session/
//! │   └── auth_token        # Bearer token
//! └── local/
//!     └── language          # Selected UI language
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Trait for string key/value storage backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
