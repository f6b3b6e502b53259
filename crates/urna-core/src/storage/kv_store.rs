//! Key-value store trait.
//!
//! Defines the interface for scope-partitioned string storage, the analogue
//! of origin-scoped browser storage. Implementations live in urna-infra.

use urna_types::error::RepositoryError;

/// Trait for scoped key-value persistent storage.
///
/// Values are opaque strings. Uses RPITIT (native async fn in traits,
/// Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        scope: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        scope: &str,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(
        &self,
        scope: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
