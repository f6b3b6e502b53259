//! IdentityLookupClient trait definition.
//!
//! One round trip per call, no retries. A response that reached the service
//! is classified as [`LookupOutcome::Found`] or [`LookupOutcome::NotFound`];
//! only transport-level failures are errors.

use urna_types::error::LoginError;
use urna_types::identity::LookupOutcome;

/// Trait for the national-ID lookup service.
///
/// Implementations return `Err(LoginError::LookupUnavailable(..))` for any
/// transport failure (connection error, non-2xx status, undecodable body)
/// and never use the other `LoginError` variants.
pub trait IdentityLookupClient: Send + Sync {
    fn lookup(
        &self,
        cedula: &str,
    ) -> impl std::future::Future<Output = Result<LookupOutcome, LoginError>> + Send;
}
