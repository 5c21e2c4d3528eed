use thiserror::Error;

use super::domain::ServiceId;

/// Failures of a resolution call. Absent commands and empty macro sets are
/// not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("service {0} not found")]
    NotFound(ServiceId),
    #[error("inheritance cycle: service {revisited} reached again after {path:?}")]
    CycleDetected { revisited: ServiceId, path: Vec<ServiceId> },
    /// Hop limit reached. Also reported for a loop longer than the limit,
    /// since the walk stops before any id repeats.
    #[error("inheritance chain exceeds {limit} hops")]
    DepthExceeded { limit: usize },
    #[error("resolution timed out after {0} ms")]
    Timeout(u64),
    #[error("configuration store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ResolveError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ResolveError::NotFound(_) => 2001,
            ResolveError::CycleDetected { .. } => 2002,
            ResolveError::DepthExceeded { .. } => 2003,
            ResolveError::Timeout(_) => 2004,
            ResolveError::StoreUnavailable(_) => 2100,
        }
    }
}

impl From<models::errors::ModelError> for ResolveError {
    fn from(e: models::errors::ModelError) -> Self { ResolveError::StoreUnavailable(e.to_string()) }
}
