//! Service layer resolving monitoring-service configuration on top of models.
//! - Separates resolution rules from data access.
//! - Reuses entity definitions in the `models` crate.
//! - Provides typed errors and documented interfaces.

pub mod configuration;
pub mod frontend;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
