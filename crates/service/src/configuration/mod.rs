//! Configuration module: three-layer architecture (domain, repository, resolver).
//!
//! Resolves the effective command line and on-demand macros of a service by
//! walking its template inheritance chain.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod resolver;
pub mod repo;

pub use errors::ResolveError;
pub use resolver::{ConfigurationResolver, ResolverOptions};
