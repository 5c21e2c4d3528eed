//! Frontend components (hooks and pages) shipped as static assets by
//! installed modules.

pub mod components;
pub mod errors;

pub use components::{ComponentAssets, FrontendComponentService, Hooks, InstalledModules, Pages};
pub use errors::FrontendError;
