use std::sync::Arc;

use service::configuration::{repository::ConfigurationRepository, ConfigurationResolver};
use service::frontend::FrontendComponentService;

/// Shared, read-only handles for request handlers.
#[derive(Clone)]
pub struct ServerState {
    pub resolver: Arc<ConfigurationResolver<dyn ConfigurationRepository>>,
    pub frontend: Arc<FrontendComponentService>,
}
