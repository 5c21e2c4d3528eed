use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::configuration::domain::{ServiceDefinition, ServiceId, ServiceMacro};
use crate::configuration::errors::ResolveError;
use crate::configuration::repository::ConfigurationRepository;

/// SeaORM-backed repository over the `service`, `command` and
/// `on_demand_macro` tables.
pub struct SeaOrmConfigurationRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmConfigurationRepository {
    async fn load(&self, id: ServiceId) -> Result<models::service::Model, ResolveError> {
        models::service::find(&self.db, id).await?.ok_or(ResolveError::NotFound(id))
    }
}

impl From<models::service::Model> for ServiceDefinition {
    fn from(s: models::service::Model) -> Self {
        ServiceDefinition {
            id: s.id,
            description: s.description,
            alias: s.alias,
            is_template: s.is_template,
            command_id: s.command_id,
            template_id: s.template_id,
        }
    }
}

impl From<models::on_demand_macro::Model> for ServiceMacro {
    fn from(m: models::on_demand_macro::Model) -> Self {
        ServiceMacro {
            name: m.name,
            value: m.value,
            is_password: m.is_password,
            description: m.description,
            order: m.macro_order,
            owner_id: m.service_id,
        }
    }
}

#[async_trait::async_trait]
impl ConfigurationRepository for SeaOrmConfigurationRepository {
    async fn find_service(&self, id: ServiceId) -> Result<Option<ServiceDefinition>, ResolveError> {
        Ok(models::service::find(&self.db, id).await?.map(ServiceDefinition::from))
    }

    async fn own_command_line(&self, id: ServiceId) -> Result<Option<String>, ResolveError> {
        let svc = self.load(id).await?;
        let Some(command_id) = svc.command_id else { return Ok(None) };
        let line = models::command::find_command_line(&self.db, command_id).await?;
        if line.is_none() {
            warn!(service_id = id, command_id, "service references a missing command");
        }
        Ok(line)
    }

    async fn own_macros(&self, id: ServiceId) -> Result<Vec<ServiceMacro>, ResolveError> {
        self.load(id).await?;
        let rows = models::on_demand_macro::list_for_service(&self.db, id).await?;
        Ok(rows.into_iter().map(ServiceMacro::from).collect())
    }

    async fn parent_id(&self, id: ServiceId) -> Result<Option<ServiceId>, ResolveError> {
        Ok(self.load(id).await?.template_id)
    }
}
