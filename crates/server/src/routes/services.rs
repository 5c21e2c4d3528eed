use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service::configuration::domain::{MacroScope, ServiceDefinition, ServiceId, ServiceMacro};

use crate::errors::JsonApiError;
use crate::state::ServerState;

const MASKED_VALUE: &str = "*****";

#[derive(Debug, Default, Deserialize)]
pub struct MacrosQuery {
    /// Merge macros inherited from templates.
    #[serde(default)]
    pub inheritance: bool,
}

#[derive(Debug, Serialize)]
pub struct CommandLineOutput {
    pub service_id: ServiceId,
    pub command_line: Option<String>,
}

/// Macro as exposed over HTTP; password values never leave the process.
#[derive(Debug, Serialize)]
pub struct MacroOutput {
    pub name: String,
    pub value: String,
    pub is_password: bool,
    pub description: Option<String>,
    pub order: i32,
    pub owner_id: ServiceId,
}

impl From<ServiceMacro> for MacroOutput {
    fn from(m: ServiceMacro) -> Self {
        let value = if m.is_password { MASKED_VALUE.to_string() } else { m.value };
        MacroOutput {
            name: m.name,
            value,
            is_password: m.is_password,
            description: m.description,
            order: m.order,
            owner_id: m.owner_id,
        }
    }
}

/// Stored definition of a service or template
pub async fn get_service(
    State(state): State<ServerState>,
    Path(id): Path<ServiceId>,
) -> Result<Json<ServiceDefinition>, JsonApiError> {
    Ok(Json(state.resolver.find_service(id).await?))
}

/// Effective command line; `null` when no entity in the chain declares one
pub async fn get_command_line(
    State(state): State<ServerState>,
    Path(id): Path<ServiceId>,
) -> Result<Json<CommandLineOutput>, JsonApiError> {
    let command_line = state.resolver.resolve_command_line(id).await?;
    Ok(Json(CommandLineOutput { service_id: id, command_line }))
}

/// On-demand macros, own only unless `?inheritance=true`
pub async fn list_macros(
    State(state): State<ServerState>,
    Path(id): Path<ServiceId>,
    Query(q): Query<MacrosQuery>,
) -> Result<Json<Vec<MacroOutput>>, JsonApiError> {
    let scope = MacroScope::from_inheritance_flag(q.inheritance);
    let macros = state.resolver.resolve_macros(id, scope).await?;
    Ok(Json(macros.into_vec().into_iter().map(MacroOutput::from).collect()))
}
