use axum::{extract::State, Json};
use service::frontend::{Hooks, Pages};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub async fn hooks(State(state): State<ServerState>) -> Result<Json<Hooks>, JsonApiError> {
    Ok(Json(state.frontend.hooks().await?))
}

pub async fn pages(State(state): State<ServerState>) -> Result<Json<Pages>, JsonApiError> {
    Ok(Json(state.frontend.pages().await?))
}
