use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::{error::ApiResult, main_lib::AppState};
use seva_core::programs::{NewProgram, Program};

#[derive(serde::Deserialize)]
struct ListQuery {
    #[serde(rename = "activeOnly")]
    active_only: Option<bool>,
}

async fn list_programs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Program>>> {
    let programs = state
        .program_service
        .list_programs(query.active_only.unwrap_or(false))?;
    Ok(Json(programs))
}

async fn get_program(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Program>> {
    let program = state.program_service.get_program(&id)?;
    Ok(Json(program))
}

async fn create_program(
    State(state): State<Arc<AppState>>,
    Json(new_program): Json<NewProgram>,
) -> ApiResult<(StatusCode, Json<Program>)> {
    let program = state.program_service.create_program(new_program).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/programs", get(list_programs))
        .route("/programs/{id}", get(get_program))
}

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/programs", post(create_program))
}
