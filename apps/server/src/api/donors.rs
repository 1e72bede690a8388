use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::{error::ApiResult, main_lib::AppState};
use seva_core::donors::Donor;
use seva_core::reporting::Pagination;

#[derive(serde::Deserialize)]
struct ListQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(serde::Serialize)]
struct DonorPage {
    success: bool,
    data: Vec<Donor>,
    pagination: Pagination,
}

async fn list_donors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<DonorPage>> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let (data, total) = state.donor_service.list_donors(page, limit)?;
    Ok(Json(DonorPage {
        success: true,
        data,
        pagination: Pagination::new(page.max(1), limit, total),
    }))
}

async fn get_donor(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Donor>> {
    let donor = state.donor_service.get_donor(&id)?;
    Ok(Json(donor))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/donors", get(list_donors))
        .route("/donors/{id}", get(get_donor))
}
