use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{error::ApiError, error::ApiResult, main_lib::AppState};
use seva_core::donations::{
    CreateOrderRequest, DonationReceipt, DonationStatus, OrderCreated, VerifyPaymentRequest,
};
use seva_core::reporting::{DonationFilters, DonationPage, DonationStats};

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderCreated>)> {
    let created = state.donation_service.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyPaymentRequest>,
) -> ApiResult<Json<DonationReceipt>> {
    let receipt = state.donation_service.verify_and_complete(request).await?;
    Ok(Json(receipt))
}

#[derive(serde::Deserialize)]
struct ListQuery {
    page: Option<i64>,
    limit: Option<i64>,
    status: Option<String>,
    #[serde(rename = "programId")]
    program_id: Option<String>,
    #[serde(rename = "dateFrom")]
    date_from: Option<String>, // YYYY-MM-DD format
    #[serde(rename = "dateTo")]
    date_to: Option<String>, // YYYY-MM-DD format
    #[serde(rename = "minAmount")]
    min_amount: Option<Decimal>,
    #[serde(rename = "maxAmount")]
    max_amount: Option<Decimal>,
}

fn parse_date_optional(value: Option<String>, field: &str) -> ApiResult<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("Invalid {field} date: '{v}'")))
        })
        .transpose()
}

impl ListQuery {
    fn into_filters(self) -> ApiResult<(DonationFilters, i64, i64)> {
        let status = self
            .status
            .map(|s| DonationStatus::from_str(&s))
            .transpose()?;
        let filters = DonationFilters {
            status,
            program_id: self.program_id,
            date_from: parse_date_optional(self.date_from, "dateFrom")?,
            date_to: parse_date_optional(self.date_to, "dateTo")?,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        };
        Ok((filters, self.page.unwrap_or(1), self.limit.unwrap_or(20)))
    }
}

async fn list_donations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<DonationPage>> {
    let (filters, page, limit) = query.into_filters()?;
    let page = state.reporting_service.list_donations(filters, page, limit)?;
    Ok(Json(page))
}

async fn donation_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<DonationStats>> {
    let (filters, _, _) = query.into_filters()?;
    let stats = state.reporting_service.donation_stats(filters)?;
    Ok(Json(stats))
}

async fn export_donations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (filters, _, _) = query.into_filters()?;
    let csv = state.reporting_service.export_csv(filters)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"donations-export.csv\"",
            ),
        ],
        csv,
    ))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/donations/create-order", post(create_order))
        .route("/donations/verify", post(verify_payment))
}

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/donations", get(list_donations))
        .route("/donations/stats", get(donation_stats))
        .route("/donations/export", get(export_donations))
}
