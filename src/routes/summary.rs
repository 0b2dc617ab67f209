use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::BuybackRecord;
use crate::render::formatting::format_usd;
use crate::services::aggregator::DailyTotal;
use crate::services::dashboard_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_summary))
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub records: usize,
    pub rows_dropped: usize,
    pub excluded_amounts: usize,
    pub total: String,
    pub total_formatted: String,
    pub total_last_24h: String,
    pub total_last_24h_formatted: String,
    pub per_day: Vec<DailyTotal>,
    pub buybacks: Vec<BuybackRecord>,
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    info!("GET /api/summary - Computing buyback summary");
    let (buybacks, summary) = dashboard_service::load(state.feed.as_ref(), state.timezone).await?;

    let records = buybacks.len();
    let rows_dropped = buybacks.rows_dropped();

    Ok(Json(SummaryResponse {
        records,
        rows_dropped,
        excluded_amounts: summary.excluded_amounts,
        total_formatted: format_usd(&summary.total),
        total: summary.total.to_string(),
        total_last_24h_formatted: format_usd(&summary.total_last_24h),
        total_last_24h: summary.total_last_24h.to_string(),
        per_day: summary.per_day,
        buybacks: buybacks.into_records(),
    }))
}
