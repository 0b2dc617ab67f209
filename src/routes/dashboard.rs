use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::errors::AppError;
use crate::render::DashboardView;
use crate::services::dashboard_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_dashboard))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    info!("GET / - Rendering buyback dashboard");
    let (buybacks, summary) = dashboard_service::load(state.feed.as_ref(), state.timezone).await?;

    let page = DashboardView::build(&buybacks, &summary, state.timezone).render()?;
    Ok(Html(page))
}
