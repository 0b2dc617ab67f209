use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{dashboard, health, summary};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(dashboard::router())
        .nest("/health", health::router())
        .nest("/api/summary", summary::router().layer(CorsLayer::permissive()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
