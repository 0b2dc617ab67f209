use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),

    #[error("feed returned status {0}")]
    BadStatus(u16),

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<csv::Error> for FeedError {
    fn from(value: csv::Error) -> Self {
        FeedError::Decode(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid feed url {0}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("invalid bind address: {0}")]
    InvalidBindAddr(String),
    #[error("invalid FEED_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("Render error: {0}")]
    Render(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Feed(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
            AppError::Render(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Render(value.to_string())
    }
}
