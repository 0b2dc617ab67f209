/// Dashboard API tests
///
/// Drives the router end to end against an in-memory feed:
/// - GET /             (HTML dashboard)
/// - GET /api/summary  (aggregates as JSON)
/// - GET /health
/// - feed failures surfacing as 502

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Request, StatusCode};
use buyback_dashboard::app::create_app;
use buyback_dashboard::errors::FeedError;
use buyback_dashboard::external::{BuybackFeed, FeedStream};
use buyback_dashboard::state::AppState;
use chrono_tz::Tz;
use futures::{stream, StreamExt};
use serde_json::Value;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const FEED: &str = "\
DATE,ORDER ID,BATCH ID,TYPE,PRICE,QUANTITY FILLED,USD AMOUNT FILLED
2024-01-01T10:00:00Z,o-1,b-1,Market,0.25,402,100.50
2024-01-01T12:00:00Z,o-2,b-1,Limit,abc,201,50.25
,o-3,b-2,Market,1,999,999
";

struct InMemoryFeed {
    chunks: Vec<&'static str>,
}

#[async_trait]
impl BuybackFeed for InMemoryFeed {
    async fn open(&self) -> Result<FeedStream, FeedError> {
        let chunks: Vec<Result<Bytes, FeedError>> = self
            .chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}

struct UnreachableFeed;

#[async_trait]
impl BuybackFeed for UnreachableFeed {
    async fn open(&self) -> Result<FeedStream, FeedError> {
        Err(FeedError::Network("connection refused".to_string()))
    }
}

fn state_with(feed: impl BuybackFeed + 'static) -> AppState {
    AppState {
        feed: Arc::new(feed),
        timezone: Tz::UTC,
    }
}

fn split_feed() -> InMemoryFeed {
    let (head, tail) = FEED.split_at(97);
    InMemoryFeed { chunks: vec![head, tail] }
}

async fn get(state: AppState, uri: &str) -> (StatusCode, String) {
    let response = create_app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_dashboard_renders_recorded_rows() {
    let (status, html) = get(state_with(split_feed()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(html.matches("<tr><td").count(), 2);
    assert!(html.contains(">o-1</td>"));
    assert!(html.contains(">o-2</td>"));
    assert!(!html.contains(">o-3</td>"));
    assert!(html.find(">o-1</td>").unwrap() < html.find(">o-2</td>").unwrap());
}

#[tokio::test]
async fn test_dashboard_totals_and_chart() {
    let (_, html) = get(state_with(split_feed()), "/").await;

    assert!(html.contains("<div id=\"total\" class=\"text-2xl\">151 USD</div>"));
    assert!(html.contains("\"x\":[\"2024-01-01\"],\"y\":[150.75]"));
    assert!(html.contains("\"displayModeBar\":false"));
}

#[tokio::test]
async fn test_unparseable_price_renders_blank() {
    let (_, html) = get(state_with(split_feed()), "/").await;

    assert!(!html.contains("NaN"));
    assert!(html.contains("bg-indigo-500\">Limit</span></td><td class=\"border px-2 py-1 text-right\"></td>"));
    assert!(html.contains("text-right\">100.5000</td>"));
}

#[tokio::test]
async fn test_feed_failure_is_bad_gateway() {
    let (status, body) = get(state_with(UnreachableFeed), "/").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("connection refused"));
}

// ---------------------------------------------------------------------------
// Summary API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_summary_json() {
    let (status, body) = get(state_with(split_feed()), "/api/summary").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["records"], 2);
    assert_eq!(json["rows_dropped"], 1);
    assert_eq!(json["excluded_amounts"], 0);
    assert_eq!(json["total"], "150.75");
    assert_eq!(json["total_formatted"], "151 USD");
    assert_eq!(json["total_last_24h"], "0");
    assert_eq!(json["per_day"][0]["date"], "2024-01-01");
    assert_eq!(json["per_day"][0]["value"], 150.75);
}

#[tokio::test]
async fn test_summary_lists_recorded_buybacks() {
    let (_, body) = get(state_with(split_feed()), "/api/summary").await;
    let json: Value = serde_json::from_str(&body).unwrap();

    let buybacks = json["buybacks"].as_array().unwrap();
    assert_eq!(buybacks.len(), 2);
    assert_eq!(buybacks[0]["order_id"], "o-1");
    assert_eq!(buybacks[0]["type"], "Market");
    assert_eq!(buybacks[0]["usd_amount_filled"], "100.50");
    assert!(buybacks[0]["date"].as_str().unwrap().starts_with("2024-01-01T10:00:00"));
    assert_eq!(buybacks[1]["type"], "Limit");
    assert!(buybacks[1]["price"].is_null());
}

#[tokio::test]
async fn test_summary_feed_failure() {
    let (status, _) = get(state_with(UnreachableFeed), "/api/summary").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(state_with(UnreachableFeed), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}
