use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{debug, error};
use url::Url;

use crate::config::AppConfig;
use crate::errors::FeedError;

/// Body of the feed as it arrives, chunk by chunk.
pub type FeedStream = BoxStream<'static, Result<Bytes, FeedError>>;

#[async_trait]
pub trait BuybackFeed: Send + Sync {
    async fn open(&self) -> Result<FeedStream, FeedError>;
}

/// Buyback CSV served over HTTP.
pub struct HttpBuybackFeed {
    client: reqwest::Client,
    url: Url,
}

impl HttpBuybackFeed {
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, FeedError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FeedError> {
        Self::new(config.feed_url().clone(), config.feed_timeout)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl BuybackFeed for HttpBuybackFeed {
    async fn open(&self) -> Result<FeedStream, FeedError> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                error!("Buyback feed request to {} failed: {}", self.url, e);
                FeedError::Network(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            error!("Buyback feed {} answered {}", self.url, status);
            return Err(FeedError::BadStatus(status.as_u16()));
        }

        debug!("Buyback feed {} opened ({})", self.url, status);

        let body = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| FeedError::Network(e.to_string())));

        Ok(body.boxed())
    }
}
