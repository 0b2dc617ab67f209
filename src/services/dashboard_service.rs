use chrono::Utc;
use chrono_tz::Tz;
use tracing::error;

use crate::errors::AppError;
use crate::external::BuybackFeed;
use crate::services::aggregator::Summary;
use crate::services::normalizer::Normalizer;
use crate::services::pipeline::{BuybackPipeline, Buybacks};

/// Pulls the feed once and aggregates it as of now.
pub async fn load(feed: &dyn BuybackFeed, tz: Tz) -> Result<(Buybacks, Summary), AppError> {
    let buybacks = BuybackPipeline::run(feed, Normalizer::new(tz))
        .await
        .map_err(|e| {
            error!("Failed to load buyback feed: {}", e);
            AppError::Feed(e)
        })?;

    let summary = Summary::compute(&buybacks, Utc::now().with_timezone(&tz));
    Ok((buybacks, summary))
}
