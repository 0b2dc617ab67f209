use futures::StreamExt;
use tracing::{debug, info};

use crate::errors::FeedError;
use crate::external::BuybackFeed;
use crate::models::BuybackRecord;
use crate::services::csv_parser::{CsvStreamDecoder, RawRow};
use crate::services::normalizer::Normalizer;

/// State of one pass over the feed. Records are only appended, in the
/// order their rows arrive.
pub struct BuybackPipeline {
    normalizer: Normalizer,
    records: Vec<BuybackRecord>,
    rows_seen: usize,
}

impl BuybackPipeline {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            records: Vec::new(),
            rows_seen: 0,
        }
    }

    pub fn ingest(&mut self, row: RawRow) {
        self.rows_seen += 1;
        match self.normalizer.normalize(row) {
            Some(record) => self.records.push(record),
            None => debug!("Skipping feed row {} without a usable date", self.rows_seen),
        }
    }

    pub fn finish(self) -> Buybacks {
        let rows_dropped = self.rows_seen - self.records.len();
        Buybacks {
            records: self.records,
            rows_seen: self.rows_seen,
            rows_dropped,
        }
    }

    /// Drains `feed` through the decoder and normalizer.
    ///
    /// Nothing is returned until the whole body has been consumed; any
    /// transport or decode failure aborts the run.
    pub async fn run(feed: &dyn BuybackFeed, normalizer: Normalizer) -> Result<Buybacks, FeedError> {
        let mut stream = feed.open().await?;
        let mut decoder = CsvStreamDecoder::new();
        let mut pipeline = Self::new(normalizer);
        let mut bytes_received = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            bytes_received += chunk.len();
            for row in decoder.push(&chunk)? {
                pipeline.ingest(row);
            }
        }
        for row in decoder.finish()? {
            pipeline.ingest(row);
        }

        let buybacks = pipeline.finish();
        info!(
            "Buyback feed drained: {} bytes, {} rows, {} records, {} dropped",
            bytes_received,
            buybacks.rows_seen,
            buybacks.len(),
            buybacks.rows_dropped
        );
        Ok(buybacks)
    }
}

/// Finalized, read-only record collection.
#[derive(Debug, Clone, Default)]
pub struct Buybacks {
    records: Vec<BuybackRecord>,
    rows_seen: usize,
    rows_dropped: usize,
}

impl Buybacks {
    pub fn records(&self) -> &[BuybackRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<BuybackRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped
    }
}
