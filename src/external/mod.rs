pub mod buyback_feed;

pub use buyback_feed::{BuybackFeed, FeedStream, HttpBuybackFeed};
