mod buyback;

pub use buyback::{Amount, BuybackRecord, OrderType};
