use std::sync::Arc;

use chrono_tz::Tz;

use crate::external::BuybackFeed;

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn BuybackFeed>,
    pub timezone: Tz,
}
