use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::{Amount, BuybackRecord, OrderType};
use crate::services::csv_parser::RawRow;

// `%#z` takes `+01:00`, `+0100` and `+01`
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y%m%dT%H%M%S%.f%#z",
    "%Y%m%dT%H%M%#z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

/// Turns raw feed rows into typed records. Timestamps without an offset
/// are read in `timezone`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    timezone: Tz,
}

impl Normalizer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Returns `None` for rows that carry no usable date.
    pub fn normalize(&self, row: RawRow) -> Option<BuybackRecord> {
        let raw_date = row.date.as_deref().map(str::trim).filter(|d| !d.is_empty())?;

        let Some(date) = self.parse_timestamp(raw_date) else {
            warn!("Dropping buyback row with unparseable date \"{}\"", raw_date);
            return None;
        };

        Some(BuybackRecord {
            date,
            order_id: row.order_id.unwrap_or_default(),
            batch_id: row.batch_id.unwrap_or_default(),
            order_type: OrderType::parse(row.order_type.as_deref().unwrap_or_default()),
            price: Amount::parse(row.price.as_deref().unwrap_or_default()),
            quantity_filled: Amount::parse(row.quantity_filled.as_deref().unwrap_or_default()),
            usd_amount_filled: Amount::parse(row.usd_amount_filled.as_deref().unwrap_or_default()),
        })
    }

    /// Parses an ISO-8601 timestamp, keeping the offset the string carries.
    pub fn parse_timestamp(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt);
        }

        let with_offset = match s.strip_suffix(['Z', 'z']) {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };
        for fmt in OFFSET_DATETIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
                return Some(dt);
            }
        }

        for fmt in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return self.localize(naive);
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|naive| self.localize(naive))
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt.fixed_offset()),
            // ambiguous wall time during a DST fold, take the earlier instant
            LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
            LocalResult::None => None,
        }
    }
}
