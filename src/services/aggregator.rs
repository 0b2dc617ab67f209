use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

use crate::services::pipeline::Buybacks;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: BigDecimal,
    /// `total` narrowed for charting
    pub value: f64,
}

/// Aggregates over a finalized record collection.
///
/// Amounts that failed to parse are left out of every sum and counted in
/// `excluded_amounts`. An empty sum is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: BigDecimal,
    pub total_last_24h: BigDecimal,
    pub per_day: Vec<DailyTotal>,
    pub excluded_amounts: usize,
}

impl Summary {
    /// Calendar days are taken in the zone of `now`; the 24h window is
    /// `(now - 24h, ∞)`.
    pub fn compute(buybacks: &Buybacks, now: DateTime<Tz>) -> Self {
        let zone = now.timezone();
        let cutoff = (now - Duration::hours(24)).with_timezone(&Utc);

        let mut total = BigDecimal::from(0);
        let mut total_last_24h = BigDecimal::from(0);
        let mut excluded_amounts = 0;

        // first-occurrence order of the days
        let mut days: Vec<(NaiveDate, BigDecimal)> = Vec::new();
        let mut day_index: HashMap<NaiveDate, usize> = HashMap::new();

        for record in buybacks.records() {
            let day = record.date.with_timezone(&zone).date_naive();
            let idx = *day_index.entry(day).or_insert_with(|| {
                days.push((day, BigDecimal::from(0)));
                days.len() - 1
            });

            let Some(amount) = record.usd_amount_filled.as_decimal() else {
                excluded_amounts += 1;
                continue;
            };

            total += amount.clone();
            days[idx].1 += amount.clone();
            if record.date.with_timezone(&Utc) > cutoff {
                total_last_24h += amount.clone();
            }
        }

        if excluded_amounts > 0 {
            warn!(
                "{} buyback records have an unparseable USD amount and were left out of the totals",
                excluded_amounts
            );
        }

        let per_day = days
            .into_iter()
            .map(|(date, total)| DailyTotal {
                date,
                value: to_chart_value(&total),
                total,
            })
            .collect();

        Self {
            total,
            total_last_24h,
            per_day,
            excluded_amounts,
        }
    }
}

/// Nearest `f64` to the decimal, so `0.3` charts as `0.3`.
fn to_chart_value(total: &BigDecimal) -> f64 {
    total.to_string().parse::<f64>().unwrap_or(0.0)
}
