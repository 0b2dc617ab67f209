use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;

use crate::models::Amount;

/// Rounds half away from zero to `digits` fractional digits and groups the
/// integer part by thousands, e.g. `1234567.891` → `1,234,567.89`.
pub fn format_decimal(value: &BigDecimal, digits: i64) -> String {
    let text = value.round(digits).with_scale(digits).to_string();

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    match unsigned.split_once('.') {
        Some((int_part, frac_part)) => {
            format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
        }
        None => format!("{}{}", sign, group_thousands(unsigned)),
    }
}

pub fn format_usd(value: &BigDecimal) -> String {
    format!("{} USD", format_decimal(value, 0))
}

/// Amount cell text; blank for `NaN`.
pub fn format_amount(amount: &Amount, digits: i64) -> String {
    match amount {
        Amount::Number(value) => format_decimal(value, digits),
        Amount::NaN => String::new(),
    }
}

/// Price and quantity are shown as given by the feed.
pub fn format_plain(amount: &Amount) -> String {
    match amount {
        Amount::Number(value) => value.to_string(),
        Amount::NaN => String::new(),
    }
}

/// Short date-time in the display zone, `1/5/2024, 3:07 PM`.
pub fn format_short_datetime(dt: &DateTime<FixedOffset>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%-m/%-d/%Y, %-I:%M %p").to_string()
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
