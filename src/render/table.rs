use std::fmt::Write;

use chrono_tz::Tz;

use crate::models::BuybackRecord;
use crate::render::formatting::{
    escape_html, format_amount, format_plain, format_short_datetime,
};

const CELL: &str = "border px-2 py-1";
const TAG: &str = "text-white rounded-sm px-1 text-sm";
const MARKET_TAG: &str = "bg-blue-500";
const OTHER_TAG: &str = "bg-indigo-500";

pub const COLUMNS: [&str; 7] = [
    "Date",
    "Order ID",
    "Batch ID",
    "Type",
    "Price",
    "Quantity Filled",
    "USD Amount Filled",
];

/// `<tr>` elements for the table body, one per record, in order.
pub fn render_rows(records: &[BuybackRecord], tz: Tz) -> String {
    let mut out = String::new();
    for record in records {
        render_row(&mut out, record, tz);
    }
    out
}

fn render_row(out: &mut String, record: &BuybackRecord, tz: Tz) {
    let tag = if record.order_type.is_market() { MARKET_TAG } else { OTHER_TAG };

    // writing into a String cannot fail
    let _ = write!(
        out,
        "<tr>\
         <td class=\"{cell}\">{date}</td>\
         <td class=\"{cell}\">{order_id}</td>\
         <td class=\"{cell}\">{batch_id}</td>\
         <td class=\"{cell} text-center\"><span class=\"{TAG} {tag}\">{order_type}</span></td>\
         <td class=\"{cell} text-right\">{price}</td>\
         <td class=\"{cell} text-right\">{quantity}</td>\
         <td class=\"{cell} text-right\">{amount}</td>\
         </tr>\n",
        cell = CELL,
        date = escape_html(&format_short_datetime(&record.date, tz)),
        order_id = escape_html(&record.order_id),
        batch_id = escape_html(&record.batch_id),
        order_type = escape_html(&record.order_type.to_string()),
        price = escape_html(&format_plain(&record.price)),
        quantity = escape_html(&format_plain(&record.quantity_filled)),
        amount = escape_html(&format_amount(&record.usd_amount_filled, 4)),
    );
}
