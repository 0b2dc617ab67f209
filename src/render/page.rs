use std::fmt::Write;

use chrono_tz::Tz;

use crate::render::chart::{BarChart, CHART_CONTAINER_ID};
use crate::render::formatting::format_usd;
use crate::render::table::{render_rows, COLUMNS};
use crate::services::aggregator::Summary;
use crate::services::pipeline::Buybacks;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const TAILWIND_HREF: &str = "https://unpkg.com/tailwindcss@1.9.6/dist/tailwind.min.css";

/// Everything the dashboard page shows, bound from the finalized
/// collection and its summary.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub rows_html: String,
    pub row_count: usize,
    pub total: String,
    pub total_last_24h: String,
    pub excluded_amounts: usize,
    pub chart: BarChart,
}

impl DashboardView {
    pub fn build(buybacks: &Buybacks, summary: &Summary, tz: Tz) -> Self {
        Self {
            rows_html: render_rows(buybacks.records(), tz),
            row_count: buybacks.len(),
            total: format_usd(&summary.total),
            total_last_24h: format_usd(&summary.total_last_24h),
            excluded_amounts: summary.excluded_amounts,
            chart: BarChart::from_daily(&summary.per_day),
        }
    }

    /// The finished document. It carries no `#loading` placeholder, the
    /// page is only sent once every section is filled in.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let script = self.chart.to_script()?;

        let mut head_cells = String::new();
        for column in COLUMNS {
            let _ = write!(head_cells, "<th class=\"border px-2 py-1\">{}</th>", column);
        }

        let excluded_note = if self.excluded_amounts > 0 {
            format!(
                "<p id=\"excluded-amounts\" class=\"text-sm text-gray-600\">{} records with an unreadable USD amount are not included in the totals.</p>",
                self.excluded_amounts
            )
        } else {
            String::new()
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Buybacks</title>
<link rel="stylesheet" href="{TAILWIND_HREF}">
<script src="{PLOTLY_SRC}"></script>
</head>
<body class="p-4">
<div class="flex mb-4">
<div class="mr-8"><div class="text-gray-600">Total</div><div id="total" class="text-2xl">{total}</div></div>
<div><div class="text-gray-600">Last 24h</div><div id="total-last24h" class="text-2xl">{total_last_24h}</div></div>
</div>
{excluded_note}
<div id="{CHART_CONTAINER_ID}" class="w-full mb-4" style="height: 300px"></div>
<table id="buyback-data" class="table-auto w-full" data-rows="{row_count}">
<thead><tr>{head_cells}</tr></thead>
<tbody>
{rows}</tbody>
</table>
<script>{script}</script>
</body>
</html>
"#,
            total = self.total,
            total_last_24h = self.total_last_24h,
            row_count = self.row_count,
            rows = self.rows_html,
        ))
    }
}
