use serde::Serialize;

use crate::services::aggregator::DailyTotal;

pub const CHART_CONTAINER_ID: &str = "days-graph";
const BAR_COLOR: &str = "#4299e1";

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub margin: Margin,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
    pub pad: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    pub display_mode_bar: bool,
    pub responsive: bool,
}

/// Per-day bar chart, drawn client side by Plotly.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub trace: BarTrace,
    pub layout: Layout,
    pub config: PlotConfig,
}

impl BarChart {
    pub fn from_daily(per_day: &[DailyTotal]) -> Self {
        Self {
            trace: BarTrace {
                x: per_day.iter().map(|d| d.date.format("%Y-%m-%d").to_string()).collect(),
                y: per_day.iter().map(|d| d.value).collect(),
                kind: "bar",
                marker: Marker { color: BAR_COLOR },
            },
            layout: Layout {
                margin: Margin { l: 0, r: 0, b: 50, t: 0, pad: 4 },
            },
            config: PlotConfig {
                display_mode_bar: false,
                responsive: true,
            },
        }
    }

    pub fn to_script(&self) -> Result<String, serde_json::Error> {
        Ok(format!(
            "Plotly.newPlot({}, [{}], {}, {});",
            serde_json::to_string(CHART_CONTAINER_ID)?,
            serde_json::to_string(&self.trace)?,
            serde_json::to_string(&self.layout)?,
            serde_json::to_string(&self.config)?,
        ))
    }
}
