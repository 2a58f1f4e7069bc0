//! Chart Plotter Module
//! Builds the dashboard chart data from prepared records and the palette.

use crate::config::{HexColor, Palette};
use crate::data::{CategoryField, PreparedRecord};
use crate::stats::{Aggregation, AggregationResult, Reduction};
use serde::Serialize;

/// Axis label for a group whose category is undefined.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Ids of the four dashboard charts, in page order. Each renders to `<id>.svg`.
pub const CHART_IDS: [&str; 4] = ["chart-1", "chart-2", "chart-3", "chart-4"];

/// One bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: HexColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: HexColor,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Bars in aggregation order, all in `color`. Groups with an undefined
    /// value have no bar.
    pub fn from_aggregation(
        id: &str,
        title: &str,
        x_label: &str,
        y_label: &str,
        color: HexColor,
        result: &AggregationResult,
    ) -> Self {
        let bars = result
            .iter()
            .filter_map(|entry| {
                Some(Bar {
                    label: entry.key.clone().unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                    value: entry.value?,
                    color,
                })
            })
            .collect();

        Self {
            id: id.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            color,
            bars,
        }
    }

    /// Color each bar from the palette scale, in bar order.
    pub fn with_series_colors(mut self, palette: &Palette) -> Self {
        for (i, bar) in self.bars.iter_mut().enumerate() {
            bar.color = palette.series(i);
        }
        self
    }

    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

/// A named point series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub color: HexColor,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// `(x_max, y_max)` over all points, at least `(1.0, 1.0)`.
    pub fn bounds(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .fold((1.0, 1.0), |(x, y), &(px, py)| (x.max(px), y.max(py)))
    }
}

/// The four dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub subscriptions_by_education: BarChart,
    pub conversion_by_job: BarChart,
    pub duration_vs_calls: ScatterChart,
    pub conversion_by_previous_outcome: BarChart,
}

/// Builds chart data for the dashboard.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn build(records: &[PreparedRecord], palette: &Palette) -> DashboardCharts {
        DashboardCharts {
            subscriptions_by_education: Self::subscriptions_by_education(records, palette),
            conversion_by_job: Self::conversion_by_job(records, palette),
            duration_vs_calls: Self::duration_vs_calls(records, palette),
            conversion_by_previous_outcome: Self::conversion_by_previous_outcome(
                records, palette,
            ),
        }
    }

    /// Chart 1: subscribed clients per education level.
    pub fn subscriptions_by_education(records: &[PreparedRecord], palette: &Palette) -> BarChart {
        let result =
            Aggregation::new(CategoryField::Education, Reduction::count_subscribed()).run(records);
        BarChart::from_aggregation(
            CHART_IDS[0],
            "Subscriptions by education",
            "Education",
            "Subscribed clients",
            palette.steel,
            &result,
        )
    }

    /// Chart 2: subscription rate per job.
    pub fn conversion_by_job(records: &[PreparedRecord], palette: &Palette) -> BarChart {
        let result =
            Aggregation::new(CategoryField::Job, Reduction::subscription_rate()).run(records);
        BarChart::from_aggregation(
            CHART_IDS[1],
            "Conversion rate by job",
            "Job",
            "Conversion (%)",
            palette.crimson,
            &result,
        )
    }

    /// Chart 3: call duration against calls this campaign, split by outcome.
    /// Records missing either value are left out.
    pub fn duration_vs_calls(records: &[PreparedRecord], palette: &Palette) -> ScatterChart {
        let mut subscribed = Vec::new();
        let mut declined = Vec::new();

        for record in records {
            let (Some(duration), Some(calls)) = (record.duration.value(), record.campaign.value())
            else {
                continue;
            };
            let point = (duration as f64, calls as f64);
            if record.subscribed {
                subscribed.push(point);
            } else {
                declined.push(point);
            }
        }

        ScatterChart {
            id: CHART_IDS[2].to_string(),
            title: "Call duration vs calls this campaign".to_string(),
            x_label: "Call duration (s)".to_string(),
            y_label: "Calls this campaign".to_string(),
            series: vec![
                ScatterSeries {
                    name: "Not subscribed".to_string(),
                    color: palette.muted,
                    points: declined,
                },
                ScatterSeries {
                    name: "Subscribed".to_string(),
                    color: palette.coral,
                    points: subscribed,
                },
            ],
        }
    }

    /// Chart 4: subscription rate per previous campaign outcome, one scale
    /// color per outcome.
    pub fn conversion_by_previous_outcome(
        records: &[PreparedRecord],
        palette: &Palette,
    ) -> BarChart {
        let result =
            Aggregation::new(CategoryField::Poutcome, Reduction::subscription_rate()).run(records);
        BarChart::from_aggregation(
            CHART_IDS[3],
            "Conversion rate by previous outcome",
            "Previous campaign outcome",
            "Conversion (%)",
            palette.purple,
            &result,
        )
        .with_series_colors(palette)
    }
}
