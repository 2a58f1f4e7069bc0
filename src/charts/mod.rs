//! Charts module - Dashboard chart data and rendering

mod plotter;
mod renderer;

pub use plotter::{
    Bar, BarChart, ChartPlotter, DashboardCharts, ScatterChart, ScatterSeries, CHART_IDS,
    UNKNOWN_LABEL,
};
pub use renderer::{ChartError, StaticChartRenderer};
