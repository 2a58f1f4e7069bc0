//! Campaign Insights - Bank marketing campaign CSV analysis
//!
//! Loads the campaign CSV, coerces each row into a typed record, computes the
//! KPI metrics and grouped aggregations, and renders the dashboard charts.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod format;
pub mod stats;

pub use config::{ConfigError, DashboardConfig, HexColor, Palette, DEFAULT_LOAD_ERROR_MESSAGE};
pub use dashboard::{Dashboard, DashboardState, KpiPanel, PublishError};
pub use data::{
    CategoryField, DataLoader, DataPreparer, LoaderError, NumericColumn, NumericField,
    PreparedRecord, RawRecord,
};
pub use stats::{
    Aggregation, AggregationEntry, AggregationResult, Aggregator, CampaignMetrics, Reduction,
    SummaryCalculator, SummaryError, SummaryMetrics,
};
