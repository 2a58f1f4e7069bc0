//! Stats module - Summary metrics and grouped aggregation

mod aggregator;
mod calculator;

pub use aggregator::{
    Aggregation, AggregationEntry, AggregationResult, Aggregator, Predicate, Reduction,
};
pub use calculator::{
    mean_of_valid, rate_percent, round_one_decimal, CampaignMetrics, SummaryCalculator,
    SummaryError, SummaryMetrics, PREVIOUS_SUCCESS,
};
