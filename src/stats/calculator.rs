//! Summary Calculator Module
//! Whole-dataset metrics shown in the KPI panel.

use crate::data::{NumericColumn, NumericField, PreparedRecord};
use serde::Serialize;
use statrs::statistics::Statistics;
use thiserror::Error;

/// `poutcome` value for a previous campaign that ended in a subscription.
pub const PREVIOUS_SUCCESS: &str = "success";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryError {
    /// A rate was requested over zero records.
    #[error("Rate is undefined over zero records")]
    DivisionUndefined,
}

/// Headline metrics for one load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total: usize,
    pub subscribed: usize,
    /// Percentage, rounded to one decimal place.
    pub subscription_rate: f64,
}

/// Secondary metrics for the remaining KPI slots.
///
/// `None` means the metric is undefined for this dataset (no records, or no
/// valid values for the field).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CampaignMetrics {
    /// Mean of `campaign` (calls during this campaign) per client.
    pub mean_calls_per_client: Option<f64>,
    /// Percentage of clients whose previous campaign succeeded.
    pub previous_success_rate: Option<f64>,
    /// Mean age of clients who subscribed.
    pub mean_age_subscribed: Option<f64>,
}

pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Compute total, subscription count and subscription rate.
    pub fn summarize(records: &[PreparedRecord]) -> Result<SummaryMetrics, SummaryError> {
        let total = records.len();
        let subscribed = records.iter().filter(|r| r.subscribed).count();
        let subscription_rate = rate_percent(subscribed, total)?;

        Ok(SummaryMetrics {
            total,
            subscribed,
            subscription_rate,
        })
    }

    /// Compute the secondary campaign metrics.
    pub fn campaign_metrics(records: &[PreparedRecord]) -> CampaignMetrics {
        let previous_success = records
            .iter()
            .filter(|r| r.poutcome.as_deref() == Some(PREVIOUS_SUCCESS))
            .count();

        CampaignMetrics {
            mean_calls_per_client: mean_of_valid(
                records.iter().map(|r| NumericColumn::Campaign.extract(r)),
            ),
            previous_success_rate: rate_percent(previous_success, records.len()).ok(),
            mean_age_subscribed: mean_of_valid(
                records.iter().filter(|r| r.subscribed).map(|r| r.age),
            ),
        }
    }
}

/// `100 * matching / total`, rounded to one decimal place.
pub fn rate_percent(matching: usize, total: usize) -> Result<f64, SummaryError> {
    if total == 0 {
        return Err(SummaryError::DivisionUndefined);
    }
    Ok(round_one_decimal(matching as f64 / total as f64 * 100.0))
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean over valid values only. Missing and invalid fields are
/// excluded from the denominator; `None` when no value is valid.
pub fn mean_of_valid<I>(fields: I) -> Option<f64>
where
    I: IntoIterator<Item = NumericField>,
{
    let values: Vec<f64> = fields
        .into_iter()
        .filter_map(NumericField::value)
        .map(|v| v as f64)
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}
