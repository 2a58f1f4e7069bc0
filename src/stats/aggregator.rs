//! Grouped Aggregation Module
//! Groups prepared records by a category and reduces each group to one metric.

use super::calculator::{mean_of_valid, rate_percent};
use crate::data::{CategoryField, NumericColumn, PreparedRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Record predicate used by counting and rate reductions.
pub type Predicate = fn(&PreparedRecord) -> bool;

/// How a group of records is reduced to a single value.
#[derive(Debug, Clone, Copy)]
pub enum Reduction {
    /// Number of members matching the predicate.
    CountWhere(Predicate),
    /// Mean of a numeric column over members with a valid value.
    Mean(NumericColumn),
    /// Percentage of members matching the predicate.
    RateWhere(Predicate),
}

impl Reduction {
    pub fn count_subscribed() -> Self {
        Reduction::CountWhere(|r| r.subscribed)
    }

    pub fn subscription_rate() -> Self {
        Reduction::RateWhere(|r| r.subscribed)
    }

    /// Reduce one group. `None` when the value is undefined for the group.
    fn apply(&self, members: &[&PreparedRecord]) -> Option<f64> {
        match *self {
            Reduction::CountWhere(pred) => {
                Some(members.iter().filter(|r| pred(r)).count() as f64)
            }
            Reduction::Mean(column) => mean_of_valid(members.iter().map(|r| column.extract(r))),
            Reduction::RateWhere(pred) => {
                let matching = members.iter().filter(|r| pred(r)).count();
                rate_percent(matching, members.len()).ok()
            }
        }
    }
}

/// One group of an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationEntry {
    /// Category value; `None` groups records where the category is undefined.
    pub key: Option<String>,
    /// Reduced value; `None` when undefined for this group.
    pub value: Option<f64>,
    /// Number of records in the group.
    pub members: usize,
}

/// Groups ordered by descending value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregationResult {
    entries: Vec<AggregationEntry>,
}

impl AggregationResult {
    pub fn entries(&self) -> &[AggregationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: Option<&str>) -> Option<&AggregationEntry> {
        self.entries.iter().find(|e| e.key.as_deref() == key)
    }

    /// `(key, value)` pairs for entries with a defined key and value.
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.entries
            .iter()
            .filter_map(|e| Some((e.key.as_deref()?, e.value?)))
            .collect()
    }

    /// Sum of all defined values.
    pub fn total(&self) -> f64 {
        self.entries.iter().filter_map(|e| e.value).sum()
    }
}

/// A grouping key plus a reduction, with optional categories that must be
/// reported even when no record has them.
#[derive(Debug, Clone)]
pub struct Aggregation {
    key: CategoryField,
    reduction: Reduction,
    expected: Vec<String>,
}

impl Aggregation {
    pub fn new(key: CategoryField, reduction: Reduction) -> Self {
        Self {
            key,
            reduction,
            expected: Vec::new(),
        }
    }

    /// Report these categories even if absent from the data. Unobserved ones
    /// are placed after the observed ones, in the order given here.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn run(&self, records: &[PreparedRecord]) -> AggregationResult {
        let extra: Vec<Option<&str>> = self.expected.iter().map(|c| Some(c.as_str())).collect();
        Aggregator::aggregate_with(records, |r| self.key.extract(r), &self.reduction, &extra)
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Group by a category column.
    pub fn by_category(
        records: &[PreparedRecord],
        key: CategoryField,
        reduction: &Reduction,
    ) -> AggregationResult {
        Self::aggregate(records, |r| key.extract(r), reduction)
    }

    /// Group by any key function. Only keys observed at least once appear.
    pub fn aggregate<F>(records: &[PreparedRecord], key: F, reduction: &Reduction) -> AggregationResult
    where
        F: Fn(&PreparedRecord) -> Option<&str>,
    {
        Self::aggregate_with(records, key, reduction, &[])
    }

    /// Group by a key function, also reporting `extra` keys that may be absent
    /// from the data.
    ///
    /// Output is sorted by descending value with undefined values last. Equal
    /// values keep the order in which their keys were first encountered.
    pub fn aggregate_with<'k, F>(
        records: &'k [PreparedRecord],
        key: F,
        reduction: &Reduction,
        extra: &[Option<&'k str>],
    ) -> AggregationResult
    where
        F: Fn(&'k PreparedRecord) -> Option<&'k str>,
    {
        // Groups in first-encountered order
        let mut groups: Vec<(Option<&str>, Vec<&PreparedRecord>)> = Vec::new();
        let mut index: HashMap<Option<&str>, usize> = HashMap::new();

        for record in records {
            let k = key(record);
            let slot = *index.entry(k).or_insert_with(|| {
                groups.push((k, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(record);
        }

        for &k in extra {
            if !index.contains_key(&k) {
                index.insert(k, groups.len());
                groups.push((k, Vec::new()));
            }
        }

        let mut entries: Vec<AggregationEntry> = groups
            .into_iter()
            .map(|(k, members)| AggregationEntry {
                key: k.map(str::to_string),
                value: reduction.apply(&members),
                members: members.len(),
            })
            .collect();

        // sort_by is stable: ties keep first-encountered order
        entries.sort_by(|a, b| descending(a.value, b.value));

        AggregationResult { entries }
    }
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
