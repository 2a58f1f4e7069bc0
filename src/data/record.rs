//! Record Types
//! Raw rows as read from the CSV and typed rows ready for aggregation.

use serde::Serialize;
use std::collections::HashMap;

/// Token in the `y` column marking a client who subscribed.
pub const SUBSCRIBED_TOKEN: &str = "yes";

/// One CSV row before type coercion: column name -> cell text.
///
/// Empty cells and absent columns are both stored as "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (column, value) in pairs {
            record.insert(column, value);
        }
        record
    }

    /// Set a cell value. Empty strings are treated as missing.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.fields.insert(column.into(), value);
        }
    }

    /// Get the text of a cell, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A numeric cell after coercion.
///
/// Unparseable text does not abort preparation; it is tagged so that every
/// numeric reduction has to decide what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Value(i64),
    /// Empty cell or absent column
    Missing,
    /// Text that is not an integer
    Invalid,
}

impl NumericField {
    /// Parse cell text. Integral floats such as `"41.0"` are accepted.
    pub fn parse(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim) else {
            return NumericField::Missing;
        };
        if text.is_empty() {
            return NumericField::Missing;
        }

        if let Ok(v) = text.parse::<i64>() {
            return NumericField::Value(v);
        }

        match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                NumericField::Value(v as i64)
            }
            _ => NumericField::Invalid,
        }
    }

    pub fn value(self) -> Option<i64> {
        match self {
            NumericField::Value(v) => Some(v),
            NumericField::Missing | NumericField::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, NumericField::Value(_))
    }
}

/// One client row after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRecord {
    // Demographic
    pub age: NumericField,
    pub job: Option<String>,
    pub marital: Option<String>,
    pub education: Option<String>,

    // Financial
    pub balance: NumericField,
    pub housing: Option<String>,
    pub loan: Option<String>,

    // Campaign
    pub contact: Option<String>,
    pub duration: NumericField,
    pub campaign: NumericField,
    /// Days since the previous contact, -1 when never contacted.
    pub pdays: NumericField,
    pub previous: NumericField,
    pub poutcome: Option<String>,

    // Target
    pub subscribed: bool,
}

/// Categorical columns usable as a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Job,
    Marital,
    Education,
    Housing,
    Loan,
    Contact,
    Poutcome,
}

impl CategoryField {
    pub fn extract(self, record: &PreparedRecord) -> Option<&str> {
        let value = match self {
            CategoryField::Job => &record.job,
            CategoryField::Marital => &record.marital,
            CategoryField::Education => &record.education,
            CategoryField::Housing => &record.housing,
            CategoryField::Loan => &record.loan,
            CategoryField::Contact => &record.contact,
            CategoryField::Poutcome => &record.poutcome,
        };
        value.as_deref()
    }

    pub fn column_name(self) -> &'static str {
        match self {
            CategoryField::Job => "job",
            CategoryField::Marital => "marital",
            CategoryField::Education => "education",
            CategoryField::Housing => "housing",
            CategoryField::Loan => "loan",
            CategoryField::Contact => "contact",
            CategoryField::Poutcome => "poutcome",
        }
    }
}

/// Numeric columns usable in a mean reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Age,
    Balance,
    Duration,
    Campaign,
    Pdays,
    Previous,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 6] = [
        NumericColumn::Age,
        NumericColumn::Balance,
        NumericColumn::Duration,
        NumericColumn::Campaign,
        NumericColumn::Pdays,
        NumericColumn::Previous,
    ];

    pub fn extract(self, record: &PreparedRecord) -> NumericField {
        match self {
            NumericColumn::Age => record.age,
            NumericColumn::Balance => record.balance,
            NumericColumn::Duration => record.duration,
            NumericColumn::Campaign => record.campaign,
            NumericColumn::Pdays => record.pdays,
            NumericColumn::Previous => record.previous,
        }
    }

    pub fn column_name(self) -> &'static str {
        match self {
            NumericColumn::Age => "age",
            NumericColumn::Balance => "balance",
            NumericColumn::Duration => "duration",
            NumericColumn::Campaign => "campaign",
            NumericColumn::Pdays => "pdays",
            NumericColumn::Previous => "previous",
        }
    }
}
