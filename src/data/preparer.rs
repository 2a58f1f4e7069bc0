//! Data Preparer Module
//! Coerces raw text records into typed records (numeric fields, target label).

use super::record::{NumericColumn, NumericField, PreparedRecord, RawRecord, SUBSCRIBED_TOKEN};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Column holding the campaign outcome label.
pub const TARGET_COLUMN: &str = "y";

/// Per-column counts of numeric cells that failed coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionReport {
    pub missing: BTreeMap<&'static str, usize>,
    pub invalid: BTreeMap<&'static str, usize>,
}

impl CoercionReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Turns raw records into prepared records. Never fails and never drops rows.
pub struct DataPreparer;

impl DataPreparer {
    /// Prepare every record, preserving order and count.
    pub fn prepare(raw: &[RawRecord]) -> Vec<PreparedRecord> {
        let prepared: Vec<PreparedRecord> = raw.par_iter().map(Self::prepare_record).collect();

        let report = Self::coercion_report(&prepared);
        if !report.is_clean() {
            tracing::debug!(
                missing = ?report.missing,
                invalid = ?report.invalid,
                "numeric fields could not be coerced"
            );
        }

        prepared
    }

    /// Prepare a single record.
    pub fn prepare_record(row: &RawRecord) -> PreparedRecord {
        let number = |column: &str| NumericField::parse(row.get(column));
        let category = |column: &str| row.get(column).map(str::to_string);

        PreparedRecord {
            age: number("age"),
            job: category("job"),
            marital: category("marital"),
            education: category("education"),

            balance: number("balance"),
            housing: category("housing"),
            loan: category("loan"),

            contact: category("contact"),
            duration: number("duration"),
            campaign: number("campaign"),
            pdays: number("pdays"),
            previous: number("previous"),
            poutcome: category("poutcome"),

            subscribed: row.get(TARGET_COLUMN) == Some(SUBSCRIBED_TOKEN),
        }
    }

    /// Count missing/invalid numeric cells per column.
    pub fn coercion_report(records: &[PreparedRecord]) -> CoercionReport {
        let mut report = CoercionReport::default();

        for record in records {
            for column in NumericColumn::ALL {
                let bucket = match column.extract(record) {
                    NumericField::Value(_) => continue,
                    NumericField::Missing => &mut report.missing,
                    NumericField::Invalid => &mut report.invalid,
                };
                *bucket.entry(column.column_name()).or_default() += 1;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full_row() -> RawRecord {
        RawRecord::from_pairs([
            ("age", "58"),
            ("job", "management"),
            ("marital", "married"),
            ("education", "tertiary"),
            ("balance", "-2143"),
            ("housing", "yes"),
            ("loan", "no"),
            ("contact", "unknown"),
            ("duration", "261"),
            ("campaign", "1"),
            ("pdays", "-1"),
            ("previous", "0"),
            ("poutcome", "unknown"),
            ("y", "yes"),
        ])
    }

    #[test]
    fn prepares_all_fields() {
        let record = DataPreparer::prepare_record(&full_row());

        assert_eq!(record.age, NumericField::Value(58));
        assert_eq!(record.job.as_deref(), Some("management"));
        assert_eq!(record.education.as_deref(), Some("tertiary"));
        assert_eq!(record.balance, NumericField::Value(-2143));
        assert_eq!(record.housing.as_deref(), Some("yes"));
        assert_eq!(record.loan.as_deref(), Some("no"));
        assert_eq!(record.duration, NumericField::Value(261));
        assert_eq!(record.pdays, NumericField::Value(-1));
        assert_eq!(record.poutcome.as_deref(), Some("unknown"));
        assert!(record.subscribed);
    }

    #[test]
    fn non_numeric_age_is_tagged_not_dropped() {
        let raw = vec![RawRecord::from_pairs([("age", "N/A"), ("y", "no")])];
        let prepared = DataPreparer::prepare(&raw);

        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].age, NumericField::Invalid);
    }

    #[test]
    fn missing_columns_are_undefined() {
        let record = DataPreparer::prepare_record(&RawRecord::from_pairs([("y", "yes")]));

        assert_eq!(record.age, NumericField::Missing);
        assert_eq!(record.job, None);
        assert_eq!(record.poutcome, None);
        assert!(record.subscribed);
    }

    #[test]
    fn target_label_is_exact_match() {
        for label in ["no", "Yes", "YES", " yes", "yes ", "", "1", "true"] {
            let record = DataPreparer::prepare_record(&RawRecord::from_pairs([("y", label)]));
            assert!(!record.subscribed, "label {label:?} must not count as subscribed");
        }
        assert!(!DataPreparer::prepare_record(&RawRecord::new()).subscribed);
    }

    #[test]
    fn coercion_report_counts_per_column() {
        let raw = vec![
            RawRecord::from_pairs([("age", "N/A"), ("balance", "10")]),
            RawRecord::from_pairs([("age", "31"), ("balance", "oops")]),
        ];
        let report = DataPreparer::coercion_report(&DataPreparer::prepare(&raw));

        assert_eq!(report.invalid.get("age"), Some(&1));
        assert_eq!(report.invalid.get("balance"), Some(&1));
        assert_eq!(report.missing.get("duration"), Some(&2));
        assert!(!report.is_clean());
    }

    proptest! {
        #[test]
        fn preparation_preserves_length_and_order(
            ages in proptest::collection::vec("[0-9A-Za-z/]{0,4}", 0..64)
        ) {
            let raw: Vec<RawRecord> = ages
                .iter()
                .map(|age| RawRecord::from_pairs([("age", age.as_str())]))
                .collect();
            let prepared = DataPreparer::prepare(&raw);

            prop_assert_eq!(prepared.len(), raw.len());
            for (age, record) in ages.iter().zip(&prepared) {
                prop_assert_eq!(record.age, NumericField::parse(Some(age.as_str())));
            }
        }

        #[test]
        fn subscribed_iff_label_is_yes(label in "(yes|no|Yes|y|)[a-z ]{0,2}") {
            let record = DataPreparer::prepare_record(&RawRecord::from_pairs([("y", label.as_str())]));
            prop_assert_eq!(record.subscribed, label == "yes");
        }
    }
}
