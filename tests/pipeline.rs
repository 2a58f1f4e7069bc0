//! End-to-end: CSV file -> prepared records -> summary and aggregations.

use campaign_insights::{
    Aggregator, CategoryField, DataLoader, DataPreparer, NumericColumn, NumericField, Reduction,
    SummaryCalculator, SummaryError,
};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "age,job,marital,education,default,balance,housing,loan,contact,day,month,duration,campaign,pdays,previous,poutcome,y";

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn three_rows_by_education() {
    let file = csv_file(&[
        "58,management,married,primary,no,2143,yes,no,unknown,5,may,261,1,-1,0,unknown,yes",
        "44,technician,single,primary,no,29,yes,no,unknown,5,may,151,1,-1,0,unknown,no",
        "33,entrepreneur,married,secondary,no,2,yes,yes,unknown,5,may,76,1,-1,0,unknown,yes",
    ]);

    let raw = DataLoader::load_csv(file.path()).unwrap();
    let records = DataPreparer::prepare(&raw);
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].loan.as_deref(), Some("yes"));

    let summary = SummaryCalculator::summarize(&records).unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.subscription_rate, 66.7);

    let by_education =
        Aggregator::by_category(&records, CategoryField::Education, &Reduction::count_subscribed());
    assert_eq!(by_education.pairs(), vec![("primary", 1.0), ("secondary", 1.0)]);
}

#[test]
fn non_numeric_age_is_kept_and_excluded_from_mean() {
    let file = csv_file(&[
        "N/A,admin.,single,tertiary,no,100,no,no,cellular,1,jun,90,2,-1,0,unknown,no",
        "40,admin.,married,tertiary,no,-50,no,no,cellular,1,jun,120,1,-1,0,unknown,yes",
    ]);

    let records = DataPreparer::prepare(&DataLoader::load_csv(file.path()).unwrap());
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].age, NumericField::Invalid);
    assert_eq!(records[1].balance, NumericField::Value(-50));

    let mean_age =
        Aggregator::by_category(&records, CategoryField::Job, &Reduction::Mean(NumericColumn::Age));
    assert_eq!(mean_age.len(), 1);
    assert_eq!(mean_age.entries()[0].value, Some(40.0));
    assert_eq!(mean_age.entries()[0].members, 2);
}

#[test]
fn header_only_file_is_empty_not_an_error() {
    let file = csv_file(&[]);

    let records = DataPreparer::prepare(&DataLoader::load_csv(file.path()).unwrap());
    assert!(records.is_empty());
    assert_eq!(
        SummaryCalculator::summarize(&records),
        Err(SummaryError::DivisionUndefined)
    );
    assert!(Aggregator::by_category(&records, CategoryField::Job, &Reduction::subscription_rate())
        .is_empty());
}

#[test]
fn missing_columns_degrade_per_field() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "job,y,extra").unwrap();
    writeln!(file, "student,yes,ignored").unwrap();
    file.flush().unwrap();

    let records = DataPreparer::prepare(&DataLoader::load_csv(file.path()).unwrap());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].age, NumericField::Missing);
    assert_eq!(records[0].education, None);
    assert!(records[0].subscribed);
}
