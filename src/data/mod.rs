//! Data module - CSV loading and record preparation

mod loader;
mod preparer;
mod record;

pub use loader::{DataLoader, LoaderError};
pub use preparer::{CoercionReport, DataPreparer, TARGET_COLUMN};
pub use record::{
    CategoryField, NumericColumn, NumericField, PreparedRecord, RawRecord, SUBSCRIBED_TOKEN,
};
