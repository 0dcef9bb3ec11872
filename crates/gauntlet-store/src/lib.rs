pub mod database;
pub mod error;
pub mod row_helpers;
pub mod schema;
pub mod verdicts;

pub use database::Database;
pub use error::StoreError;
pub use verdicts::{VerdictRecord, VerdictRepo};
