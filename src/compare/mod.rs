//! Pairing subreads with their long reads and scoring them.

pub mod aggregate;
pub mod records;
pub mod report;

pub use aggregate::{compare_all, compare_pair, CompareParams, ComparisonRow, ComparisonRun, RunStats};
pub use records::{parse_interval, LongReadRecord, LongReadTable, ReadKey, SubreadRecord, SUBREAD_MARKER};
pub use report::{write_report, write_rows};
