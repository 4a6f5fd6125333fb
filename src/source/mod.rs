//! Source file reading
//!
//! Turns delimited text files into typed [`Record`](crate::record::Record)s:
//! - Header row names the fields
//! - Column types are inferred per file
//! - Missing cells are dropped

mod delimited;
mod infer;

pub use delimited::DelimitedReader;
pub use infer::{ColumnType, NA_MARKERS, is_missing};
