//! Sequin
//!
//! Sequential CSV ingest: bulk-loads delimited files into a DynamoDB table,
//! stamping every row with a run-local sequence identifier and storing
//! floating-point values as exact decimals.

pub mod cli;
pub mod client;
pub mod config;
pub mod etl;
pub mod record;
pub mod source;
pub mod storage;
pub mod throttle;
pub mod transform;

// Re-exports for convenience
pub use client::{DynamoClient, TableInfo};
pub use config::{LoadConfig, StoreConfig};
pub use etl::{BatchLoader, Extractor, LoadSummary, Loader, Transformer};
pub use record::{Decimal, FieldValue, Record};
pub use source::DelimitedReader;
pub use storage::{DynamoLoader, MemoryStore, NdjsonWriter};
pub use throttle::Throttle;
