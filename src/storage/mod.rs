//! Item destinations
//!
//! Every destination implements [`Loader`](crate::etl::Loader):
//! - DynamoDB table (the real target)
//! - NDJSON file (dry runs)
//! - In-memory store (tests and embedding)

mod dynamodb;
mod memory;
mod ndjson;

pub use dynamodb::{DynamoLoader, to_item};
pub use memory::MemoryStore;
pub use ndjson::NdjsonWriter;
