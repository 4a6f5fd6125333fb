//! DynamoDB API client.
//!
//! This module provides the [`DynamoClient`] for writing items to a table,
//! along with the [`TableInfo`] returned by table checks.

mod dynamo;

pub use dynamo::{DynamoClient, TableInfo};
