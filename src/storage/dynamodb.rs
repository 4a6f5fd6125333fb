//! DynamoDB table loader
//!
//! Writes records to a table with one `PutItem` call per record.

use crate::client::DynamoClient;
use crate::etl::Loader;
use crate::record::{FieldValue, Record};

use aws_sdk_dynamodb::types::AttributeValue;
use eyre::{Context, Result, bail};
use std::collections::HashMap;

/// Loader for a DynamoDB table
///
/// Field values map to attribute values as:
/// - text → `S`
/// - integer, decimal → `N`
/// - bool → `BOOL`
///
/// Raw floats are refused; normalize them to decimals first.
///
/// # Example
/// ```no_run
/// use sequin::client::DynamoClient;
/// use sequin::storage::DynamoLoader;
/// use sequin::etl::Loader;
/// use sequin::record::Record;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = DynamoClient::connect(None, None).await?;
/// let loader = DynamoLoader::new(client, "beta4");
///
/// let mut item = Record::new();
/// item.insert("SNO", 1i64);
/// loader.put(item).await?;
/// # Ok(())
/// # }
/// ```
pub struct DynamoLoader {
    client: DynamoClient,
    table: String,
}

impl DynamoLoader {
    /// Create a new table loader
    ///
    /// # Arguments
    /// * `client` - DynamoDB client
    /// * `table` - Name of an existing table
    pub fn new(client: DynamoClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl Loader for DynamoLoader {
    type Item = Record;

    async fn put(&self, item: Self::Item) -> Result<()> {
        let item = to_item(item)?;
        self.client.put_item(&self.table, item).await
    }
}

/// Convert a record into a DynamoDB item
pub fn to_item(record: Record) -> Result<HashMap<String, AttributeValue>> {
    record
        .into_iter()
        .map(|(name, value)| -> Result<(String, AttributeValue)> {
            let attribute = to_attribute(value)
                .with_context(|| format!("Cannot store field '{}'", name))?;
            Ok((name, attribute))
        })
        .collect()
}

fn to_attribute(value: FieldValue) -> Result<AttributeValue> {
    Ok(match value {
        FieldValue::Text(s) => AttributeValue::S(s),
        FieldValue::Integer(i) => AttributeValue::N(i.to_string()),
        FieldValue::Decimal(d) => AttributeValue::N(d.into_string()),
        FieldValue::Bool(b) => AttributeValue::Bool(b),
        FieldValue::Float(f) => bail!("Float {} must be converted to a decimal before writing", f),
    })
}
