//! DynamoDB client module
//!
//! Provides `DynamoClient`, a thin wrapper over the AWS SDK client with the
//! two calls the loader needs: `PutItem` and `DescribeTable`.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, KeyType};
use eyre::{Result, eyre};
use std::collections::HashMap;
use url::Url;

/// Summary of a table, as reported by `DescribeTable`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub status: String,
    pub item_count: Option<i64>,
    /// Partition key attribute name
    pub hash_key: Option<String>,
    /// Sort key attribute name, if the table has one
    pub range_key: Option<String>,
}

/// DynamoDB client for writing items.
///
/// Credentials come from the standard AWS provider chain (environment,
/// profile, container or instance role). Nothing is read from literals.
///
/// # Example
/// ```no_run
/// use sequin::client::DynamoClient;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = DynamoClient::connect(Some("us-east-1".to_string()), None).await?;
/// let table = client.describe_table("beta4").await?;
/// println!("{} is {}", table.name, table.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DynamoClient {
    client: Client,
}

impl DynamoClient {
    /// Build a client from the AWS environment.
    ///
    /// # Arguments
    /// * `region` - Region override; falls back to `AWS_REGION` and profile config
    /// * `endpoint_url` - Endpoint override, e.g. a local DynamoDB
    ///
    /// # Errors
    /// Returns an error if no region can be resolved.
    pub async fn connect(region: Option<String>, endpoint_url: Option<Url>) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;

        let Some(region) = shared.region() else {
            eyre::bail!("No AWS region configured; set AWS_REGION or pass --region");
        };
        log::debug!("Using AWS region {}", region);

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(url) = endpoint_url {
            log::debug!("Using DynamoDB endpoint {}", url);
            builder = builder.endpoint_url(url.as_str());
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
        })
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Write one item, replacing any item with the same key.
    pub async fn put_item(&self, table: &str, item: HashMap<String, AttributeValue>) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| eyre!("PutItem on table '{}' failed: {}", table, DisplayErrorContext(&e)))?;
        Ok(())
    }

    /// Describe a table to verify credentials, connectivity and key schema.
    pub async fn describe_table(&self, table: &str) -> Result<TableInfo> {
        let response = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| {
                eyre!("DescribeTable on table '{}' failed: {}", table, DisplayErrorContext(&e))
            })?;

        let description = response
            .table()
            .ok_or_else(|| eyre!("DescribeTable returned no description for '{}'", table))?;

        let key_named = |key_type: KeyType| {
            description
                .key_schema()
                .iter()
                .find(|k| *k.key_type() == key_type)
                .map(|k| k.attribute_name().to_string())
        };

        Ok(TableInfo {
            name: description.table_name().unwrap_or(table).to_string(),
            status: description
                .table_status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            item_count: description.item_count(),
            hash_key: key_named(KeyType::Hash),
            range_key: key_named(KeyType::Range),
        })
    }
}
