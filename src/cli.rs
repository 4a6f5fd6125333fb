//! CLI helper functions

use crate::{
    client::{DynamoClient, TableInfo},
    config::{LoadConfig, StoreConfig},
    etl::{BatchLoader, LoadSummary, Loader},
    record::Record,
    source::DelimitedReader,
    storage::{DynamoLoader, NdjsonWriter},
    transform::DecimalNormalizer,
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;

/// Connect to DynamoDB using the configured region and endpoint
pub async fn connect(store: &StoreConfig) -> Result<DynamoClient> {
    DynamoClient::connect(store.region.clone(), store.endpoint_url.clone())
        .await
        .context("Failed to create DynamoDB client")
}

/// Load every configured file into the target
///
/// Pipeline per row: DelimitedReader → DecimalNormalizer → SequenceStamper → Loader.
/// The target is the DynamoDB table, or an NDJSON file on a dry run.
pub async fn load(config: &LoadConfig) -> Result<LoadSummary> {
    let sources: Vec<DelimitedReader> = config
        .files
        .iter()
        .map(|path| DelimitedReader::new(path).with_delimiter(config.delimiter))
        .collect();

    match &config.dry_run {
        Some(path) => {
            log::info!("Dry run, writing items to {}", path.display().bright_black());
            let writer = NdjsonWriter::create(path)?;
            run_batch(config, sources, writer).await
        }
        None => {
            let table = config.store.table()?;
            let client = connect(&config.store).await?;
            log::info!("Loading into table {}", table.cyan());
            run_batch(config, sources, DynamoLoader::new(client, table)).await
        }
    }
}

async fn run_batch<L>(config: &LoadConfig, sources: Vec<DelimitedReader>, loader: L) -> Result<LoadSummary>
where
    L: Loader<Item = Record>,
{
    BatchLoader::new(sources, DecimalNormalizer, loader)
        .with_key_field(config.key_field.as_str())
        .with_throttle(config.throttle.clone())
        .run()
        .await
}

/// Verify credentials and connectivity by describing the table
///
/// Warns when the table's partition key is not the field rows are keyed by,
/// or when the table has a sort key the rows will not carry.
pub async fn check(store: &StoreConfig, key_field: &str) -> Result<TableInfo> {
    let table = store.table()?;
    let client = connect(store).await?;
    let info = client.describe_table(table).await?;

    log::info!(
        "Table {} is {} ({} items)",
        info.name.cyan(),
        info.status.green(),
        info.item_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );

    match info.hash_key.as_deref() {
        Some(hash_key) if hash_key == key_field => {
            log::info!("Partition key {} matches the key field", hash_key.cyan());
        }
        Some(hash_key) => log::warn!(
            "Partition key is {}, but rows are keyed by {}",
            hash_key.yellow(),
            key_field.yellow()
        ),
        None => log::warn!("Could not determine the table's partition key"),
    }
    if let Some(range_key) = &info.range_key {
        log::warn!(
            "Table has sort key {}; rows without it will be rejected",
            range_key.yellow()
        );
    }

    Ok(info)
}
