//! Integration tests for the load command's dry-run path
//!
//! Exercises configuration resolution and the CLI load helper end to end,
//! writing to an NDJSON file instead of DynamoDB.

use eyre::Result;
use sequin::cli;
use sequin::config::{LoadArgs, LoadConfig};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

fn read_lines(path: &PathBuf) -> Result<Vec<Value>> {
    std::fs::read_to_string(path)?
        .lines()
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

#[tokio::test]
async fn test_dry_run_writes_numbered_items() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let first = temp_dir.path().join("DATA1.csv");
    let second = temp_dir.path().join("DATA2.csv");
    let output = temp_dir.path().join("items.ndjson");
    std::fs::write(&first, "name,price\napple,12.1\npear,0.5\n")?;
    std::fs::write(&second, "name,price\nfig,3\n")?;

    let args = LoadArgs {
        files: vec![first, second],
        pause_ms: Some(0),
        dry_run: Some(output.clone()),
        ..Default::default()
    };
    let config = LoadConfig::resolve(&args, no_env)?;

    let summary = cli::load(&config).await?;
    assert_eq!(summary.written, 3);

    let items = read_lines(&output)?;
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["SNO"], json!(1));
    assert_eq!(items[0]["name"], json!("apple"));
    assert_eq!(items[2]["SNO"], json!(3));
    assert_eq!(items[2]["name"], json!("fig"));

    // Exact decimal text survives into the output
    let raw = std::fs::read_to_string(&output)?;
    let first_line = raw.lines().next().unwrap_or_default();
    assert!(first_line.contains(r#""price":12.1"#), "{}", first_line);

    Ok(())
}

#[tokio::test]
async fn test_dry_run_with_semicolons_and_custom_key() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("data.csv");
    let output = temp_dir.path().join("items.ndjson");
    std::fs::write(&input, "city;population\nOslo;709037\nBergen;\n")?;

    let args = LoadArgs {
        files: vec![input],
        delimiter: Some(";".to_string()),
        dry_run: Some(output.clone()),
        ..Default::default()
    };
    let env: HashMap<&str, &str> = HashMap::from([("SEQUIN_KEY_FIELD", "row_id"), ("SEQUIN_PAUSE_MS", "0")]);
    let config = LoadConfig::resolve(&args, |key| env.get(key).map(|v| v.to_string()))?;

    cli::load(&config).await?;

    let items = read_lines(&output)?;
    assert_eq!(items[0], json!({"row_id": 1, "city": "Oslo", "population": 709037}));
    // Missing population is left out rather than stored as NaN
    assert_eq!(items[1], json!({"row_id": 2, "city": "Bergen"}));

    Ok(())
}

#[tokio::test]
async fn test_load_without_table_fails_before_reading() -> Result<()> {
    let args = LoadArgs {
        files: vec![PathBuf::from("does-not-matter.csv")],
        ..Default::default()
    };
    let config = LoadConfig::resolve(&args, no_env)?;

    let err = cli::load(&config).await.unwrap_err();
    assert!(err.to_string().contains("No table configured"), "{}", err);

    Ok(())
}
