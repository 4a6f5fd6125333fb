//! Integration tests for batch loading
//!
//! These tests run delimited files through the full loader into an
//! in-memory store.

use eyre::Result;
use sequin::etl::{BatchLoader, Extractor};
use sequin::record::{Decimal, FieldValue, Record};
use sequin::source::DelimitedReader;
use sequin::storage::MemoryStore;
use sequin::throttle::Throttle;
use sequin::transform::DecimalNormalizer;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, content: &str) -> DelimitedReader {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    DelimitedReader::new(path)
}

/// Three files with 2, 3 and 1 rows
fn three_files(dir: &Path) -> Vec<DelimitedReader> {
    vec![
        write_csv(dir, "DATA1.csv", "name,price,qty\napple,12.1,3\npear,0.5,7\n"),
        write_csv(dir, "DATA2.csv", "name,price,qty\nplum,1.25,1\nfig,2,2\nkiwi,3.75,9\n"),
        write_csv(dir, "DATA3.csv", "name,price,qty\nlime,0.1,4\n"),
    ]
}

fn decimal(s: &str) -> FieldValue {
    FieldValue::Decimal(s.parse::<Decimal>().unwrap())
}

#[tokio::test]
async fn test_identifiers_span_files_in_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let loader = BatchLoader::new(three_files(temp_dir.path()), DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::none());

    let summary = loader.run().await?;

    assert_eq!(summary.files, 3);
    assert_eq!(summary.written, 6);
    assert_eq!(summary.last_id, Some(6));

    let store = loader.loader();
    assert_eq!(store.ids(), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(store.get(1).unwrap().get("name"), Some(&FieldValue::from("apple")));
    assert_eq!(store.get(3).unwrap().get("name"), Some(&FieldValue::from("plum")));
    assert_eq!(store.get(6).unwrap().get("name"), Some(&FieldValue::from("lime")));

    Ok(())
}

#[tokio::test]
async fn test_floats_are_stored_as_exact_decimals() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let loader = BatchLoader::new(three_files(temp_dir.path()), DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::none());

    loader.run().await?;
    let store = loader.loader();

    assert_eq!(store.get(1).unwrap().get("price"), Some(&decimal("12.1")));
    assert_eq!(store.get(6).unwrap().get("price"), Some(&decimal("0.1")));
    // "2" sits in a float column, so it is a decimal too
    assert_eq!(store.get(4).unwrap().get("price"), Some(&decimal("2")));

    for item in store.items() {
        assert!(item.iter().all(|(_, value)| !value.is_float()), "{:?}", item);
    }

    Ok(())
}

#[tokio::test]
async fn test_strings_and_integers_pass_through() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_csv(
        temp_dir.path(),
        "mixed.csv",
        "code,count,note,flag\n00042,10,\"hello, world\",True\nA7,-3,  padded  ,False\n",
    );
    let loader = BatchLoader::new(vec![source], DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::none());

    loader.run().await?;
    let first = loader.loader().get(1).unwrap();
    let second = loader.loader().get(2).unwrap();

    assert_eq!(first.get("code"), Some(&FieldValue::from("00042")));
    assert_eq!(first.get("count"), Some(&FieldValue::Integer(10)));
    assert_eq!(first.get("note"), Some(&FieldValue::from("hello, world")));
    assert_eq!(first.get("flag"), Some(&FieldValue::Bool(true)));
    assert_eq!(second.get("count"), Some(&FieldValue::Integer(-3)));
    assert_eq!(second.get("note"), Some(&FieldValue::from("  padded  ")));
    assert_eq!(second.get("SNO"), Some(&FieldValue::Integer(2)));

    Ok(())
}

#[tokio::test]
async fn test_integer_column_beyond_i64_stays_exact() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_csv(
        temp_dir.path(),
        "wide.csv",
        "id,tag\n12345678901234567891,x\n9007199254740993,y\n",
    );
    let loader = BatchLoader::new(vec![source], DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::none());

    loader.run().await?;
    let first = loader.loader().get(1).unwrap();
    let second = loader.loader().get(2).unwrap();

    assert_eq!(first.get("id"), Some(&decimal("12345678901234567891")));
    assert_eq!(second.get("id"), Some(&FieldValue::Integer(9007199254740993)));
    assert_eq!(second.get("tag"), Some(&FieldValue::from("y")));

    Ok(())
}

#[tokio::test]
async fn test_rejected_write_stops_the_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let loader = BatchLoader::new(
        three_files(temp_dir.path()),
        DecimalNormalizer,
        MemoryStore::default().failing_on(4),
    )
    .with_throttle(Throttle::none());

    let err = loader.run().await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Failed to write item 4"), "{}", message);
    assert!(message.contains("last successful write was 3"), "{}", message);

    // Items 1-3 stay written, nothing after the failure is attempted
    let store = loader.loader();
    assert_eq!(store.ids(), vec![1, 2, 3]);
    assert_eq!(store.write_count(), 3);

    Ok(())
}

#[tokio::test]
async fn test_malformed_file_stops_the_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let sources = vec![
        write_csv(temp_dir.path(), "good.csv", "a,b\n1,2\n"),
        write_csv(temp_dir.path(), "bad.csv", "a,b\n1,2,3\n"),
        write_csv(temp_dir.path(), "never.csv", "a,b\n5,6\n"),
    ];
    let loader = BatchLoader::new(sources, DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::none());

    let err = loader.run().await.unwrap_err();

    assert!(err.to_string().contains("bad.csv"), "{}", err);
    assert_eq!(loader.loader().ids(), vec![1]);

    Ok(())
}

#[tokio::test]
async fn test_rerun_restarts_identifiers() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let first_run = BatchLoader::new(three_files(temp_dir.path()), DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::none());
    first_run.run().await?;
    let store = first_run.into_loader();

    // A shorter second run against the same store
    let second_source = write_csv(temp_dir.path(), "again.csv", "name,price,qty\nquince,9.9,1\n");
    let second_run = BatchLoader::new(vec![second_source], DecimalNormalizer, store)
        .with_throttle(Throttle::none());
    let summary = second_run.run().await?;

    assert_eq!(summary.last_id, Some(1));

    let store = second_run.loader();
    // Identifier 1 collided and was overwritten, the rest of the first run remains
    assert_eq!(store.ids(), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(store.get(1).unwrap().get("name"), Some(&FieldValue::from("quince")));
    assert_eq!(store.get(2).unwrap().get("name"), Some(&FieldValue::from("pear")));
    assert_eq!(store.write_count(), 7);

    Ok(())
}

#[tokio::test]
async fn test_source_key_column_is_overwritten() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = write_csv(temp_dir.path(), "keyed.csv", "SNO,name\n100,a\n200,b\n");
    let loader = BatchLoader::new(vec![source], DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::none());

    loader.run().await?;

    assert_eq!(loader.loader().ids(), vec![1, 2]);

    Ok(())
}

struct Rows(usize);

impl Extractor for Rows {
    type Item = Record;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        Ok((0..self.0)
            .map(|i| {
                let mut row = Record::new();
                row.insert("i", i as i64);
                row
            })
            .collect())
    }
}

#[tokio::test(start_paused = true)]
async fn test_pause_only_between_files() -> Result<()> {
    let loader = BatchLoader::new(vec![Rows(2), Rows(3), Rows(1)], DecimalNormalizer, MemoryStore::default())
        .with_throttle(Throttle::new(Duration::from_secs(1)));

    let start = tokio::time::Instant::now();
    loader.run().await?;

    // Two gaps between three files, no pause after the last one
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    assert_eq!(loader.loader().len(), 6);

    Ok(())
}
