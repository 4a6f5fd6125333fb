//! NDJSON (Newline Delimited JSON) file output

use crate::etl::Loader;
use crate::record::Record;

use eyre::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write items as NDJSON lines, one line per `put`
///
/// Used for dry runs: the file receives exactly the items that would have
/// been written to the table, in write order. Decimals keep their exact
/// text as JSON numbers.
pub struct NdjsonWriter {
    path: PathBuf,
}

impl NdjsonWriter {
    /// Create (or truncate) the output file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::write(&path, "")
            .with_context(|| format!("Failed to create NDJSON file: {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one item as a JSON line
    pub fn append(&self, item: &Record) -> Result<()> {
        let line = serde_json::to_string(&item.to_json()?)?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open NDJSON file: {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write NDJSON file: {}", self.path.display()))?;

        Ok(())
    }
}

impl Loader for NdjsonWriter {
    type Item = Record;

    async fn put(&self, item: Self::Item) -> Result<()> {
        self.append(&item)
    }
}
