//! Delimited text file reader

use super::infer::{ColumnType, is_missing};
use crate::etl::Extractor;
use crate::record::Record;

use eyre::{Context, Result};
use std::path::{Path, PathBuf};

/// Read rows from a delimited file with a header row
///
/// Column types are inferred over the whole file before any record is
/// built, so every row of a file carries the same type per column.
/// Missing cells are left out of the record.
///
/// # Example
/// ```no_run
/// use sequin::source::DelimitedReader;
///
/// # fn example() -> eyre::Result<()> {
/// let reader = DelimitedReader::new("DATA1.csv").with_delimiter(b';');
/// for record in reader.read()? {
///     println!("{:?}", record);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DelimitedReader {
    path: PathBuf,
    delimiter: u8,
}

impl DelimitedReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all rows as records, in file order
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, is not valid UTF-8,
    /// or a row has a different number of fields than the header.
    pub fn read(&self) -> Result<Vec<Record>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open delimited file: {}", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header row: {}", self.path.display()))?;
        let headers = unique_headers(headers.iter());

        let mut rows = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.with_context(|| {
                format!("Failed to parse row {} of {}", index + 1, self.path.display())
            })?;
            rows.push(row);
        }

        let types: Vec<ColumnType> = (0..headers.len())
            .map(|column| ColumnType::infer(rows.iter().filter_map(|row| row.get(column))))
            .collect();

        for (name, column_type) in headers.iter().zip(&types) {
            log::debug!("{}: column '{}' is {}", self.path.display(), name, column_type);
        }

        rows.iter()
            .enumerate()
            .map(|(index, row)| -> Result<Record> {
                let mut record = Record::new();
                for ((name, column_type), cell) in headers.iter().zip(&types).zip(row.iter()) {
                    if is_missing(cell) {
                        continue;
                    }
                    let value = column_type.parse(cell).with_context(|| {
                        format!(
                            "Failed to read column '{}' in row {} of {}",
                            name,
                            index + 1,
                            self.path.display()
                        )
                    })?;
                    record.insert(name.clone(), value);
                }
                Ok(record)
            })
            .collect()
    }
}

impl Extractor for DelimitedReader {
    type Item = Record;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        self.read()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Suffix repeated header names with `.1`, `.2`, ... so no column is lost
fn unique_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while unique.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        unique.push(candidate);
    }
    unique
}
