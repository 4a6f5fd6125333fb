//! Batch loader: drains sources in order, one write per row

use super::{Extractor, Loader, Transformer};
use crate::record::Record;
use crate::throttle::Throttle;
use crate::transform::{Sequence, SequenceStamper};
use eyre::{Context, Result};

/// Outcome of a completed batch load
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Sources fully processed
    pub files: usize,
    /// Items written
    pub written: u64,
    /// Identifier of the last item written
    pub last_id: Option<u64>,
}

/// Sequential batch loader
///
/// Processes every row of every source exactly once, in source order and
/// then in row order. Each row is transformed, stamped with the next
/// sequence identifier, and written on its own before the next row is
/// read. The first error ends the run; rows already written stay written.
///
/// # Type Parameters
/// - `E`: Extractor type, one per source file
/// - `T`: Transformer applied to each row before stamping
/// - `L`: Loader receiving the stamped records
///
/// # Example
/// ```no_run
/// use sequin::etl::BatchLoader;
/// use sequin::source::DelimitedReader;
/// use sequin::storage::MemoryStore;
/// use sequin::transform::DecimalNormalizer;
///
/// # async fn example() -> eyre::Result<()> {
/// let sources = vec![
///     DelimitedReader::new("DATA1.csv"),
///     DelimitedReader::new("DATA2.csv"),
/// ];
/// let loader = BatchLoader::new(sources, DecimalNormalizer, MemoryStore::default());
///
/// let summary = loader.run().await?;
/// println!("Wrote {} items", summary.written);
/// # Ok(())
/// # }
/// ```
pub struct BatchLoader<E, T, L> {
    sources: Vec<E>,
    transformer: T,
    loader: L,
    stamper: SequenceStamper,
    throttle: Throttle,
}

impl<E, T, L> BatchLoader<E, T, L>
where
    E: Extractor<Item = Record>,
    T: Transformer<Input = Record, Output = Record>,
    L: Loader<Item = Record>,
{
    /// Create a batch loader with the default key field and throttle
    pub fn new(sources: Vec<E>, transformer: T, loader: L) -> Self {
        Self {
            sources,
            transformer,
            loader,
            stamper: SequenceStamper::default(),
            throttle: Throttle::default(),
        }
    }

    /// Set the field that receives the sequence identifier
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.stamper = SequenceStamper::new(key_field);
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn into_loader(self) -> L {
        self.loader
    }

    /// Run the load
    ///
    /// For each row:
    /// 1. Transform the parsed row
    /// 2. Stamp the current sequence identifier into the key field
    /// 3. Write it to the loader
    /// 4. Advance the sequence and log the identifier
    ///
    /// Sources are separated by the throttle's file pause.
    ///
    /// # Errors
    /// Returns the first source, transform or write error. Source errors
    /// name the source; write errors name the identifier being written and
    /// the last one that succeeded.
    pub async fn run(&self) -> Result<LoadSummary> {
        log::info!("Starting batch load of {} source(s)", self.sources.len());

        let mut sequence = Sequence::new();
        let mut pacer = self.throttle.pacer();
        let mut summary = LoadSummary::default();
        let key_field = self.stamper.key_field();

        for (index, source) in self.sources.iter().enumerate() {
            let name = source.describe();
            log::info!("Reading {}", name);

            let rows = source
                .extract()
                .await
                .with_context(|| format!("Failed to read source {}", name))?;

            if rows.is_empty() {
                log::warn!("No rows in {}", name);
            }

            let mut file_count = 0;
            for row in rows {
                let id = sequence.current();

                let record = self.transformer.transform(row).with_context(|| {
                    format!("Failed to transform row {} of {}", file_count + 1, name)
                })?;
                let record = self.stamper.stamp(record, id)?;

                pacer.before_write().await;
                self.loader
                    .put(record)
                    .await
                    .with_context(|| match summary.last_id {
                        Some(last) => format!(
                            "Failed to write item {} from {}; last successful write was {}",
                            id, name, last
                        ),
                        None => format!(
                            "Failed to write item {} from {}; nothing was written",
                            id, name
                        ),
                    })?;

                sequence.advance();
                summary.written += 1;
                summary.last_id = Some(id);
                file_count += 1;
                log::info!("Inserted row with {}: {}", key_field, id);
            }

            summary.files += 1;
            log::info!("Finished {}: {} row(s)", name, file_count);

            if index + 1 < self.sources.len() {
                pacer.between_files().await;
            }
        }

        log::info!(
            "Loaded {} item(s) from {} source(s)",
            summary.written,
            summary.files
        );
        Ok(summary)
    }
}
