//! Extractor trait for reading rows from a source

use eyre::Result;

/// Extractor trait for extracting data from a source
///
/// Each extractor is one source of rows, such as a delimited file. The
/// batch loader drains extractors one after another, in order.
///
/// # Example
/// ```no_run
/// use sequin::etl::Extractor;
/// use sequin::record::Record;
/// use eyre::Result;
///
/// struct FixedRows(Vec<Record>);
///
/// impl Extractor for FixedRows {
///     type Item = Record;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract all items from the source, in source order
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, parsing, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;

    /// Human-readable name of the source, used in log lines
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}
