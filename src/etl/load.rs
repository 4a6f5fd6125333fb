//! Loader trait for writing items to a destination

use eyre::Result;

/// Loader trait for loading data to a destination
///
/// The single required capability is `put`: write one item, keyed by
/// whatever the destination treats as the item key, replacing any item
/// already stored under that key.
///
/// # Example
/// ```no_run
/// use sequin::etl::Loader;
/// use sequin::record::Record;
/// use eyre::Result;
///
/// struct StdoutLoader;
///
/// impl Loader for StdoutLoader {
///     type Item = Record;
///
///     async fn put(&self, item: Self::Item) -> Result<()> {
///         println!("{}", item.to_json()?);
///         Ok(())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Write a single item, blocking until the destination acknowledges it
    ///
    /// # Errors
    /// Returns an error if the write fails (network, I/O, rejection, etc.)
    fn put(&self, item: Self::Item) -> impl std::future::Future<Output = Result<()>> + Send;
}
