//! Transformer trait for data transformation

use eyre::Result;

/// Transformer trait for transforming data items
///
/// Implementors define how to transform items:
/// - Value normalization (float to decimal)
/// - Data enrichment (adding fields)
///
/// # Example
/// ```
/// use sequin::etl::Transformer;
/// use sequin::record::Record;
/// use eyre::Result;
///
/// struct FieldDropper {
///     fields: Vec<String>,
/// }
///
/// impl Transformer for FieldDropper {
///     type Input = Record;
///     type Output = Record;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input
///             .into_iter()
///             .filter(|(name, _)| !self.fields.contains(name))
///             .collect())
///     }
/// }
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;
}
