//! Sequential identifiers
//!
//! A [`Sequence`] hands out row identifiers 1, 2, 3, ... for the lifetime of
//! one run. It is not persisted: a new run starts again at 1.

use crate::record::{FieldValue, Record};
use eyre::{Context, Result};

/// Default name of the identifier field
pub const DEFAULT_KEY_FIELD: &str = "SNO";

/// Process-local monotonic counter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    next: u64,
}

impl Sequence {
    /// A sequence whose first identifier is 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// The identifier the next written row will get
    pub fn current(&self) -> u64 {
        self.next
    }

    /// Move past the current identifier once its row has been written
    pub fn advance(&mut self) {
        self.next += 1;
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a row identifier into a named field
///
/// A source column with the same name is overwritten.
///
/// # Example
/// ```
/// use sequin::transform::SequenceStamper;
/// use sequin::record::{FieldValue, Record};
///
/// let stamper = SequenceStamper::default();
/// let record = stamper.stamp(Record::new(), 7).unwrap();
/// assert_eq!(record.get("SNO"), Some(&FieldValue::Integer(7)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceStamper {
    key_field: String,
}

impl SequenceStamper {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
        }
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Insert `id` as the key field of `record`
    pub fn stamp(&self, mut record: Record, id: u64) -> Result<Record> {
        let id = i64::try_from(id)
            .with_context(|| format!("Identifier {} does not fit a signed 64-bit integer", id))?;
        if let Some(previous) = record.insert(self.key_field.clone(), FieldValue::Integer(id)) {
            log::debug!(
                "Replacing source value '{}' of field '{}' with identifier {}",
                previous,
                self.key_field,
                id
            );
        }
        Ok(record)
    }
}

impl Default for SequenceStamper {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FIELD)
    }
}
