//! Record transforms applied before a row is written

mod decimal;
mod sequence;

pub use decimal::DecimalNormalizer;
pub use sequence::{DEFAULT_KEY_FIELD, Sequence, SequenceStamper};
