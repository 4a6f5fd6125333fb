//! Float to decimal normalization
//!
//! Replaces every floating-point value in a record with an exact decimal so
//! no binary rounding error reaches the store.

use crate::etl::Transformer;
use crate::record::{Decimal, FieldValue, Record};
use eyre::Result;

/// Transformer that converts `Float` fields to `Decimal`
///
/// The decimal is built from the float's shortest round-trip text, so
/// `12.1` is stored as `12.1` and not as `12.0999999999999996447...`.
/// Every other value passes through unchanged.
///
/// # Example
/// ```
/// use sequin::transform::DecimalNormalizer;
/// use sequin::etl::Transformer;
/// use sequin::record::{FieldValue, Record};
///
/// let mut row = Record::new();
/// row.insert("price", 12.1);
/// row.insert("name", "widget");
///
/// let output = DecimalNormalizer.transform(row).unwrap();
/// assert_eq!(output.get("price"), Some(&FieldValue::Decimal("12.1".parse().unwrap())));
/// assert_eq!(output.get("name"), Some(&FieldValue::from("widget")));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalNormalizer;

impl Transformer for DecimalNormalizer {
    type Input = Record;
    type Output = Record;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        for value in input.values_mut() {
            if let FieldValue::Float(f) = *value {
                *value = FieldValue::Decimal(Decimal::from_f64(f)?);
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(s: &str) -> FieldValue {
        FieldValue::Decimal(s.parse().unwrap())
    }

    #[test]
    fn test_floats_become_exact_decimals() {
        let mut row = Record::new();
        row.insert("a", 12.1);
        row.insert("b", 0.1);
        row.insert("c", -1234.5678);

        let output = DecimalNormalizer.transform(row).unwrap();

        assert_eq!(output.get("a"), Some(&decimal("12.1")));
        assert_eq!(output.get("b"), Some(&decimal("0.1")));
        assert_eq!(output.get("c"), Some(&decimal("-1234.5678")));
        assert!(output.iter().all(|(_, v)| !v.is_float()));
    }

    #[test]
    fn test_other_values_pass_through() {
        let mut row = Record::new();
        row.insert("name", "12.1");
        row.insert("qty", 7i64);
        row.insert("active", false);
        row.insert("existing", "3.25".parse::<Decimal>().unwrap());

        let output = DecimalNormalizer.transform(row.clone()).unwrap();
        assert_eq!(output, row);
    }

    #[test]
    fn test_non_finite_float_fails() {
        let mut row = Record::new();
        row.insert("bad", f64::NAN);
        assert!(DecimalNormalizer.transform(row).is_err());
    }
}
