//! Row values and records
//!
//! A [`Record`] is one row of a source file as a mapping from column name to
//! a dynamically-typed [`FieldValue`]. Floating-point values only live in
//! freshly parsed rows; before an item is written they are replaced by
//! exact [`Decimal`] values.

use eyre::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An exact base-10 number kept in its textual form
///
/// DynamoDB carries numbers as decimal strings, so holding the text avoids
/// any round trip through binary floating point.
///
/// # Example
/// ```
/// use sequin::record::Decimal;
///
/// let decimal = Decimal::from_f64(12.1).unwrap();
/// assert_eq!(decimal.as_str(), "12.1");
/// assert_eq!(decimal, "12.1".parse().unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    /// Build a decimal from the shortest text that round-trips to `value`
    ///
    /// # Errors
    /// Returns an error for NaN and infinities, which have no decimal form.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            bail!("Cannot store non-finite value {} as a decimal", value);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Decimal {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        if !is_decimal_literal(s) {
            bail!("Not a decimal number: {:?}", s);
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `-?digits(.digits)?([eE][+-]?digits)?`
fn is_decimal_literal(s: &str) -> bool {
    fn digits(s: &str) -> (usize, &str) {
        let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        (end, &s[end..])
    }

    let rest = s.strip_prefix('-').unwrap_or(s);
    let (int_len, mut rest) = digits(rest);
    if int_len == 0 {
        return false;
    }
    if let Some(fraction) = rest.strip_prefix('.') {
        let (frac_len, after) = digits(fraction);
        if frac_len == 0 {
            return false;
        }
        rest = after;
    }
    if let Some(exponent) = rest.strip_prefix(['e', 'E']) {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        let (exp_len, after) = digits(exponent);
        if exp_len == 0 {
            return false;
        }
        rest = after;
    }
    rest.is_empty()
}

/// A single column value
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    /// Binary floating point, as parsed from the source. Never written.
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
}

impl FieldValue {
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Bool(_) => "bool",
        }
    }

    /// Convert to a JSON value, keeping decimals exact
    pub fn to_json(&self) -> Result<Value> {
        Ok(match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| eyre::eyre!("Cannot encode non-finite float {} as JSON", f))?,
            Self::Decimal(d) => serde_json::from_str(d.as_str())
                .with_context(|| format!("Cannot encode decimal {} as JSON", d))?,
            Self::Bool(b) => Value::Bool(*b),
        })
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

/// One row: column name to value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the value it replaced
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut FieldValue> {
        self.fields.values_mut()
    }

    /// Render as a JSON object
    pub fn to_json(&self) -> Result<Value> {
        let mut object = serde_json::Map::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            let json = value
                .to_json()
                .with_context(|| format!("Failed to encode field '{}'", name))?;
            object.insert(name.clone(), json);
        }
        Ok(Value::Object(object))
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
