//! Column type inference
//!
//! Columns are typed as a whole, the way dataframe readers do it: a column
//! is numeric only if every present cell is numeric.

use crate::record::{Decimal, FieldValue};
use eyre::{Result, bail};

/// Cell texts treated as a missing value
pub const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a cell holds no value
///
/// Markers match exactly; a whitespace-only cell is a value.
pub fn is_missing(cell: &str) -> bool {
    NA_MARKERS.contains(&cell)
}

/// The inferred type of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnType {
    /// Infer the narrowest type that fits every present cell
    ///
    /// Integer is preferred over Float, Float over Bool, and Text is the
    /// fallback. A column with no present cells is Text. An integer column
    /// stays Integer even when some cells exceed `i64`.
    ///
    /// # Example
    /// ```
    /// use sequin::source::ColumnType;
    ///
    /// assert_eq!(ColumnType::infer(["1", "2", ""]), ColumnType::Integer);
    /// assert_eq!(ColumnType::infer(["1", "2.5"]), ColumnType::Float);
    /// assert_eq!(ColumnType::infer(["1", "x"]), ColumnType::Text);
    /// assert_eq!(ColumnType::infer(["12345678901234567891", "7"]), ColumnType::Integer);
    /// ```
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen = false;
        let mut integer = true;
        let mut float = true;
        let mut boolean = true;

        for cell in cells.into_iter().filter(|c| !is_missing(c)) {
            seen = true;
            let cell = cell.trim();
            integer = integer && is_integer_literal(cell);
            float = float && parse_float(cell).is_some();
            boolean = boolean && parse_bool(cell).is_some();
            if !integer && !float && !boolean {
                return Self::Text;
            }
        }

        match (seen, integer, float, boolean) {
            (false, _, _, _) => Self::Text,
            (true, true, _, _) => Self::Integer,
            (true, _, true, _) => Self::Float,
            (true, _, _, true) => Self::Bool,
            _ => Self::Text,
        }
    }

    /// Parse a present cell as this column type
    ///
    /// Text cells are kept verbatim; typed cells are trimmed first. Integers
    /// beyond `i64` become exact decimals carrying the same digits.
    ///
    /// # Errors
    /// Returns an error if the cell does not fit the type.
    pub fn parse(&self, cell: &str) -> Result<FieldValue> {
        let trimmed = cell.trim();
        let value = match self {
            Self::Integer => parse_integer(trimmed),
            Self::Float => parse_float(trimmed).map(FieldValue::Float),
            Self::Bool => parse_bool(trimmed).map(FieldValue::Bool),
            Self::Text => Some(FieldValue::Text(cell.to_string())),
        };
        match value {
            Some(value) => Ok(value),
            None => bail!("Cell {:?} is not a valid {}", cell, self),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// `[+-]?digits`
fn is_integer_literal(cell: &str) -> bool {
    let digits = cell.strip_prefix(['+', '-']).unwrap_or(cell);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_integer(cell: &str) -> Option<FieldValue> {
    if let Ok(i) = cell.parse::<i64>() {
        return Some(FieldValue::Integer(i));
    }
    if !is_integer_literal(cell) {
        return None;
    }
    let digits = cell.strip_prefix('+').unwrap_or(cell);
    digits.parse::<Decimal>().ok().map(FieldValue::Decimal)
}

fn parse_float(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
