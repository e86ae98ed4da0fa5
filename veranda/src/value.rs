//! Cell values and the semantic column types they are coerced through.

use std::collections::BTreeMap;

use serde::Serialize;

/// We use [`std::collections::BTreeMap`] as our default map structure.
pub type Map<K, V> = BTreeMap<K, V>;

/// The semantic type of a column, which drives per-cell coercion and
/// data-quality checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ColumnType {
    /// Free-form categorical text (zone names, metric labels, ...).
    Category,
    /// An ordinal calendar year.
    Year,
    /// A percentage value: either a rate (interest, ROI) or, when the column
    /// is marked as a distribution, a share of a whole.
    Percentage,
    /// A monetary or other plain float magnitude; the unit is carried by the
    /// column name.
    Currency,
    /// A non-negative integer count.
    Count,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Category => "Category",
                Self::Year => "Year",
                Self::Percentage => "Percentage",
                Self::Currency => "Currency",
                Self::Count => "Count",
            }
        )
    }
}

impl ColumnType {
    /// Whether values of this type are numeric.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Category)
    }

    /// Coerce one raw cell into a [`Value`] of this semantic type.
    ///
    /// On failure the returned string describes the mismatch; the caller is
    /// responsible for attaching dataset/column/row context.
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        match self {
            Self::Category => Ok(Value::Text(raw.to_string())),
            Self::Year | Self::Count => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("\"{}\" is not an integer", raw)),
            Self::Percentage | Self::Currency => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("\"{}\" is not a number", raw)),
        }
    }
}

/// A single cell value in a dataset.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
