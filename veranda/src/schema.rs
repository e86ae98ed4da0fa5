//! Dataset shapes: ordered columns with semantic types.

use serde::Serialize;

use crate::ColumnType;

/// A single named, semantically typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    distribution: bool,
}

impl Column {
    /// Constructor.
    pub fn new<N: AsRef<str>>(name: N, column_type: ColumnType) -> Self {
        Self {
            name: name.as_ref().to_string(),
            column_type,
            distribution: false,
        }
    }

    /// Mark this percentage column as a distribution over a whole, whose
    /// values are expected to sum to roughly 100. Rate-like percentage
    /// columns (interest, ROI) are not distributions and stay unmarked.
    pub fn distribution(mut self) -> Self {
        self.distribution = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_distribution(&self) -> bool {
        self.distribution
    }
}

/// The declared shape of a dataset. Column order is significant and fixed at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema(Vec<Column>);

impl Schema {
    /// Constructor.
    pub fn new(columns: Vec<Column>) -> Self {
        Self(columns)
    }

    /// Convenience constructor from `(name, type)` pairs.
    pub fn of(columns: &[(&str, ColumnType)]) -> Self {
        Self(
            columns
                .iter()
                .map(|(name, column_type)| Column::new(name, *column_type))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a column with the given name is declared. Comparison is exact
    /// and case-sensitive.
    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.index_of(name).is_some()
    }

    /// Position of the named column within the schema, if declared.
    pub fn index_of<N: AsRef<str>>(&self, name: N) -> Option<usize> {
        let name = name.as_ref();
        self.0.iter().position(|c| c.name == name)
    }

    /// Look up a declared column by name.
    pub fn column<N: AsRef<str>>(&self, name: N) -> Option<&Column> {
        self.index_of(name).map(|idx| &self.0[idx])
    }

    /// The first declared column that does not appear in the given header,
    /// if any.
    pub fn missing_from(&self, header: &[String]) -> Option<&str> {
        self.0
            .iter()
            .find(|c| !header.iter().any(|h| h == &c.name))
            .map(|c| c.name.as_str())
    }
}
