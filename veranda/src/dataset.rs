//! Resolved, schema-conforming tables.

use serde::Serialize;

use crate::{ColumnType, Error, Schema, Value};

/// How far the sum of a distribution column may stray from 100 before it is
/// flagged as a data-quality problem.
pub const PERCENTAGE_TOLERANCE: f64 = 1.0;

/// A named, schema-typed table of rows.
///
/// Construction enforces that every row carries exactly one value per
/// declared column; rows are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    name: String,
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Constructor. Fails if any row's arity does not match the schema.
    pub fn new<N: AsRef<str>>(
        name: N,
        schema: Schema,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, Error> {
        let name = name.as_ref().to_string();
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(Error::RowArity {
                    dataset: name,
                    row: row_idx,
                    got: row.len(),
                    want: schema.len(),
                });
            }
        }
        Ok(Self { name, schema, rows })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of the named column, in row order.
    pub fn column_values<N: AsRef<str>>(&self, name: N) -> Option<Vec<Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// Soft-invariant checks on the resolved data.
    ///
    /// Each percentage column marked as a distribution over a whole is
    /// expected to sum to 100 within [`PERCENTAGE_TOLERANCE`]. Rate-like
    /// percentage columns are exempt. Violations are reported as
    /// human-readable warnings, never as errors.
    pub fn quality_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (idx, column) in self.schema.columns().iter().enumerate() {
            if column.column_type() != ColumnType::Percentage || !column.is_distribution() {
                continue;
            }
            let sum: f64 = self
                .rows
                .iter()
                .filter_map(|row| row[idx].as_f64())
                .sum();
            if !self.rows.is_empty() && (sum - 100.0).abs() > PERCENTAGE_TOLERANCE {
                warnings.push(format!(
                    "percentage column \"{}\" sums to {:.2}, expected ~100",
                    column.name(),
                    sum
                ));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Column;

    fn submarket_schema() -> Schema {
        Schema::new(vec![
            Column::new("Zona", ColumnType::Category),
            Column::new("Porcentaje", ColumnType::Percentage).distribution(),
        ])
    }

    fn submarket_rows() -> Vec<Vec<Value>> {
        vec![
            vec!["Miami Beach".into(), 38.5.into()],
            vec!["Downtown/Brickell".into(), 30.0.into()],
            vec!["Otras".into(), 31.5.into()],
        ]
    }

    #[test]
    fn row_arity_is_enforced() {
        let err = Dataset::new(
            "submercados",
            submarket_schema(),
            vec![vec!["Miami Beach".into()]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::RowArity {
                row: 0,
                got: 1,
                want: 2,
                ..
            }
        ));
    }

    #[test]
    fn percentages_summing_to_100_pass_quietly() {
        let ds = Dataset::new("submercados", submarket_schema(), submarket_rows()).unwrap();
        assert!(ds.quality_warnings().is_empty());
    }

    #[test]
    fn skewed_percentages_warn_but_do_not_fail() {
        let rows = vec![
            vec!["Miami Beach".into(), 38.5.into()],
            vec!["Otras".into(), 31.5.into()],
        ];
        let ds = Dataset::new("submercados", submarket_schema(), rows).unwrap();
        let warnings = ds.quality_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Porcentaje"));
    }

    #[test]
    fn rate_columns_are_exempt_from_the_sum_check() {
        // Interest and ROI percentages are rates, not shares of a whole;
        // their sums are meaningless and must not be flagged.
        let schema = Schema::of(&[
            ("Fuente", ColumnType::Category),
            ("Tasa (%)", ColumnType::Percentage),
        ]);
        let rows = vec![
            vec!["Bancos Privados".into(), 6.5.into()],
            vec!["USDA (Préstamos Agrícolas)".into(), 4.75.into()],
        ];
        let ds = Dataset::new("financiamiento", schema, rows).unwrap();
        assert!(ds.quality_warnings().is_empty());
    }

    #[test]
    fn column_values_preserve_row_order() {
        let ds = Dataset::new("submercados", submarket_schema(), submarket_rows()).unwrap();
        let zones = ds.column_values("Zona").unwrap();
        assert_eq!(
            zones,
            vec![
                Value::Text("Miami Beach".to_string()),
                Value::Text("Downtown/Brickell".to_string()),
                Value::Text("Otras".to_string()),
            ]
        );
        assert!(ds.column_values("NoSuchColumn").is_none());
    }
}
