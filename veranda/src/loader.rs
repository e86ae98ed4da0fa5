//! Dataset resolution and memoization.

use std::{collections::HashMap, rc::Rc};

use eyre::Result;
use log::{debug, warn};

use crate::{Dataset, Error, Map, Schema, Source, SourceRegistry, Value};

/// Resolves logical datasets to concrete [`Dataset`]s and memoizes the
/// results for the lifetime of the process.
///
/// Each dataset is resolved at most once; repeated calls return the same
/// shared instance. There is no TTL and no change detection: sources are
/// static snapshots, and a fresh process re-resolves everything.
pub struct Loader<'a> {
    registry: &'a SourceRegistry,
    cache: HashMap<String, Rc<Dataset>>,
}

impl<'a> Loader<'a> {
    /// Constructor.
    pub fn new(registry: &'a SourceRegistry) -> Self {
        Self {
            registry,
            cache: HashMap::new(),
        }
    }

    /// Resolve the named dataset, reusing the cached result if present.
    ///
    /// A failed resolution leaves the cache untouched, so one bad source
    /// never poisons other datasets and may itself be retried by a fresh
    /// process.
    pub fn resolve<N: AsRef<str>>(&mut self, name: N) -> Result<Rc<Dataset>> {
        let name = name.as_ref();
        if let Some(dataset) = self.cache.get(name) {
            return Ok(Rc::clone(dataset));
        }
        let spec = self
            .registry
            .get(name)
            .ok_or_else(|| Error::NoSuchDataset(name.to_string()))?;
        let dataset = match spec.source() {
            Source::Inline { rows } => Dataset::new(name, spec.schema().clone(), rows.clone())?,
            Source::File { path } => load_delimited(name, spec.schema(), path)?,
        };
        for warning in dataset.quality_warnings() {
            warn!("Dataset {}: {}", name, warning);
        }
        debug!("Resolved dataset {} ({} rows)", name, dataset.len());
        let dataset = Rc::new(dataset);
        self.cache.insert(name.to_string(), Rc::clone(&dataset));
        Ok(dataset)
    }

    /// Resolve every registered dataset, isolating failures per dataset.
    pub fn resolve_all(&mut self) -> Map<String, Result<Rc<Dataset>>> {
        let names = self
            .registry
            .sources()
            .iter()
            .map(|s| s.name().to_string())
            .collect::<Vec<String>>();
        names
            .into_iter()
            .map(|name| {
                let result = self.resolve(&name);
                (name, result)
            })
            .collect()
    }
}

/// Parse a delimited file with a header row into a dataset conforming to the
/// declared schema.
fn load_delimited(name: &str, schema: &Schema, path: &std::path::Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        Error::SourceResolution(
            name.to_string(),
            format!("cannot read {}: {}", path.display(), e),
        )
    })?;
    let header = reader
        .headers()
        .map_err(|e| Error::SourceResolution(name.to_string(), e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<String>>();

    // Exact, case-sensitive header validation in both directions.
    if let Some(missing) = schema.missing_from(&header) {
        return Err(Error::SourceResolution(
            name.to_string(),
            format!("header is missing declared column \"{}\"", missing),
        )
        .into());
    }
    if let Some(extra) = header.iter().find(|h| !schema.contains(h)) {
        return Err(Error::SourceResolution(
            name.to_string(),
            format!("header declares unknown column \"{}\"", extra),
        )
        .into());
    }

    let indices = schema
        .columns()
        .iter()
        .filter_map(|c| header.iter().position(|h| h == c.name()))
        .collect::<Vec<usize>>();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| Error::SourceResolution(name.to_string(), e.to_string()))?;
        let mut row = Vec::with_capacity(schema.len());
        for (column, &idx) in schema.columns().iter().zip(&indices) {
            let raw = record.get(idx).ok_or_else(|| Error::DataType {
                dataset: name.to_string(),
                column: column.name().to_string(),
                row: row_idx,
                reason: "missing value".to_string(),
            })?;
            let value = column
                .column_type()
                .coerce(raw)
                .map_err(|reason| Error::DataType {
                    dataset: name.to_string(),
                    column: column.name().to_string(),
                    row: row_idx,
                    reason,
                })?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok(Dataset::new(name, schema.clone(), rows)?)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;
    use crate::{ColumnType, SourceSpec};

    fn financing_schema() -> Schema {
        Schema::of(&[
            ("Fuente", ColumnType::Category),
            ("Tasa (%)", ColumnType::Percentage),
        ])
    }

    fn write_csv(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn resolution_is_memoized() {
        let registry = SourceRegistry::new(vec![SourceSpec::inline(
            "financiamiento",
            financing_schema(),
            vec![
                vec!["Bancos Privados".into(), 6.5.into()],
                vec!["USDA (Préstamos Agrícolas)".into(), 4.75.into()],
            ],
        )])
        .unwrap();
        let mut loader = Loader::new(&registry);
        let first = loader.resolve("financiamiento").unwrap();
        let second = loader.resolve("financiamiento").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_datasets_are_reported() {
        let registry = SourceRegistry::new(vec![]).unwrap();
        let mut loader = Loader::new(&registry);
        let err = loader.resolve("fantasma").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NoSuchDataset(name)) if name == "fantasma"
        ));
    }

    #[test]
    fn file_sources_parse_and_coerce() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "financiamiento.csv",
            "Fuente,Tasa (%)\nBancos Privados,6.5\nUSDA (Préstamos Agrícolas),4.75\n",
        );
        let registry = SourceRegistry::new(vec![SourceSpec::file(
            "financiamiento",
            financing_schema(),
            path,
        )])
        .unwrap();
        let mut loader = Loader::new(&registry);
        let ds = loader.resolve("financiamiento").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0][1], Value::Float(6.5));
        assert_eq!(ds.rows()[1][0], Value::Text("USDA (Préstamos Agrícolas)".to_string()));
    }

    #[test]
    fn missing_header_column_names_the_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "financiamiento.csv",
            "Fuente\nBancos Privados\n",
        );
        let registry = SourceRegistry::new(vec![SourceSpec::file(
            "financiamiento",
            financing_schema(),
            path,
        )])
        .unwrap();
        let mut loader = Loader::new(&registry);
        let err = loader.resolve("financiamiento").unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::SourceResolution(name, reason)) => {
                assert_eq!(name, "financiamiento");
                assert!(reason.contains("Tasa (%)"));
            }
            other => panic!("expected SourceResolution, got {:?}", other),
        }
    }

    #[test]
    fn bad_cells_identify_dataset_column_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "financiamiento.csv",
            "Fuente,Tasa (%)\nBancos Privados,6.5\nUSDA,alta\n",
        );
        let registry = SourceRegistry::new(vec![SourceSpec::file(
            "financiamiento",
            financing_schema(),
            path,
        )])
        .unwrap();
        let mut loader = Loader::new(&registry);
        let err = loader.resolve("financiamiento").unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::DataType {
                dataset,
                column,
                row,
                ..
            }) => {
                assert_eq!(dataset, "financiamiento");
                assert_eq!(column, "Tasa (%)");
                assert_eq!(*row, 1);
            }
            other => panic!("expected DataType, got {:?}", other),
        }
    }

    #[test]
    fn one_bad_source_does_not_poison_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("no-such-file.csv");
        let registry = SourceRegistry::new(vec![
            SourceSpec::file("financiamiento", financing_schema(), bad),
            SourceSpec::inline(
                "submercados",
                Schema::of(&[
                    ("Zona", ColumnType::Category),
                    ("Porcentaje", ColumnType::Percentage),
                ]),
                vec![vec!["Miami Beach".into(), 100.0.into()]],
            ),
        ])
        .unwrap();
        let mut loader = Loader::new(&registry);
        let results = loader.resolve_all();
        assert!(results["financiamiento"].is_err());
        assert!(results["submercados"].is_ok());
        // And the failed dataset is still independently resolvable later.
        assert!(loader.resolve("financiamiento").is_err());
        assert!(loader.resolve("submercados").is_ok());
    }
}
