//! Data source descriptors and the registry that enumerates them.

use std::path::PathBuf;

use crate::{Error, Schema, Value};

/// Where a logical dataset's rows come from.
///
/// Descriptors are constructed once at startup and never mutated.
#[derive(Debug, Clone)]
pub enum Source {
    /// Literal rows embedded at construction.
    Inline { rows: Vec<Vec<Value>> },
    /// A delimited text file with a header row matching the declared schema.
    File { path: PathBuf },
}

/// One logical dataset: its name, declared shape, and provenance.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    name: String,
    schema: Schema,
    source: Source,
}

impl SourceSpec {
    /// Describe a dataset whose rows are embedded in the program.
    pub fn inline<N: AsRef<str>>(name: N, schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.as_ref().to_string(),
            schema,
            source: Source::Inline { rows },
        }
    }

    /// Describe a dataset backed by an external delimited file.
    pub fn file<N: AsRef<str>, P: Into<PathBuf>>(name: N, schema: Schema, path: P) -> Self {
        Self {
            name: name.as_ref().to_string(),
            schema,
            source: Source::File { path: path.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn source(&self) -> &Source {
        &self.source
    }
}

/// The ordered set of logical datasets known to the pipeline.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    specs: Vec<SourceSpec>,
}

impl SourceRegistry {
    /// Constructor. Dataset names must be unique.
    pub fn new(specs: Vec<SourceSpec>) -> Result<Self, Error> {
        for (idx, spec) in specs.iter().enumerate() {
            if specs[..idx].iter().any(|s| s.name == spec.name) {
                return Err(Error::DuplicateDataset(spec.name.clone()));
            }
        }
        Ok(Self { specs })
    }

    /// All registered sources, in registration order.
    pub fn sources(&self) -> &[SourceSpec] {
        &self.specs
    }

    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&SourceSpec> {
        let name = name.as_ref();
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn schema_of<N: AsRef<str>>(&self, name: N) -> Option<&Schema> {
        self.get(name).map(SourceSpec::schema)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ColumnType;

    #[test]
    fn duplicate_dataset_names_are_rejected() {
        let schema = Schema::of(&[("Zona", ColumnType::Category)]);
        let err = SourceRegistry::new(vec![
            SourceSpec::inline("submercados", schema.clone(), vec![]),
            SourceSpec::file("submercados", schema, "submercados.csv"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateDataset(name) if name == "submercados"));
    }

    #[test]
    fn registration_order_is_preserved() {
        let schema = Schema::of(&[("Zona", ColumnType::Category)]);
        let registry = SourceRegistry::new(vec![
            SourceSpec::inline("b", schema.clone(), vec![]),
            SourceSpec::inline("a", schema, vec![]),
        ])
        .unwrap();
        let names = registry
            .sources()
            .iter()
            .map(SourceSpec::name)
            .collect::<Vec<&str>>();
        assert_eq!(names, vec!["b", "a"]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("c").is_none());
    }
}
