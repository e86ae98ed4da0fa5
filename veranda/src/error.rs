use thiserror::Error;

/// The primary error type that can be produced by Veranda.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no dataset named \"{0}\" is registered")]
    NoSuchDataset(String),
    #[error("duplicate dataset name \"{0}\" in source registry")]
    DuplicateDataset(String),
    #[error("duplicate view name \"{0}\" in view registry")]
    DuplicateView(String),
    #[error("failed to resolve source \"{0}\": {1}")]
    SourceResolution(String, String),
    #[error("type error in dataset \"{dataset}\", column \"{column}\", row {row}: {reason}")]
    DataType {
        dataset: String,
        column: String,
        row: usize,
        reason: String,
    },
    #[error("view \"{view}\" is misconfigured: {reason}")]
    ViewConfiguration { view: String, reason: String },
    #[error(
        "dataset \"{dataset}\" row {row} has {got} values but the schema declares {want} columns"
    )]
    RowArity {
        dataset: String,
        row: usize,
        got: usize,
        want: usize,
    },
    #[error("{0} is not in the analysis-year domain")]
    UnknownFilterValue(i64),
}
