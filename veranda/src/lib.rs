//! Veranda ingests small tabular datasets and composes them into a fixed,
//! declarative set of dashboard views.
//!
//! This crate provides the pipeline only: an ordered source registry
//! resolves logical datasets (inline literals or delimited files) through a
//! memoizing loader, and a validated view registry is composed into
//! render-ready chart specifications bound to a per-pass filter selection.
//! For the host shell that renders those specifications to HTML, see the
//! `veranda-cli` crate.

pub mod dashboard;

mod compose;
mod dataset;
mod error;
mod filter;
mod loader;
mod schema;
mod source;
mod value;
mod view;

pub use compose::{compose, ChartBody, ChartSpec, EncodedColumn};
pub use dataset::{Dataset, PERCENTAGE_TOLERANCE};
pub use error::Error;
pub use filter::{FilterContext, FilterState};
pub use loader::Loader;
pub use schema::{Column, Schema};
pub use source::{Source, SourceRegistry, SourceSpec};
pub use value::{ColumnType, Map, Value};
pub use view::{Channel, ChartKind, Slot, ViewRegistry, ViewSpec};
