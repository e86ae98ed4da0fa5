//! The compositor: turns the view registry and resolved datasets into
//! render-ready chart specifications.

use log::error;
use serde::Serialize;

use crate::{
    Channel, ChartKind, Dataset, FilterContext, Loader, Schema, Slot, Value, ViewRegistry,
    ViewSpec,
};

/// One dataset column bound to a visual channel: its name plus the values it
/// contributes, in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedColumn {
    pub name: String,
    pub values: Vec<Value>,
}

/// The render-ready payload of one chart specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    Bar {
        x: EncodedColumn,
        y: EncodedColumn,
        color: Option<EncodedColumn>,
    },
    Pie {
        names: EncodedColumn,
        values: EncodedColumn,
    },
    Table {
        columns: Vec<EncodedColumn>,
    },
    KeyValue {
        pairs: Vec<(String, String)>,
    },
    /// A dataset-level failure, surfaced to the shell as a visible panel in
    /// the slot the view would have occupied.
    ErrorPanel {
        message: String,
    },
}

/// The resolved payload handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub view: String,
    pub title: String,
    pub slot: Slot,
    pub body: ChartBody,
}

/// Compose every registered view, in registry order, into a chart
/// specification.
///
/// Dataset-level failures are isolated: a view whose dataset cannot be
/// resolved yields an [`ChartBody::ErrorPanel`] in place, and composition
/// continues with the remaining views. Given the same inputs and cache
/// state, two invocations yield structurally identical output.
pub fn compose(
    views: &ViewRegistry,
    loader: &mut Loader<'_>,
    filter: &FilterContext,
) -> Vec<ChartSpec> {
    views
        .views()
        .iter()
        .map(|view| {
            let body = match loader.resolve(view.dataset()) {
                Ok(dataset) => build_body(view, &dataset, filter),
                Err(e) => {
                    error!("View {}: {}", view.name(), e);
                    ChartBody::ErrorPanel {
                        message: e.to_string(),
                    }
                }
            };
            ChartSpec {
                view: view.name().to_string(),
                title: view.title().to_string(),
                slot: view.slot(),
                body,
            }
        })
        .collect()
}

fn build_body(view: &ViewSpec, dataset: &Dataset, filter: &FilterContext) -> ChartBody {
    let schema = dataset.schema();
    let rows = restrict(view, dataset, filter);
    let encoded = |channel: Channel| -> Option<EncodedColumn> {
        let column = view.channel(channel)?;
        encode_column(schema, &rows, column)
    };
    match view.kind() {
        ChartKind::Bar => match (encoded(Channel::X), encoded(Channel::Y)) {
            (Some(x), Some(y)) => ChartBody::Bar {
                x,
                y,
                color: encoded(Channel::Color),
            },
            // Unreachable when the view came from a validated registry.
            _ => missing_encoding(view),
        },
        ChartKind::Pie => match (encoded(Channel::Names), encoded(Channel::Values)) {
            (Some(names), Some(values)) => ChartBody::Pie { names, values },
            _ => missing_encoding(view),
        },
        ChartKind::KeyValue => match (encoded(Channel::Names), encoded(Channel::Values)) {
            (Some(names), Some(values)) => ChartBody::KeyValue {
                pairs: names
                    .values
                    .iter()
                    .zip(values.values.iter())
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
            _ => missing_encoding(view),
        },
        // Table views present every declared column.
        ChartKind::Table => ChartBody::Table {
            columns: schema
                .columns()
                .iter()
                .filter_map(|c| encode_column(schema, &rows, c.name()))
                .collect(),
        },
    }
}

/// Restrict the dataset's rows to the selected analysis year, if this view
/// is filter-aware and a year has been selected. All other views see every
/// row.
fn restrict(view: &ViewSpec, dataset: &Dataset, filter: &FilterContext) -> Vec<Vec<Value>> {
    let year_idx = view
        .filter_column()
        .and_then(|column| dataset.schema().index_of(column));
    match (year_idx, filter.selected()) {
        (Some(idx), Some(year)) => dataset
            .rows()
            .iter()
            .filter(|row| row[idx].as_int() == Some(year))
            .cloned()
            .collect(),
        _ => dataset.rows().to_vec(),
    }
}

fn encode_column(schema: &Schema, rows: &[Vec<Value>], column: &str) -> Option<EncodedColumn> {
    let idx = schema.index_of(column)?;
    Some(EncodedColumn {
        name: column.to_string(),
        values: rows.iter().map(|row| row[idx].clone()).collect(),
    })
}

fn missing_encoding(view: &ViewSpec) -> ChartBody {
    ChartBody::ErrorPanel {
        message: format!(
            "view \"{}\" is missing a channel required by {} charts",
            view.name(),
            view.kind()
        ),
    }
}
