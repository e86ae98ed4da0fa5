//! Declarative view specifications and the ordered, validated view registry.

use serde::Serialize;

use crate::{ColumnType, Error, Map, SourceRegistry};

/// The kinds of visual the rendering collaborator knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Pie,
    Table,
    KeyValue,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Bar => "bar",
                Self::Pie => "pie",
                Self::Table => "table",
                Self::KeyValue => "key-value",
            }
        )
    }
}

/// A visual channel that a dataset column can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Channel {
    X,
    Y,
    Color,
    Names,
    Values,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Color => "color",
                Self::Names => "names",
                Self::Values => "values",
            }
        )
    }
}

/// Layout-slot hint for the host shell. The shell owns actual layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slot {
    /// A full-width section.
    Full,
    /// Left cell of a two-column row.
    HalfLeft,
    /// Right cell of a two-column row.
    HalfRight,
    /// A collapsible "show all data" panel.
    Collapsible,
}

/// A declarative, immutable description of one chart/table/display, bound to
/// a dataset and an encoding.
#[derive(Debug, Clone)]
pub struct ViewSpec {
    name: String,
    dataset: String,
    kind: ChartKind,
    title: String,
    encoding: Map<Channel, String>,
    slot: Slot,
    filter_column: Option<String>,
}

impl ViewSpec {
    /// Constructor. Channel bindings are added with [`ViewSpec::encode`].
    pub fn new<N, D, T>(name: N, dataset: D, kind: ChartKind, title: T, slot: Slot) -> Self
    where
        N: AsRef<str>,
        D: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            name: name.as_ref().to_string(),
            dataset: dataset.as_ref().to_string(),
            kind,
            title: title.as_ref().to_string(),
            encoding: Map::new(),
            slot,
            filter_column: None,
        }
    }

    /// Bind a visual channel to a dataset column.
    pub fn encode<C: AsRef<str>>(mut self, channel: Channel, column: C) -> Self {
        self.encoding
            .insert(channel, column.as_ref().to_string());
        self
    }

    /// Opt this view into year filtering: when the host shell has selected an
    /// analysis year, only rows whose named column equals that year are
    /// composed. Views that never call this ignore the filter entirely.
    pub fn filter_on<C: AsRef<str>>(mut self, column: C) -> Self {
        self.filter_column = Some(column.as_ref().to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn encoding(&self) -> &Map<Channel, String> {
        &self.encoding
    }

    /// The column bound to the given channel, if any.
    pub fn channel(&self, channel: Channel) -> Option<&str> {
        self.encoding.get(&channel).map(String::as_str)
    }

    pub fn filter_column(&self) -> Option<&str> {
        self.filter_column.as_deref()
    }

    /// The channels this view's kind cannot render without.
    fn required_channels(&self) -> &'static [Channel] {
        match self.kind {
            ChartKind::Bar => &[Channel::X, Channel::Y],
            ChartKind::Pie | ChartKind::KeyValue => &[Channel::Names, Channel::Values],
            ChartKind::Table => &[],
        }
    }
}

/// A fixed, ordered list of view specifications.
///
/// Ordering determines render order and is set at construction; there is no
/// runtime reordering. Construction validates every specification against
/// the source registry's declared schemas, so a misconfigured view fails at
/// startup rather than mid-render.
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    views: Vec<ViewSpec>,
}

impl ViewRegistry {
    /// Constructor. Fails fast with [`Error::ViewConfiguration`] on the first
    /// specification that references an unknown dataset or column, or omits
    /// a channel its chart kind requires.
    pub fn new(views: Vec<ViewSpec>, sources: &SourceRegistry) -> Result<Self, Error> {
        for (idx, view) in views.iter().enumerate() {
            if views[..idx].iter().any(|v| v.name == view.name) {
                return Err(Error::DuplicateView(view.name.clone()));
            }
            Self::validate(view, sources)?;
        }
        Ok(Self { views })
    }

    fn validate(view: &ViewSpec, sources: &SourceRegistry) -> Result<(), Error> {
        let misconfigured = |reason: String| Error::ViewConfiguration {
            view: view.name.clone(),
            reason,
        };
        let schema = sources
            .schema_of(&view.dataset)
            .ok_or_else(|| misconfigured(format!("no dataset named \"{}\"", view.dataset)))?;
        for (channel, column) in &view.encoding {
            if !schema.contains(column) {
                return Err(misconfigured(format!(
                    "channel {} references column \"{}\", which does not exist in dataset \"{}\"",
                    channel, column, view.dataset
                )));
            }
        }
        for channel in view.required_channels() {
            if !view.encoding.contains_key(channel) {
                return Err(misconfigured(format!(
                    "{} views require the {} channel",
                    view.kind, channel
                )));
            }
        }
        if let Some(column) = &view.filter_column {
            match schema.column(column) {
                None => {
                    return Err(misconfigured(format!(
                        "filter column \"{}\" does not exist in dataset \"{}\"",
                        column, view.dataset
                    )));
                }
                Some(c) if c.column_type() != ColumnType::Year => {
                    return Err(misconfigured(format!(
                        "filter column \"{}\" must be Year-typed, found {}",
                        column,
                        c.column_type()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// All views, in render order.
    pub fn views(&self) -> &[ViewSpec] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
