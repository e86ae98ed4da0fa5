//! The per-render-pass filter selection.

use crate::Error;

/// Whether an analysis year has been chosen for the current render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// No selection has been made yet. Only observable before the first
    /// render pass.
    Unselected,
    Selected(i64),
}

/// The single process-wide filter selection: an analysis year drawn from a
/// fixed enumerated domain.
///
/// The host shell writes the selection once per render pass; the compositor
/// only ever reads it.
#[derive(Debug, Clone)]
pub struct FilterContext {
    domain: Vec<i64>,
    state: FilterState,
}

impl FilterContext {
    /// Constructor. Starts out unselected.
    pub fn new(domain: Vec<i64>) -> Self {
        Self {
            domain,
            state: FilterState::Unselected,
        }
    }

    /// The fixed set of selectable analysis years, in display order.
    pub fn domain(&self) -> &[i64] {
        &self.domain
    }

    /// Record the host shell's selection for this render pass. Values outside
    /// the enumerated domain are rejected.
    pub fn select(&mut self, year: i64) -> Result<(), Error> {
        if !self.domain.contains(&year) {
            return Err(Error::UnknownFilterValue(year));
        }
        self.state = FilterState::Selected(year);
        Ok(())
    }

    /// Reset to unselected, ready for the next render pass.
    pub fn clear(&mut self) {
        self.state = FilterState::Unselected;
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// The selected year, if one has been chosen.
    pub fn selected(&self) -> Option<i64> {
        match self.state {
            FilterState::Selected(year) => Some(year),
            FilterState::Unselected => None,
        }
    }
}
