//! Shared form plumbing
//!
//! Every panel follows the same cycle: fill a draft, save it, optionally
//! edit a row in place, or remove a row. Blank required fields turn a save
//! into a logged no-op rather than an error.

use dlv_model::{ModelError, StrategyId};
use dlv_store::{PlanState, StoreError};
use tracing::debug;

use crate::shell::ActiveElement;

/// An in-progress row edit
///
/// `key` identifies the record being edited; it never changes while the
/// draft is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession<K, D> {
    pub key: K,
    pub draft: D,
}

/// Build a record from a draft, treating blank required fields as a no-op
///
/// # Errors
/// Returns any validation error other than a missing field
pub(crate) fn build_or_skip<T>(
    panel: &'static str,
    built: Result<T, ModelError>,
) -> Result<Option<T>, StoreError> {
    match built {
        Ok(record) => Ok(Some(record)),
        Err(ModelError::MissingField(field)) => {
            debug!(panel, field, "required field blank, nothing saved");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Selected parent strategy, or a no-op when none is selected
pub(crate) fn selected_or_skip(
    panel: &'static str,
    selected: Option<StrategyId>,
) -> Option<StrategyId> {
    if selected.is_none() {
        debug!(panel, "no strategy selected, nothing saved");
    }
    selected
}

/// A detail panel shown in the middle pane
pub trait Panel {
    /// Navigation entry this panel belongs to
    fn element(&self) -> ActiveElement;

    /// Render the panel as plain text
    fn render(&self, state: &PlanState) -> String;
}

/// Strategy picker line shared by the strategy-scoped panels
pub(crate) fn render_selector(state: &PlanState, selected: Option<StrategyId>) -> String {
    let name = selected
        .and_then(|id| state.strategy(id))
        .map_or("-- none --", |s| s.title.as_str());
    let mut out = format!("Strategy: {name}\n");
    if state.strategies.is_empty() {
        out.push_str("  (no strategies yet)\n");
    }
    out
}
