//! Success metrics panel
//!
//! Edits a working copy of the grid for the current selection. Nothing
//! reaches the plan until [`MetricsPanel::save`]; the chart is drawn from
//! the saved grid.

use crate::form::Panel;
use crate::shell::ActiveElement;
use crate::table::TextTable;
use dlv_model::{MetricsGrid, ModelError, SelectionKey};
use dlv_store::{Action, PlanState, PlanStore, StoreError};
use dlv_views::{chart, long_date, ChartData};
use tracing::debug;

/// Grid editor for one selection
#[derive(Debug, Clone, Default)]
pub struct MetricsPanel {
    selected: Option<SelectionKey>,
    grid: MetricsGrid,
}

impl MetricsPanel {
    /// Create panel with nothing selected
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch selection, loading its saved grid or a fresh one
    pub fn select(&mut self, state: &PlanState, key: Option<SelectionKey>) {
        self.grid = key
            .as_ref()
            .and_then(|k| state.metrics_for(k).cloned())
            .unwrap_or_default();
        self.selected = key;
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&SelectionKey> {
        self.selected.as_ref()
    }

    /// Working grid
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &MetricsGrid {
        &self.grid
    }

    /// Append a blank row
    pub fn add_row(&mut self) {
        self.grid.add_row();
    }

    /// Append a column; a blank title is ignored
    pub fn add_column(&mut self, title: &str) -> bool {
        self.grid.add_column(title)
    }

    /// Remove a column
    ///
    /// # Errors
    /// Returns [`ModelError::ColumnOutOfRange`] for an unknown column
    pub fn delete_column(&mut self, index: usize) -> Result<String, ModelError> {
        self.grid.delete_column(index)
    }

    /// Set a cell; the time column is date-masked
    ///
    /// # Errors
    /// Returns [`ModelError::CellOutOfRange`] for an unknown cell
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), ModelError> {
        self.grid.set_cell(row, col, value)
    }

    /// Save the working grid under the selection
    ///
    /// Returns `false` when nothing is selected.
    ///
    /// # Errors
    /// Returns the store's error
    pub fn save(&mut self, store: &mut PlanStore) -> Result<bool, StoreError> {
        let Some(key) = self.selected.clone() else {
            debug!(panel = "metrics", "no selection, nothing saved");
            return Ok(false);
        };
        store.dispatch(Action::SaveMetrics {
            key,
            grid: self.grid.clone(),
        })?;
        Ok(true)
    }

    /// Chart of the saved grid for the selection
    #[must_use]
    pub fn chart(&self, state: &PlanState) -> Option<ChartData> {
        self.selected
            .as_ref()
            .and_then(|k| state.metrics_for(k))
            .map(chart)
    }
}

/// Summarize chart data as text
#[must_use]
pub fn render_chart(data: &ChartData) -> String {
    let mut out = String::new();
    if let (Some(min), Some(max)) = (data.y_min, data.y_max) {
        out.push_str(&format!("Chart  y: {min} .. {max}\n"));
    } else {
        out.push_str("Chart  (no numeric values)\n");
    }
    for series in &data.series {
        let points: Vec<String> = series
            .points
            .iter()
            .map(|p| match p.value {
                Some(v) => format!("{} {v}", long_date(p.date)),
                None => format!("{} -", long_date(p.date)),
            })
            .collect();
        out.push_str(&format!(
            "  {} [{}]: {}\n",
            series.label,
            series.color,
            points.join(", ")
        ));
    }
    if data.undated_rows > 0 {
        out.push_str(&format!("  ({} rows without a valid date)\n", data.undated_rows));
    }
    out
}

impl Panel for MetricsPanel {
    fn element(&self) -> ActiveElement {
        ActiveElement::SuccessMetrics
    }

    fn render(&self, state: &PlanState) -> String {
        let mut out = String::from("== Success Metrics ==\n");
        let Some(key) = &self.selected else {
            out.push_str("Selection: -- none --\n");
            return out;
        };
        let label = key
            .as_str()
            .parse()
            .ok()
            .and_then(|id| state.strategy(id))
            .map_or(key.as_str(), |s| s.title.as_str());
        out.push_str(&format!("Selection: {label}\n"));

        let mut table = TextTable::new(
            std::iter::once("#".to_string()).chain(self.grid.columns().iter().cloned()),
        );
        for (i, row) in self.grid.rows().iter().enumerate() {
            table.push(std::iter::once((i + 1).to_string()).chain(row.iter().cloned()));
        }
        out.push_str(&table.render());
        if let Some(data) = self.chart(state) {
            out.push_str(&render_chart(&data));
        }
        out
    }
}
