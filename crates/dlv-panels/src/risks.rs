//! Risks and issues panel
//!
//! The form holds several draft rows at once. Saving appends every row that
//! has content and a description, then resets the form to one blank row.

use crate::form::{build_or_skip, render_selector, selected_or_skip, EditSession, Panel};
use crate::shell::ActiveElement;
use crate::table::TextTable;
use dlv_model::{RecordId, RiskDraft, StrategyId};
use dlv_store::{Action, Address, PlanState, PlanStore, StoreError};
use tracing::debug;

const PANEL: &str = "risks";

/// Risk and issue register of the selected strategy
#[derive(Debug, Clone)]
pub struct RisksPanel {
    pub selected: Option<StrategyId>,
    rows: Vec<RiskDraft>,
    editing: Option<EditSession<RecordId, RiskDraft>>,
}

impl Default for RisksPanel {
    fn default() -> Self {
        Self {
            selected: None,
            rows: vec![RiskDraft::default()],
            editing: None,
        }
    }
}

impl RisksPanel {
    /// Create panel with one blank draft row
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the parent strategy; an open edit is discarded
    pub fn select(&mut self, strategy: Option<StrategyId>) {
        if self.selected != strategy {
            self.editing = None;
        }
        self.selected = strategy;
    }

    /// Draft rows
    #[must_use]
    pub fn rows(&self) -> &[RiskDraft] {
        &self.rows
    }

    /// Append a blank draft row and return it
    pub fn add_row(&mut self) -> &mut RiskDraft {
        self.rows.push(RiskDraft::default());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Mutable draft row
    pub fn row_mut(&mut self, index: usize) -> Option<&mut RiskDraft> {
        self.rows.get_mut(index)
    }

    /// Save every filled draft row under the selected strategy
    ///
    /// Blank rows and rows without a description are skipped. Returns the
    /// ids of the saved rows; with no strategy selected nothing is saved and
    /// the drafts are kept.
    ///
    /// # Errors
    /// Returns the store's error; rows saved before it stay saved
    pub fn save(&mut self, store: &mut PlanStore) -> Result<Vec<RecordId>, StoreError> {
        let Some(strategy) = selected_or_skip(PANEL, self.selected) else {
            return Ok(Vec::new());
        };
        let mut saved = Vec::new();
        for draft in self.rows.iter().filter(|d| !d.is_blank()) {
            let Some(risk) = build_or_skip(PANEL, draft.build())? else {
                continue;
            };
            let id = RecordId::new();
            store.dispatch(Action::AddRisk { strategy, id, risk })?;
            saved.push(id);
        }
        debug!(saved = saved.len(), drafts = self.rows.len(), "risk rows saved");
        self.rows = vec![RiskDraft::default()];
        Ok(saved)
    }

    /// Open a saved row for editing
    ///
    /// # Errors
    /// Returns [`StoreError::RecordNotFound`] when the row is not under the
    /// selected strategy
    pub fn begin_edit(&mut self, state: &PlanState, id: RecordId) -> Result<(), StoreError> {
        let draft = self
            .selected
            .and_then(|s| state.risks_for(s).get(id).map(RiskDraft::from))
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        self.editing = Some(EditSession { key: id, draft });
        Ok(())
    }

    /// Draft of the row being edited
    pub fn edit_draft_mut(&mut self) -> Option<&mut RiskDraft> {
        self.editing.as_mut().map(|e| &mut e.draft)
    }

    /// Replace the edited row with the edit draft
    ///
    /// # Errors
    /// Returns the store's error
    pub fn save_edit(&mut self, store: &mut PlanStore) -> Result<bool, StoreError> {
        let (Some(strategy), Some(session)) = (self.selected, &self.editing) else {
            return Ok(false);
        };
        let Some(risk) = build_or_skip(PANEL, session.draft.build())? else {
            return Ok(false);
        };
        store.dispatch(Action::UpdateRisk {
            strategy,
            target: Address::Id(session.key),
            risk,
        })?;
        self.editing = None;
        Ok(true)
    }

    /// Discard the edit draft
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Remove a saved row
    ///
    /// # Errors
    /// Returns the store's error
    pub fn remove(&mut self, store: &mut PlanStore, id: RecordId) -> Result<bool, StoreError> {
        let Some(strategy) = selected_or_skip(PANEL, self.selected) else {
            return Ok(false);
        };
        store.dispatch(Action::RemoveRisk {
            strategy,
            target: Address::Id(id),
        })?;
        if self.editing.as_ref().is_some_and(|e| e.key == id) {
            self.editing = None;
        }
        Ok(true)
    }
}

impl Panel for RisksPanel {
    fn element(&self) -> ActiveElement {
        ActiveElement::RisksAndIssues
    }

    fn render(&self, state: &PlanState) -> String {
        let mut out = format!("== Risks and Issues ==\n{}", render_selector(state, self.selected));
        let Some(strategy) = self.selected else {
            return out;
        };
        let mut table = TextTable::new([
            "#",
            "Intervention",
            "Type",
            "Description",
            "Likelihood",
            "Impact",
            "Mitigation",
            "Post Likelihood",
            "Post Impact",
            "Comment",
            "Id",
        ]);
        for (i, record) in state.risks_for(strategy).iter().enumerate() {
            let (marker, r) = match &self.editing {
                Some(e) if e.key == record.id => (format!("{}*", i + 1), e.draft.clone()),
                _ => ((i + 1).to_string(), RiskDraft::from(&record.value)),
            };
            table.push([
                marker,
                r.intervention_title,
                r.kind.to_string(),
                r.description,
                r.likelihood.to_string(),
                r.impact.to_string(),
                r.mitigation,
                r.post_mitigation_likelihood.to_string(),
                r.post_mitigation_impact.to_string(),
                r.comment,
                record.id.to_string(),
            ]);
        }
        out.push_str(&table.render());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlv_model::{Rating, RiskKind, Strategy};

    fn store_with_strategy() -> (PlanStore, StrategyId) {
        let mut store = PlanStore::new();
        let id = StrategyId::new();
        store
            .dispatch(Action::AddStrategy {
                id,
                strategy: Strategy {
                    title: "A".into(),
                    description: "d".into(),
                    owner: "o".into(),
                    reference_info: "r".into(),
                },
            })
            .unwrap();
        (store, id)
    }

    #[test]
    fn fresh_panel_has_one_blank_row_with_defaults() {
        let panel = RisksPanel::new();
        assert_eq!(panel.rows().len(), 1);
        assert_eq!(panel.rows()[0].kind, RiskKind::Risk);
        assert_eq!(panel.rows()[0].likelihood, Rating::Low);
    }

    #[test]
    fn save_keeps_filled_rows_and_resets() {
        let (mut store, a) = store_with_strategy();
        let mut panel = RisksPanel::new();
        panel.select(Some(a));
        panel.row_mut(0).unwrap().description = "Supplier delay".into();
        panel.add_row();
        panel.add_row().mitigation = "no description".into();
        panel.add_row().description = "Budget cut".into();

        let saved = panel.save(&mut store).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(store.state().risks_for(a).len(), 2);
        assert_eq!(panel.rows(), &[RiskDraft::default()]);
    }

    #[test]
    fn nothing_saved_without_selection() {
        let (mut store, _) = store_with_strategy();
        let mut panel = RisksPanel::new();
        panel.row_mut(0).unwrap().description = "x".into();
        assert!(panel.save(&mut store).unwrap().is_empty());
        assert_eq!(panel.rows()[0].description, "x");
    }

    #[test]
    fn edit_then_remove() {
        let (mut store, a) = store_with_strategy();
        let mut panel = RisksPanel::new();
        panel.select(Some(a));
        panel.row_mut(0).unwrap().description = "x".into();
        let id = panel.save(&mut store).unwrap()[0];

        panel.begin_edit(store.state(), id).unwrap();
        panel.edit_draft_mut().unwrap().kind = RiskKind::Issue;
        assert!(panel.render(store.state()).contains("1*"));
        assert!(panel.save_edit(&mut store).unwrap());
        assert_eq!(store.state().risks_for(a).get(id).unwrap().kind, RiskKind::Issue);

        assert!(panel.remove(&mut store, id).unwrap());
        assert!(store.state().risks_for(a).is_empty());
    }
}
