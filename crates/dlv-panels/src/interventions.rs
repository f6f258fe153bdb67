//! Interventions panel

use crate::form::{build_or_skip, render_selector, selected_or_skip, EditSession, Panel};
use crate::shell::ActiveElement;
use crate::table::TextTable;
use dlv_model::{InterventionDraft, RecordId, StrategyId};
use dlv_store::{Action, Address, PlanState, PlanStore, StoreError};
use dlv_views::{interventions_by_end_date, long_date};

const PANEL: &str = "interventions";

/// Interventions of the selected strategy, listed by target end date
#[derive(Debug, Clone, Default)]
pub struct InterventionsPanel {
    pub selected: Option<StrategyId>,
    pub draft: InterventionDraft,
    editing: Option<EditSession<RecordId, InterventionDraft>>,
}

impl InterventionsPanel {
    /// Create panel with nothing selected
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

    /// Save the draft under the selected strategy
    ///
    /// Returns `None` when no strategy is selected or a field is blank.
    ///
    /// # Errors
    /// Returns an error for an unparseable date or from the store
    pub fn save(&mut self, store: &mut PlanStore) -> Result<Option<RecordId>, StoreError> {
        let Some(strategy) = selected_or_skip(PANEL, self.selected) else {
            return Ok(None);
        };
        let Some(intervention) = build_or_skip(PANEL, self.draft.build())? else {
            return Ok(None);
        };
        let id = RecordId::new();
        store.dispatch(Action::AddIntervention {
            strategy,
            id,
            intervention,
        })?;
        self.draft = InterventionDraft::default();
        Ok(Some(id))
    }

    /// Open a row for editing
    ///
    /// # Errors
    /// Returns [`StoreError::RecordNotFound`] when the row is not under the
    /// selected strategy
    pub fn begin_edit(&mut self, state: &PlanState, id: RecordId) -> Result<(), StoreError> {
        let draft = self
            .selected
            .and_then(|s| state.interventions_for(s).get(id).map(InterventionDraft::from))
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        self.editing = Some(EditSession { key: id, draft });
        Ok(())
    }

    /// Draft of the row being edited
    pub fn edit_draft_mut(&mut self) -> Option<&mut InterventionDraft> {
        self.editing.as_mut().map(|e| &mut e.draft)
    }

    /// Key of the row being edited
    #[must_use]
    pub fn editing(&self) -> Option<RecordId> {
        self.editing.as_ref().map(|e| e.key)
    }

    /// Replace the edited row with the edit draft
    ///
    /// # Errors
    /// Returns an error for an unparseable date or from the store
    pub fn save_edit(&mut self, store: &mut PlanStore) -> Result<bool, StoreError> {
        let (Some(strategy), Some(session)) = (self.selected, &self.editing) else {
            return Ok(false);
        };
        let Some(intervention) = build_or_skip(PANEL, session.draft.build())? else {
            return Ok(false);
        };
        store.dispatch(Action::UpdateIntervention {
            strategy,
            target: Address::Id(session.key),
            intervention,
        })?;
        self.editing = None;
        Ok(true)
    }

    /// Discard the edit draft
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Remove a row of the selected strategy
    ///
    /// # Errors
    /// Returns the store's error
    pub fn remove(&mut self, store: &mut PlanStore, id: RecordId) -> Result<bool, StoreError> {
        let Some(strategy) = selected_or_skip(PANEL, self.selected) else {
            return Ok(false);
        };
        store.dispatch(Action::RemoveIntervention {
            strategy,
            target: Address::Id(id),
        })?;
        if self.editing() == Some(id) {
            self.editing = None;
        }
        Ok(true)
    }
}

impl Panel for InterventionsPanel {
    fn element(&self) -> ActiveElement {
        ActiveElement::Interventions
    }

    fn render(&self, state: &PlanState) -> String {
        let mut out = format!("== Interventions ==\n{}", render_selector(state, self.selected));
        let Some(strategy) = self.selected else {
            return out;
        };
        let items = state.interventions_for(strategy);
        let mut table = TextTable::new(["#", "Title", "Description", "Owner", "Target End", "Id"]);
        for (i, record) in interventions_by_end_date(&items).into_iter().enumerate() {
            match &self.editing {
                Some(e) if e.key == record.id => table.push([
                    format!("{}*", i + 1),
                    format!("[{}]", e.draft.title),
                    format!("[{}]", e.draft.description),
                    format!("[{}]", e.draft.owner),
                    format!("[{}]", e.draft.target_end_date),
                    record.id.to_string(),
                ]),
                _ => table.push([
                    (i + 1).to_string(),
                    record.value.title.clone(),
                    record.value.description.clone(),
                    record.value.owner.clone(),
                    long_date(record.value.target_end_date),
                    record.id.to_string(),
                ]),
            }
        }
        out.push_str(&table.render());
        out
    }
}
