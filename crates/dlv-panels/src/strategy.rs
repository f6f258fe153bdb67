//! Strategy panel

use crate::form::{build_or_skip, EditSession, Panel};
use crate::shell::ActiveElement;
use crate::table::TextTable;
use dlv_model::{StrategyDraft, StrategyId};
use dlv_store::{Action, Address, PlanState, PlanStore, StoreError};
use tracing::debug;

const PANEL: &str = "strategy";

/// Create, edit and remove strategies
#[derive(Debug, Clone, Default)]
pub struct StrategyPanel {
    pub draft: StrategyDraft,
    editing: Option<EditSession<StrategyId, StrategyDraft>>,
}

impl StrategyPanel {
    /// Create panel with a blank draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the draft as a new strategy
    ///
    /// Returns `None` when a required field is blank; the draft is kept.
    ///
    /// # Errors
    /// Returns the store's error
    pub fn save(&mut self, store: &mut PlanStore) -> Result<Option<StrategyId>, StoreError> {
        let Some(strategy) = build_or_skip(PANEL, self.draft.build())? else {
            return Ok(None);
        };
        let id = StrategyId::new();
        store.dispatch(Action::AddStrategy { id, strategy })?;
        self.draft = StrategyDraft::default();
        debug!(strategy = %id, "strategy saved");
        Ok(Some(id))
    }

    /// Open a row for editing
    ///
    /// # Errors
    /// Returns [`StoreError::RecordNotFound`] for an unknown strategy
    pub fn begin_edit(&mut self, state: &PlanState, id: StrategyId) -> Result<(), StoreError> {
        let strategy = state
            .strategy(id)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        self.editing = Some(EditSession {
            key: id,
            draft: StrategyDraft::from(strategy),
        });
        Ok(())
    }

    /// Draft of the row being edited
    pub fn edit_draft_mut(&mut self) -> Option<&mut StrategyDraft> {
        self.editing.as_mut().map(|e| &mut e.draft)
    }

    /// Key of the row being edited
    #[must_use]
    pub fn editing(&self) -> Option<StrategyId> {
        self.editing.as_ref().map(|e| e.key)
    }

    /// Replace the edited strategy with the edit draft
    ///
    /// Returns `false` when nothing was saved (no edit open, or a blank
    /// required field); the edit stays open in the latter case.
    ///
    /// # Errors
    /// Returns the store's error
    pub fn save_edit(&mut self, store: &mut PlanStore) -> Result<bool, StoreError> {
        let Some(session) = &self.editing else {
            return Ok(false);
        };
        let Some(strategy) = build_or_skip(PANEL, session.draft.build())? else {
            return Ok(false);
        };
        store.dispatch(Action::UpdateStrategy {
            target: Address::Id(session.key),
            strategy,
        })?;
        self.editing = None;
        Ok(true)
    }

    /// Discard the edit draft
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Remove a strategy under the store's delete policy
    ///
    /// # Errors
    /// Returns the store's error, e.g. [`StoreError::DeleteBlocked`]
    pub fn remove(
        &mut self,
        store: &mut PlanStore,
        target: Address<StrategyId>,
    ) -> Result<(), StoreError> {
        store.remove_strategy(target)?;
        if let Some(key) = self.editing() {
            if !store.state().strategies.contains(key) {
                self.editing = None;
            }
        }
        Ok(())
    }
}

impl Panel for StrategyPanel {
    fn element(&self) -> ActiveElement {
        ActiveElement::Strategy
    }

    fn render(&self, state: &PlanState) -> String {
        let mut table = TextTable::new(["#", "Title", "Description", "Owner", "Reference Info", "Id"]);
        for (i, record) in state.strategies.iter().enumerate() {
            match &self.editing {
                Some(e) if e.key == record.id => table.push([
                    format!("{}*", i + 1),
                    format!("[{}]", e.draft.title),
                    format!("[{}]", e.draft.description),
                    format!("[{}]", e.draft.owner),
                    format!("[{}]", e.draft.reference_info),
                    record.id.to_string(),
                ]),
                _ => table.push([
                    (i + 1).to_string(),
                    record.value.title.clone(),
                    record.value.description.clone(),
                    record.value.owner.clone(),
                    record.value.reference_info.clone(),
                    record.id.to_string(),
                ]),
            }
        }
        format!("== Strategy ==\n{}", table.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> StrategyDraft {
        StrategyDraft {
            title: "A".into(),
            description: "d".into(),
            owner: "o".into(),
            reference_info: "r".into(),
        }
    }

    #[test]
    fn blank_field_is_a_no_op() {
        let mut store = PlanStore::new();
        let mut panel = StrategyPanel::new();
        panel.draft = StrategyDraft {
            owner: "  ".into(),
            ..filled()
        };
        assert_eq!(panel.save(&mut store).unwrap(), None);
        assert!(store.state().strategies.is_empty());
        assert_eq!(panel.draft.title, "A");
    }

    #[test]
    fn save_resets_draft() {
        let mut store = PlanStore::new();
        let mut panel = StrategyPanel::new();
        panel.draft = filled();
        let id = panel.save(&mut store).unwrap().unwrap();
        assert!(store.state().strategies.contains(id));
        assert_eq!(panel.draft, StrategyDraft::default());
    }

    #[test]
    fn edit_cycle_replaces_in_place() {
        let mut store = PlanStore::new();
        let mut panel = StrategyPanel::new();
        panel.draft = filled();
        let id = panel.save(&mut store).unwrap().unwrap();

        panel.begin_edit(store.state(), id).unwrap();
        panel.edit_draft_mut().unwrap().title = "A2".into();
        assert!(panel.render(store.state()).contains("[A2]"));
        assert!(panel.save_edit(&mut store).unwrap());
        assert_eq!(store.state().strategy(id).unwrap().title, "A2");
        assert_eq!(panel.editing(), None);
    }

    #[test]
    fn cancel_discards_edit() {
        let mut store = PlanStore::new();
        let mut panel = StrategyPanel::new();
        panel.draft = filled();
        let id = panel.save(&mut store).unwrap().unwrap();
        panel.begin_edit(store.state(), id).unwrap();
        panel.edit_draft_mut().unwrap().title = "changed".into();
        panel.cancel_edit();
        assert!(!panel.save_edit(&mut store).unwrap());
        assert_eq!(store.state().strategy(id).unwrap().title, "A");
    }
}
