//! Stakeholders panel

use crate::form::{build_or_skip, EditSession, Panel};
use crate::shell::ActiveElement;
use crate::table::TextTable;
use dlv_model::{RecordId, StakeholderDraft};
use dlv_store::{Action, Address, PlanState, PlanStore, StoreError};
use tracing::debug;

const PANEL: &str = "stakeholders";

/// Stakeholder contacts; not scoped to a strategy
#[derive(Debug, Clone)]
pub struct StakeholdersPanel {
    rows: Vec<StakeholderDraft>,
    editing: Option<EditSession<RecordId, StakeholderDraft>>,
}

impl Default for StakeholdersPanel {
    fn default() -> Self {
        Self {
            rows: vec![StakeholderDraft::default()],
            editing: None,
        }
    }
}

impl StakeholdersPanel {
    /// Create panel with one blank draft row
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft rows
    #[must_use]
    pub fn rows(&self) -> &[StakeholderDraft] {
        &self.rows
    }

    /// Append a blank draft row and return it
    pub fn add_row(&mut self) -> &mut StakeholderDraft {
        self.rows.push(StakeholderDraft::default());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Mutable draft row
    pub fn row_mut(&mut self, index: usize) -> Option<&mut StakeholderDraft> {
        self.rows.get_mut(index)
    }

    /// Save every draft row that has a name, then reset to one blank row
    ///
    /// # Errors
    /// Returns the store's error; rows saved before it stay saved
    pub fn save(&mut self, store: &mut PlanStore) -> Result<Vec<RecordId>, StoreError> {
        let mut saved = Vec::new();
        for draft in self.rows.iter().filter(|d| !d.is_blank()) {
            let Some(stakeholder) = build_or_skip(PANEL, draft.build())? else {
                continue;
            };
            let id = RecordId::new();
            store.dispatch(Action::AddStakeholder { id, stakeholder })?;
            saved.push(id);
        }
        debug!(saved = saved.len(), "stakeholder rows saved");
        self.rows = vec![StakeholderDraft::default()];
        Ok(saved)
    }

    /// Open a saved row for editing
    ///
    /// # Errors
    /// Returns [`StoreError::RecordNotFound`] for an unknown row
    pub fn begin_edit(&mut self, state: &PlanState, id: RecordId) -> Result<(), StoreError> {
        let draft = state
            .stakeholders
            .get(id)
            .map(StakeholderDraft::from)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        self.editing = Some(EditSession { key: id, draft });
        Ok(())
    }

    /// Draft of the row being edited
    pub fn edit_draft_mut(&mut self) -> Option<&mut StakeholderDraft> {
        self.editing.as_mut().map(|e| &mut e.draft)
    }

    /// Replace the edited row with the edit draft
    ///
    /// # Errors
    /// Returns the store's error
    pub fn save_edit(&mut self, store: &mut PlanStore) -> Result<bool, StoreError> {
        let Some(session) = &self.editing else {
            return Ok(false);
        };
        let Some(stakeholder) = build_or_skip(PANEL, session.draft.build())? else {
            return Ok(false);
        };
        store.dispatch(Action::UpdateStakeholder {
            target: Address::Id(session.key),
            stakeholder,
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
    pub fn remove(
        &mut self,
        store: &mut PlanStore,
        target: Address<RecordId>,
    ) -> Result<(), StoreError> {
        store.dispatch(Action::RemoveStakeholder { target })?;
        if let Some(e) = &self.editing {
            if !store.state().stakeholders.contains(e.key) {
                self.editing = None;
            }
        }
        Ok(())
    }
}

impl Panel for StakeholdersPanel {
    fn element(&self) -> ActiveElement {
        ActiveElement::Stakeholders
    }

    fn render(&self, state: &PlanState) -> String {
        let mut table = TextTable::new([
            "#",
            "Name",
            "Role",
            "Email",
            "Phone",
            "Preferred Contact",
            "Comment",
            "Id",
        ]);
        for (i, record) in state.stakeholders.iter().enumerate() {
            let (marker, s) = match &self.editing {
                Some(e) if e.key == record.id => (format!("{}*", i + 1), e.draft.clone()),
                _ => ((i + 1).to_string(), StakeholderDraft::from(&record.value)),
            };
            table.push([
                marker,
                s.name,
                s.role,
                s.email,
                s.phone,
                s.preferred_contact.to_string(),
                s.comment,
                record.id.to_string(),
            ]);
        }
        format!("== Stakeholders ==\n{}", table.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlv_model::ContactMethod;

    #[test]
    fn rows_without_name_are_skipped() {
        let mut store = PlanStore::new();
        let mut panel = StakeholdersPanel::new();
        panel.row_mut(0).unwrap().name = "Grace".into();
        panel.add_row().email = "nobody@example.org".into();
        let saved = panel.save(&mut store).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(store.state().stakeholders.len(), 1);
        assert_eq!(panel.rows().len(), 1);
    }

    #[test]
    fn default_contact_is_email() {
        assert_eq!(
            StakeholdersPanel::new().rows()[0].preferred_contact,
            ContactMethod::Email
        );
    }

    #[test]
    fn edit_and_remove_by_position() {
        let mut store = PlanStore::new();
        let mut panel = StakeholdersPanel::new();
        panel.row_mut(0).unwrap().name = "Grace".into();
        let id = panel.save(&mut store).unwrap()[0];

        panel.begin_edit(store.state(), id).unwrap();
        panel.edit_draft_mut().unwrap().preferred_contact = ContactMethod::Text;
        assert!(panel.save_edit(&mut store).unwrap());
        assert_eq!(
            store.state().stakeholders.get(id).unwrap().preferred_contact,
            ContactMethod::Text
        );

        panel.remove(&mut store, Address::Index(0)).unwrap();
        assert!(store.state().stakeholders.is_empty());
    }
}
