//! Schedule panel
//!
//! Table of schedule items for the selected strategy, listed by start date,
//! followed by a text Gantt chart.

use crate::form::{build_or_skip, render_selector, selected_or_skip, EditSession, Panel};
use crate::shell::ActiveElement;
use crate::table::TextTable;
use dlv_model::{RecordId, ScheduleDraft, StrategyId};
use dlv_store::{Action, Address, PlanState, PlanStore, StoreError};
use dlv_views::{layout, schedule_by_start_date, short_date, GanttLayout};
use tracing::error;

const PANEL: &str = "schedule";

/// Character width of the text Gantt chart
pub const GANTT_COLUMNS: usize = 60;

/// Schedule items of the selected strategy
#[derive(Debug, Clone)]
pub struct SchedulePanel {
    pub selected: Option<StrategyId>,
    pub draft: ScheduleDraft,
    /// Width the Gantt layout is scaled into
    pub display_scale: f64,
    editing: Option<EditSession<RecordId, ScheduleDraft>>,
}

impl Default for SchedulePanel {
    fn default() -> Self {
        Self {
            selected: None,
            draft: ScheduleDraft::default(),
            display_scale: 600.0,
            editing: None,
        }
    }
}

// Missing dates are reported loudly; other blank fields are a quiet no-op
fn log_if_missing_dates(draft: &ScheduleDraft) -> bool {
    let missing = draft.start_date.trim().is_empty() || draft.end_date.trim().is_empty();
    if missing {
        error!(
            title = %draft.title,
            "invalid schedule item: missing required fields"
        );
    }
    missing
}

impl SchedulePanel {
    /// Create panel with nothing selected
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With Gantt display scale
    #[inline]
    #[must_use]
    pub fn with_display_scale(mut self, scale: f64) -> Self {
        self.display_scale = scale;
        self
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
    /// # Errors
    /// Returns an error for an unparseable date or from the store
    pub fn save(&mut self, store: &mut PlanStore) -> Result<Option<RecordId>, StoreError> {
        let Some(strategy) = selected_or_skip(PANEL, self.selected) else {
            return Ok(None);
        };
        log_if_missing_dates(&self.draft);
        let Some(item) = build_or_skip(PANEL, self.draft.build())? else {
            return Ok(None);
        };
        let id = RecordId::new();
        store.dispatch(Action::AddScheduleItem { strategy, id, item })?;
        self.draft = ScheduleDraft::default();
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
            .and_then(|s| state.schedule_for(s).get(id).map(ScheduleDraft::from))
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        self.editing = Some(EditSession { key: id, draft });
        Ok(())
    }

    /// Draft of the row being edited
    pub fn edit_draft_mut(&mut self) -> Option<&mut ScheduleDraft> {
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
        log_if_missing_dates(&session.draft);
        let Some(item) = build_or_skip(PANEL, session.draft.build())? else {
            return Ok(false);
        };
        store.dispatch(Action::UpdateScheduleItem {
            strategy,
            target: Address::Id(session.key),
            item,
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
        store.dispatch(Action::RemoveScheduleItem {
            strategy,
            target: Address::Id(id),
        })?;
        if self.editing() == Some(id) {
            self.editing = None;
        }
        Ok(true)
    }

    /// Remove every item of the selected strategy
    ///
    /// # Errors
    /// Returns the store's error
    pub fn clear(&mut self, store: &mut PlanStore) -> Result<bool, StoreError> {
        let Some(strategy) = selected_or_skip(PANEL, self.selected) else {
            return Ok(false);
        };
        store.dispatch(Action::ClearSchedule { strategy })?;
        self.editing = None;
        Ok(true)
    }

    /// Gantt layout of the selected strategy
    #[must_use]
    pub fn gantt(&self, state: &PlanState) -> Option<GanttLayout> {
        self.selected
            .map(|s| layout(&state.schedule_for(s), self.display_scale))
    }
}

/// Draw a layout as text bars
#[must_use]
pub fn render_gantt(gantt: &GanttLayout) -> String {
    let mut out = String::new();
    let (Some(start), Some(end)) = (gantt.start, gantt.end) else {
        return out;
    };
    out.push_str(&format!("Gantt {} .. {}\n", short_date(start), short_date(end)));
    let label_width = gantt
        .bars
        .iter()
        .map(|b| b.title.chars().count())
        .max()
        .unwrap_or(0);
    for bar in &gantt.bars {
        let (lead, fill) = bar_cells(gantt.scale, bar.offset, bar.width);
        out.push_str(&format!(
            "{:<label_width$} |{}{}{}| {}\n",
            bar.title,
            " ".repeat(lead),
            "#".repeat(fill),
            " ".repeat(GANTT_COLUMNS - lead - fill),
            bar.status,
        ));
    }
    out
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_cells(scale: f64, offset: f64, width: f64) -> (usize, usize) {
    if scale <= 0.0 {
        return (0, 0);
    }
    let cols = GANTT_COLUMNS as f64;
    let lead = ((offset / scale) * cols).round().clamp(0.0, cols) as usize;
    let fill = ((width / scale) * cols).round().clamp(0.0, cols) as usize;
    (lead, fill.min(GANTT_COLUMNS - lead))
}

impl Panel for SchedulePanel {
    fn element(&self) -> ActiveElement {
        ActiveElement::Schedule
    }

    fn render(&self, state: &PlanState) -> String {
        let mut out = format!("== Schedule ==\n{}", render_selector(state, self.selected));
        let Some(strategy) = self.selected else {
            return out;
        };
        let items = state.schedule_for(strategy);
        let mut table = TextTable::new(["#", "Title", "Description", "Start", "End", "Status", "Id"]);
        for (i, record) in schedule_by_start_date(&items).into_iter().enumerate() {
            match &self.editing {
                Some(e) if e.key == record.id => table.push([
                    format!("{}*", i + 1),
                    format!("[{}]", e.draft.title),
                    format!("[{}]", e.draft.description),
                    format!("[{}]", e.draft.start_date),
                    format!("[{}]", e.draft.end_date),
                    format!("[{}]", e.draft.status),
                    record.id.to_string(),
                ]),
                _ => table.push([
                    (i + 1).to_string(),
                    record.value.title.clone(),
                    record.value.description.clone(),
                    short_date(record.value.start_date),
                    short_date(record.value.end_date),
                    record.value.status.to_string(),
                    record.id.to_string(),
                ]),
            }
        }
        out.push_str(&table.render());
        out.push_str(&render_gantt(&layout(&items, self.display_scale)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlv_model::{ScheduleStatus, Strategy};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

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

    fn draft(title: &str, start: &str, end: &str) -> ScheduleDraft {
        ScheduleDraft {
            title: title.into(),
            description: "d".into(),
            start_date: start.into(),
            end_date: end.into(),
            status: ScheduleStatus::InProgress,
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = BufferWriter;

        fn make_writer(&'a self) -> Self::Writer {
            BufferWriter(Arc::clone(&self.0))
        }
    }

    impl io::Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_errors(f: impl FnOnce()) -> String {
        let sink = SharedBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_max_level(Level::ERROR)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn missing_dates_are_a_no_op() {
        let (mut store, a) = store_with_strategy();
        let mut panel = SchedulePanel::new();
        panel.select(Some(a));
        panel.draft = draft("S", "2024-01-01", "");
        let logs = captured_errors(|| {
            assert_eq!(panel.save(&mut store).unwrap(), None);
        });
        assert!(store.state().schedule_for(a).is_empty());
        assert!(logs.contains("invalid schedule item: missing required fields"));
        assert!(logs.contains("ERROR"));
    }

    #[test]
    fn only_missing_dates_are_reported() {
        assert!(log_if_missing_dates(&draft("S", " ", "2024-01-10")));
        assert!(!log_if_missing_dates(&draft("", "2024-01-01", "2024-01-10")));

        let (mut store, a) = store_with_strategy();
        let mut panel = SchedulePanel::new();
        panel.select(Some(a));
        panel.draft = draft("", "2024-01-01", "2024-01-10");
        let logs = captured_errors(|| {
            assert_eq!(panel.save(&mut store).unwrap(), None);
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn edit_targets_the_displayed_row() {
        let (mut store, a) = store_with_strategy();
        let mut panel = SchedulePanel::new();
        panel.select(Some(a));
        panel.draft = draft("Late", "2024-03-01", "2024-03-10");
        panel.save(&mut store).unwrap();
        panel.draft = draft("Early", "2024-01-01", "2024-01-10");
        let early = panel.save(&mut store).unwrap().unwrap();

        let items = store.state().schedule_for(a);
        let shown = schedule_by_start_date(&items);
        assert_eq!(shown[0].id, early);

        panel.begin_edit(store.state(), shown[0].id).unwrap();
        panel.edit_draft_mut().unwrap().status = ScheduleStatus::Completed;
        panel.save_edit(&mut store).unwrap();

        let items = store.state().schedule_for(a);
        assert_eq!(items.get(early).unwrap().status, ScheduleStatus::Completed);
        assert_eq!(items.at(0).unwrap().value.status, ScheduleStatus::InProgress);
    }

    #[test]
    fn clear_empties_selected_schedule() {
        let (mut store, a) = store_with_strategy();
        let mut panel = SchedulePanel::new();
        panel.select(Some(a));
        panel.draft = draft("S", "2024-01-01", "2024-01-05");
        panel.save(&mut store).unwrap();
        assert!(panel.clear(&mut store).unwrap());
        assert!(store.state().schedule_for(a).is_empty());
    }

    #[test]
    fn render_shows_short_dates_and_bars() {
        let (mut store, a) = store_with_strategy();
        let mut panel = SchedulePanel::new();
        panel.select(Some(a));
        panel.draft = draft("Build", "2024-01-01", "2024-01-31");
        panel.save(&mut store).unwrap();

        let text = panel.render(store.state());
        assert!(text.contains("01-01"));
        assert!(text.contains("31-01"));
        assert!(text.contains(&"#".repeat(GANTT_COLUMNS)));
        assert!(text.contains("In progress"));
    }

    #[test]
    fn bar_cells_stay_inside_chart() {
        assert_eq!(bar_cells(0.0, 1.0, 1.0), (0, 0));
        assert_eq!(bar_cells(600.0, 600.0, 0.0), (GANTT_COLUMNS, 0));
        assert_eq!(bar_cells(600.0, 300.0, 300.0), (30, 30));
    }
}
