//! Plan state
//!
//! The whole application state as one explicit value. Views receive it by
//! reference; updates go through [`crate::reduce`] and produce a new value.

use crate::collection::Collection;
use dlv_model::{
    Intervention, MetricsGrid, RecordId, RiskOrIssue, ScheduleItem, SelectionKey, Stakeholder,
    Strategy, StrategyId,
};
use im::OrdMap;
use serde::{Deserialize, Serialize};

/// Records of one kind, grouped by parent strategy
pub type ByStrategy<T> = OrdMap<StrategyId, Collection<RecordId, T>>;

/// Complete plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanState {
    pub strategies: Collection<StrategyId, Strategy>,
    pub interventions: ByStrategy<Intervention>,
    pub schedule: ByStrategy<ScheduleItem>,
    pub metrics: OrdMap<SelectionKey, MetricsGrid>,
    pub risks: ByStrategy<RiskOrIssue>,
    pub stakeholders: Collection<RecordId, Stakeholder>,
}

impl PlanState {
    /// Create empty plan
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a strategy
    #[inline]
    #[must_use]
    pub fn strategy(&self, id: StrategyId) -> Option<&Strategy> {
        self.strategies.get(id)
    }

    /// Interventions under a strategy (empty when none)
    #[must_use]
    pub fn interventions_for(&self, id: StrategyId) -> Collection<RecordId, Intervention> {
        self.interventions.get(&id).cloned().unwrap_or_default()
    }

    /// Schedule items under a strategy (empty when none)
    #[must_use]
    pub fn schedule_for(&self, id: StrategyId) -> Collection<RecordId, ScheduleItem> {
        self.schedule.get(&id).cloned().unwrap_or_default()
    }

    /// Risks and issues under a strategy (empty when none)
    #[must_use]
    pub fn risks_for(&self, id: StrategyId) -> Collection<RecordId, RiskOrIssue> {
        self.risks.get(&id).cloned().unwrap_or_default()
    }

    /// Saved metrics grid for a selection
    #[inline]
    #[must_use]
    pub fn metrics_for(&self, key: &SelectionKey) -> Option<&MetricsGrid> {
        self.metrics.get(key)
    }

    /// Number of records that reference a strategy
    #[must_use]
    pub fn dependents_of(&self, id: StrategyId) -> usize {
        let keyed = |len: Option<usize>| len.unwrap_or(0);
        keyed(self.interventions.get(&id).map(Collection::len))
            + keyed(self.schedule.get(&id).map(Collection::len))
            + keyed(self.risks.get(&id).map(Collection::len))
            + usize::from(self.metrics.contains_key(&SelectionKey::from(id)))
    }

    /// Parent keys that no longer name a strategy
    #[must_use]
    pub fn orphaned_keys(&self) -> Vec<StrategyId> {
        let mut keys: Vec<StrategyId> = self
            .interventions
            .keys()
            .chain(self.schedule.keys())
            .chain(self.risks.keys())
            .copied()
            .filter(|id| !self.strategies.contains(*id))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(title: &str) -> Strategy {
        Strategy {
            title: title.into(),
            description: "d".into(),
            owner: "o".into(),
            reference_info: "r".into(),
        }
    }

    #[test]
    fn selectors_default_to_empty() {
        let state = PlanState::new();
        let id = StrategyId::new();
        assert!(state.interventions_for(id).is_empty());
        assert!(state.schedule_for(id).is_empty());
        assert!(state.risks_for(id).is_empty());
        assert_eq!(state.dependents_of(id), 0);
    }

    #[test]
    fn dependents_count_metrics_grid() {
        let mut state = PlanState::new();
        let id = state.strategies.insert(strategy("A"));
        state.metrics.insert(SelectionKey::from(id), MetricsGrid::new());
        assert_eq!(state.dependents_of(id), 1);
    }

    #[test]
    fn orphaned_keys_lists_dead_parents() {
        let mut state = PlanState::new();
        let live = state.strategies.insert(strategy("A"));
        let dead = StrategyId::new();
        state.schedule.insert(live, Collection::new());
        state.risks.insert(dead, Collection::new());
        assert_eq!(state.orphaned_keys(), vec![dead]);
    }

    #[test]
    fn empty_state_round_trips_json() {
        let state = PlanState::new();
        let json = serde_json::to_string(&state).unwrap();
        let back: PlanState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        let partial: PlanState = serde_json::from_str("{}").unwrap();
        assert_eq!(partial, state);
    }
}
