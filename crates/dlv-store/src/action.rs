//! State update actions
//!
//! Insert actions carry their new key, generated when the action is built,
//! so applying the same action twice yields the same state.

use crate::collection::Address;
use dlv_model::{
    DeletePolicy, Intervention, MetricsGrid, RecordId, RiskOrIssue, ScheduleItem, SelectionKey,
    Stakeholder, Strategy, StrategyId,
};

/// One state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddStrategy {
        id: StrategyId,
        strategy: Strategy,
    },
    UpdateStrategy {
        target: Address<StrategyId>,
        strategy: Strategy,
    },
    RemoveStrategy {
        target: Address<StrategyId>,
        policy: DeletePolicy,
    },

    AddIntervention {
        strategy: StrategyId,
        id: RecordId,
        intervention: Intervention,
    },
    UpdateIntervention {
        strategy: StrategyId,
        target: Address<RecordId>,
        intervention: Intervention,
    },
    RemoveIntervention {
        strategy: StrategyId,
        target: Address<RecordId>,
    },

    AddScheduleItem {
        strategy: StrategyId,
        id: RecordId,
        item: ScheduleItem,
    },
    UpdateScheduleItem {
        strategy: StrategyId,
        target: Address<RecordId>,
        item: ScheduleItem,
    },
    RemoveScheduleItem {
        strategy: StrategyId,
        target: Address<RecordId>,
    },
    ClearSchedule {
        strategy: StrategyId,
    },

    SaveMetrics {
        key: SelectionKey,
        grid: MetricsGrid,
    },
    RemoveMetrics {
        key: SelectionKey,
    },

    AddRisk {
        strategy: StrategyId,
        id: RecordId,
        risk: RiskOrIssue,
    },
    UpdateRisk {
        strategy: StrategyId,
        target: Address<RecordId>,
        risk: RiskOrIssue,
    },
    RemoveRisk {
        strategy: StrategyId,
        target: Address<RecordId>,
    },

    AddStakeholder {
        id: RecordId,
        stakeholder: Stakeholder,
    },
    UpdateStakeholder {
        target: Address<RecordId>,
        stakeholder: Stakeholder,
    },
    RemoveStakeholder {
        target: Address<RecordId>,
    },
}

impl Action {
    /// Add a strategy under a fresh id
    #[must_use]
    pub fn add_strategy(strategy: Strategy) -> Self {
        Self::AddStrategy {
            id: StrategyId::new(),
            strategy,
        }
    }

    /// Add an intervention under a fresh id
    #[must_use]
    pub fn add_intervention(strategy: StrategyId, intervention: Intervention) -> Self {
        Self::AddIntervention {
            strategy,
            id: RecordId::new(),
            intervention,
        }
    }

    /// Add a schedule item under a fresh id
    #[must_use]
    pub fn add_schedule_item(strategy: StrategyId, item: ScheduleItem) -> Self {
        Self::AddScheduleItem {
            strategy,
            id: RecordId::new(),
            item,
        }
    }

    /// Add a risk or issue under a fresh id
    #[must_use]
    pub fn add_risk(strategy: StrategyId, risk: RiskOrIssue) -> Self {
        Self::AddRisk {
            strategy,
            id: RecordId::new(),
            risk,
        }
    }

    /// Add a stakeholder under a fresh id
    #[must_use]
    pub fn add_stakeholder(stakeholder: Stakeholder) -> Self {
        Self::AddStakeholder {
            id: RecordId::new(),
            stakeholder,
        }
    }

    /// Short name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddStrategy { .. } => "add_strategy",
            Action::UpdateStrategy { .. } => "update_strategy",
            Action::RemoveStrategy { .. } => "remove_strategy",
            Action::AddIntervention { .. } => "add_intervention",
            Action::UpdateIntervention { .. } => "update_intervention",
            Action::RemoveIntervention { .. } => "remove_intervention",
            Action::AddScheduleItem { .. } => "add_schedule_item",
            Action::UpdateScheduleItem { .. } => "update_schedule_item",
            Action::RemoveScheduleItem { .. } => "remove_schedule_item",
            Action::ClearSchedule { .. } => "clear_schedule",
            Action::SaveMetrics { .. } => "save_metrics",
            Action::RemoveMetrics { .. } => "remove_metrics",
            Action::AddRisk { .. } => "add_risk",
            Action::UpdateRisk { .. } => "update_risk",
            Action::RemoveRisk { .. } => "remove_risk",
            Action::AddStakeholder { .. } => "add_stakeholder",
            Action::UpdateStakeholder { .. } => "update_stakeholder",
            Action::RemoveStakeholder { .. } => "remove_stakeholder",
        }
    }

    /// Check if the action changes the metrics blob
    #[inline]
    #[must_use]
    pub fn touches_metrics(&self) -> bool {
        matches!(
            self,
            Action::SaveMetrics { .. } | Action::RemoveMetrics { .. } | Action::RemoveStrategy { .. }
        )
    }
}
