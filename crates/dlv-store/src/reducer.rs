//! Pure reducer
//!
//! [`reduce`] maps `(state, action)` to a new state. It never touches its
//! input, never generates ids and never performs I/O, so every transition
//! can be replayed and tested in isolation.
//!
//! Failed actions return an error and leave the caller's state untouched.

use crate::action::Action;
use crate::collection::{Address, Collection};
use crate::error::StoreError;
use crate::state::{ByStrategy, PlanState};
use dlv_model::{DeletePolicy, RecordId, SelectionKey, StrategyId};
use tracing::{debug, trace};

/// Apply one action to a state
///
/// # Errors
/// - [`StoreError::StrategyNotFound`] when a child is added under an unknown strategy
/// - [`StoreError::RecordNotFound`] / [`StoreError::IndexOutOfBounds`] for bad addresses
/// - [`StoreError::DeleteBlocked`] when removing a strategy with dependents under
///   [`DeletePolicy::Block`]
pub fn reduce(state: &PlanState, action: Action) -> Result<PlanState, StoreError> {
    let name = action.name();
    let mut next = state.clone();

    match action {
        Action::AddStrategy { id, strategy } => {
            next.strategies.insert_with_id(id, strategy);
        }
        Action::UpdateStrategy { target, strategy } => {
            next.strategies.update(target, strategy)?;
        }
        Action::RemoveStrategy { target, policy } => {
            remove_strategy(&mut next, target, policy)?;
        }

        Action::AddIntervention {
            strategy,
            id,
            intervention,
        } => {
            require_strategy(state, strategy)?;
            add_child(&mut next.interventions, strategy, id, intervention);
        }
        Action::UpdateIntervention {
            strategy,
            target,
            intervention,
        } => {
            update_child(&mut next.interventions, strategy, target, intervention)?;
        }
        Action::RemoveIntervention { strategy, target } => {
            remove_child(&mut next.interventions, strategy, target)?;
        }

        Action::AddScheduleItem { strategy, id, item } => {
            require_strategy(state, strategy)?;
            add_child(&mut next.schedule, strategy, id, item);
        }
        Action::UpdateScheduleItem {
            strategy,
            target,
            item,
        } => {
            update_child(&mut next.schedule, strategy, target, item)?;
        }
        Action::RemoveScheduleItem { strategy, target } => {
            remove_child(&mut next.schedule, strategy, target)?;
        }
        Action::ClearSchedule { strategy } => {
            next.schedule.remove(&strategy);
        }

        Action::SaveMetrics { key, grid } => {
            next.metrics.insert(key, grid);
        }
        Action::RemoveMetrics { key } => {
            next.metrics.remove(&key);
        }

        Action::AddRisk { strategy, id, risk } => {
            require_strategy(state, strategy)?;
            add_child(&mut next.risks, strategy, id, risk);
        }
        Action::UpdateRisk {
            strategy,
            target,
            risk,
        } => {
            update_child(&mut next.risks, strategy, target, risk)?;
        }
        Action::RemoveRisk { strategy, target } => {
            remove_child(&mut next.risks, strategy, target)?;
        }

        Action::AddStakeholder { id, stakeholder } => {
            next.stakeholders.insert_with_id(id, stakeholder);
        }
        Action::UpdateStakeholder {
            target,
            stakeholder,
        } => {
            next.stakeholders.update(target, stakeholder)?;
        }
        Action::RemoveStakeholder { target } => {
            next.stakeholders.remove(target)?;
        }
    }

    trace!(action = name, "reduced");
    Ok(next)
}

/// Apply a sequence of actions, stopping at the first failure
///
/// # Errors
/// Returns the first error; earlier actions are discarded with it
pub fn reduce_all<I>(state: &PlanState, actions: I) -> Result<PlanState, StoreError>
where
    I: IntoIterator<Item = Action>,
{
    actions
        .into_iter()
        .try_fold(state.clone(), |acc, action| reduce(&acc, action))
}

fn require_strategy(state: &PlanState, id: StrategyId) -> Result<(), StoreError> {
    if state.strategies.contains(id) {
        Ok(())
    } else {
        Err(StoreError::StrategyNotFound(id))
    }
}

fn add_child<T: Clone>(map: &mut ByStrategy<T>, strategy: StrategyId, id: RecordId, value: T) {
    let mut children = map.get(&strategy).cloned().unwrap_or_default();
    children.insert_with_id(id, value);
    map.insert(strategy, children);
}

fn update_child<T: Clone>(
    map: &mut ByStrategy<T>,
    strategy: StrategyId,
    target: Address<RecordId>,
    value: T,
) -> Result<(), StoreError> {
    let mut children = map.get(&strategy).cloned().unwrap_or_default();
    children.update(target, value)?;
    map.insert(strategy, children);
    Ok(())
}

fn remove_child<T: Clone>(
    map: &mut ByStrategy<T>,
    strategy: StrategyId,
    target: Address<RecordId>,
) -> Result<(), StoreError> {
    let mut children: Collection<RecordId, T> = map.get(&strategy).cloned().unwrap_or_default();
    children.remove(target)?;
    if children.is_empty() {
        map.remove(&strategy);
    } else {
        map.insert(strategy, children);
    }
    Ok(())
}

fn remove_strategy(
    state: &mut PlanState,
    target: Address<StrategyId>,
    policy: DeletePolicy,
) -> Result<(), StoreError> {
    let index = state.strategies.resolve(target)?;
    let id = state
        .strategies
        .at(index)
        .map(|r| r.id)
        .ok_or(StoreError::IndexOutOfBounds {
            index,
            len: state.strategies.len(),
        })?;
    let dependents = state.dependents_of(id);

    match policy {
        DeletePolicy::Block if dependents > 0 => {
            return Err(StoreError::DeleteBlocked {
                strategy: id,
                dependents,
            });
        }
        DeletePolicy::Cascade => {
            state.interventions.remove(&id);
            state.schedule.remove(&id);
            state.risks.remove(&id);
            state.metrics.remove(&SelectionKey::from(id));
        }
        DeletePolicy::Block | DeletePolicy::Orphan => {}
    }

    state.strategies.remove(Address::Index(index))?;
    debug!(strategy = %id, dependents, ?policy, "strategy removed");
    Ok(())
}
