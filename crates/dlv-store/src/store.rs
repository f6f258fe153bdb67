//! Plan store
//!
//! Owns the current [`PlanState`] and routes actions through [`reduce`].
//! A failed action is logged and leaves the state as it was.

use crate::action::Action;
use crate::collection::Address;
use crate::error::StoreError;
use crate::reducer::reduce;
use crate::state::PlanState;
use dlv_model::{DeletePolicy, StrategyId};
use tracing::{debug, warn};

/// Current plan plus the policy used for strategy removal
#[derive(Debug, Clone, Default)]
pub struct PlanStore {
    state: PlanState,
    policy: DeletePolicy,
    revision: u64,
}

impl PlanStore {
    /// Create store with an empty plan
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store from a loaded plan
    #[must_use]
    pub fn from_state(state: PlanState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Set strategy removal policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: DeletePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current plan
    #[inline]
    #[must_use]
    pub fn state(&self) -> &PlanState {
        &self.state
    }

    /// Removal policy in effect
    #[inline]
    #[must_use]
    pub fn policy(&self) -> DeletePolicy {
        self.policy
    }

    /// Number of successful dispatches so far
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an action and keep the result
    ///
    /// # Errors
    /// Returns the reducer's error; the state is unchanged in that case
    pub fn dispatch(&mut self, action: Action) -> Result<&PlanState, StoreError> {
        let name = action.name();
        match reduce(&self.state, action) {
            Ok(next) => {
                self.state = next;
                self.revision += 1;
                debug!(action = name, revision = self.revision, "dispatched");
                Ok(&self.state)
            }
            Err(err) => {
                if err.is_no_op() {
                    debug!(action = name, error = %err, "action ignored");
                } else {
                    warn!(action = name, error = %err, "action rejected");
                }
                Err(err)
            }
        }
    }

    /// Remove a strategy using the configured policy
    ///
    /// # Errors
    /// See [`reduce`]
    pub fn remove_strategy(
        &mut self,
        target: Address<StrategyId>,
    ) -> Result<&PlanState, StoreError> {
        let policy = self.policy;
        self.dispatch(Action::RemoveStrategy { target, policy })
    }

    /// Replace the whole plan, e.g. after loading a snapshot
    pub fn replace(&mut self, state: PlanState) {
        self.state = state;
        self.revision += 1;
    }
}
