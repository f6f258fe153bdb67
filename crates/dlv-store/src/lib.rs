//! Delivery Tool plan state
//!
//! All application data lives in one [`PlanState`] value:
//! - [`Collection`]: insertion-ordered records with stable keys
//! - [`Action`]: every supported state transition
//! - [`reduce`]: pure `(state, action) -> state` function
//! - [`PlanStore`]: holds the current state and dispatches actions
//!
//! Child records (interventions, schedule items, risks) are grouped by the
//! [`dlv_model::StrategyId`] of their parent. What happens to them when the
//! parent is removed is governed by [`dlv_model::DeletePolicy`].
//!
//! # Example
//!
//! ```rust
//! use dlv_model::Strategy;
//! use dlv_store::{Action, PlanStore};
//!
//! let mut store = PlanStore::new();
//! store
//!     .dispatch(Action::add_strategy(Strategy {
//!         title: "Reduce waiting lists".into(),
//!         description: "Shift outpatient capacity".into(),
//!         owner: "Ops".into(),
//!         reference_info: String::new(),
//!     }))
//!     .unwrap();
//! assert_eq!(store.state().strategies.len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod action;
pub mod collection;
pub mod error;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::Action;
pub use collection::{Address, Collection, Record};
pub use error::StoreError;
pub use reducer::{reduce, reduce_all};
pub use state::{ByStrategy, PlanState};
pub use store::PlanStore;
