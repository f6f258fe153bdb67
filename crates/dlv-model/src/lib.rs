//! Delivery Tool data model
//!
//! The typed vocabulary shared by every other crate in the workspace:
//! - Stable record identifiers ([`StrategyId`], [`RecordId`])
//! - Plan entities (strategies, interventions, schedule items, risks, stakeholders)
//! - Form drafts with presence-only validation
//! - The free-form [`MetricsGrid`]
//! - [`PlannerConfig`] loaded from TOML
//!
//! # Example
//!
//! ```rust
//! use dlv_model::{StrategyDraft, ScheduleStatus};
//!
//! let draft = StrategyDraft {
//!     title: "Reduce waiting lists".into(),
//!     description: "Shift outpatient capacity".into(),
//!     owner: "Ops".into(),
//!     reference_info: "board paper 12".into(),
//! };
//! let strategy = draft.build().unwrap();
//! assert_eq!(strategy.title, "Reduce waiting lists");
//! assert_eq!(ScheduleStatus::default().label(), "Not started");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod draft;
pub mod entities;
pub mod error;
pub mod ids;
pub mod metrics;

// Re-exports for convenience
pub use config::{ConfigError, DeletePolicy, LogConfig, PlannerConfig, StorageConfig};
pub use draft::{
    InterventionDraft, RiskDraft, ScheduleDraft, StakeholderDraft, StrategyDraft,
};
pub use entities::{
    parse_iso_date, ContactMethod, Intervention, Rating, RiskKind, RiskOrIssue, ScheduleItem,
    ScheduleStatus, Stakeholder, Strategy,
};
pub use error::ModelError;
pub use ids::{RecordId, RecordKey, SelectionKey, StrategyId};
pub use metrics::{mask_date_input, MetricsGrid, DEFAULT_COLUMNS, DEFAULT_ROW_COUNT, TIME_COLUMN};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
