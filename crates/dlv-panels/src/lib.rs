//! Delivery Tool panels
//!
//! Presentation state for the six planning panels and the two-pane shell
//! around them. Panels own only transient form drafts; every saved record
//! goes through a [`dlv_store::PlanStore`].
//!
//! Rendering produces plain text so the same panels serve the command line
//! and tests.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod form;
pub mod interventions;
pub mod metrics;
pub mod risks;
pub mod schedule;
pub mod shell;
pub mod stakeholders;
pub mod strategy;
pub mod table;

pub use form::{EditSession, Panel};
pub use interventions::InterventionsPanel;
pub use metrics::{render_chart, MetricsPanel};
pub use risks::RisksPanel;
pub use schedule::{render_gantt, SchedulePanel, GANTT_COLUMNS};
pub use shell::{banner, ActiveElement, Shell, NAV_ENTRIES, PLACEHOLDER, TITLE};
pub use stakeholders::StakeholdersPanel;
pub use strategy::StrategyPanel;
pub use table::TextTable;
