//! Delivery Tool command line
//!
//! The `dlv` binary replaces the browser surface: every invocation loads the
//! plan from the data file, runs one command through the panels and writes
//! the plan back when it changed.
//!
//! ```text
//! dlv strategy add --title "Reduce waiting lists" --description ... --owner Ops --reference "paper 12"
//! dlv intervention add --strategy '#1' --title Pilot --description ... --owner Ops --end 2024-06-30
//! dlv schedule gantt --strategy '#1'
//! dlv metrics set --selection '#1' --row 1 --column Baseline 120
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod address;
pub mod app;
pub mod cli;
pub mod logging;

pub use address::{parse_target, resolve_row, resolve_selection, resolve_strategy, AddressError, Target};
pub use app::{config_from_matches, App};
pub use cli::command;
