//! Delivery Tool view transforms
//!
//! Pure functions from plan data to display data. Nothing here mutates
//! state or performs I/O; results are recomputed whenever they are needed.
//!
//! - [`gantt`]: schedule items to positioned bars
//! - [`chart`]: metrics grid to line series
//! - [`listing`]: table ordering and date formatting

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod chart;
pub mod gantt;
pub mod listing;

pub use chart::{
    chart, parse_leading_number, parse_metric_date, series_color, sort_rows_by_date, ChartData,
    ChartPoint, Series,
};
pub use gantt::{layout, layout_by_days, GanttBar, GanttLayout};
pub use listing::{
    displayed_id, interventions_by_end_date, long_date, schedule_by_start_date, short_date,
};
