//! View transforms over seeded plans

use dlv_model::{ScheduleStatus, SelectionKey};
use dlv_store::{reduce, Action};
use dlv_test_utils::*;
use dlv_views::{chart, layout, layout_by_days, schedule_by_start_date, short_date};

#[test]
fn gantt_for_selected_strategy_only() {
    let seeded = seeded_plan();
    let state = reduce(
        &seeded.state,
        Action::add_schedule_item(
            seeded.second,
            sample_schedule_item("Other", date(2025, 1, 1), date(2025, 6, 1), ScheduleStatus::Completed),
        ),
    )
    .unwrap();

    let first = layout(&state.schedule_for(seeded.first), 600.0);
    assert_eq!(first.bars.len(), 1);
    assert_eq!(first.bars[0].title, "Kick-off");
    assert!((first.bars[0].width - 600.0).abs() < 1e-9);

    let days = layout_by_days(&state.schedule_for(seeded.first), 10.0);
    assert!((days.bars[0].width - 100.0).abs() < 1e-9);
}

#[test]
fn chart_for_saved_grid() {
    let seeded = seeded_plan();
    let grid = seeded
        .state
        .metrics_for(&SelectionKey::from(seeded.first))
        .unwrap();
    let data = chart(grid);
    assert_eq!(data.labels.len(), 3);
    assert!(data.labels.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn schedule_rows_render_short_dates() {
    let seeded = seeded_plan();
    let schedule = seeded.state.schedule_for(seeded.first);
    let rows = schedule_by_start_date(&schedule);
    assert_eq!(short_date(rows[0].value.start_date), "01-01");
}
