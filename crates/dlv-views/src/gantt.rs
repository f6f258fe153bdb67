//! Schedule layout
//!
//! Turns a strategy's schedule items into horizontal bars. Two layouts are
//! available:
//! - [`layout`] scales the whole schedule into a fixed `display_scale`
//! - [`layout_by_days`] gives every day a fixed pixel width
//!
//! Both guarantee `width >= 0`, `offset >= 0` and, for [`layout`],
//! `offset + width <= display_scale`.

use chrono::NaiveDate;
use dlv_model::{RecordId, ScheduleItem, ScheduleStatus};
use dlv_store::Collection;
use serde::Serialize;

/// One positioned bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttBar {
    pub id: RecordId,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ScheduleStatus,
    /// Distance from the left edge
    pub offset: f64,
    pub width: f64,
    /// CSS color for the status
    pub color: &'static str,
}

/// Bars for one schedule, ordered by start date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttLayout {
    /// Earliest start across all items
    pub start: Option<NaiveDate>,
    /// Latest end across all items
    pub end: Option<NaiveDate>,
    /// Days between `start` and `end`; zero when there is nothing to scale
    pub range_days: i64,
    /// Total drawable width
    pub scale: f64,
    pub bars: Vec<GanttBar>,
}

impl GanttLayout {
    /// Check if there are no bars
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn bounds(items: &Collection<RecordId, ScheduleItem>) -> Option<(NaiveDate, NaiveDate)> {
    let start = items.values().map(|i| i.start_date).min()?;
    let end = items.values().map(|i| i.end_date).max()?;
    Some((start, end))
}

#[allow(clippy::cast_precision_loss)]
fn days_f64(days: i64) -> f64 {
    days as f64
}

fn bar(id: RecordId, item: &ScheduleItem, offset: f64, width: f64) -> GanttBar {
    GanttBar {
        id,
        title: item.title.clone(),
        start_date: item.start_date,
        end_date: item.end_date,
        status: item.status,
        offset,
        width,
        color: item.status.color(),
    }
}

/// Scale a schedule into `display_scale` units
///
/// With no items, or when every item collapses into a zero-day range, each
/// bar gets zero width and offset. Items whose end precedes their start get
/// a zero-width bar at their start offset.
#[must_use]
pub fn layout(items: &Collection<RecordId, ScheduleItem>, display_scale: f64) -> GanttLayout {
    let scale = if display_scale.is_finite() {
        display_scale.max(0.0)
    } else {
        0.0
    };
    let bounds = bounds(items);
    let range_days = bounds.map_or(0, |(start, end)| (end - start).num_days().max(0));

    let bars = items
        .sorted_by_key(|i| i.start_date)
        .into_iter()
        .map(|record| {
            let item = &record.value;
            let (offset, width) = match bounds {
                Some((min, _)) if range_days > 0 => {
                    let range = days_f64(range_days);
                    let offset = days_f64((item.start_date - min).num_days()) / range * scale;
                    let offset = offset.clamp(0.0, scale);
                    let width = days_f64(item.duration_days().max(0)) / range * scale;
                    (offset, width.clamp(0.0, scale - offset))
                }
                _ => (0.0, 0.0),
            };
            bar(record.id, item, offset, width)
        })
        .collect();

    GanttLayout {
        start: bounds.map(|(s, _)| s),
        end: bounds.map(|(_, e)| e),
        range_days,
        scale,
        bars,
    }
}

/// Give every day `px_per_day` units, starting at the earliest start
#[must_use]
pub fn layout_by_days(items: &Collection<RecordId, ScheduleItem>, px_per_day: f64) -> GanttLayout {
    let px = if px_per_day.is_finite() {
        px_per_day.max(0.0)
    } else {
        0.0
    };
    let bounds = bounds(items);
    let range_days = bounds.map_or(0, |(start, end)| (end - start).num_days().max(0));

    let bars = items
        .sorted_by_key(|i| i.start_date)
        .into_iter()
        .map(|record| {
            let item = &record.value;
            let offset = bounds.map_or(0.0, |(min, _)| {
                days_f64((item.start_date - min).num_days()) * px
            });
            let width = days_f64(item.duration_days().max(0)) * px;
            bar(record.id, item, offset, width)
        })
        .collect();

    GanttLayout {
        start: bounds.map(|(s, _)| s),
        end: bounds.map(|(_, e)| e),
        range_days,
        scale: days_f64(range_days) * px,
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlv_test_utils::{date, sample_schedule_item};
    use proptest::prelude::*;

    fn schedule(spans: &[(NaiveDate, NaiveDate)]) -> Collection<RecordId, ScheduleItem> {
        spans
            .iter()
            .enumerate()
            .map(|(i, (s, e))| {
                sample_schedule_item(&format!("item {i}"), *s, *e, ScheduleStatus::default())
            })
            .collect()
    }

    #[test]
    fn empty_schedule_has_no_bars() {
        let out = layout(&Collection::new(), 600.0);
        assert!(out.is_empty());
        assert_eq!(out.range_days, 0);
        assert_eq!(out.start, None);
    }

    #[test]
    fn zero_range_gives_zero_bars() {
        let d = date(2024, 1, 1);
        let out = layout(&schedule(&[(d, d), (d, d)]), 600.0);
        assert!(out.bars.iter().all(|b| b.width == 0.0 && b.offset == 0.0));
    }

    #[test]
    fn bars_scale_into_display_width() {
        let items = schedule(&[
            (date(2024, 1, 1), date(2024, 1, 11)),
            (date(2024, 1, 11), date(2024, 1, 21)),
        ]);
        let out = layout(&items, 600.0);
        assert_eq!(out.range_days, 20);
        assert!((out.bars[0].offset - 0.0).abs() < 1e-9);
        assert!((out.bars[0].width - 300.0).abs() < 1e-9);
        assert!((out.bars[1].offset - 300.0).abs() < 1e-9);
        assert!((out.bars[1].width - 300.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_item_gets_zero_width_at_its_start() {
        let items = schedule(&[
            (date(2024, 1, 1), date(2024, 1, 11)),
            (date(2024, 1, 6), date(2024, 1, 2)),
        ]);
        let out = layout(&items, 100.0);
        let reversed = &out.bars[1];
        assert_eq!(reversed.width, 0.0);
        assert!((reversed.offset - 50.0).abs() < 1e-9);
    }

    #[test]
    fn bars_follow_start_date_and_carry_status_color() {
        let items: Collection<RecordId, ScheduleItem> = [
            sample_schedule_item("late", date(2024, 3, 1), date(2024, 3, 2), ScheduleStatus::Completed),
            sample_schedule_item("early", date(2024, 1, 1), date(2024, 1, 2), ScheduleStatus::ForReview),
        ]
        .into_iter()
        .collect();
        let out = layout(&items, 600.0);
        assert_eq!(out.bars[0].title, "early");
        assert_eq!(out.bars[0].color, ScheduleStatus::ForReview.color());
    }

    #[test]
    fn day_layout_uses_fixed_pixels() {
        let items = schedule(&[
            (date(2024, 1, 1), date(2024, 1, 4)),
            (date(2024, 1, 3), date(2024, 1, 8)),
        ]);
        let out = layout_by_days(&items, 10.0);
        assert!((out.bars[0].width - 30.0).abs() < 1e-9);
        assert!((out.bars[1].offset - 20.0).abs() < 1e-9);
        assert!((out.bars[1].width - 50.0).abs() < 1e-9);
        assert!((out.scale - 70.0).abs() < 1e-9);
    }

    fn arb_item() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
        (0i64..400, -30i64..120).prop_map(|(start, len)| {
            let base = date(2023, 1, 1);
            let s = base + chrono::Duration::days(start);
            (s, s + chrono::Duration::days(len))
        })
    }

    proptest! {
        #[test]
        fn prop_bars_stay_inside_scale(
            spans in proptest::collection::vec(arb_item(), 0..20),
            scale in 0.0f64..2000.0,
        ) {
            let out = layout(&schedule(&spans), scale);
            for b in &out.bars {
                prop_assert!(b.width >= 0.0);
                prop_assert!(b.offset >= 0.0);
                prop_assert!(b.offset + b.width <= scale + 1e-9);
            }
        }

        #[test]
        fn prop_bars_sorted_by_start(spans in proptest::collection::vec(arb_item(), 0..20)) {
            let out = layout(&schedule(&spans), 600.0);
            prop_assert!(out.bars.windows(2).all(|w| w[0].start_date <= w[1].start_date));
        }
    }
}
