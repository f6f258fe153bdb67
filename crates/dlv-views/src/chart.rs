//! Metrics chart data
//!
//! Rows of a [`MetricsGrid`] become one line series per value column. The
//! time column holds `dd-mm-yyyy` text; every column after it holds values.
//! Bad input degrades quietly: an unparseable date keeps the row out of the
//! series, a non-numeric cell becomes a gap.

use chrono::NaiveDate;
use dlv_model::{MetricsGrid, TIME_COLUMN};
use serde::Serialize;
use tracing::warn;

/// Date format of the time column
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// One x/y point; `value` is `None` for a gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A labelled line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub points: Vec<ChartPoint>,
}

/// Everything needed to draw the chart
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartData {
    /// x-axis dates, ascending
    pub labels: Vec<NaiveDate>,
    pub series: Vec<Series>,
    /// Smallest numeric cell, if any
    pub y_min: Option<f64>,
    /// Largest numeric cell, if any
    pub y_max: Option<f64>,
    /// Rows left out because their date did not parse
    pub undated_rows: usize,
}

/// Parse a `dd-mm-yyyy` cell
#[must_use]
pub fn parse_metric_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Parse the longest numeric prefix of a cell (`"12kg"` is 12)
#[must_use]
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Line color for the `index`-th series
#[must_use]
pub fn series_color(index: usize) -> String {
    format!("hsl({}, 70%, 50%)", (index * 60) % 360)
}

/// Rows ordered by their time cell
///
/// The sort is stable. Rows whose date does not parse go last, in grid
/// order.
#[must_use]
pub fn sort_rows_by_date(rows: &[Vec<String>]) -> Vec<&Vec<String>> {
    let mut out: Vec<&Vec<String>> = rows.iter().collect();
    out.sort_by_key(|row| {
        let date = row.get(TIME_COLUMN).and_then(|c| parse_metric_date(c));
        (date.is_none(), date)
    });
    out
}

/// Build chart data for a grid
#[must_use]
pub fn chart(grid: &MetricsGrid) -> ChartData {
    let value_columns: Vec<(usize, &String)> = grid
        .columns()
        .iter()
        .enumerate()
        .skip(TIME_COLUMN + 1)
        .collect();

    let sorted = sort_rows_by_date(grid.rows());
    let mut labels = Vec::new();
    let mut series: Vec<Series> = value_columns
        .iter()
        .enumerate()
        .map(|(i, (_, title))| Series {
            label: (*title).clone(),
            color: series_color(i),
            points: Vec::new(),
        })
        .collect();
    let mut y_min: Option<f64> = None;
    let mut y_max: Option<f64> = None;
    let mut undated_rows = 0;

    for row in sorted {
        for (col, _) in &value_columns {
            if let Some(v) = row.get(*col).and_then(|c| parse_leading_number(c)) {
                y_min = Some(y_min.map_or(v, |m| m.min(v)));
                y_max = Some(y_max.map_or(v, |m| m.max(v)));
            }
        }

        let Some(date) = row.get(TIME_COLUMN).and_then(|c| parse_metric_date(c)) else {
            undated_rows += 1;
            continue;
        };
        labels.push(date);
        for (line, (col, _)) in series.iter_mut().zip(&value_columns) {
            line.points.push(ChartPoint {
                date,
                value: row.get(*col).and_then(|c| parse_leading_number(c)),
            });
        }
    }

    if undated_rows > 0 {
        warn!(undated_rows, "metric rows without a valid dd-mm-yyyy date left out of chart");
    }

    ChartData {
        labels,
        series,
        y_min,
        y_max,
        undated_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlv_test_utils::{row, sample_grid};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn leading_number_prefix() {
        assert_eq!(parse_leading_number("12kg"), Some(12.0));
        assert_eq!(parse_leading_number("  -3.5 units"), Some(-3.5));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("7."), Some(7.0));
        assert_eq!(parse_leading_number("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_number("2e"), Some(2.0));
        assert_eq!(parse_leading_number("0"), Some(0.0));
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn metric_dates() {
        assert_eq!(
            parse_metric_date("05-02-2024"),
            NaiveDate::from_ymd_opt(2024, 2, 5)
        );
        assert_eq!(parse_metric_date("31-02-2024"), None);
        assert_eq!(parse_metric_date("2024-02-05"), None);
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), "hsl(0, 70%, 50%)");
        assert_eq!(series_color(1), "hsl(60, 70%, 50%)");
        assert_eq!(series_color(6), "hsl(0, 70%, 50%)");
    }

    #[test]
    fn chart_sorts_and_degrades() {
        let data = chart(&sample_grid());
        assert_eq!(
            data.labels,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ]
        );
        assert_eq!(data.series.len(), 3);
        let first: Vec<Option<f64>> = data.series[0].points.iter().map(|p| p.value).collect();
        assert_eq!(first, vec![Some(150.0), None, Some(120.0)]);
        assert_eq!(data.series[0].label, "Baseline");
        assert_eq!(data.y_min, Some(80.0));
        assert_eq!(data.y_max, Some(150.0));
    }

    #[test]
    fn undated_rows_are_counted_not_plotted() {
        let grid = MetricsGrid::from_parts(
            vec!["Description".into(), "Time".into(), "Value".into()],
            vec![row(&["a", "soon", "5"]), row(&["b", "01-01-2024", "2"])],
        );
        let data = chart(&grid);
        assert_eq!(data.undated_rows, 1);
        assert_eq!(data.series[0].points.len(), 1);
        assert_eq!(data.y_max, Some(5.0));
    }

    #[test]
    fn no_numbers_means_no_bounds() {
        let grid = MetricsGrid::new();
        let data = chart(&grid);
        assert_eq!(data.y_min, None);
        assert_eq!(data.y_max, None);
    }

    fn arb_cell() -> impl Strategy<Value = String> {
        prop_oneof![
            (1u32..29, 1u32..13, 2020i32..2026)
                .prop_map(|(d, m, y)| format!("{d:02}-{m:02}-{y}")),
            "[a-z]{0,4}",
        ]
    }

    proptest! {
        #[test]
        fn prop_sort_is_monotonic_and_stable(cells in proptest::collection::vec(arb_cell(), 0..25)) {
            let rows: Vec<Vec<String>> = cells
                .iter()
                .enumerate()
                .map(|(i, c)| vec![i.to_string(), c.clone()])
                .collect();
            let sorted = sort_rows_by_date(&rows);
            let keys: Vec<(bool, Option<NaiveDate>, usize)> = sorted
                .iter()
                .map(|r| {
                    let d = parse_metric_date(&r[1]);
                    (d.is_none(), d, r[0].parse::<usize>().unwrap())
                })
                .collect();
            prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
