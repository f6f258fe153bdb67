//! Success metrics grid
//!
//! A small spreadsheet: user-defined column titles and rows of free-text
//! cells. By convention column 0 is a description, column 1 a `dd-mm-yyyy`
//! time reference and every later column a numeric series.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Column titles of a fresh grid
pub const DEFAULT_COLUMNS: [&str; 5] = [
    "Description",
    "Time Reference",
    "Baseline",
    "Expected Impact of Intervention",
    "Actual Performance",
];

/// Number of blank rows in a fresh grid
pub const DEFAULT_ROW_COUNT: usize = 3;

/// Index of the time reference column
pub const TIME_COLUMN: usize = 1;

/// Tabular metrics for one selection
///
/// Every row always has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GridParts")]
pub struct MetricsGrid {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct GridParts {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl From<GridParts> for MetricsGrid {
    fn from(parts: GridParts) -> Self {
        Self::from_parts(parts.columns, parts.rows)
    }
}

impl Default for MetricsGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsGrid {
    /// Grid with the default columns and three blank rows
    #[must_use]
    pub fn new() -> Self {
        let columns: Vec<String> = DEFAULT_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        let rows = vec![vec![String::new(); columns.len()]; DEFAULT_ROW_COUNT];
        Self { columns, rows }
    }

    /// Build a grid from explicit parts, padding or truncating rows to fit
    #[must_use]
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column titles
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows of cells
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Get a cell
    #[inline]
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Append a blank row
    pub fn add_row(&mut self) {
        self.rows.push(vec![String::new(); self.columns.len()]);
    }

    /// Append a column with a blank cell in every row
    ///
    /// A blank title is ignored, as cancelling the title prompt is.
    /// Returns whether a column was added.
    pub fn add_column(&mut self, title: &str) -> bool {
        if title.trim().is_empty() {
            return false;
        }
        self.columns.push(title.trim().to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        true
    }

    /// Remove a column and its cells
    ///
    /// # Errors
    /// Returns [`ModelError::ColumnOutOfRange`] for an unknown column
    pub fn delete_column(&mut self, index: usize) -> Result<String, ModelError> {
        if index >= self.columns.len() {
            return Err(ModelError::ColumnOutOfRange {
                index,
                len: self.columns.len(),
            });
        }
        for row in &mut self.rows {
            row.remove(index);
        }
        Ok(self.columns.remove(index))
    }

    /// Set a cell from user input
    ///
    /// Input into the time reference column goes through [`mask_date_input`].
    ///
    /// # Errors
    /// Returns [`ModelError::CellOutOfRange`] for an unknown cell
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), ModelError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(ModelError::CellOutOfRange { row, col })?;
        *cell = if col == TIME_COLUMN {
            mask_date_input(value)
        } else {
            value.to_string()
        };
        Ok(())
    }

    /// Check if every cell is empty
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(|c| c.trim().is_empty())
    }
}

/// Format typed digits progressively as `dd`, `dd-mm`, `dd-mm-yyyy`
///
/// Non-digits are discarded and at most eight digits are kept.
#[must_use]
pub fn mask_date_input(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).take(8).collect();
    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}-{}", &digits[..2], &digits[2..]),
        _ => format!("{}-{}-{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}
