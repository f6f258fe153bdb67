//! Error types for the data model
//!
//! Model errors only ever describe a single record: a required field left
//! blank, a date that does not parse, an enumeration label that is not known,
//! or a grid coordinate outside the grid.

/// Data model error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A required form field was empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A date field did not parse
    #[error("invalid date for {field}: {value:?}")]
    InvalidDate {
        /// Field name
        field: &'static str,
        /// Raw input
        value: String,
    },

    /// An enumeration label was not recognized
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant {
        /// Enumeration name
        kind: &'static str,
        /// Raw input
        value: String,
    },

    /// An identifier string did not parse
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    /// A metrics grid column index was outside the grid
    #[error("column {index} out of range ({len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    /// A metrics grid cell was outside the grid
    #[error("cell ({row}, {col}) out of range")]
    CellOutOfRange { row: usize, col: usize },
}

impl ModelError {
    /// Create an unknown-variant error
    #[inline]
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }

    /// Check if error comes from a presence check
    #[inline]
    #[must_use]
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

/// Check a required text field is present
///
/// Whitespace-only input counts as empty.
///
/// # Errors
/// Returns [`ModelError::MissingField`] when `value` is blank
pub fn require(field: &'static str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        Err(ModelError::MissingField(field))
    } else {
        Ok(())
    }
}
