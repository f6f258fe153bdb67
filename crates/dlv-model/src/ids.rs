//! Stable record identifiers
//!
//! Every record gets a ULID on insert, so that removing or re-sorting rows
//! never changes which record an id points at.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Key type usable by a record collection
pub trait RecordKey: Copy + Eq + Ord + fmt::Debug + fmt::Display {
    /// Generate a fresh key
    fn generate() -> Self;
}

/// Unique strategy identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyId(pub Ulid);

impl StrategyId {
    /// Generate new strategy ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for StrategyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StrategyId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s.trim())
            .map(Self)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl RecordKey for StrategyId {
    fn generate() -> Self {
        Self::new()
    }
}

/// Unique identifier for interventions, schedule items, risks and stakeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Ulid);

impl RecordId {
    /// Generate new record ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s.trim())
            .map(Self)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl RecordKey for RecordId {
    fn generate() -> Self {
        Self::new()
    }
}

/// Key under which a metrics grid is saved
///
/// Usually a strategy id, but any non-empty label is accepted so grids can be
/// kept per intervention as well.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionKey(String);

impl SelectionKey {
    /// Create key from a label
    ///
    /// # Errors
    /// Returns [`ModelError::MissingField`] for a blank label
    pub fn new(label: impl Into<String>) -> Result<Self, ModelError> {
        let label = label.into();
        crate::error::require("selection", &label)?;
        Ok(Self(label.trim().to_string()))
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<StrategyId> for SelectionKey {
    fn from(id: StrategyId) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
