//! Error types for plan state updates

use dlv_model::{ModelError, StrategyId};

/// Store error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Record content failed validation
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Parent strategy does not exist
    #[error("strategy not found: {0}")]
    StrategyNotFound(StrategyId),

    /// No record with this id
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// Positional address past the end of the collection
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Strategy removal refused under the block policy
    #[error("strategy {strategy} still has {dependents} dependent records")]
    DeleteBlocked {
        strategy: StrategyId,
        dependents: usize,
    },
}

impl StoreError {
    /// Check if the error only means "nothing to act on"
    ///
    /// Presentation code treats these as silent no-ops.
    #[inline]
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        matches!(
            self,
            Self::Model(ModelError::MissingField(_))
                | Self::RecordNotFound(_)
                | Self::IndexOutOfBounds { .. }
        )
    }
}
