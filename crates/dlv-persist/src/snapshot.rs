//! Plan snapshots
//!
//! Two keys are used:
//! - `metrics_key` holds every metrics grid as one JSON object keyed by
//!   selection, read once at startup and overwritten on save
//! - `plan_key` holds the rest of the plan
//!
//! Metrics are never duplicated into the plan payload. A metrics blob that
//! cannot be decoded is left in place until a grid is saved; that save
//! first copies the unreadable text to `<metrics_key>.corrupt`.

use crate::buffer::{FlushResult, StageOutcome, WriteBuffer};
use crate::error::PersistError;
use crate::storage::{FileStorage, KeyValueStorage};
use dlv_model::{MetricsGrid, SelectionKey, StorageConfig};
use dlv_store::PlanState;
use im::OrdMap;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Metrics blob as stored: selection key to grid, in key order
pub type MetricsBlob = IndexMap<SelectionKey, MetricsGrid>;

/// Encode grids as the stored metrics blob
///
/// # Errors
/// Returns [`PersistError::Serialization`] when encoding fails
pub fn encode_metrics(metrics: &OrdMap<SelectionKey, MetricsGrid>) -> Result<String, PersistError> {
    let blob: MetricsBlob = metrics
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Ok(serde_json::to_string(&blob)?)
}

/// Decode a stored metrics blob
///
/// # Errors
/// Returns [`PersistError::Corrupt`] when the text is not a metrics blob
pub fn decode_metrics(
    key: &str,
    text: &str,
) -> Result<OrdMap<SelectionKey, MetricsGrid>, PersistError> {
    let blob: MetricsBlob =
        serde_json::from_str(text).map_err(|e| PersistError::corrupt(key, e))?;
    Ok(blob.into_iter().collect())
}

/// Plan persistence over a buffered backend
#[derive(Debug)]
pub struct PlanPersistence<S: KeyValueStorage> {
    buffer: WriteBuffer<S>,
    metrics_key: String,
    plan_key: String,
    unreadable_metrics: Option<String>,
}

impl PlanPersistence<FileStorage> {
    /// Open the file store named by a storage config
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed
    pub fn open(config: &StorageConfig) -> Result<Self, PersistError> {
        let storage = FileStorage::open(&config.path)?;
        Ok(Self::with_storage(storage, config))
    }
}

impl<S: KeyValueStorage> PlanPersistence<S> {
    /// Wrap any backend
    pub fn with_storage(storage: S, config: &StorageConfig) -> Self {
        Self {
            buffer: WriteBuffer::new(storage, config.flush_every as usize),
            metrics_key: config.metrics_key.clone(),
            plan_key: config.plan_key.clone(),
            unreadable_metrics: None,
        }
    }

    /// Underlying write buffer
    #[inline]
    pub fn buffer(&self) -> &WriteBuffer<S> {
        &self.buffer
    }

    /// Load saved metrics grids; missing data is an empty map
    ///
    /// # Errors
    /// Returns a read error or [`PersistError::Corrupt`]
    pub fn load_metrics(&mut self) -> Result<OrdMap<SelectionKey, MetricsGrid>, PersistError> {
        match self.buffer.read(&self.metrics_key)? {
            Some(text) => decode_metrics(&self.metrics_key, &text),
            None => Ok(OrdMap::new()),
        }
    }

    /// Key the unreadable metrics blob is moved to
    #[must_use]
    pub fn corrupt_metrics_key(&self) -> String {
        format!("{}.corrupt", self.metrics_key)
    }

    /// Load the whole plan
    ///
    /// A corrupt metrics blob is logged and loaded as no grids so the rest
    /// of the plan stays usable. The stored text is kept.
    ///
    /// # Errors
    /// Returns a read error or [`PersistError::Corrupt`] for the plan itself
    pub fn load(&mut self) -> Result<PlanState, PersistError> {
        let mut state = match self.buffer.read(&self.plan_key)? {
            Some(text) => serde_json::from_str::<PlanState>(&text)
                .map_err(|e| PersistError::corrupt(&self.plan_key, e))?,
            None => PlanState::new(),
        };
        state.metrics = match self.load_metrics() {
            Ok(metrics) => metrics,
            Err(e @ PersistError::Corrupt { .. }) => {
                warn!(error = %e, "ignoring unreadable metrics");
                self.unreadable_metrics = self.buffer.read(&self.metrics_key)?;
                OrdMap::new()
            }
            Err(e) => return Err(e),
        };
        debug!(
            strategies = state.strategies.len(),
            grids = state.metrics.len(),
            "plan loaded"
        );
        Ok(state)
    }

    // Payloads for the metrics key; none while an unreadable blob is kept
    fn metrics_entries(
        &mut self,
        metrics: &OrdMap<SelectionKey, MetricsGrid>,
    ) -> Result<Vec<(String, String)>, PersistError> {
        if self.unreadable_metrics.is_some() && metrics.is_empty() {
            debug!(key = %self.metrics_key, "keeping unreadable metrics");
            return Ok(Vec::new());
        }
        let mut entries = Vec::with_capacity(2);
        if let Some(raw) = self.unreadable_metrics.take() {
            let aside = self.corrupt_metrics_key();
            warn!(from = %self.metrics_key, to = %aside, "moving unreadable metrics aside");
            entries.push((aside, raw));
        }
        entries.push((self.metrics_key.clone(), encode_metrics(metrics)?));
        Ok(entries)
    }

    fn stage_entries(&mut self, entries: &[(String, String)]) -> Result<StageOutcome, PersistError> {
        self.buffer
            .stage_all(entries.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }

    /// Stage the metrics blob
    ///
    /// # Errors
    /// Returns an error when encoding fails or a triggered flush fails
    pub fn save_metrics(
        &mut self,
        metrics: &OrdMap<SelectionKey, MetricsGrid>,
    ) -> Result<StageOutcome, PersistError> {
        let entries = self.metrics_entries(metrics)?;
        self.stage_entries(&entries)
    }

    /// Stage the whole plan
    ///
    /// Metrics and plan payloads are queued together before any write, so
    /// a failed write keeps both pending.
    ///
    /// # Errors
    /// Returns an error when encoding fails or a triggered flush fails
    pub fn save(&mut self, state: &PlanState) -> Result<StageOutcome, PersistError> {
        let mut entries = self.metrics_entries(&state.metrics)?;
        let plan = PlanState {
            metrics: OrdMap::new(),
            ..state.clone()
        };
        entries.push((self.plan_key.clone(), serde_json::to_string(&plan)?));
        self.stage_entries(&entries)
    }

    /// Write everything pending
    ///
    /// # Errors
    /// Returns the first write error; unwritten payloads stay pending
    pub fn flush(&mut self) -> Result<FlushResult, PersistError> {
        self.buffer.flush()
    }
}
