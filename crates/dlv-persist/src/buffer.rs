//! Write buffer
//!
//! Sits between the application and a [`KeyValueStorage`]. Saves are staged
//! per key and committed together:
//! - after `flush_every` staged saves, or on [`WriteBuffer::flush`], or on drop
//! - a payload whose hash equals the last committed one is not written again
//! - a failed write keeps its payload pending for the next flush
//!
//! The in-memory state stays authoritative; the buffer only decides when
//! storage catches up.

use crate::error::PersistError;
use crate::hash::PayloadHash;
use crate::storage::KeyValueStorage;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error, info};

/// What happened to a staged save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Payload matches what storage already holds
    Unchanged,
    /// Waiting for the next flush
    Pending,
    /// Written as part of an automatic flush
    Flushed,
}

/// Result of a successful flush
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushResult {
    /// Keys written
    pub committed: usize,
}

/// Buffered writer over a storage backend
#[derive(Debug)]
pub struct WriteBuffer<S: KeyValueStorage> {
    storage: S,
    flush_every: usize,
    pending: IndexMap<String, String>,
    committed: HashMap<String, PayloadHash>,
    staged_since_flush: usize,
}

impl<S: KeyValueStorage> WriteBuffer<S> {
    /// Wrap a backend; `flush_every` of 0 or 1 writes through
    pub fn new(storage: S, flush_every: usize) -> Self {
        Self {
            storage,
            flush_every: flush_every.max(1),
            pending: IndexMap::new(),
            committed: HashMap::new(),
            staged_since_flush: 0,
        }
    }

    /// Backend
    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Keys waiting to be written, oldest first
    pub fn pending_keys(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }

    /// Check if anything is waiting to be written
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Read through the buffer: a pending payload wins over storage
    ///
    /// A value read from storage is remembered as committed so that saving
    /// it back unchanged costs nothing.
    ///
    /// # Errors
    /// Returns the backend's read error
    pub fn read(&mut self, key: &str) -> Result<Option<String>, PersistError> {
        if let Some(value) = self.pending.get(key) {
            return Ok(Some(value.clone()));
        }
        let value = self.storage.get(key)?;
        if let Some(v) = &value {
            self.committed
                .insert(key.to_string(), PayloadHash::compute(v));
        }
        Ok(value)
    }

    /// Stage a payload for a key
    ///
    /// # Errors
    /// Returns the write error when the save triggers a flush that fails;
    /// the payload then stays pending
    pub fn stage(&mut self, key: &str, payload: String) -> Result<StageOutcome, PersistError> {
        self.stage_all([(key, payload)])
    }

    /// Stage several payloads, then flush at most once
    ///
    /// Every payload is queued before any write happens, so a failed write
    /// leaves all of them pending together.
    ///
    /// # Errors
    /// Returns the write error when the batch triggers a flush that fails
    pub fn stage_all<'k, I>(&mut self, entries: I) -> Result<StageOutcome, PersistError>
    where
        I: IntoIterator<Item = (&'k str, String)>,
    {
        let mut queued = false;
        for (key, payload) in entries {
            queued |= self.queue(key, payload);
        }
        if !queued {
            return Ok(StageOutcome::Unchanged);
        }
        if self.staged_since_flush >= self.flush_every {
            self.flush()?;
            return Ok(StageOutcome::Flushed);
        }
        Ok(StageOutcome::Pending)
    }

    fn queue(&mut self, key: &str, payload: String) -> bool {
        let hash = PayloadHash::compute(&payload);
        if self.committed.get(key) == Some(&hash) {
            self.pending.shift_remove(key);
            debug!(key, hash = %hash.short(), "payload unchanged, write skipped");
            return false;
        }
        self.pending.insert(key.to_string(), payload);
        self.staged_since_flush += 1;
        true
    }

    /// Write every pending payload
    ///
    /// Stops at the first failure; that payload and the ones after it stay
    /// pending.
    ///
    /// # Errors
    /// Returns the first write error
    pub fn flush(&mut self) -> Result<FlushResult, PersistError> {
        let mut committed = 0;
        while let Some((key, payload)) = self.pending.first() {
            let hash = PayloadHash::compute(payload);
            if let Err(e) = self.storage.set(key, payload) {
                error!(key = %key, error = %e, pending = self.pending.len(), "write failed");
                return Err(e);
            }
            info!(key = %key, hash = %hash.short(), bytes = payload.len(), "persisted");
            self.committed.insert(key.clone(), hash);
            self.pending.shift_remove_index(0);
            committed += 1;
        }
        self.staged_since_flush = 0;
        Ok(FlushResult { committed })
    }
}

impl<S: KeyValueStorage> Drop for WriteBuffer<S> {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if let Err(e) = self.flush() {
            error!(error = %e, lost = self.pending.len(), "pending writes dropped");
        }
    }
}
