//! Delivery Tool persistence
//!
//! Mirrors browser local storage with a file-backed key/value store and
//! puts a write buffer in front of it:
//! - [`KeyValueStorage`]: string get/set/remove
//! - [`FileStorage`] / [`MemoryStorage`]: backends
//! - [`WriteBuffer`]: batched writes, skipped when content is unchanged
//! - [`PlanPersistence`]: load and save a [`dlv_store::PlanState`]

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod buffer;
pub mod error;
pub mod hash;
pub mod snapshot;
pub mod storage;

pub use buffer::{FlushResult, StageOutcome, WriteBuffer};
pub use error::PersistError;
pub use hash::PayloadHash;
pub use snapshot::{decode_metrics, encode_metrics, MetricsBlob, PlanPersistence};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
