//! Storage layer for complaintdesk.
//!
//! Complaints live in a single named slot of an origin-scoped key/value store,
//! serialized as one JSON array. Every append rewrites the whole slot.
//!
//! Two layers:
//!
//! - [`SlotStore`] is the raw key/value backend: [`SqliteSlots`] on disk,
//!   [`MemorySlots`] in process.
//! - [`RecordStore`] is what the desk talks to. [`SlotRecordStore`] adapts any
//!   slot backend to it.

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::complaint::ComplaintRecord;
use crate::error::{Error, Result};

pub use memory::MemorySlots;
pub use sqlite::{SlotInfo, SqliteSlots};

/// Slot the complaint collection is kept under unless configured otherwise.
pub const DEFAULT_SLOT_KEY: &str = "complaints";

/// A key/value backend holding whole serialized payloads.
///
/// There is no locking or versioning: the last writer wins.
pub trait SlotStore {
    /// Read the payload stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write, e.g. when the value
    /// exceeds the storage quota.
    fn write_slot(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: SlotStore + ?Sized> SlotStore for Arc<T> {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        (**self).write_slot(key, value)
    }
}

/// The outcome of [`RecordStore::append`].
///
/// `records` is always the new collection, whether or not it reached the
/// backend.
#[derive(Debug)]
pub struct Appended {
    /// The collection with the new record at the end.
    pub records: Vec<ComplaintRecord>,
    /// Whether the full collection was written to the backend.
    pub persisted: Result<()>,
}

impl Appended {
    /// Whether the write reached the backend.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Persistence collaborator of the complaint desk.
pub trait RecordStore {
    /// Read the persisted collection.
    ///
    /// Never fails: a missing, unreadable or malformed payload yields an empty
    /// collection.
    fn load(&self) -> Vec<ComplaintRecord>;

    /// Append `record` to `current` and persist the whole result.
    fn append(&self, current: &[ComplaintRecord], record: ComplaintRecord) -> Appended;
}

/// A [`RecordStore`] keeping the collection in one slot of a [`SlotStore`].
#[derive(Debug)]
pub struct SlotRecordStore<B> {
    backend: B,
    key: String,
}

impl<B: SlotStore> SlotRecordStore<B> {
    /// Use `backend` under the default slot key.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_SLOT_KEY)
    }

    /// Use `backend` under a custom slot key.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<B: SlotStore> RecordStore for SlotRecordStore<B> {
    fn load(&self) -> Vec<ComplaintRecord> {
        let payload = match self.backend.read_slot(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(key = %self.key, "Slot is empty, starting with no complaints");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read slot, starting with no complaints");
                return Vec::new();
            }
        };

        match decode_records(&payload) {
            Ok(records) => {
                debug!(key = %self.key, count = records.len(), "Loaded complaints");
                records
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring unreadable complaint payload");
                Vec::new()
            }
        }
    }

    fn append(&self, current: &[ComplaintRecord], record: ComplaintRecord) -> Appended {
        let mut records = Vec::with_capacity(current.len() + 1);
        records.extend_from_slice(current);
        records.push(record);

        let persisted = encode_records(&records)
            .and_then(|payload| self.backend.write_slot(&self.key, &payload));

        match &persisted {
            Ok(()) => debug!(key = %self.key, count = records.len(), "Rewrote complaint slot"),
            Err(e) => warn!(
                key = %self.key,
                count = records.len(),
                error = %e,
                "Complaint slot write failed; the new complaint is only held in memory"
            ),
        }

        Appended { records, persisted }
    }
}

/// Parse a slot payload. JSON `null` counts as an empty collection.
///
/// # Errors
///
/// Returns an error if the payload is not a JSON array of complaint records.
pub fn decode_records(payload: &str) -> Result<Vec<ComplaintRecord>> {
    let records: Option<Vec<ComplaintRecord>> = serde_json::from_str(payload)?;
    Ok(records.unwrap_or_default())
}

/// Serialize a collection into a slot payload.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_records(records: &[ComplaintRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// Refuse a write whose key and value together exceed `quota` bytes.
pub(crate) fn check_quota(key: &str, value: &str, quota: Option<usize>) -> Result<()> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let size = key.len() + value.len();
    if size > quota {
        return Err(Error::QuotaExceeded {
            key: key.to_string(),
            size,
            quota,
        });
    }
    Ok(())
}
