//! In-process slot backend.
//!
//! Used in tests, and by anything that wants the desk without a database.
//! Reads and writes can be made to fail on demand.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{check_quota, SlotStore};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Inner {
    slots: HashMap<String, String>,
    fail_reads: bool,
    reject_writes: bool,
    writes: usize,
}

/// A [`SlotStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemorySlots {
    inner: Mutex<Inner>,
    quota: Option<usize>,
}

impl MemorySlots {
    /// Create an empty, unlimited store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit each slot to `quota` bytes of key plus value.
    #[must_use]
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    /// Store a payload verbatim, bypassing quota and failure switches.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock_unchecked()
            .slots
            .insert(key.to_string(), value.to_string());
    }

    /// The payload under `key`, verbatim.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock_unchecked().slots.get(key).cloned()
    }

    /// Make every read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.lock_unchecked().fail_reads = fail;
    }

    /// Make every write fail.
    pub fn reject_writes(&self, reject: bool) {
        self.lock_unchecked().reject_writes = reject;
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock_unchecked().writes
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::internal("memory slot store lock poisoned"))
    }

    // Test helpers never fail; a poisoned lock still holds usable data.
    fn lock_unchecked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SlotStore for MemorySlots {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(Error::internal(format!("read of slot '{key}' failed")));
        }
        Ok(inner.slots.get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.reject_writes {
            return Err(Error::write_rejected(key, "writes are disabled"));
        }
        check_quota(key, value, self.quota)?;
        inner.slots.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_slot() {
        let slots = MemorySlots::new();
        assert_eq!(slots.read_slot("complaints").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let slots = MemorySlots::new();
        slots.write_slot("complaints", "[]").unwrap();
        assert_eq!(slots.read_slot("complaints").unwrap().as_deref(), Some("[]"));
        assert_eq!(slots.write_count(), 1);
    }

    #[test]
    fn test_write_overwrites() {
        let slots = MemorySlots::new();
        slots.write_slot("k", "one").unwrap();
        slots.write_slot("k", "two").unwrap();
        assert_eq!(slots.raw("k").as_deref(), Some("two"));
    }

    #[test]
    fn test_quota_blocks_large_writes() {
        let slots = MemorySlots::new().with_quota(Some(8));
        slots.write_slot("k", "short").unwrap();

        let err = slots.write_slot("k", "much too long").unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { .. }));
        assert_eq!(slots.raw("k").as_deref(), Some("short"));
    }

    #[test]
    fn test_reject_writes_switch() {
        let slots = MemorySlots::new();
        slots.reject_writes(true);
        assert!(slots.write_slot("k", "v").unwrap_err().is_storage_error());

        slots.reject_writes(false);
        assert!(slots.write_slot("k", "v").is_ok());
    }

    #[test]
    fn test_fail_reads_switch() {
        let slots = MemorySlots::new();
        slots.insert_raw("k", "v");
        slots.fail_reads(true);
        assert!(slots.read_slot("k").is_err());
    }
}
