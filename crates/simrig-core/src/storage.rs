//! Non-volatile calibration store capability

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Failed to read record {key:?}: {reason}")]
    ReadFailed { key: StorageKey, reason: String },

    #[error("Failed to write record {key:?}: {reason}")]
    WriteFailed { key: StorageKey, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Stable identity of one persisted calibration record.
///
/// `device` identifies the peripheral (the integrator picks the numbering,
/// one id per physical device); `channel` is the axis index within it, in
/// declaration order. The same key always addresses the same record across
/// power cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey {
    pub device: u16,
    pub channel: u8,
}

impl StorageKey {
    pub fn new(device: u16, channel: u8) -> Self {
        Self { device, channel }
    }
}

/// Abstract byte-level persistence for calibration records.
///
/// The store does not interpret record contents; corruption detection is the
/// codec's job via its checksum. `read_bytes` returns `Ok(None)` for a key
/// that has never been written.
pub trait CalibrationStore {
    /// Reads up to `len` bytes for a key, or `None` if never written.
    fn read_bytes(&self, key: StorageKey, len: usize) -> StorageResult<Option<Vec<u8>>>;

    /// Writes the record for a key, replacing any previous contents.
    fn write_bytes(&mut self, key: StorageKey, bytes: &[u8]) -> StorageResult<()>;
}

/// In-memory [`CalibrationStore`] for tests and host-side tooling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: std::collections::HashMap<StorageKey, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail, to exercise error paths.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CalibrationStore for MemoryStore {
    fn read_bytes(&self, key: StorageKey, len: usize) -> StorageResult<Option<Vec<u8>>> {
        Ok(self
            .records
            .get(&key)
            .map(|bytes| bytes.iter().copied().take(len).collect()))
    }

    fn write_bytes(&mut self, key: StorageKey, bytes: &[u8]) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed {
                key,
                reason: "write failure injected".into(),
            });
        }
        self.records.insert(key, bytes.to_vec());
        Ok(())
    }
}
