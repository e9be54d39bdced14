//! Fixed-width calibration record format
//!
//! Calibration survives power cycles as a 14-byte little-endian record:
//!
//! ```text
//! offset  size  field
//!      0     2  magic (0xC41B)
//!      2     1  format version (1)
//!      3     1  flags (bit 0 inverted, bit 1 auto-calibrate)
//!      4     2  min
//!      6     2  max
//!      8     2  deadzone min
//!     10     2  deadzone max
//!     12     2  CRC-16/CCITT-FALSE over bytes 0..12
//! ```
//!
//! The magic plus checksum distinguish a record that was never written
//! (erased storage reads as all-ones or all-zeros) from one that was
//! written and then damaged. Both cases decode to an error so the caller
//! can fall back to defaults, but only the latter is worth logging loudly.

use crate::types::AxisCalibration;
use crate::{CalibrationError, CalibrationResult};

/// Size of an encoded calibration record in bytes.
pub const RECORD_LEN: usize = 14;

const MAGIC: u16 = 0xC41B;
const VERSION: u8 = 1;

const FLAG_INVERTED: u8 = 1 << 0;
const FLAG_AUTO_CALIBRATE: u8 = 1 << 1;

/// A decoded calibration record: the bounds plus the auto-calibration flag
/// that was active when it was saved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRecord {
    pub cal: AxisCalibration,
    pub auto_calibrate: bool,
}

/// Encodes a record into its wire form.
pub fn encode(record: &CalibrationRecord) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];

    buf[0..2].copy_from_slice(&MAGIC.to_le_bytes());
    buf[2] = VERSION;

    let mut flags = 0u8;
    if record.cal.inverted {
        flags |= FLAG_INVERTED;
    }
    if record.auto_calibrate {
        flags |= FLAG_AUTO_CALIBRATE;
    }
    buf[3] = flags;

    buf[4..6].copy_from_slice(&record.cal.min.to_le_bytes());
    buf[6..8].copy_from_slice(&record.cal.max.to_le_bytes());
    buf[8..10].copy_from_slice(&record.cal.deadzone_min.to_le_bytes());
    buf[10..12].copy_from_slice(&record.cal.deadzone_max.to_le_bytes());

    let crc = crc16_ccitt(&buf[0..12]);
    buf[12..14].copy_from_slice(&crc.to_le_bytes());
    buf
}

/// Decodes and validates a record.
///
/// Erased storage (all `0x00` or all `0xFF` bytes) maps to
/// [`CalibrationError::RecordNeverWritten`]; any other checksum or magic
/// failure is [`CalibrationError::RecordCorrupt`]. Decoded bounds go through
/// the same validation as freshly constructed calibrations, so a record from
/// an older buggy writer cannot smuggle in an empty range.
pub fn decode(bytes: &[u8]) -> CalibrationResult<CalibrationRecord> {
    if bytes.len() < RECORD_LEN {
        return Err(CalibrationError::RecordTruncated {
            expected: RECORD_LEN,
            actual: bytes.len(),
        });
    }
    let bytes = &bytes[0..RECORD_LEN];

    if bytes.iter().all(|&b| b == 0x00) || bytes.iter().all(|&b| b == 0xFF) {
        return Err(CalibrationError::RecordNeverWritten);
    }

    let magic = u16::from_le_bytes([bytes[0], bytes[1]]);
    if magic != MAGIC {
        return Err(CalibrationError::RecordCorrupt {
            expected: MAGIC,
            actual: magic,
        });
    }

    let expected_crc = crc16_ccitt(&bytes[0..12]);
    let actual_crc = u16::from_le_bytes([bytes[12], bytes[13]]);
    if actual_crc != expected_crc {
        return Err(CalibrationError::RecordCorrupt {
            expected: expected_crc,
            actual: actual_crc,
        });
    }

    if bytes[2] != VERSION {
        return Err(CalibrationError::UnsupportedVersion(bytes[2]));
    }

    let flags = bytes[3];
    let min = u16::from_le_bytes([bytes[4], bytes[5]]);
    let max = u16::from_le_bytes([bytes[6], bytes[7]]);
    let deadzone_min = u16::from_le_bytes([bytes[8], bytes[9]]);
    let deadzone_max = u16::from_le_bytes([bytes[10], bytes[11]]);

    let cal = AxisCalibration::new(min, max)?
        .with_deadzone(deadzone_min, deadzone_max)?
        .with_inverted(flags & FLAG_INVERTED != 0);

    Ok(CalibrationRecord {
        cal,
        auto_calibrate: flags & FLAG_AUTO_CALIBRATE != 0,
    })
}

/// Reads and decodes one record from a store, best-effort.
///
/// Returns `None` on any failure so the caller keeps its compiled-in
/// defaults. An erased or absent slot is logged quietly; a record that was
/// written and then damaged is logged as a warning, since that points at a
/// storage problem worth investigating.
pub fn load_record(
    store: &dyn simrig_core::CalibrationStore,
    key: simrig_core::StorageKey,
    channel_label: &str,
) -> Option<CalibrationRecord> {
    let bytes = match store.read_bytes(key, RECORD_LEN) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::debug!(?key, channel_label, "no stored calibration, using defaults");
            return None;
        }
        Err(err) => {
            tracing::warn!(?key, channel_label, %err, "calibration read failed, using defaults");
            return None;
        }
    };

    match decode(&bytes) {
        Ok(record) => {
            tracing::debug!(?key, channel_label, "loaded stored calibration");
            Some(record)
        }
        Err(CalibrationError::RecordNeverWritten) => {
            tracing::debug!(?key, channel_label, "calibration slot erased, using defaults");
            None
        }
        Err(err) => {
            tracing::warn!(?key, channel_label, %err, "stored calibration invalid, using defaults");
            None
        }
    }
}

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection).
fn crc16_ccitt(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in bytes {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CalibrationResult<CalibrationRecord> {
        Ok(CalibrationRecord {
            cal: AxisCalibration::new(48, 904)?
                .with_deadzone(60, 890)?
                .with_inverted(true),
            auto_calibrate: true,
        })
    }

    #[test]
    fn test_crc_reference_vector() {
        // CRC-16/CCITT-FALSE check value for "123456789"
        assert_eq!(crc16_ccitt(b"123456789"), 0x29B1);
        assert_eq!(crc16_ccitt(&[]), 0xFFFF);
    }

    #[test]
    fn test_round_trip() -> CalibrationResult<()> {
        let record = sample_record()?;
        let decoded = decode(&encode(&record))?;
        assert_eq!(decoded, record);
        Ok(())
    }

    #[test]
    fn test_encode_layout() -> CalibrationResult<()> {
        let bytes = encode(&sample_record()?);

        assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]), MAGIC);
        assert_eq!(bytes[2], VERSION);
        assert_eq!(bytes[3], FLAG_INVERTED | FLAG_AUTO_CALIBRATE);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 48);
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 904);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 60);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 890);
        Ok(())
    }

    #[test]
    fn test_erased_storage_is_never_written() {
        assert_eq!(
            decode(&[0x00; RECORD_LEN]),
            Err(CalibrationError::RecordNeverWritten)
        );
        assert_eq!(
            decode(&[0xFF; RECORD_LEN]),
            Err(CalibrationError::RecordNeverWritten)
        );
    }

    #[test]
    fn test_truncated_record() {
        let result = decode(&[0xC4; 5]);
        assert_eq!(
            result,
            Err(CalibrationError::RecordTruncated {
                expected: RECORD_LEN,
                actual: 5
            })
        );
    }

    #[test]
    fn test_flipped_bit_is_corrupt() -> CalibrationResult<()> {
        let mut bytes = encode(&sample_record()?);
        bytes[5] ^= 0x04;

        assert!(matches!(
            decode(&bytes),
            Err(CalibrationError::RecordCorrupt { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_wrong_magic_is_corrupt() -> CalibrationResult<()> {
        let mut bytes = encode(&sample_record()?);
        bytes[0] = 0x12;
        bytes[1] = 0x34;

        assert_eq!(
            decode(&bytes),
            Err(CalibrationError::RecordCorrupt {
                expected: MAGIC,
                actual: 0x3412
            })
        );
        Ok(())
    }

    #[test]
    fn test_future_version_rejected() -> CalibrationResult<()> {
        let mut bytes = encode(&sample_record()?);
        bytes[2] = 9;
        let crc = crc16_ccitt(&bytes[0..12]);
        bytes[12..14].copy_from_slice(&crc.to_le_bytes());

        assert_eq!(decode(&bytes), Err(CalibrationError::UnsupportedVersion(9)));
        Ok(())
    }

    #[test]
    fn test_valid_checksum_invalid_bounds_rejected() -> CalibrationResult<()> {
        // a record whose framing is intact but whose payload is nonsense
        let mut bytes = encode(&sample_record()?);
        bytes[4..6].copy_from_slice(&904u16.to_le_bytes()); // min == max
        let crc = crc16_ccitt(&bytes[0..12]);
        bytes[12..14].copy_from_slice(&crc.to_le_bytes());

        assert!(matches!(
            decode(&bytes),
            Err(CalibrationError::InvalidRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_load_record_from_store() -> CalibrationResult<()> {
        use simrig_core::{CalibrationStore, MemoryStore, StorageKey};

        let mut store = MemoryStore::new();
        let key = StorageKey::new(1, 0);

        // absent slot falls back silently
        assert_eq!(load_record(&store, key, "gas"), None);

        let record = sample_record()?;
        store
            .write_bytes(key, &encode(&record))
            .expect("memory store write");
        assert_eq!(load_record(&store, key, "gas"), Some(record));

        store
            .write_bytes(key, &[0x5A; RECORD_LEN])
            .expect("memory store write");
        assert_eq!(load_record(&store, key, "gas"), None);
        Ok(())
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_decode_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
            let _ = decode(&bytes);
        }

        #[test]
        fn prop_round_trip_any_valid_calibration(
            min in 0u16..1000,
            spread in 1u16..=1000,
            inverted: bool,
            auto_calibrate: bool,
        ) {
            let record = CalibrationRecord {
                cal: AxisCalibration::new(min, min + spread)
                    .expect("spread is at least 1")
                    .with_inverted(inverted),
                auto_calibrate,
            };
            prop_assert_eq!(decode(&encode(&record)).expect("freshly encoded"), record);
        }
    }
}
