//! Analog axis calibration for sim racing peripherals
//!
//! This crate turns noisy raw ADC samples into stable normalized positions:
//! calibration bounds with optional deadzones, buffered analog channels with
//! live auto-calibration, and a fixed-width record format for persisting
//! calibration across power cycles.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod axis;
pub mod codec;
pub mod types;

pub use axis::*;
pub use codec::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    #[error("Invalid calibration range: min {min} must be less than max {max}")]
    InvalidRange { min: u16, max: u16 },

    #[error("Deadzone {low}..{high} does not fit inside calibration range {min}..{max}")]
    InvalidDeadzone {
        low: u16,
        high: u16,
        min: u16,
        max: u16,
    },

    #[error("Deadzone percentage {0} outside 0.0..=1.0")]
    InvalidPercent(f32),

    #[error("Calibration record truncated: expected {expected} bytes, got {actual}")]
    RecordTruncated { expected: usize, actual: usize },

    #[error("No calibration record has been written")]
    RecordNeverWritten,

    #[error("Calibration record corrupt: expected {expected:#06x}, found {actual:#06x}")]
    RecordCorrupt { expected: u16, actual: u16 },

    #[error("Unsupported calibration record version: {0}")]
    UnsupportedVersion(u8),
}

pub type CalibrationResult<T> = Result<T, CalibrationError>;
