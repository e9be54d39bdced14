//! Gear shifter peripherals
//!
//! Three ways a shifter can present itself electrically, one gear model:
//!
//! - [`AnalogShifter`] decodes an H-pattern from a two-axis position against
//!   a table of gear zones.
//! - [`RegisterShifter`] decodes gears from dedicated bits on a
//!   shift-register button word.
//! - [`SequentialDecoder`] turns a single sprung axis into up/down shift
//!   states with hysteresis.
//!
//! Which gears exist where is configuration; device-specific tables live in
//! `simrig-logitech`.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod analog;
pub mod register;
pub mod sequential;
pub mod types;
pub mod zones;

pub use analog::*;
pub use register::*;
pub use sequential::*;
pub use types::*;
pub use zones::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ShifterError {
    #[error("Gear zone table must declare at least one zone")]
    EmptyZoneTable,

    #[error("Gear zones for {first} and {second} overlap")]
    OverlappingZones { first: Gear, second: Gear },

    #[error("Gear zone for {gear} has invalid tolerance {tolerance}")]
    InvalidTolerance { gear: Gear, tolerance: f32 },

    #[error("Register gear table must declare at least one bit")]
    EmptyGearTable,

    #[error("Register bit {0} is out of range for a 16-bit button word")]
    BitOutOfRange(u8),

    #[error("Sequential thresholds invalid: engage {engage} must be in (0.5, 1.0] and release {release} in [0.5, engage)")]
    InvalidThresholds { engage: f32, release: f32 },
}

pub type ShifterResult<T> = Result<T, ShifterError>;
