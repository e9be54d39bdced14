//! Logitech device tables
//!
//! Everything Logitech-specific is data: pin maps, factory calibrations, and
//! gear-zone geometry, feeding the generic peripherals from `simrig-pedals`
//! and `simrig-shifter`. The calibration numbers were measured on real
//! hardware; treat them as starting points that per-unit calibration
//! replaces.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod buttons;
pub mod pedals;
pub mod shifter;

pub use buttons::*;
pub use pedals::*;
pub use shifter::*;
