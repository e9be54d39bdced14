//! Pedal set peripheral
//!
//! A [`PedalSet`] owns one calibrated analog channel per fitted pedal and
//! implements the shared peripheral lifecycle: presence-gated polling,
//! best-effort calibration loading, and explicit persistence. Which pedals
//! are fitted is configuration, not a type distinction; a two-pedal set is
//! simply one that never declared a clutch.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod set;
pub mod types;

pub use set::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedalsError {
    #[error("Pedal {0} is not fitted on this pedal set")]
    UnsupportedPedal(Pedal),

    #[error("Pedal {0} declared twice")]
    DuplicatePedal(Pedal),
}

pub type PedalsResult<T> = Result<T, PedalsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PedalsError::UnsupportedPedal(Pedal::Clutch);
        assert_eq!(err.to_string(), "Pedal clutch is not fitted on this pedal set");
    }
}
