//! Core capabilities for sim racing peripherals
//!
//! This crate defines the two capabilities every peripheral consumes — a
//! [`DeviceConnection`] for raw electrical signals and a [`CalibrationStore`]
//! for non-volatile calibration records — plus the [`Peripheral`] lifecycle
//! contract and the debounced presence detector shared by all device kinds.
//!
//! Pin I/O and storage I/O are deliberately not implemented here; the
//! integration layer that wires up the physical board supplies both.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod connection;
pub mod detect;
pub mod storage;

pub use connection::*;
pub use detect::*;
pub use storage::*;

/// Lifecycle contract common to every peripheral kind.
///
/// `update` is the single synchronization point: all owned analog channels
/// and digital lines are refreshed inside it, and no derived state (pedal
/// positions, decoded gear) changes anywhere else. Callers must invoke it
/// once per control loop iteration before reading any accessor.
pub trait Peripheral {
    /// Initializes the peripheral and performs the first poll.
    ///
    /// If a store is supplied, persisted calibration is loaded best-effort:
    /// a missing or corrupt record falls back to the compiled-in defaults
    /// and never aborts startup.
    fn begin(&mut self, store: Option<&dyn CalibrationStore>);

    /// Polls the hardware once and refreshes all cached state.
    ///
    /// Returns `true` if any externally visible state changed.
    fn update(&mut self) -> bool;

    /// Whether the backing hardware currently reports a plugged-in device.
    ///
    /// This is a polled boolean, not an event; it reflects the state as of
    /// the last `update`.
    fn is_connected(&self) -> bool;

    /// Persists the current calibration of every owned analog channel.
    fn save_calibration(&self, store: &mut dyn CalibrationStore) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullPeripheral {
        connected: bool,
    }

    impl Peripheral for NullPeripheral {
        fn begin(&mut self, _store: Option<&dyn CalibrationStore>) {}

        fn update(&mut self) -> bool {
            false
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn save_calibration(&self, _store: &mut dyn CalibrationStore) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_peripheral_trait_is_object_safe() {
        let mut p = NullPeripheral { connected: true };
        let dyn_p: &mut dyn Peripheral = &mut p;
        dyn_p.begin(None);
        assert!(!dyn_p.update());
        assert!(dyn_p.is_connected());
    }
}
