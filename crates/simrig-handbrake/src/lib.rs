//! Single-axis handbrake peripheral
//!
//! A [`Handbrake`] is one calibrated analog channel with the standard
//! peripheral lifecycle: 0.0 released, 1.0 fully pulled, parked at released
//! while the hardware is unplugged.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

use std::time::Instant;

use tracing::debug;

use simrig_calibration::{codec, AnalogAxis, AxisCalibration, RECORD_LEN};
use simrig_core::{
    AnalogPin, CalibrationStore, DeviceConnection, Peripheral, PresenceDetector, StorageError,
    StorageKey,
};

pub struct Handbrake<C: DeviceConnection> {
    conn: C,
    device_id: u16,
    axis: AnalogAxis,
    detector: PresenceDetector,
    changed: bool,
}

impl<C: DeviceConnection> Handbrake<C> {
    pub fn new(conn: C, device_id: u16, pin: AnalogPin, cal: AxisCalibration) -> Self {
        Self {
            conn,
            device_id,
            axis: AnalogAxis::new(pin, cal),
            detector: PresenceDetector::new(),
            changed: false,
        }
    }

    pub fn with_detector(mut self, detector: PresenceDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Enables live range learning on the lever.
    pub fn with_auto_calibration(mut self, enabled: bool) -> Self {
        self.axis = self.axis.with_auto_calibration(enabled);
        self
    }

    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    /// Pull amount, 0.0 released to 1.0 fully pulled.
    pub fn position(&self) -> f32 {
        self.axis.position()
    }

    pub fn position_raw(&self) -> u16 {
        self.axis.position_raw()
    }

    pub fn position_changed(&self) -> bool {
        self.changed
    }

    pub fn calibration(&self) -> AxisCalibration {
        self.axis.calibration()
    }

    pub fn set_calibration(&mut self, cal: AxisCalibration) {
        self.axis.set_calibration(cal);
    }

    /// Encodes the lever calibration as a persistence record.
    pub fn serial_calibration(&self) -> [u8; RECORD_LEN] {
        self.axis.serial_calibration()
    }

    fn storage_key(&self) -> StorageKey {
        StorageKey::new(self.device_id, 0)
    }

    fn poll(&mut self) -> bool {
        let was_connected = self.detector.is_connected();
        self.detector.poll(self.conn.is_present(), Instant::now());

        self.changed = if self.detector.is_connected() {
            if !was_connected {
                debug!(device = self.device_id, "handbrake reconnected");
            }
            self.axis.update(&self.conn)
        } else {
            if was_connected {
                debug!(device = self.device_id, "handbrake disconnected");
            }
            self.axis.reset_to_rest()
        };
        self.changed
    }
}

impl<C: DeviceConnection> Peripheral for Handbrake<C> {
    fn begin(&mut self, store: Option<&dyn CalibrationStore>) {
        if let Some(store) = store {
            if let Some(record) = codec::load_record(store, self.storage_key(), "handbrake") {
                self.axis.apply_record(&record);
            }
        }
        self.poll();
    }

    fn update(&mut self) -> bool {
        self.poll()
    }

    fn is_connected(&self) -> bool {
        self.detector.is_connected()
    }

    fn save_calibration(&self, store: &mut dyn CalibrationStore) -> Result<(), StorageError> {
        store.write_bytes(self.storage_key(), &self.axis.serial_calibration())
    }
}
