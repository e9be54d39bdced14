//! Buffered analog channel

use simrig_core::{AnalogPin, DeviceConnection};

use crate::codec::{self, CalibrationRecord, RECORD_LEN};
use crate::types::AxisCalibration;

/// One physical analog channel with its calibration and buffered state.
///
/// `update` is the only method that touches hardware; every accessor returns
/// the value buffered by the most recent update, so two reads between
/// updates always agree.
#[derive(Debug, Clone)]
pub struct AnalogAxis {
    pin: AnalogPin,
    cal: AxisCalibration,
    raw: u16,
    position: f32,
    auto_calibrate: bool,
}

impl AnalogAxis {
    pub fn new(pin: AnalogPin, cal: AxisCalibration) -> Self {
        let rest = cal.rest_raw();
        Self {
            pin,
            cal,
            raw: rest,
            position: cal.apply(rest),
            auto_calibrate: false,
        }
    }

    /// Enables live range learning: each update expands the calibration
    /// bounds to include any new raw extreme.
    pub fn with_auto_calibration(mut self, enabled: bool) -> Self {
        self.auto_calibrate = enabled;
        self
    }

    /// Samples the raw signal and recomputes the normalized position.
    ///
    /// Returns `true` if the normalized position changed. Raw movement
    /// entirely outside the calibrated range (e.g. sensor noise past a
    /// clamped bound) does not count as a change.
    pub fn update(&mut self, conn: &dyn DeviceConnection) -> bool {
        let raw = conn.read_analog(self.pin);
        if self.auto_calibrate {
            self.cal.expand(raw);
        }

        let position = self.cal.apply(raw);
        let changed = (position - self.position).abs() > f32::EPSILON;

        self.raw = raw;
        self.position = position;
        changed
    }

    /// The normalized position in `[0.0, 1.0]` from the last update.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// The unprocessed raw sample from the last update, for diagnostics and
    /// calibration bootstrapping.
    pub fn position_raw(&self) -> u16 {
        self.raw
    }

    pub fn pin(&self) -> AnalogPin {
        self.pin
    }

    pub fn calibration(&self) -> AxisCalibration {
        self.cal
    }

    pub fn auto_calibrate(&self) -> bool {
        self.auto_calibrate
    }

    /// Replaces the calibration bounds.
    ///
    /// The buffered sample is not reprocessed; the new bounds take effect on
    /// the next update.
    pub fn set_calibration(&mut self, cal: AxisCalibration) {
        self.cal = cal;
    }

    /// Overrides the buffered sample, e.g. to park a disconnected axis at a
    /// known value.
    pub fn set_raw(&mut self, raw: u16) {
        self.raw = raw;
        self.position = self.cal.apply(raw);
    }

    /// Parks the axis at its released position (normalized 0.0).
    pub fn reset_to_rest(&mut self) -> bool {
        let rest = self.cal.rest_raw();
        let changed = self.raw != rest;
        self.set_raw(rest);
        changed
    }

    /// Encodes the current calibration as a fixed-width persistence record.
    pub fn serial_calibration(&self) -> [u8; RECORD_LEN] {
        codec::encode(&CalibrationRecord {
            cal: self.cal,
            auto_calibrate: self.auto_calibrate,
        })
    }

    /// Applies a decoded persistence record.
    pub fn apply_record(&mut self, record: &CalibrationRecord) {
        self.cal = record.cal;
        self.auto_calibrate = record.auto_calibrate;
    }
}
