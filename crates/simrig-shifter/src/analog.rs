//! Two-axis H-pattern shifter

use std::time::Instant;

use tracing::debug;

use simrig_calibration::{codec, AnalogAxis, AxisCalibration};
use simrig_core::{
    CalibrationStore, DeviceConnection, DigitalPin, Peripheral, PresenceDetector, StorageError,
    StorageKey,
};

use crate::{Gear, ZoneTable};

/// Where the reverse interlock signal comes from.
///
/// H-pattern shifters with a reverse gear carry a switch that closes when the
/// knob is pressed down; without it, bumping the stick past the last forward
/// gate would engage reverse at speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutSource {
    /// No interlock fitted.
    None,
    /// A dedicated digital line.
    Pin(DigitalPin),
    /// One bit of the shift-register button word.
    RegisterBit(u8),
}

/// How reverse is laid out on the H-pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseMode {
    /// Reverse has its own gate in the zone table. A geometric reverse match
    /// without the interlock held decodes as `Neutral`.
    DedicatedZone,
    /// Reverse shares a gate with a forward gear, selected by pressing the
    /// knob down. With the interlock held, `gate` decodes as `Reverse`;
    /// `conflict` is the adjacent gate that cannot physically be reached
    /// with the knob pressed, so it decodes as `Neutral`.
    SharedGate { gate: Gear, conflict: Gear },
}

/// H-pattern shifter decoding gears from a two-axis knob position.
///
/// Both axes are refreshed before the position is decoded, so the gear never
/// mixes one stale coordinate with one fresh.
pub struct AnalogShifter<C: DeviceConnection> {
    conn: C,
    device_id: u16,
    x: AnalogAxis,
    y: AnalogAxis,
    zones: ZoneTable,
    lockout: LockoutSource,
    reverse_mode: ReverseMode,
    neutral_raw: (u16, u16),
    detector: PresenceDetector,
    gear: Gear,
    gear_changed: bool,
}

impl<C: DeviceConnection> AnalogShifter<C> {
    /// Creates a shifter from its two calibrated axes and a zone table.
    ///
    /// The default configuration has no reverse interlock and treats any
    /// reverse zone as a dedicated gate; the disconnect resting point is the
    /// center of both calibrated ranges.
    pub fn new(conn: C, device_id: u16, x: AnalogAxis, y: AnalogAxis, zones: ZoneTable) -> Self {
        let neutral_raw = (center_raw(&x.calibration()), center_raw(&y.calibration()));
        Self {
            conn,
            device_id,
            x,
            y,
            zones,
            lockout: LockoutSource::None,
            reverse_mode: ReverseMode::DedicatedZone,
            neutral_raw,
            detector: PresenceDetector::new(),
            gear: Gear::Neutral,
            gear_changed: false,
        }
    }

    pub fn with_lockout(mut self, lockout: LockoutSource) -> Self {
        self.lockout = lockout;
        self
    }

    pub fn with_reverse_mode(mut self, mode: ReverseMode) -> Self {
        self.reverse_mode = mode;
        self
    }

    /// Sets the raw axis values the knob reports at rest, used to park the
    /// shifter in neutral while disconnected.
    pub fn with_neutral_raw(mut self, x: u16, y: u16) -> Self {
        self.neutral_raw = (x, y);
        self
    }

    pub fn with_detector(mut self, detector: PresenceDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    /// The gear engaged as of the last update.
    pub fn gear(&self) -> Gear {
        self.gear
    }

    /// Whether the last update changed the engaged gear.
    pub fn gear_changed(&self) -> bool {
        self.gear_changed
    }

    pub fn gear_char(&self) -> char {
        self.gear.as_char()
    }

    /// Normalized knob position from the last update.
    pub fn position(&self) -> (f32, f32) {
        (self.x.position(), self.y.position())
    }

    /// Raw axis samples from the last update, for calibration tooling.
    pub fn position_raw(&self) -> (u16, u16) {
        (self.x.position_raw(), self.y.position_raw())
    }

    pub fn calibration(&self) -> (AxisCalibration, AxisCalibration) {
        (self.x.calibration(), self.y.calibration())
    }

    pub fn set_calibration(&mut self, x: AxisCalibration, y: AxisCalibration) {
        self.x.set_calibration(x);
        self.y.set_calibration(y);
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    /// Whether the reverse interlock is currently held, as of the raw
    /// signals right now. `LockoutSource::None` is never held.
    fn lockout_held(&self) -> bool {
        match self.lockout {
            LockoutSource::None => false,
            LockoutSource::Pin(pin) => self.conn.read_digital(pin),
            LockoutSource::RegisterBit(bit) => self.conn.read_shift_register() & (1 << bit) != 0,
        }
    }

    fn resolve_gear(&self, decoded: Gear, lockout_held: bool) -> Gear {
        match self.reverse_mode {
            ReverseMode::DedicatedZone => {
                let interlock_fitted = self.lockout != LockoutSource::None;
                if decoded == Gear::Reverse && interlock_fitted && !lockout_held {
                    Gear::Neutral
                } else {
                    decoded
                }
            }
            ReverseMode::SharedGate { gate, conflict } => {
                if lockout_held && decoded == gate {
                    Gear::Reverse
                } else if lockout_held && decoded == conflict {
                    // the knob cannot reach this gate while pressed down
                    Gear::Neutral
                } else {
                    decoded
                }
            }
        }
    }

    fn poll(&mut self) -> bool {
        let was_connected = self.detector.is_connected();
        self.detector.poll(self.conn.is_present(), Instant::now());

        let gear = if self.detector.is_connected() {
            if !was_connected {
                debug!(device = self.device_id, "shifter reconnected");
            }
            self.x.update(&self.conn);
            self.y.update(&self.conn);
            let decoded = self.zones.decode(self.x.position(), self.y.position());
            self.resolve_gear(decoded, self.lockout_held())
        } else {
            if was_connected {
                debug!(device = self.device_id, "shifter disconnected");
            }
            self.x.set_raw(self.neutral_raw.0);
            self.y.set_raw(self.neutral_raw.1);
            Gear::Neutral
        };

        self.gear_changed = gear != self.gear;
        if self.gear_changed {
            debug!(device = self.device_id, gear = %gear, "gear change");
        }
        self.gear = gear;
        self.gear_changed
    }

    fn load_calibration(&mut self, store: &dyn CalibrationStore) {
        let device = self.device_id;
        for (channel, axis, label) in [
            (0u8, &mut self.x, "shifter-x"),
            (1u8, &mut self.y, "shifter-y"),
        ] {
            let key = StorageKey::new(device, channel);
            if let Some(record) = codec::load_record(store, key, label) {
                axis.apply_record(&record);
            }
        }
    }
}

fn center_raw(cal: &AxisCalibration) -> u16 {
    cal.min + (cal.max - cal.min) / 2
}

impl<C: DeviceConnection> Peripheral for AnalogShifter<C> {
    fn begin(&mut self, store: Option<&dyn CalibrationStore>) {
        if let Some(store) = store {
            self.load_calibration(store);
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
        for (channel, axis) in [(0u8, &self.x), (1u8, &self.y)] {
            store.write_bytes(
                StorageKey::new(self.device_id, channel),
                &axis.serial_calibration(),
            )?;
        }
        Ok(())
    }
}
