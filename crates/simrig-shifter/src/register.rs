//! Shift-register gear decoding

use std::time::Instant;

use tracing::debug;

use simrig_core::{
    CalibrationStore, DeviceConnection, Peripheral, PresenceDetector, StorageError,
};

use crate::{Gear, ShifterError, ShifterResult};

/// Shifter whose gears arrive as dedicated bits on a shift-register button
/// word.
///
/// The gear table maps bit index to gear; the first declared bit that is set
/// wins, so a bouncing contact overlapping a neighbor cannot flicker the
/// output between two gears. No set gear bit decodes as `Neutral`.
///
/// The whole 16-bit word is cached each update, so auxiliary buttons sharing
/// the register can be queried without another bus read.
pub struct RegisterShifter<C: DeviceConnection> {
    conn: C,
    device_id: u16,
    table: Vec<(u8, Gear)>,
    detector: PresenceDetector,
    word: u16,
    prev_word: u16,
    gear: Gear,
    gear_changed: bool,
}

impl<C: DeviceConnection> RegisterShifter<C> {
    pub fn new(conn: C, device_id: u16, table: &[(u8, Gear)]) -> ShifterResult<Self> {
        if table.is_empty() {
            return Err(ShifterError::EmptyGearTable);
        }
        if let Some(&(bit, _)) = table.iter().find(|(bit, _)| *bit > 15) {
            return Err(ShifterError::BitOutOfRange(bit));
        }
        Ok(Self {
            conn,
            device_id,
            table: table.to_vec(),
            detector: PresenceDetector::new(),
            word: 0,
            prev_word: 0,
            gear: Gear::Neutral,
            gear_changed: false,
        })
    }

    pub fn with_detector(mut self, detector: PresenceDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    pub fn gear(&self) -> Gear {
        self.gear
    }

    pub fn gear_changed(&self) -> bool {
        self.gear_changed
    }

    pub fn gear_char(&self) -> char {
        self.gear.as_char()
    }

    /// The button word cached by the last update, MSB first.
    pub fn button_word(&self) -> u16 {
        self.word
    }

    /// State of one register bit as of the last update.
    pub fn button(&self, bit: u8) -> bool {
        self.word & (1u16 << bit) != 0
    }

    /// Whether a register bit flipped in the last update.
    pub fn button_changed(&self, bit: u8) -> bool {
        (self.word ^ self.prev_word) & (1u16 << bit) != 0
    }

    fn decode(&self) -> Gear {
        self.table
            .iter()
            .find(|(bit, _)| self.word & (1u16 << bit) != 0)
            .map_or(Gear::Neutral, |&(_, gear)| gear)
    }

    fn poll(&mut self) -> bool {
        let was_connected = self.detector.is_connected();
        self.detector.poll(self.conn.is_present(), Instant::now());

        self.prev_word = self.word;
        let gear = if self.detector.is_connected() {
            if !was_connected {
                debug!(device = self.device_id, "register shifter reconnected");
            }
            self.word = self.conn.read_shift_register();
            self.decode()
        } else {
            if was_connected {
                debug!(device = self.device_id, "register shifter disconnected");
            }
            self.word = 0;
            Gear::Neutral
        };

        self.gear_changed = gear != self.gear;
        self.gear = gear;
        self.gear_changed || self.word != self.prev_word
    }
}

impl<C: DeviceConnection> Peripheral for RegisterShifter<C> {
    fn begin(&mut self, _store: Option<&dyn CalibrationStore>) {
        // nothing analog to calibrate
        self.poll();
    }

    fn update(&mut self) -> bool {
        self.poll()
    }

    fn is_connected(&self) -> bool {
        self.detector.is_connected()
    }

    fn save_calibration(&self, _store: &mut dyn CalibrationStore) -> Result<(), StorageError> {
        Ok(())
    }
}
