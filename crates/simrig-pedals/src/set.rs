//! Pedal set peripheral

use std::time::Instant;

use tracing::debug;

use simrig_calibration::{codec, AnalogAxis, AxisCalibration, RECORD_LEN};
use simrig_core::{
    AnalogPin, CalibrationStore, DeviceConnection, Peripheral, PresenceDetector, StorageError,
    StorageKey,
};

use crate::{Pedal, PedalsError, PedalsResult};

/// A set of analog pedals on one connection.
///
/// Pedals are declared at construction time; the declaration order fixes the
/// persistence channel of each pedal, so adding a pedal to an existing
/// configuration must append it rather than reorder the others.
///
/// While the connection reports the device as unplugged, every pedal holds
/// its released position. A released pedal is the only safe thing to report
/// from a harness that is not there.
pub struct PedalSet<C: DeviceConnection> {
    conn: C,
    device_id: u16,
    detector: PresenceDetector,
    axes: Vec<(Pedal, AnalogAxis)>,
    changed: bool,
}

impl<C: DeviceConnection> PedalSet<C> {
    /// Creates an empty pedal set; declare pedals with [`Self::with_pedal`].
    ///
    /// `device_id` namespaces this set's calibration records in the store.
    pub fn new(conn: C, device_id: u16) -> Self {
        Self {
            conn,
            device_id,
            detector: PresenceDetector::new(),
            axes: Vec::new(),
            changed: false,
        }
    }

    /// Creates a pedal set from a declaration table.
    pub fn from_table(
        conn: C,
        device_id: u16,
        table: &[(Pedal, AnalogPin, AxisCalibration)],
    ) -> PedalsResult<Self> {
        let mut set = Self::new(conn, device_id);
        for &(pedal, pin, cal) in table {
            set = set.with_pedal(pedal, pin, cal)?;
        }
        Ok(set)
    }

    /// Declares a fitted pedal with its analog pin and starting calibration.
    pub fn with_pedal(
        mut self,
        pedal: Pedal,
        pin: AnalogPin,
        cal: AxisCalibration,
    ) -> PedalsResult<Self> {
        if self.axes.iter().any(|(p, _)| *p == pedal) {
            return Err(PedalsError::DuplicatePedal(pedal));
        }
        self.axes.push((pedal, AnalogAxis::new(pin, cal)));
        Ok(self)
    }

    /// Replaces the presence detector, e.g. to shorten the debounce window.
    pub fn with_detector(mut self, detector: PresenceDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Gas and brake on default full-range calibration.
    pub fn two_pedal(conn: C, device_id: u16, gas: AnalogPin, brake: AnalogPin) -> Self {
        let mut set = Self::new(conn, device_id);
        set.axes
            .push((Pedal::Gas, AnalogAxis::new(gas, AxisCalibration::default())));
        set.axes
            .push((Pedal::Brake, AnalogAxis::new(brake, AxisCalibration::default())));
        set
    }

    /// Gas, brake, and clutch on default full-range calibration.
    pub fn three_pedal(
        conn: C,
        device_id: u16,
        gas: AnalogPin,
        brake: AnalogPin,
        clutch: AnalogPin,
    ) -> Self {
        let mut set = Self::two_pedal(conn, device_id, gas, brake);
        set.axes.push((
            Pedal::Clutch,
            AnalogAxis::new(clutch, AxisCalibration::default()),
        ));
        set
    }

    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    pub fn num_pedals(&self) -> usize {
        self.axes.len()
    }

    /// Whether the last update changed any pedal position.
    pub fn position_changed(&self) -> bool {
        self.changed
    }

    /// Encodes one pedal's calibration as a persistence record.
    pub fn serial_calibration(&self, pedal: Pedal) -> PedalsResult<[u8; RECORD_LEN]> {
        Ok(self.axis(pedal)?.serial_calibration())
    }

    /// The pedals fitted on this set, in declaration order.
    pub fn pedals(&self) -> impl Iterator<Item = Pedal> + '_ {
        self.axes.iter().map(|(pedal, _)| *pedal)
    }

    pub fn has_pedal(&self, pedal: Pedal) -> bool {
        self.axes.iter().any(|(p, _)| *p == pedal)
    }

    fn axis(&self, pedal: Pedal) -> PedalsResult<&AnalogAxis> {
        self.axes
            .iter()
            .find(|(p, _)| *p == pedal)
            .map(|(_, axis)| axis)
            .ok_or(PedalsError::UnsupportedPedal(pedal))
    }

    fn axis_mut(&mut self, pedal: Pedal) -> PedalsResult<&mut AnalogAxis> {
        self.axes
            .iter_mut()
            .find(|(p, _)| *p == pedal)
            .map(|(_, axis)| axis)
            .ok_or(PedalsError::UnsupportedPedal(pedal))
    }

    /// Normalized position of a pedal, 0.0 released to 1.0 fully pressed.
    ///
    /// Asking for a pedal that is not fitted is a caller bug, reported as an
    /// error rather than a phantom released pedal.
    pub fn position(&self, pedal: Pedal) -> PedalsResult<f32> {
        Ok(self.axis(pedal)?.position())
    }

    /// Raw sample of a pedal from the last update, for calibration tooling.
    pub fn position_raw(&self, pedal: Pedal) -> PedalsResult<u16> {
        Ok(self.axis(pedal)?.position_raw())
    }

    pub fn calibration(&self, pedal: Pedal) -> PedalsResult<AxisCalibration> {
        Ok(self.axis(pedal)?.calibration())
    }

    pub fn set_calibration(&mut self, pedal: Pedal, cal: AxisCalibration) -> PedalsResult<()> {
        self.axis_mut(pedal)?.set_calibration(cal);
        Ok(())
    }

    /// Enables or disables live range learning on one pedal.
    pub fn set_auto_calibration(&mut self, pedal: Pedal, enabled: bool) -> PedalsResult<()> {
        let axis = self.axis_mut(pedal)?;
        *axis = axis.clone().with_auto_calibration(enabled);
        Ok(())
    }

    fn load_calibration(&mut self, store: &dyn CalibrationStore) {
        let device = self.device_id;
        for (channel, (pedal, axis)) in self.axes.iter_mut().enumerate() {
            let key = StorageKey::new(device, channel as u8);
            if let Some(record) = codec::load_record(store, key, pedal.label()) {
                axis.apply_record(&record);
            }
        }
    }

    fn poll(&mut self) -> bool {
        let was_connected = self.detector.is_connected();
        self.detector.poll(self.conn.is_present(), Instant::now());

        let mut changed = false;
        if self.detector.is_connected() {
            if !was_connected {
                debug!(device = self.device_id, "pedal set reconnected");
            }
            for (_, axis) in &mut self.axes {
                changed |= axis.update(&self.conn);
            }
        } else {
            if was_connected {
                debug!(device = self.device_id, "pedal set disconnected");
            }
            for (_, axis) in &mut self.axes {
                changed |= axis.reset_to_rest();
            }
        }

        self.changed = changed;
        changed
    }
}

impl<C: DeviceConnection> Peripheral for PedalSet<C> {
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
        for (channel, (_, axis)) in self.axes.iter().enumerate() {
            let key = StorageKey::new(self.device_id, channel as u8);
            store.write_bytes(key, &axis.serial_calibration())?;
        }
        Ok(())
    }
}
