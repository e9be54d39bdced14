//! A virtual cockpit: every peripheral of a full Logitech rig wired to one
//! scriptable connection.

use std::sync::Arc;

use simrig_core::mock::MockConnection;
use simrig_core::{AnalogPin, DigitalPin, PresenceDetector};
use simrig_handbrake::Handbrake;
use simrig_logitech::{driving_force_pedals, driving_force_shifter, PedalPins, ShifterPins};
use simrig_pedals::PedalSet;
use simrig_shifter::{AnalogShifter, ShifterResult};

pub const GAS_PIN: AnalogPin = AnalogPin(0);
pub const BRAKE_PIN: AnalogPin = AnalogPin(1);
pub const CLUTCH_PIN: AnalogPin = AnalogPin(2);
pub const SHIFTER_X_PIN: AnalogPin = AnalogPin(3);
pub const SHIFTER_Y_PIN: AnalogPin = AnalogPin(4);
pub const HANDBRAKE_PIN: AnalogPin = AnalogPin(5);
pub const LOCKOUT_PIN: DigitalPin = DigitalPin(6);

pub const PEDALS_ID: u16 = 1;
pub const SHIFTER_ID: u16 = 2;
pub const HANDBRAKE_ID: u16 = 3;

pub struct VirtualCockpit {
    pub conn: Arc<MockConnection>,
    pub pedals: PedalSet<Arc<MockConnection>>,
    pub shifter: AnalogShifter<Arc<MockConnection>>,
    pub handbrake: Handbrake<Arc<MockConnection>>,
}

impl VirtualCockpit {
    /// Builds the rig with a zero-length presence debounce so tests can
    /// replug without synthesizing elapsed time.
    pub fn new() -> ShifterResult<Self> {
        let conn = Arc::new(MockConnection::new());
        let instant_detector = || PresenceDetector::with_stable_period(std::time::Duration::ZERO);

        let pedals = driving_force_pedals(
            Arc::clone(&conn),
            PEDALS_ID,
            PedalPins {
                gas: GAS_PIN,
                brake: BRAKE_PIN,
                clutch: Some(CLUTCH_PIN),
            },
        )
        .expect("fixed pedal table has no duplicates")
        .with_detector(instant_detector());

        let shifter = driving_force_shifter(
            Arc::clone(&conn),
            SHIFTER_ID,
            ShifterPins {
                x: SHIFTER_X_PIN,
                y: SHIFTER_Y_PIN,
                lockout: Some(LOCKOUT_PIN),
            },
        )?
        .with_detector(instant_detector());

        let handbrake = Handbrake::new(
            Arc::clone(&conn),
            HANDBRAKE_ID,
            HANDBRAKE_PIN,
            simrig_calibration::AxisCalibration::default(),
        )
        .with_detector(instant_detector());

        Ok(Self {
            conn,
            pedals,
            shifter,
            handbrake,
        })
    }

    /// Parks every analog signal at its resting value.
    pub fn rest_all(&self) {
        // Logitech pedals rest at their raw maximum
        self.conn.set_analog(GAS_PIN, 904);
        self.conn.set_analog(BRAKE_PIN, 944);
        self.conn.set_analog(CLUTCH_PIN, 881);
        self.conn.set_analog(SHIFTER_X_PIN, 490);
        self.conn.set_analog(SHIFTER_Y_PIN, 440);
        self.conn.set_analog(HANDBRAKE_PIN, 0);
    }

    /// One control-loop iteration over every peripheral.
    pub fn update_all(&mut self) {
        use simrig_core::Peripheral;
        self.pedals.update();
        self.shifter.update();
        self.handbrake.update();
    }
}
