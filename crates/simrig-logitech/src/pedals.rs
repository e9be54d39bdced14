//! Logitech pedal tables

use serde::{Deserialize, Serialize};

use simrig_calibration::AxisCalibration;
use simrig_core::{AnalogPin, DeviceConnection};
use simrig_pedals::{Pedal, PedalSet, PedalsResult};

/// Analog pin assignment for a Logitech pedal harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedalPins {
    pub gas: AnalogPin,
    pub brake: AnalogPin,
    /// Two-pedal sets (Driving Force GT) have no clutch.
    pub clutch: Option<AnalogPin>,
}

// Logitech pedal potentiometers read high at rest and low when pressed, so
// every factory calibration here is inverted.

/// G25/G27/G29 gas pedal factory calibration.
pub const DRIVING_FORCE_GAS: AxisCalibration = AxisCalibration {
    min: 48,
    max: 904,
    deadzone_min: 48,
    deadzone_max: 904,
    inverted: true,
};

/// G25/G27/G29 brake pedal factory calibration.
pub const DRIVING_FORCE_BRAKE: AxisCalibration = AxisCalibration {
    min: 286,
    max: 944,
    deadzone_min: 286,
    deadzone_max: 944,
    inverted: true,
};

/// G25/G27/G29 clutch pedal factory calibration.
pub const DRIVING_FORCE_CLUTCH: AxisCalibration = AxisCalibration {
    min: 59,
    max: 881,
    deadzone_min: 59,
    deadzone_max: 881,
    inverted: true,
};

/// Driving Force GT gas pedal factory calibration.
pub const DRIVING_FORCE_GT_GAS: AxisCalibration = AxisCalibration {
    min: 0,
    max: 646,
    deadzone_min: 0,
    deadzone_max: 646,
    inverted: true,
};

/// Driving Force GT brake pedal factory calibration.
pub const DRIVING_FORCE_GT_BRAKE: AxisCalibration = AxisCalibration {
    min: 473,
    max: 1023,
    deadzone_min: 473,
    deadzone_max: 1023,
    inverted: false,
};

/// Three-pedal set as shipped with the G25, G27, and G29 wheels.
///
/// `pins.clutch` is honored if set; without it this degrades to the same
/// two-pedal set with factory gas/brake calibration.
pub fn driving_force_pedals<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    pins: PedalPins,
) -> PedalsResult<PedalSet<C>> {
    let mut set = PedalSet::new(conn, device_id)
        .with_pedal(Pedal::Gas, pins.gas, DRIVING_FORCE_GAS)?
        .with_pedal(Pedal::Brake, pins.brake, DRIVING_FORCE_BRAKE)?;
    if let Some(clutch) = pins.clutch {
        set = set.with_pedal(Pedal::Clutch, clutch, DRIVING_FORCE_CLUTCH)?;
    }
    Ok(set)
}

/// Two-pedal set as shipped with the Driving Force GT wheel.
pub fn driving_force_gt_pedals<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    gas: AnalogPin,
    brake: AnalogPin,
) -> PedalsResult<PedalSet<C>> {
    PedalSet::new(conn, device_id)
        .with_pedal(Pedal::Gas, gas, DRIVING_FORCE_GT_GAS)?
        .with_pedal(Pedal::Brake, brake, DRIVING_FORCE_GT_BRAKE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simrig_core::mock::MockConnection;
    use simrig_core::Peripheral;

    const GAS: AnalogPin = AnalogPin(0);
    const BRAKE: AnalogPin = AnalogPin(1);
    const CLUTCH: AnalogPin = AnalogPin(2);

    #[test]
    fn test_three_pedal_rest_positions() -> PedalsResult<()> {
        let conn = MockConnection::new();
        // potentiometers at their resting (high) values
        conn.set_analog(GAS, 904);
        conn.set_analog(BRAKE, 944);
        conn.set_analog(CLUTCH, 881);

        let mut set = driving_force_pedals(
            &conn,
            1,
            PedalPins {
                gas: GAS,
                brake: BRAKE,
                clutch: Some(CLUTCH),
            },
        )?;
        set.begin(None);

        for pedal in [Pedal::Gas, Pedal::Brake, Pedal::Clutch] {
            assert!(
                set.position(pedal)?.abs() < f32::EPSILON,
                "{pedal} should rest at 0.0"
            );
        }
        Ok(())
    }

    #[test]
    fn test_inverted_travel_presses_toward_one() -> PedalsResult<()> {
        let conn = MockConnection::new();
        conn.set_analog(GAS, 48); // pressed to the floor

        let mut set = driving_force_pedals(
            &conn,
            1,
            PedalPins {
                gas: GAS,
                brake: BRAKE,
                clutch: None,
            },
        )?;
        set.begin(None);

        assert!((set.position(Pedal::Gas)? - 1.0).abs() < f32::EPSILON);
        assert!(!set.has_pedal(Pedal::Clutch));
        Ok(())
    }

    #[test]
    fn test_gt_pedals_have_no_clutch() -> PedalsResult<()> {
        let conn = MockConnection::new();
        let mut set = driving_force_gt_pedals(&conn, 2, GAS, BRAKE)?;
        set.begin(None);

        assert_eq!(set.num_pedals(), 2);
        assert!(set.position(Pedal::Clutch).is_err());
        assert_eq!(set.calibration(Pedal::Brake)?, DRIVING_FORCE_GT_BRAKE);
        Ok(())
    }
}
