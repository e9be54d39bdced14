//! Logitech shifter tables

use serde::{Deserialize, Serialize};

use simrig_calibration::{AnalogAxis, AxisCalibration};
use simrig_core::{AnalogPin, DeviceConnection, DigitalPin};
use simrig_shifter::{
    AnalogShifter, Gear, GearZone, LockoutSource, ReverseMode, SequentialDecoder, ShifterResult,
    ZoneTable,
};

use crate::G27Button;

/// Pin assignment for a Logitech DE-9 shifter harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShifterPins {
    pub x: AnalogPin,
    pub y: AnalogPin,
    /// Reverse interlock line, for harnesses that break it out as a digital
    /// pin rather than a shift-register bit.
    pub lockout: Option<DigitalPin>,
}

/// Driving Force shifter X axis factory calibration.
pub const DRIVING_FORCE_SHIFTER_X: AxisCalibration = AxisCalibration {
    min: 257,
    max: 670,
    deadzone_min: 257,
    deadzone_max: 670,
    inverted: false,
};

/// Driving Force shifter Y axis factory calibration.
pub const DRIVING_FORCE_SHIFTER_Y: AxisCalibration = AxisCalibration {
    min: 79,
    max: 822,
    deadzone_min: 79,
    deadzone_max: 822,
    inverted: false,
};

/// Raw axis values of the knob resting in neutral.
pub const DRIVING_FORCE_NEUTRAL_RAW: (u16, u16) = (490, 440);

/// G25 sequential-mode Y axis factory calibration (down throw to up throw).
pub const G25_SEQUENTIAL_Y: AxisCalibration = AxisCalibration {
    min: 257,
    max: 619,
    deadzone_min: 257,
    deadzone_max: 619,
    inverted: false,
};

/// Raw Y value of the sequential lever at rest.
pub const G25_SEQUENTIAL_NEUTRAL_RAW: u16 = 425;

/// The six-gear H-pattern of the Driving Force shifter in normalized axis
/// space: odd gears across the top, even gears across the bottom.
pub fn driving_force_zones() -> ShifterResult<ZoneTable> {
    const TOLERANCE: f32 = 0.2;
    ZoneTable::new(vec![
        GearZone::new(Gear::Forward(1), 0.0, 1.0, TOLERANCE),
        GearZone::new(Gear::Forward(2), 0.0, 0.0, TOLERANCE),
        GearZone::new(Gear::Forward(3), 0.5, 1.0, TOLERANCE),
        GearZone::new(Gear::Forward(4), 0.5, 0.0, TOLERANCE),
        GearZone::new(Gear::Forward(5), 1.0, 1.0, TOLERANCE),
        GearZone::new(Gear::Forward(6), 1.0, 0.0, TOLERANCE),
    ])
}

fn driving_force_base<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    x: AnalogPin,
    y: AnalogPin,
) -> ShifterResult<AnalogShifter<C>> {
    Ok(AnalogShifter::new(
        conn,
        device_id,
        AnalogAxis::new(x, DRIVING_FORCE_SHIFTER_X),
        AnalogAxis::new(y, DRIVING_FORCE_SHIFTER_Y),
        driving_force_zones()?,
    )
    .with_neutral_raw(DRIVING_FORCE_NEUTRAL_RAW.0, DRIVING_FORCE_NEUTRAL_RAW.1)
    .with_reverse_mode(ReverseMode::SharedGate {
        gate: Gear::Forward(6),
        conflict: Gear::Forward(5),
    }))
}

/// Driving Force shifter: six forward gears, reverse sharing the 6th gate
/// behind the press-down interlock. Also sold with the G29, G920, and G923
/// wheels.
pub fn driving_force_shifter<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    pins: ShifterPins,
) -> ShifterResult<AnalogShifter<C>> {
    let lockout = pins.lockout.map_or(LockoutSource::None, LockoutSource::Pin);
    Ok(driving_force_base(conn, device_id, pins.x, pins.y)?.with_lockout(lockout))
}

/// G29 shifter, electrically a Driving Force shifter.
pub fn g29_shifter<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    pins: ShifterPins,
) -> ShifterResult<AnalogShifter<C>> {
    driving_force_shifter(conn, device_id, pins)
}

/// G920 shifter, electrically a Driving Force shifter.
pub fn g920_shifter<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    pins: ShifterPins,
) -> ShifterResult<AnalogShifter<C>> {
    driving_force_shifter(conn, device_id, pins)
}

/// G923 shifter, electrically a Driving Force shifter.
pub fn g923_shifter<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    pins: ShifterPins,
) -> ShifterResult<AnalogShifter<C>> {
    driving_force_shifter(conn, device_id, pins)
}

/// G27 shifter: the Driving Force H-pattern with the reverse interlock on
/// bit 14 of the shift-register button word.
pub fn g27_shifter<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    x: AnalogPin,
    y: AnalogPin,
) -> ShifterResult<AnalogShifter<C>> {
    Ok(driving_force_base(conn, device_id, x, y)?
        .with_lockout(LockoutSource::RegisterBit(G27Button::Reverse.bit())))
}

/// G25 shifter, electrically a G27 in H-pattern mode.
///
/// Sequential mode (the dial turned counter-clockwise, register bit 12) is
/// decoded separately: feed the normalized Y position through
/// [`g25_sequential_decoder`] while [`G27Button::Sequential`] is held.
pub fn g25_shifter<C: DeviceConnection>(
    conn: C,
    device_id: u16,
    x: AnalogPin,
    y: AnalogPin,
) -> ShifterResult<AnalogShifter<C>> {
    g27_shifter(conn, device_id, x, y)
}

/// Hysteresis decoder tuned for the G25 sequential mode.
pub fn g25_sequential_decoder() -> SequentialDecoder {
    SequentialDecoder::with_defaults()
}
