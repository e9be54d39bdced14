//! Gear decoding scenarios against the reference geometry.

use simrig_core::Peripheral;
use simrig_integration_tests::fixtures::{
    VirtualCockpit, LOCKOUT_PIN, SHIFTER_X_PIN, SHIFTER_Y_PIN,
};
use simrig_shifter::{Gear, GearZone, ShifterResult, ZoneTable};

#[test]
fn test_two_zone_reference_decoding() -> ShifterResult<()> {
    let table = ZoneTable::new(vec![
        GearZone::new(Gear::Forward(1), 0.2, 0.2, 0.1),
        GearZone::new(Gear::Forward(2), 0.8, 0.8, 0.1),
    ])?;

    // inside the first zone, just off center
    assert_eq!(table.decode(0.21, 0.19), Gear::Forward(1));
    // dead center of the pattern is no gear at all
    assert_eq!(table.decode(0.5, 0.5), Gear::Neutral);
    assert_eq!(table.decode(0.8, 0.8), Gear::Forward(2));
    Ok(())
}

#[test]
fn test_h_pattern_walkthrough() -> ShifterResult<()> {
    let mut rig = VirtualCockpit::new()?;
    rig.rest_all();
    rig.shifter.begin(None);
    assert_eq!(rig.shifter.gear(), Gear::Neutral);

    // row by row through the gate: 1-2, 3-4, 5-6
    let throws = [
        (253u16, 799u16, Gear::Forward(1)),
        (262, 86, Gear::Forward(2)),
        (460, 826, Gear::Forward(3)),
        (470, 76, Gear::Forward(4)),
        (664, 841, Gear::Forward(5)),
        (677, 77, Gear::Forward(6)),
    ];
    for (x, y, expected) in throws {
        // pass through neutral between gates, as a hand would
        rig.conn.set_analog(SHIFTER_X_PIN, 490);
        rig.conn.set_analog(SHIFTER_Y_PIN, 440);
        rig.shifter.update();
        assert_eq!(rig.shifter.gear(), Gear::Neutral);

        rig.conn.set_analog(SHIFTER_X_PIN, x);
        rig.conn.set_analog(SHIFTER_Y_PIN, y);
        rig.shifter.update();
        assert_eq!(rig.shifter.gear(), expected);
        assert!(rig.shifter.gear_changed());
    }
    Ok(())
}

#[test]
fn test_reverse_interlock_over_sixth_gate() -> ShifterResult<()> {
    let mut rig = VirtualCockpit::new()?;
    rig.rest_all();
    rig.shifter.begin(None);

    // into the 6th gate without pressing the knob down
    rig.conn.set_analog(SHIFTER_X_PIN, 677);
    rig.conn.set_analog(SHIFTER_Y_PIN, 77);
    rig.shifter.update();
    assert_eq!(rig.shifter.gear(), Gear::Forward(6));

    rig.conn.set_digital(LOCKOUT_PIN, true);
    rig.shifter.update();
    assert_eq!(rig.shifter.gear(), Gear::Reverse);
    assert_eq!(rig.shifter.gear_char(), 'r');

    // 5th gate while pressed down is a contradiction, resolved as neutral
    rig.conn.set_analog(SHIFTER_X_PIN, 664);
    rig.conn.set_analog(SHIFTER_Y_PIN, 841);
    rig.shifter.update();
    assert_eq!(rig.shifter.gear(), Gear::Neutral);
    Ok(())
}

#[test]
fn test_gear_never_stale_between_gates() -> ShifterResult<()> {
    let mut rig = VirtualCockpit::new()?;
    rig.rest_all();
    rig.shifter.begin(None);

    rig.conn.set_analog(SHIFTER_X_PIN, 253);
    rig.conn.set_analog(SHIFTER_Y_PIN, 799);
    rig.shifter.update();
    assert_eq!(rig.shifter.gear(), Gear::Forward(1));

    // halfway out of the gate toward neutral
    rig.conn.set_analog(SHIFTER_X_PIN, 370);
    rig.conn.set_analog(SHIFTER_Y_PIN, 620);
    rig.shifter.update();
    assert_eq!(rig.shifter.gear(), Gear::Neutral);
    Ok(())
}
