//! Calibration bounds and normalization

use serde::{Deserialize, Serialize};

use crate::{CalibrationError, CalibrationResult};

/// Highest raw sample a 10-bit ADC can produce, the default full-scale range.
pub const ADC_MAX: u16 = 1023;

/// Calibration bounds for one analog axis, in raw ADC units.
///
/// `min`/`max` are the raw extremes the axis reaches (observed during
/// auto-calibration or configured from a known device); `deadzone_min`/
/// `deadzone_max` trim the usable band inside that range so a slightly
/// drifting sensor still rests at exactly 0.0 and reaches exactly 1.0.
/// `inverted` flips the output for axes wired with the potentiometer
/// reversed.
///
/// # Examples
///
/// ```
/// use simrig_calibration::AxisCalibration;
///
/// let cal = AxisCalibration::new(100, 900)?;
/// assert_eq!(cal.apply(100), 0.0);
/// assert_eq!(cal.apply(500), 0.5);
/// assert_eq!(cal.apply(950), 1.0); // clamped
/// # Ok::<(), simrig_calibration::CalibrationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCalibration {
    /// Lowest raw value the axis reaches.
    pub min: u16,
    /// Highest raw value the axis reaches.
    pub max: u16,
    /// Raw samples at or below this value map to 0.0.
    pub deadzone_min: u16,
    /// Raw samples at or above this value map to 1.0.
    pub deadzone_max: u16,
    /// Whether the electrical direction of the axis is reversed.
    pub inverted: bool,
}

impl Default for AxisCalibration {
    fn default() -> Self {
        Self {
            min: 0,
            max: ADC_MAX,
            deadzone_min: 0,
            deadzone_max: ADC_MAX,
            inverted: false,
        }
    }
}

impl AxisCalibration {
    /// Creates a calibration covering `min..=max` with no deadzone.
    ///
    /// `min >= max` is a configuration error: it would make normalization
    /// divide by zero, so it is rejected here rather than producing NaN at
    /// runtime.
    pub fn new(min: u16, max: u16) -> CalibrationResult<Self> {
        if min >= max {
            return Err(CalibrationError::InvalidRange { min, max });
        }
        Ok(Self {
            min,
            max,
            deadzone_min: min,
            deadzone_max: max,
            inverted: false,
        })
    }

    /// Sets the deadzone boundaries in raw units.
    ///
    /// Samples at or below `low` collapse to 0.0; at or above `high`, to
    /// 1.0; the band in between remaps continuously over the full output
    /// range.
    pub fn with_deadzone(mut self, low: u16, high: u16) -> CalibrationResult<Self> {
        if low < self.min || high > self.max || low >= high {
            return Err(CalibrationError::InvalidDeadzone {
                low,
                high,
                min: self.min,
                max: self.max,
            });
        }
        self.deadzone_min = low;
        self.deadzone_max = high;
        Ok(self)
    }

    /// Marks the axis direction as reversed.
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Builds a calibration from a measured range plus deadzone percentages.
    ///
    /// This is the arithmetic a calibration tool performs after recording
    /// the resting and fully-engaged raw values: `low_pct` of the travel is
    /// cut at the resting end (so the axis is never "slightly pressed") and
    /// `high_pct` at the far end (so full travel is always reachable).
    pub fn from_range_with_deadzone(
        min: u16,
        max: u16,
        low_pct: f32,
        high_pct: f32,
    ) -> CalibrationResult<Self> {
        for pct in [low_pct, high_pct] {
            if !(0.0..=1.0).contains(&pct) {
                return Err(CalibrationError::InvalidPercent(pct));
            }
        }

        let cal = Self::new(min, max)?;
        let span = f32::from(max - min);
        let low = min + (span * low_pct).round() as u16;
        let high = max - (span * high_pct).round() as u16;
        cal.with_deadzone(low, high)
    }

    /// Converts a raw sample to a normalized position in `[0.0, 1.0]`.
    ///
    /// The output is a monotonic, clamped linear function of the raw sample:
    /// samples outside the calibrated range clamp to the nearest bound, the
    /// deadzone band collapses to its boundary value, and inversion flips
    /// the result.
    pub fn apply(&self, raw: u16) -> f32 {
        let span = f32::from(self.max) - f32::from(self.min);
        let norm = ((f32::from(raw) - f32::from(self.min)) / span).clamp(0.0, 1.0);

        let dz_low = (f32::from(self.deadzone_min) - f32::from(self.min)) / span;
        let dz_high = (f32::from(self.deadzone_max) - f32::from(self.min)) / span;

        let position = if norm <= dz_low {
            0.0
        } else if norm >= dz_high {
            1.0
        } else {
            (norm - dz_low) / (dz_high - dz_low)
        };

        if self.inverted { 1.0 - position } else { position }
    }

    /// Grows the calibrated range to include a newly observed extreme.
    ///
    /// Deadzone boundaries that sat exactly on the old range edge follow it
    /// outward, so auto-calibration never introduces a deadzone the
    /// configuration didn't ask for.
    pub fn expand(&mut self, raw: u16) {
        if raw < self.min {
            if self.deadzone_min == self.min {
                self.deadzone_min = raw;
            }
            self.min = raw;
        }
        if raw > self.max {
            if self.deadzone_max == self.max {
                self.deadzone_max = raw;
            }
            self.max = raw;
        }
    }

    /// The raw value the axis rests at when released.
    pub fn rest_raw(&self) -> u16 {
        if self.inverted { self.max } else { self.min }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_range() {
        assert!(matches!(
            AxisCalibration::new(500, 500),
            Err(CalibrationError::InvalidRange { min: 500, max: 500 })
        ));
        assert!(AxisCalibration::new(501, 500).is_err());
    }

    #[test]
    fn test_apply_clamps_at_bounds() -> CalibrationResult<()> {
        let cal = AxisCalibration::new(100, 900)?;

        assert!((cal.apply(100) - 0.0).abs() < f32::EPSILON);
        assert!((cal.apply(500) - 0.5).abs() < 0.001);
        assert!((cal.apply(900) - 1.0).abs() < f32::EPSILON);

        // outside the range clamps, never extrapolates
        assert!((cal.apply(0) - 0.0).abs() < f32::EPSILON);
        assert!((cal.apply(950) - 1.0).abs() < f32::EPSILON);
        Ok(())
    }

    #[test]
    fn test_apply_inverted_flips_output() -> CalibrationResult<()> {
        let cal = AxisCalibration::new(100, 900)?.with_inverted(true);

        assert!((cal.apply(100) - 1.0).abs() < f32::EPSILON);
        assert!((cal.apply(900) - 0.0).abs() < f32::EPSILON);
        assert!((cal.apply(500) - 0.5).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_deadzone_collapses_to_boundary() -> CalibrationResult<()> {
        let cal = AxisCalibration::new(0, 1000)?.with_deadzone(100, 900)?;

        assert!((cal.apply(50) - 0.0).abs() < f32::EPSILON);
        assert!((cal.apply(100) - 0.0).abs() < f32::EPSILON);
        assert!((cal.apply(900) - 1.0).abs() < f32::EPSILON);
        assert!((cal.apply(950) - 1.0).abs() < f32::EPSILON);

        // the band in between still spans the whole output range
        assert!((cal.apply(500) - 0.5).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_deadzone_must_fit_range() -> CalibrationResult<()> {
        let cal = AxisCalibration::new(100, 900)?;
        assert!(cal.with_deadzone(50, 800).is_err());
        assert!(cal.with_deadzone(100, 950).is_err());
        assert!(cal.with_deadzone(400, 400).is_err());
        Ok(())
    }

    #[test]
    fn test_from_range_with_deadzone() -> CalibrationResult<()> {
        // 1% and 2.5%, the customary pedal-travel trims
        let cal = AxisCalibration::from_range_with_deadzone(0, 1000, 0.01, 0.025)?;
        assert_eq!(cal.deadzone_min, 10);
        assert_eq!(cal.deadzone_max, 975);

        assert!(AxisCalibration::from_range_with_deadzone(0, 1000, -0.1, 0.0).is_err());
        assert!(AxisCalibration::from_range_with_deadzone(0, 1000, 0.0, 1.5).is_err());
        Ok(())
    }

    #[test]
    fn test_expand_grows_range() -> CalibrationResult<()> {
        let mut cal = AxisCalibration::new(400, 600)?;

        cal.expand(300);
        cal.expand(700);
        assert_eq!(cal.min, 300);
        assert_eq!(cal.max, 700);
        // deadzone edges followed the range outward
        assert_eq!(cal.deadzone_min, 300);
        assert_eq!(cal.deadzone_max, 700);

        // in-range samples change nothing
        cal.expand(500);
        assert_eq!((cal.min, cal.max), (300, 700));
        Ok(())
    }

    #[test]
    fn test_expand_preserves_configured_deadzone() -> CalibrationResult<()> {
        let mut cal = AxisCalibration::new(400, 600)?.with_deadzone(420, 580)?;

        cal.expand(300);
        assert_eq!(cal.min, 300);
        assert_eq!(cal.deadzone_min, 420);
        Ok(())
    }

    #[test]
    fn test_rest_raw_respects_inversion() -> CalibrationResult<()> {
        let cal = AxisCalibration::new(48, 904)?;
        assert_eq!(cal.rest_raw(), 48);

        let cal = cal.with_inverted(true);
        assert_eq!(cal.rest_raw(), 904);
        assert!((cal.apply(cal.rest_raw()) - 0.0).abs() < f32::EPSILON);
        Ok(())
    }

    #[test]
    fn test_serde_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let cal = AxisCalibration::new(100, 900)?
            .with_deadzone(110, 880)?
            .with_inverted(true);

        let json = serde_json::to_string(&cal)?;
        let back: AxisCalibration = serde_json::from_str(&json)?;
        assert_eq!(cal, back);
        Ok(())
    }

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(500))]

        #[test]
        fn prop_apply_is_within_unit_range(
            min in 0u16..1000,
            spread in 1u16..=1000,
            raw in 0u16..=2047,
        ) {
            let cal = AxisCalibration::new(min, min + spread)
                .expect("spread is at least 1");
            let out = cal.apply(raw);
            prop_assert!(out >= 0.0, "output {} must be >= 0", out);
            prop_assert!(out <= 1.0, "output {} must be <= 1", out);
            prop_assert!(out.is_finite());
        }

        #[test]
        fn prop_apply_is_monotonic(
            min in 0u16..1000,
            spread in 1u16..=1000,
            a in 0u16..=2047,
            b in 0u16..=2047,
        ) {
            let cal = AxisCalibration::new(min, min + spread)
                .expect("spread is at least 1");
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(cal.apply(lo) <= cal.apply(hi));
        }

        #[test]
        fn prop_expand_always_contains_sample(
            min in 100u16..900,
            spread in 1u16..100,
            raw in 0u16..=2047,
        ) {
            let mut cal = AxisCalibration::new(min, min + spread)
                .expect("spread is at least 1");
            cal.expand(raw);
            prop_assert!(cal.min <= raw && raw <= cal.max);
            prop_assert!(cal.min < cal.max);
        }
    }
}
