//! Sequential shift hysteresis

use serde::{Deserialize, Serialize};

use crate::{ShifterError, ShifterResult};

/// State of a sprung sequential lever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SequentialShift {
    Down,
    #[default]
    Neutral,
    Up,
}

/// Hysteresis decoder for a single sprung axis.
///
/// The lever rests near the center of its normalized travel. A push past the
/// engage threshold registers a shift; the lever must come back past the
/// release threshold before another shift in the same direction can
/// register. Engage and release are distinct so sensor noise around one
/// threshold cannot fire twice.
///
/// Thresholds are expressed for the "up" half; the "down" half mirrors them
/// around the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialDecoder {
    engage: f32,
    release: f32,
    state: SequentialShift,
}

impl SequentialDecoder {
    /// Fraction of travel that registers a shift.
    pub const DEFAULT_ENGAGE: f32 = 0.70;
    /// Fraction of travel below which a registered shift releases.
    pub const DEFAULT_RELEASE: f32 = 0.50;

    pub fn new(engage: f32, release: f32) -> ShifterResult<Self> {
        let valid = engage > 0.5 && engage <= 1.0 && release >= 0.5 && release < engage;
        if !(valid && engage.is_finite() && release.is_finite()) {
            return Err(ShifterError::InvalidThresholds { engage, release });
        }
        Ok(Self {
            engage,
            release,
            state: SequentialShift::Neutral,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            engage: Self::DEFAULT_ENGAGE,
            release: Self::DEFAULT_RELEASE,
            state: SequentialShift::Neutral,
        }
    }

    /// Feeds one normalized lever position and returns the resulting state.
    pub fn feed(&mut self, position: f32) -> SequentialShift {
        self.state = match self.state {
            SequentialShift::Neutral => {
                if position >= self.engage {
                    SequentialShift::Up
                } else if position <= 1.0 - self.engage {
                    SequentialShift::Down
                } else {
                    SequentialShift::Neutral
                }
            }
            SequentialShift::Up => {
                if position <= self.release {
                    SequentialShift::Neutral
                } else {
                    SequentialShift::Up
                }
            }
            SequentialShift::Down => {
                if position >= 1.0 - self.release {
                    SequentialShift::Neutral
                } else {
                    SequentialShift::Down
                }
            }
        };
        self.state
    }

    pub fn state(&self) -> SequentialShift {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = SequentialShift::Neutral;
    }
}

impl Default for SequentialDecoder {
    fn default() -> Self {
        Self::with_defaults()
    }
}
