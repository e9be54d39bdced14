//! Gear identity

use serde::{Deserialize, Serialize};

/// A gear position.
///
/// Forward gears are numbered from 1; `Neutral` doubles as the "no gear
/// engaged" output of every decoder, so a shifter is never stuck reporting a
/// stale gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gear {
    Reverse,
    #[default]
    Neutral,
    Forward(u8),
}

impl Gear {
    /// Single-character tag for compact telemetry displays: `r`, `n`, or the
    /// gear digit.
    pub fn as_char(self) -> char {
        match self {
            Gear::Reverse => 'r',
            Gear::Neutral => 'n',
            Gear::Forward(n @ 1..=9) => char::from(b'0' + n),
            Gear::Forward(_) => '?',
        }
    }

    pub fn is_engaged(self) -> bool {
        self != Gear::Neutral
    }
}

impl std::fmt::Display for Gear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Gear::Reverse => f.write_str("reverse"),
            Gear::Neutral => f.write_str("neutral"),
            Gear::Forward(n) => match n {
                1 => f.write_str("1st"),
                2 => f.write_str("2nd"),
                3 => f.write_str("3rd"),
                n => write!(f, "{n}th"),
            },
        }
    }
}
