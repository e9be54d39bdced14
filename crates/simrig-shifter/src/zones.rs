//! Geometric gear decoding
//!
//! An H-pattern knob position is a point in normalized `(x, y)` space; each
//! gear claims a circular zone around its gate. Decoding is a point-in-zone
//! test, so adding a gear or moving a gate is a data change, not new code.

use serde::{Deserialize, Serialize};

use crate::{Gear, ShifterError, ShifterResult};

/// One gear's circular capture zone in normalized axis space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearZone {
    pub gear: Gear,
    pub x: f32,
    pub y: f32,
    pub tolerance: f32,
}

impl GearZone {
    pub fn new(gear: Gear, x: f32, y: f32, tolerance: f32) -> Self {
        Self { gear, x, y, tolerance }
    }

    /// Whether a point falls inside this zone (boundary inclusive).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        distance_squared(self.x, self.y, x, y) <= self.tolerance * self.tolerance
    }
}

fn distance_squared(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// A validated, ordered set of gear zones.
///
/// Construction rejects tables where two zones overlap, since a knob resting
/// in the overlap would decode differently depending on declaration order.
/// Zones that merely touch are legal; a point exactly on the shared boundary
/// resolves to the first-declared zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTable {
    zones: Vec<GearZone>,
}

impl ZoneTable {
    pub fn new(zones: Vec<GearZone>) -> ShifterResult<Self> {
        if zones.is_empty() {
            return Err(ShifterError::EmptyZoneTable);
        }
        for zone in &zones {
            if !(zone.tolerance > 0.0 && zone.tolerance.is_finite()) {
                return Err(ShifterError::InvalidTolerance {
                    gear: zone.gear,
                    tolerance: zone.tolerance,
                });
            }
        }
        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                let reach = a.tolerance + b.tolerance;
                if distance_squared(a.x, a.y, b.x, b.y) < reach * reach {
                    return Err(ShifterError::OverlappingZones {
                        first: a.gear,
                        second: b.gear,
                    });
                }
            }
        }
        Ok(Self { zones })
    }

    /// Decodes a normalized knob position into a gear.
    ///
    /// A point inside no zone is `Neutral`: between gates the transmission is
    /// disengaged, never in the previous gear.
    pub fn decode(&self, x: f32, y: f32) -> Gear {
        self.zones
            .iter()
            .find(|zone| zone.contains(x, y))
            .map_or(Gear::Neutral, |zone| zone.gear)
    }

    pub fn zones(&self) -> &[GearZone] {
        &self.zones
    }

    /// Whether any zone claims the given gear.
    pub fn has_gear(&self, gear: Gear) -> bool {
        self.zones.iter().any(|zone| zone.gear == gear)
    }
}
