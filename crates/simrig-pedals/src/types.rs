//! Pedal identity

use serde::{Deserialize, Serialize};

/// One pedal position on a pedal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pedal {
    Gas,
    Brake,
    Clutch,
}

impl Pedal {
    pub fn label(self) -> &'static str {
        match self {
            Pedal::Gas => "gas",
            Pedal::Brake => "brake",
            Pedal::Clutch => "clutch",
        }
    }
}

impl std::fmt::Display for Pedal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
