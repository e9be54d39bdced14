//! Presence detection with debounced plug-in

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Connection state of a peripheral as seen by its consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Debounced presence tracker.
///
/// Cheap cable detection lines bounce while a plug is being seated, so a
/// device only counts as connected once its presence signal has been stable
/// for the configured period. Loss of presence disconnects immediately —
/// reporting positions from an unplugged harness is worse than a late
/// plug-in.
///
/// The detector starts out `Connected` so that devices wired without a
/// detection line (presence permanently high) are usable from the first
/// poll, without an arbitrary startup delay.
#[derive(Debug, Clone)]
pub struct PresenceDetector {
    stable_period: Duration,
    present: bool,
    last_change: Option<Instant>,
    connected: bool,
}

impl PresenceDetector {
    /// Default time the presence line must be stable before a device counts
    /// as plugged in.
    pub const DEFAULT_STABLE_PERIOD: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_stable_period(Self::DEFAULT_STABLE_PERIOD)
    }

    pub fn with_stable_period(stable_period: Duration) -> Self {
        Self {
            stable_period,
            present: true,
            last_change: None,
            connected: true,
        }
    }

    /// Feeds one presence sample into the state machine.
    ///
    /// `now` is injected rather than read internally so the debounce window
    /// can be tested without sleeping.
    pub fn poll(&mut self, present: bool, now: Instant) -> ConnectionState {
        if present != self.present {
            self.present = present;
            self.last_change = Some(now);
            if !present {
                tracing::debug!("presence lost, disconnecting");
                self.connected = false;
            }
        } else if present && !self.connected {
            let stable = match self.last_change {
                Some(changed_at) => now.duration_since(changed_at) >= self.stable_period,
                None => true,
            };
            if stable {
                tracing::debug!(stable_period = ?self.stable_period, "presence stable, connecting");
                self.connected = true;
            }
        }

        self.state()
    }

    pub fn state(&self) -> ConnectionState {
        if self.connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Changes how long the presence line must be stable before a plug-in
    /// registers. An already connected device stays connected.
    pub fn set_stable_period(&mut self, stable_period: Duration) {
        self.stable_period = stable_period;
    }
}

impl Default for PresenceDetector {
    fn default() -> Self {
        Self::new()
    }
}
