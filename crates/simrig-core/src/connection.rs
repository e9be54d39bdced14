//! Raw signal source capability

use serde::{Deserialize, Serialize};

/// Identifier for one analog (ADC) channel on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalogPin(pub u8);

/// Identifier for one digital line on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DigitalPin(pub u8);

/// Abstract source of raw electrical signals for one wiring harness.
///
/// Reads are bounded-time and non-blocking; a read on a disconnected or
/// floating line returns whatever the hardware reports, and it is the
/// peripheral's job to gate those reads behind presence detection.
///
/// One connection may back several peripherals fanning out from the same
/// physical bus. Peripherals hold non-owning handles (`&T` or `Arc<T>`, both
/// of which implement this trait); the integration layer owns the connection
/// and manages its lifetime.
pub trait DeviceConnection {
    /// Reads the raw sample from an analog channel.
    fn read_analog(&self, pin: AnalogPin) -> u16;

    /// Reads the state of a digital line.
    fn read_digital(&self, pin: DigitalPin) -> bool;

    /// Reads the parallel button word from a shift-register bus, MSB first.
    ///
    /// Connections without a register bus report an empty word.
    fn read_shift_register(&self) -> u16 {
        0
    }

    /// Whether a device is electrically present on this connection.
    fn is_present(&self) -> bool;
}

impl<T: DeviceConnection + ?Sized> DeviceConnection for &T {
    fn read_analog(&self, pin: AnalogPin) -> u16 {
        (**self).read_analog(pin)
    }

    fn read_digital(&self, pin: DigitalPin) -> bool {
        (**self).read_digital(pin)
    }

    fn read_shift_register(&self) -> u16 {
        (**self).read_shift_register()
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<T: DeviceConnection + ?Sized> DeviceConnection for std::sync::Arc<T> {
    fn read_analog(&self, pin: AnalogPin) -> u16 {
        (**self).read_analog(pin)
    }

    fn read_digital(&self, pin: DigitalPin) -> bool {
        (**self).read_digital(pin)
    }

    fn read_shift_register(&self) -> u16 {
        (**self).read_shift_register()
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

pub mod mock {
    //! Scriptable connection for tests and examples.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A [`DeviceConnection`] whose signals are set programmatically.
    pub struct MockConnection {
        analog: Mutex<HashMap<u8, u16>>,
        digital: Mutex<HashMap<u8, bool>>,
        register: Mutex<u16>,
        present: Mutex<bool>,
    }

    impl MockConnection {
        pub fn new() -> Self {
            Self {
                analog: Mutex::new(HashMap::new()),
                digital: Mutex::new(HashMap::new()),
                register: Mutex::new(0),
                present: Mutex::new(true),
            }
        }

        /// Sets the raw sample an analog channel will report.
        pub fn set_analog(&self, pin: AnalogPin, raw: u16) {
            let mut analog = self.analog.lock().unwrap_or_else(|e| e.into_inner());
            analog.insert(pin.0, raw);
        }

        /// Sets the state a digital line will report.
        pub fn set_digital(&self, pin: DigitalPin, high: bool) {
            let mut digital = self.digital.lock().unwrap_or_else(|e| e.into_inner());
            digital.insert(pin.0, high);
        }

        /// Sets the shift-register button word.
        pub fn set_shift_register(&self, word: u16) {
            let mut register = self.register.lock().unwrap_or_else(|e| e.into_inner());
            *register = word;
        }

        /// Simulates pulling the plug.
        pub fn unplug(&self) {
            let mut present = self.present.lock().unwrap_or_else(|e| e.into_inner());
            *present = false;
        }

        /// Simulates plugging the device back in.
        pub fn replug(&self) {
            let mut present = self.present.lock().unwrap_or_else(|e| e.into_inner());
            *present = true;
        }
    }

    impl Default for MockConnection {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DeviceConnection for MockConnection {
        fn read_analog(&self, pin: AnalogPin) -> u16 {
            let analog = self.analog.lock().unwrap_or_else(|e| e.into_inner());
            analog.get(&pin.0).copied().unwrap_or(0)
        }

        fn read_digital(&self, pin: DigitalPin) -> bool {
            let digital = self.digital.lock().unwrap_or_else(|e| e.into_inner());
            digital.get(&pin.0).copied().unwrap_or(false)
        }

        fn read_shift_register(&self) -> u16 {
            *self.register.lock().unwrap_or_else(|e| e.into_inner())
        }

        fn is_present(&self) -> bool {
            *self.present.lock().unwrap_or_else(|e| e.into_inner())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockConnection;
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_mock_defaults() {
        let conn = MockConnection::new();
        assert_eq!(conn.read_analog(AnalogPin(0)), 0);
        assert!(!conn.read_digital(DigitalPin(0)));
        assert_eq!(conn.read_shift_register(), 0);
        assert!(conn.is_present());
    }

    #[test]
    fn test_mock_scripting() {
        let conn = MockConnection::new();
        conn.set_analog(AnalogPin(2), 512);
        conn.set_digital(DigitalPin(7), true);
        conn.set_shift_register(0x4001);

        assert_eq!(conn.read_analog(AnalogPin(2)), 512);
        assert!(conn.read_digital(DigitalPin(7)));
        assert_eq!(conn.read_shift_register(), 0x4001);

        conn.unplug();
        assert!(!conn.is_present());
        conn.replug();
        assert!(conn.is_present());
    }

    #[test]
    fn test_shared_handle_sees_updates() {
        // one connection shared by two handles, like two peripherals on a bus
        let conn = Arc::new(MockConnection::new());
        let handle: Arc<MockConnection> = Arc::clone(&conn);

        conn.set_analog(AnalogPin(1), 900);
        assert_eq!(handle.read_analog(AnalogPin(1)), 900);

        conn.unplug();
        assert!(!handle.is_present());
    }

    #[test]
    fn test_borrowed_handle_is_a_connection() {
        fn read_via_generic<C: DeviceConnection>(conn: C) -> u16 {
            conn.read_analog(AnalogPin(0))
        }

        let conn = MockConnection::new();
        conn.set_analog(AnalogPin(0), 321);
        assert_eq!(read_via_generic(&conn), 321);
    }

    #[test]
    fn test_default_shift_register_is_empty() {
        struct BareConnection;

        impl DeviceConnection for BareConnection {
            fn read_analog(&self, _pin: AnalogPin) -> u16 {
                0
            }

            fn read_digital(&self, _pin: DigitalPin) -> bool {
                false
            }

            fn is_present(&self) -> bool {
                true
            }
        }

        assert_eq!(BareConnection.read_shift_register(), 0);
    }
}
