//! G27 shift-register button word

use simrig_core::DeviceConnection;

/// Buttons on the G27 shifter base, as bit offsets from the LSB of the
/// 16-bit shift-register word (read MSB first).
///
/// The red buttons are numbered left to right across the front; the black
/// buttons use cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum G27Button {
    DpadUp = 0,
    DpadDown = 1,
    DpadLeft = 2,
    DpadRight = 3,
    South = 4,
    West = 5,
    East = 6,
    North = 7,
    Red1 = 8,
    Red4 = 9,
    Red2 = 10,
    Red3 = 11,
    /// Sequential mode dial, turned counter-clockwise.
    Sequential = 12,
    /// Reverse interlock, the knob pressed down.
    Reverse = 14,
}

impl G27Button {
    pub fn bit(self) -> u8 {
        self as u8
    }
}

/// Cached view of the G27 button word.
///
/// Presence handling belongs to the shifter sharing this connection; the pad
/// only caches the word so buttons read consistently between updates.
pub struct G27ButtonPad<C: DeviceConnection> {
    conn: C,
    word: u16,
    prev_word: u16,
}

impl<C: DeviceConnection> G27ButtonPad<C> {
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            word: 0,
            prev_word: 0,
        }
    }

    /// Rereads the button word. Returns `true` if any button changed.
    pub fn update(&mut self) -> bool {
        self.prev_word = self.word;
        self.word = self.conn.read_shift_register();
        self.word != self.prev_word
    }

    pub fn button_word(&self) -> u16 {
        self.word
    }

    pub fn button(&self, button: G27Button) -> bool {
        self.word & (1u16 << button.bit()) != 0
    }

    pub fn button_changed(&self, button: G27Button) -> bool {
        (self.word ^ self.prev_word) & (1u16 << button.bit()) != 0
    }

    /// Directional pad as a hat-switch angle in degrees, clockwise from up,
    /// or `-1` when nothing (or only opposing directions) is pressed.
    ///
    /// Simultaneous opposing cardinal directions cancel: the pad is for menu
    /// navigation, and a half-broken contact should read as centered rather
    /// than as whichever direction wins a scan-order race.
    pub fn dpad_angle(&self) -> i16 {
        // bitfield to hat position, 0-7 clockwise from up, 8 for centered
        const HAT_TABLE: [u8; 16] = [
            8, // none
            0, // up
            2, // right
            1, // up + right
            4, // down
            8, // down + up cancel
            3, // down + right
            2, // down + right + up, verticals cancel
            6, // left
            7, // left + up
            8, // left + right cancel
            0, // left + right + up, horizontals cancel
            5, // left + down
            6, // left + down + up, verticals cancel
            4, // left + down + right, horizontals cancel
            8, // everything cancels
        ];

        let directions = [
            G27Button::DpadUp,
            G27Button::DpadRight,
            G27Button::DpadDown,
            G27Button::DpadLeft,
        ];
        let mut nybble = 0usize;
        for (i, button) in directions.iter().enumerate() {
            nybble |= usize::from(self.button(*button)) << i;
        }

        match HAT_TABLE[nybble] {
            8 => -1,
            position => i16::from(position) * 45,
        }
    }
}
