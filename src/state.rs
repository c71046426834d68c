//! Raw per-poll device snapshots and the double buffer they live in.
//!
//! The records here are plain named-field values. Platform adapters fill them in;
//! nothing outside `backends` depends on any native struct layout.

use serde::{Deserialize, Serialize};

/// Snapshot of a joystick-family device (generic HID joystick or Atari adapter).
///
/// Axes are already scaled to `[-axis_range, axis_range]` by the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoystickState {
    /// Bit `i` set means button `i` is down.
    pub buttons: u32,
    pub x: i32,
    pub y: i32,
    /// Third axis. Daptor II adapters report their mode switch here.
    pub z: i32,
}

impl JoystickState {
    /// Bumped whenever a field is added or reinterpreted.
    pub const LAYOUT_VERSION: u16 = 1;

    #[inline]
    pub fn button_down(&self, index: u8) -> bool {
        index < 32 && self.buttons & (1u32 << index) != 0
    }

    pub fn with_button(mut self, index: u8, down: bool) -> Self {
        if index < 32 {
            if down {
                self.buttons |= 1 << index;
            } else {
                self.buttons &= !(1 << index);
            }
        }
        self
    }
}

/// Gamepad button bits (XInput layout).
pub mod pad {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// Snapshot of a modern gamepad controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadState {
    /// Changes whenever the controller state changes.
    pub packet: u32,
    /// See [`pad`] for bit assignments.
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    /// Positive is up.
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl GamepadState {
    pub const LAYOUT_VERSION: u16 = 1;

    #[inline]
    pub fn pressed(&self, mask: u16) -> bool {
        self.buttons & mask != 0
    }
}

/// Two state buffers plus a one-bit selector.
///
/// The "current" slot is filled by a poll, compared against "previous", and then
/// the selector flips so the freshly read state becomes "previous" without a copy.
#[derive(Clone, Debug, Default)]
pub struct StatePair<T> {
    slots: [T; 2],
    current: usize,
}

impl<T: Default> StatePair<T> {
    pub fn new() -> Self {
        Self {
            slots: [T::default(), T::default()],
            current: 0,
        }
    }

    /// Zero both buffers.
    pub fn reset(&mut self) {
        self.slots = [T::default(), T::default()];
        self.current = 0;
    }
}

impl<T> StatePair<T> {
    #[inline]
    pub fn current(&self) -> &T {
        &self.slots[self.current]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut T {
        &mut self.slots[self.current]
    }

    #[inline]
    pub fn previous(&self) -> &T {
        &self.slots[self.current ^ 1]
    }

    /// `(previous, current)`.
    #[inline]
    pub fn both(&self) -> (&T, &T) {
        (self.previous(), self.current())
    }

    /// Make the current buffer the previous one.
    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
    }
}
