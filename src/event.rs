//! Change notifications.
//!
//! A poll diffs the freshly read device state against the previous one and
//! reports every transition as a [`ChangeEvent`]. Events are edge-triggered:
//! a button that stays down produces exactly one `ButtonChanged { down: true }`.
//!
//! ## Value conventions
//! - **Buttons:** device-local index, `down` is the new state.
//! - **Directions:** each of Left/Right/Up/Down is its own line, so diagonals are two
//!   independent events. Gamepads also report Back and Start here.
//! - **Analog:** paddle positions are the raw axis shifted into `0..=2*axis_range`;
//!   the driving controller reports a [`DrivingPosition`] code; triggers report `0..=255`.
//! - **Mode:** Daptor II mode, `-1` when the mode switch reads an unknown value.

use serde::{Deserialize, Serialize};

/// Directional lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Back,
    Start,
}

/// Source of an [`ChangeEvent::AnalogPositionChanged`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalogChannel {
    /// Driving controller; the position is a [`DrivingPosition`] code.
    Driving,
    /// Paddle 0 (X axis) or 1 (Y axis).
    Paddle(u8),
    /// Gamepad trigger 0 (left) or 1 (right).
    Trigger(u8),
}

/// Four-way discretization of the Y axis used by driving controllers.
///
/// The numeric codes are the ones hosts index their driving tables with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum DrivingPosition {
    Center = 0,
    Full = 1,
    Half = 2,
    Up = 3,
}

impl DrivingPosition {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Center),
            1 => Some(Self::Full),
            2 => Some(Self::Half),
            3 => Some(Self::Up),
            _ => None,
        }
    }
}

/// Daptor II mode switch position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaptorMode {
    Atari2600,
    Atari7800,
    Keypad,
    Unknown,
}

impl DaptorMode {
    /// `0`, `1`, `2`, or `-1` for unknown.
    pub fn code(self) -> i32 {
        match self {
            Self::Atari2600 => 0,
            Self::Atari7800 => 1,
            Self::Keypad => 2,
            Self::Unknown => -1,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Atari2600,
            1 => Self::Atari7800,
            2 => Self::Keypad,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Atari2600 => Some("2600 mode"),
            Self::Atari7800 => Some("7800 mode"),
            Self::Keypad => Some("Keypad mode"),
            Self::Unknown => None,
        }
    }
}

/// One detected transition. Built during a poll, handed to the sink, then dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    ButtonChanged { button: u8, down: bool },
    DirectionalChanged { direction: Direction, down: bool },
    AnalogPositionChanged { channel: AnalogChannel, position: i32 },
    /// New mode code (`-1` = unknown).
    ModeChanged { mode: i32 },
}

impl ChangeEvent {
    /// Driving position carried by a driving-channel event.
    pub fn driving_position(&self) -> Option<DrivingPosition> {
        match *self {
            ChangeEvent::AnalogPositionChanged {
                channel: AnalogChannel::Driving,
                position,
            } => DrivingPosition::from_code(position),
            _ => None,
        }
    }
}

/// A [`ChangeEvent`] tagged with the controller slot it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerEvent {
    pub controller: usize,
    pub event: ChangeEvent,
}
