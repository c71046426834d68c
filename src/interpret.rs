//! Edge-detection policies.
//!
//! Each function interprets a single raw snapshot; the pollers compare the
//! interpretation of the previous and current snapshot and report a change when
//! they differ. All comparisons against the dead zone are strict, so a value
//! sitting exactly on the threshold is still neutral.

use crate::config::{Calibration, GamepadConfig};
use crate::event::{DaptorMode, Direction, DrivingPosition};
use crate::state::{pad, GamepadState, JoystickState};

/// Joystick directional line state from the X/Y axes.
pub fn joystick_direction(state: &JoystickState, direction: Direction, cal: &Calibration) -> bool {
    match direction {
        Direction::Left => state.x < -cal.dead_zone,
        Direction::Right => state.x > cal.dead_zone,
        Direction::Up => state.y < -cal.dead_zone,
        Direction::Down => state.y > cal.dead_zone,
        Direction::Back | Direction::Start => false,
    }
}

/// Driving controller position from the Y axis.
///
/// Breakpoints: `y < -dead_zone` is Up, `y > axis_range - dead_zone` is Full,
/// `y > dead_zone` is Half, anything else is Center.
pub fn driving_position(state: &JoystickState, cal: &Calibration) -> DrivingPosition {
    let y = state.y;
    if y < -cal.dead_zone {
        DrivingPosition::Up
    } else if y > cal.axis_range - cal.dead_zone {
        DrivingPosition::Full
    } else if y > cal.dead_zone {
        DrivingPosition::Half
    } else {
        DrivingPosition::Center
    }
}

/// Paddle position shifted into `0..=2*axis_range`. Even paddles read X, odd read Y.
pub fn paddle_position(state: &JoystickState, paddle: u8, cal: &Calibration) -> i32 {
    let raw = if paddle & 1 == 0 { state.x } else { state.y };
    raw.saturating_add(cal.axis_range)
}

/// Daptor II mode from the third axis.
pub fn daptor2_mode(state: &JoystickState, cal: &Calibration) -> DaptorMode {
    match cal.daptor2_modes.iter().position(|&v| v == state.z) {
        Some(0) => DaptorMode::Atari2600,
        Some(1) => DaptorMode::Atari7800,
        Some(2) => DaptorMode::Keypad,
        _ => DaptorMode::Unknown,
    }
}

/// Gamepad face/shoulder buttons in reporting order: A, B, X, Y, LB, RB.
pub const GAMEPAD_BUTTONS: [u16; 6] = [
    pad::A,
    pad::B,
    pad::X,
    pad::Y,
    pad::LEFT_SHOULDER,
    pad::RIGHT_SHOULDER,
];

/// Gamepad directional line state, optionally folding in the left thumb stick.
pub fn gamepad_direction(state: &GamepadState, direction: Direction, cfg: &GamepadConfig) -> bool {
    let dz = cfg.thumb_dead_zone;
    let thumb = cfg.thumb_as_dpad;
    match direction {
        Direction::Left => state.pressed(pad::DPAD_LEFT) || (thumb && state.thumb_lx < -dz),
        Direction::Right => state.pressed(pad::DPAD_RIGHT) || (thumb && state.thumb_lx > dz),
        Direction::Up => state.pressed(pad::DPAD_UP) || (thumb && state.thumb_ly > dz),
        Direction::Down => state.pressed(pad::DPAD_DOWN) || (thumb && state.thumb_ly < -dz),
        Direction::Back => state.pressed(pad::BACK),
        Direction::Start => state.pressed(pad::START),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn y(v: i32) -> JoystickState {
        JoystickState {
            y: v,
            ..Default::default()
        }
    }

    #[test]
    fn dead_zone_boundary_is_neutral() {
        let cal = Calibration::default();
        let at = JoystickState {
            x: 100,
            y: -100,
            ..Default::default()
        };
        assert!(!joystick_direction(&at, Direction::Right, &cal));
        assert!(!joystick_direction(&at, Direction::Up, &cal));

        let beyond = JoystickState {
            x: 101,
            y: -101,
            ..Default::default()
        };
        assert!(joystick_direction(&beyond, Direction::Right, &cal));
        assert!(joystick_direction(&beyond, Direction::Up, &cal));
        assert!(!joystick_direction(&beyond, Direction::Left, &cal));
        assert!(!joystick_direction(&beyond, Direction::Down, &cal));
    }

    #[test]
    fn driving_partitions() {
        let cal = Calibration::default(); // range 1000, dead zone 100
        assert_eq!(driving_position(&y(-1000), &cal), DrivingPosition::Up);
        assert_eq!(driving_position(&y(-101), &cal), DrivingPosition::Up);
        assert_eq!(driving_position(&y(-100), &cal), DrivingPosition::Center);
        assert_eq!(driving_position(&y(0), &cal), DrivingPosition::Center);
        assert_eq!(driving_position(&y(100), &cal), DrivingPosition::Center);
        assert_eq!(driving_position(&y(101), &cal), DrivingPosition::Half);
        assert_eq!(driving_position(&y(900), &cal), DrivingPosition::Half);
        assert_eq!(driving_position(&y(901), &cal), DrivingPosition::Full);
        assert_eq!(driving_position(&y(1000), &cal), DrivingPosition::Full);
    }

    #[test]
    fn paddles_shift_into_positive_range() {
        let cal = Calibration::default();
        let s = JoystickState {
            x: -1000,
            y: 250,
            ..Default::default()
        };
        assert_eq!(paddle_position(&s, 0, &cal), 0);
        assert_eq!(paddle_position(&s, 1, &cal), 1250);
    }

    #[test]
    fn unscaled_paddle_axis_saturates() {
        let cal = Calibration::default();
        let s = JoystickState {
            x: i32::MAX - 10,
            ..Default::default()
        };
        assert_eq!(paddle_position(&s, 0, &cal), i32::MAX);
    }

    #[test]
    fn mode_lookup() {
        let cal = Calibration::default();
        let z = |z| JoystickState {
            z,
            ..Default::default()
        };
        assert_eq!(daptor2_mode(&z(-1000), &cal), DaptorMode::Atari2600);
        assert_eq!(daptor2_mode(&z(-875), &cal), DaptorMode::Atari7800);
        assert_eq!(daptor2_mode(&z(-750), &cal), DaptorMode::Keypad);
        assert_eq!(daptor2_mode(&z(-874), &cal), DaptorMode::Unknown);
        assert_eq!(daptor2_mode(&z(0), &cal), DaptorMode::Unknown);
    }

    #[test]
    fn thumb_folds_into_dpad() {
        let cfg = GamepadConfig::default();
        let s = GamepadState {
            thumb_lx: 0x4001,
            thumb_ly: -0x4001,
            ..Default::default()
        };
        assert!(gamepad_direction(&s, Direction::Right, &cfg));
        assert!(gamepad_direction(&s, Direction::Down, &cfg));
        assert!(!gamepad_direction(&s, Direction::Up, &cfg));

        let off = GamepadConfig {
            thumb_as_dpad: false,
            ..cfg
        };
        assert!(!gamepad_direction(&s, Direction::Right, &off));
    }
}
