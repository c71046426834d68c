//! Controller events to emulated machine inputs.
//!
//! [`HostBinding`] turns [`ControllerEvent`]s into the [`HostInput`]s an Atari
//! host understands. Button meaning depends on the Daptor II mode of the jack,
//! which the binding tracks from `ModeChanged` events. [`ControllerSet`] reports
//! the mode of a freshly attached or reconnected adapter on its first poll; after
//! swapping devices, call [`HostBinding::sync`] so a slot does not keep the old
//! device's mode.
//!
//! | mode | buttons |
//! |---|---|
//! | 2600 (and anything unknown) | 0 is Fire, 1 is Fire2 |
//! | 7800 | 2 is Fire, 3 is Fire2 |
//! | keypad | button index selects a keypad key |
//!
//! Paddle and driving positions are dropped in 7800 and keypad mode.

use crate::config::Calibration;
use crate::event::{AnalogChannel, ChangeEvent, ControllerEvent, DaptorMode, Direction};
use crate::manager::{ControllerSet, MAX_CONTROLLERS};
use serde::{Deserialize, Serialize};

/// Emulated controller lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineInput {
    Fire,
    Fire2,
    Left,
    Right,
    Up,
    Down,
    End,
    Start,
    NumPad0,
    NumPad1,
    NumPad2,
    NumPad3,
    NumPad4,
    NumPad5,
    NumPad6,
    NumPad7,
    NumPad8,
    NumPad9,
    NumPadMult,
    NumPadHash,
    Driving0,
    Driving1,
    Driving2,
    Driving3,
}

const DRIVING_INPUTS: [MachineInput; 4] = [
    MachineInput::Driving0,
    MachineInput::Driving1,
    MachineInput::Driving2,
    MachineInput::Driving3,
];

const KEYPAD_INPUTS: [MachineInput; 16] = [
    MachineInput::NumPad1,
    MachineInput::NumPad2,
    MachineInput::NumPad3,
    MachineInput::NumPad4,
    MachineInput::NumPad5,
    MachineInput::NumPad6,
    MachineInput::NumPad7,
    MachineInput::NumPad8,
    MachineInput::NumPad9,
    MachineInput::NumPadMult,
    MachineInput::NumPad0,
    MachineInput::NumPadHash,
    MachineInput::NumPad0,
    MachineInput::NumPad0,
    MachineInput::NumPad0,
    MachineInput::NumPad0,
];

/// Something the host should apply to its emulated machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostInput {
    /// Standard joystick line.
    Joystick {
        player: usize,
        input: MachineInput,
        down: bool,
    },
    /// ProLine (7800) joystick line. Its fire buttons are swapped relative to the standard stick.
    ProLine {
        player: usize,
        input: MachineInput,
        down: bool,
    },
    Paddle {
        player: usize,
        range: i32,
        position: i32,
    },
    Driving {
        player: usize,
        input: MachineInput,
    },
}

pub struct HostBinding {
    modes: [DaptorMode; MAX_CONTROLLERS],
    paddle_range: i32,
}

impl HostBinding {
    pub fn new(calibration: &Calibration) -> Self {
        Self {
            modes: [DaptorMode::Atari2600; MAX_CONTROLLERS],
            // Adapters only swing about a third of the full paddle travel.
            paddle_range: calibration.axis_range * 2 * 34 / 100,
        }
    }

    pub fn mode(&self, controller: usize) -> DaptorMode {
        self.modes[controller % MAX_CONTROLLERS]
    }

    pub fn set_mode(&mut self, controller: usize, mode: DaptorMode) {
        self.modes[controller % MAX_CONTROLLERS] = mode;
    }

    /// Take every slot's mode from `set`. Slots without a mode switch map as 2600.
    pub fn sync(&mut self, set: &ControllerSet) {
        for controller in 0..MAX_CONTROLLERS {
            let mode = set.mode(controller).map_or(DaptorMode::Atari2600, DaptorMode::from_code);
            self.modes[controller] = mode;
        }
    }

    pub fn paddle_range(&self) -> i32 {
        self.paddle_range
    }

    /// Host inputs for one event, in the order they should be applied.
    pub fn translate(&mut self, event: &ControllerEvent) -> Vec<HostInput> {
        let player = event.controller;
        match event.event {
            ChangeEvent::ModeChanged { mode } => {
                self.set_mode(player, DaptorMode::from_code(mode));
                Vec::new()
            }
            ChangeEvent::ButtonChanged { button, down } => self.button(player, button, down),
            ChangeEvent::DirectionalChanged { direction, down } => direction_inputs(player, direction, down),
            ChangeEvent::AnalogPositionChanged { channel, position } => {
                if matches!(self.mode(player), DaptorMode::Atari7800 | DaptorMode::Keypad) {
                    return Vec::new();
                }
                match channel {
                    AnalogChannel::Driving => vec![HostInput::Driving {
                        player,
                        input: DRIVING_INPUTS[(position & 3) as usize],
                    }],
                    AnalogChannel::Paddle(paddle) => vec![HostInput::Paddle {
                        player: (player << 1) | usize::from(paddle & 1),
                        range: self.paddle_range,
                        position,
                    }],
                    AnalogChannel::Trigger(_) => Vec::new(),
                }
            }
        }
    }

    fn button(&self, player: usize, button: u8, down: bool) -> Vec<HostInput> {
        let (fire, fire2) = match self.mode(player) {
            DaptorMode::Keypad => {
                return vec![HostInput::Joystick {
                    player,
                    input: KEYPAD_INPUTS[usize::from(button & 0xf)],
                    down,
                }];
            }
            DaptorMode::Atari7800 => (2, 3),
            DaptorMode::Atari2600 | DaptorMode::Unknown => (0, 1),
        };
        let (stick, proline) = if button == fire {
            (MachineInput::Fire, MachineInput::Fire2)
        } else if button == fire2 {
            (MachineInput::Fire2, MachineInput::Fire)
        } else {
            return Vec::new();
        };
        vec![
            HostInput::Joystick {
                player,
                input: stick,
                down,
            },
            HostInput::ProLine {
                player,
                input: proline,
                down,
            },
        ]
    }
}

fn direction_inputs(player: usize, direction: Direction, down: bool) -> Vec<HostInput> {
    let input = match direction {
        Direction::Left => MachineInput::Left,
        Direction::Right => MachineInput::Right,
        Direction::Up => MachineInput::Up,
        Direction::Down => MachineInput::Down,
        Direction::Back => {
            return vec![HostInput::Joystick {
                player,
                input: MachineInput::End,
                down,
            }]
        }
        Direction::Start => {
            return vec![HostInput::Joystick {
                player,
                input: MachineInput::Start,
                down,
            }]
        }
    };
    vec![
        HostInput::Joystick {
            player,
            input,
            down,
        },
        HostInput::ProLine {
            player,
            input,
            down,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(controller: usize, event: ChangeEvent) -> ControllerEvent {
        ControllerEvent { controller, event }
    }

    fn button(controller: usize, button: u8) -> ControllerEvent {
        ev(controller, ChangeEvent::ButtonChanged { button, down: true })
    }

    fn binding() -> HostBinding {
        HostBinding::new(&Calibration::default())
    }

    #[test]
    fn regular_mode_fire_buttons() {
        let mut b = binding();
        assert_eq!(
            b.translate(&button(1, 0)),
            vec![
                HostInput::Joystick { player: 1, input: MachineInput::Fire, down: true },
                HostInput::ProLine { player: 1, input: MachineInput::Fire2, down: true },
            ]
        );
        assert_eq!(
            b.translate(&button(1, 1))[0],
            HostInput::Joystick { player: 1, input: MachineInput::Fire2, down: true }
        );
        assert!(b.translate(&button(1, 2)).is_empty());
    }

    #[test]
    fn mode_7800_moves_fire_to_buttons_2_and_3() {
        let mut b = binding();
        b.translate(&ev(0, ChangeEvent::ModeChanged { mode: 1 }));
        assert_eq!(b.mode(0), DaptorMode::Atari7800);
        assert!(b.translate(&button(0, 0)).is_empty());
        assert_eq!(
            b.translate(&button(0, 2))[0],
            HostInput::Joystick { player: 0, input: MachineInput::Fire, down: true }
        );
        assert_eq!(
            b.translate(&button(0, 3))[1],
            HostInput::ProLine { player: 0, input: MachineInput::Fire, down: true }
        );
        // The other jack is unaffected.
        assert_eq!(b.translate(&button(1, 0)).len(), 2);
    }

    #[test]
    fn keypad_mode_table() {
        let mut b = binding();
        b.set_mode(0, DaptorMode::Keypad);
        let keys: Vec<MachineInput> = [0u8, 9, 10, 11, 15]
            .iter()
            .map(|&i| match b.translate(&button(0, i))[0] {
                HostInput::Joystick { input, .. } => input,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                MachineInput::NumPad1,
                MachineInput::NumPadMult,
                MachineInput::NumPad0,
                MachineInput::NumPadHash,
                MachineInput::NumPad0,
            ]
        );
    }

    #[test]
    fn paddles_and_driving_dropped_in_7800_and_keypad_mode() {
        let mut b = binding();
        let paddle = ev(
            1,
            ChangeEvent::AnalogPositionChanged { channel: AnalogChannel::Paddle(1), position: 1200 },
        );
        assert_eq!(
            b.translate(&paddle),
            vec![HostInput::Paddle { player: 3, range: 680, position: 1200 }]
        );
        let driving = ev(
            1,
            ChangeEvent::AnalogPositionChanged { channel: AnalogChannel::Driving, position: 2 },
        );
        assert_eq!(
            b.translate(&driving),
            vec![HostInput::Driving { player: 1, input: MachineInput::Driving2 }]
        );

        b.set_mode(1, DaptorMode::Unknown);
        assert_eq!(b.translate(&paddle).len(), 1);
        assert_eq!(b.translate(&driving).len(), 1);

        b.set_mode(1, DaptorMode::Keypad);
        assert!(b.translate(&paddle).is_empty());
        assert!(b.translate(&driving).is_empty());
        b.set_mode(1, DaptorMode::Atari7800);
        assert!(b.translate(&paddle).is_empty());
    }

    #[test]
    fn sync_resets_slots_without_a_mode() {
        let mut b = binding();
        b.set_mode(0, DaptorMode::Keypad);
        b.set_mode(1, DaptorMode::Atari7800);
        b.sync(&ControllerSet::new());
        assert_eq!(b.mode(0), DaptorMode::Atari2600);
        assert_eq!(b.mode(1), DaptorMode::Atari2600);
    }

    #[test]
    fn gamepad_back_and_start() {
        let mut b = binding();
        let back = ev(0, ChangeEvent::DirectionalChanged { direction: Direction::Back, down: true });
        assert_eq!(
            b.translate(&back),
            vec![HostInput::Joystick { player: 0, input: MachineInput::End, down: true }]
        );
        let up = ev(0, ChangeEvent::DirectionalChanged { direction: Direction::Up, down: false });
        assert_eq!(b.translate(&up).len(), 2);
    }
}
