//! Gamepad poller (XInput-style controllers).
//!
//! Same read/diff/dispatch/swap cycle as [`JoystickDevice`](crate::joystick::JoystickDevice),
//! with a fixed button layout:
//!
//! 1. `ButtonChanged` for A, B, X, Y, LB, RB as indices 0 to 5.
//! 2. `DirectionalChanged` for Left, Right, Up, Down, Back, Start. The left thumb
//!    stick counts as the D-pad unless [`GamepadConfig::thumb_as_dpad`] is off.
//! 3. `AnalogPositionChanged` for the left then right trigger.

use crate::config::GamepadConfig;
use crate::device::{Device, PollStatus, RawStateSource, SourceError};
use crate::error::{Error, Result};
use crate::event::{AnalogChannel, ChangeEvent, Direction};
use crate::eventbus::EventSink;
use crate::interpret::{self, GAMEPAD_BUTTONS};
use crate::metadata::DeviceIdentity;
use crate::state::{GamepadState, StatePair};
use tracing::{debug, trace, warn};

const GAMEPAD_DIRECTIONS: [Direction; 6] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
    Direction::Back,
    Direction::Start,
];

pub struct GamepadDevice<S> {
    source: S,
    identity: DeviceIdentity,
    config: GamepadConfig,
    states: StatePair<GamepadState>,
    primed: bool,
}

impl<S> GamepadDevice<S>
where
    S: RawStateSource<State = GamepadState>,
{
    pub fn open(source: S, config: GamepadConfig) -> Result<Self> {
        if config.thumb_dead_zone < 0 {
            return Err(Error::InvalidArgument(
                "thumb_dead_zone must not be negative".to_string(),
            ));
        }
        let identity = DeviceIdentity::gamepad(source.product_name());
        debug!(device = %identity, "opened gamepad");
        Ok(Self {
            source,
            identity,
            config,
            states: StatePair::new(),
            primed: false,
        })
    }

    pub fn last_state(&self) -> &GamepadState {
        self.states.previous()
    }

    pub fn reset(&mut self) {
        self.states.reset();
        self.primed = false;
    }

    pub fn poll(&mut self, sink: &mut dyn EventSink) -> Result<PollStatus> {
        match self.source.read(self.states.current_mut()) {
            Ok(()) => {}
            Err(SourceError::Unplugged) => return Ok(PollStatus::Unplugged),
            Err(SourceError::InputLost) => {
                self.reset();
                if let Err(e) = self.source.acquire() {
                    warn!(device = %self.identity, error = %e, "re-acquire failed");
                }
                return Ok(PollStatus::RecoverableLoss);
            }
            Err(SourceError::Failed(msg)) => return Err(Error::Platform(msg)),
        }

        if self.primed {
            let (prev, curr) = self.states.both();
            if prev != curr {
                self.dispatch(sink);
            }
        } else {
            trace!(device = %self.identity, "baseline captured");
            self.primed = true;
        }
        self.states.swap();
        Ok(PollStatus::Ok)
    }

    pub fn close(mut self) -> S {
        self.source.unacquire();
        debug!(device = %self.identity, "closed gamepad");
        self.source
    }

    fn dispatch(&self, sink: &mut dyn EventSink) {
        let (prev, curr) = self.states.both();

        for (index, &mask) in GAMEPAD_BUTTONS.iter().enumerate() {
            let down = curr.pressed(mask);
            if prev.pressed(mask) != down {
                sink.on_event(&ChangeEvent::ButtonChanged {
                    button: index as u8,
                    down,
                });
            }
        }

        for direction in GAMEPAD_DIRECTIONS {
            let down = interpret::gamepad_direction(curr, direction, &self.config);
            if interpret::gamepad_direction(prev, direction, &self.config) != down {
                sink.on_event(&ChangeEvent::DirectionalChanged { direction, down });
            }
        }

        let triggers = [
            (prev.left_trigger, curr.left_trigger),
            (prev.right_trigger, curr.right_trigger),
        ];
        for (index, (before, after)) in triggers.into_iter().enumerate() {
            if before != after {
                sink.on_event(&ChangeEvent::AnalogPositionChanged {
                    channel: AnalogChannel::Trigger(index as u8),
                    position: i32::from(after),
                });
            }
        }
    }
}

impl<S> Device for GamepadDevice<S>
where
    S: RawStateSource<State = GamepadState>,
{
    fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    fn poll(&mut self, sink: &mut dyn EventSink) -> Result<PollStatus> {
        GamepadDevice::poll(self, sink)
    }

    fn reset(&mut self) {
        GamepadDevice::reset(self)
    }
}
