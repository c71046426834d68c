//! Joystick-family poller (generic joysticks and Atari adapters).
//!
//! [`JoystickDevice`] owns a [`RawStateSource`] and a [`StatePair`]. Every
//! [`poll`](JoystickDevice::poll) reads into the current buffer, diffs against the
//! previous one, dispatches the transitions and flips the buffers.
//!
//! # Dispatch order
//! 1. `ButtonChanged` for buttons `0..button_count`, ascending.
//! 2. `DirectionalChanged` for Left, Right, Up, Down.
//! 3. Atari adapters only: driving position, paddle 0 (X), paddle 1 (Y).
//! 4. Daptor II only: `ModeChanged`.
//!
//! # Baseline
//! After [`open`](JoystickDevice::open), [`reset`](JoystickDevice::reset) or a
//! recoverable input loss, the next successful poll only records a baseline and
//! reports nothing. Whatever the device happens to be doing at that moment is
//! treated as the starting state rather than as a burst of edges.

use crate::config::{AdapterNames, Calibration};
use crate::device::{Device, PollStatus, RawStateSource, SourceError};
use crate::error::{Error, Result};
use crate::event::{AnalogChannel, ChangeEvent, Direction};
use crate::eventbus::EventSink;
use crate::interpret;
use crate::metadata::{DeviceIdentity, DeviceKind};
use crate::state::{JoystickState, StatePair};
use tracing::{debug, trace, warn};

const JOYSTICK_DIRECTIONS: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

pub struct JoystickDevice<S> {
    source: S,
    identity: DeviceIdentity,
    calibration: Calibration,
    states: StatePair<JoystickState>,
    primed: bool,
}

impl<S> JoystickDevice<S>
where
    S: RawStateSource<State = JoystickState>,
{
    /// Classify the source by product name and allocate zeroed buffers.
    pub fn open(source: S, calibration: Calibration, names: &AdapterNames) -> Result<Self> {
        calibration.validate()?;
        let identity = DeviceIdentity::classify(source.product_name(), names);
        if identity.kind == DeviceKind::None {
            return Err(Error::InvalidArgument(
                "joystick source reported an empty product name".to_string(),
            ));
        }
        debug!(device = %identity, "opened joystick");
        Ok(Self {
            source,
            identity,
            calibration,
            states: StatePair::new(),
            primed: false,
        })
    }

    pub fn kind(&self) -> DeviceKind {
        self.identity.kind
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Last successfully read state.
    pub fn last_state(&self) -> &JoystickState {
        self.states.previous()
    }

    /// Zero both buffers; the next successful poll establishes a fresh baseline.
    pub fn reset(&mut self) {
        self.states.reset();
        self.primed = false;
    }

    /// Read, diff, dispatch, swap.
    pub fn poll(&mut self, sink: &mut dyn EventSink) -> Result<PollStatus> {
        match self.source.read(self.states.current_mut()) {
            Ok(()) => {}
            Err(SourceError::Unplugged) => {
                trace!(device = %self.identity, "unplugged");
                return Ok(PollStatus::Unplugged);
            }
            Err(SourceError::InputLost) => {
                self.reset();
                match self.source.acquire() {
                    Ok(()) => debug!(device = %self.identity, "input lost, re-acquired"),
                    Err(e) => warn!(device = %self.identity, error = %e, "re-acquire failed"),
                }
                return Ok(PollStatus::RecoverableLoss);
            }
            Err(SourceError::Failed(msg)) => return Err(Error::Platform(msg)),
        }
        self.states.current_mut().buttons &= self.calibration.button_mask();

        if self.primed {
            self.dispatch(sink);
        } else {
            trace!(device = %self.identity, "baseline captured");
            self.primed = true;
        }
        self.states.swap();
        Ok(PollStatus::Ok)
    }

    /// Current Daptor II mode code (`-1` unknown), `None` for devices without a mode switch.
    pub fn mode(&self) -> Option<i32> {
        self.kind()
            .has_mode_switch()
            .then(|| interpret::daptor2_mode(self.states.previous(), &self.calibration).code())
    }

    /// Release the platform handle and hand the source back.
    pub fn close(mut self) -> S {
        self.source.unacquire();
        debug!(device = %self.identity, "closed joystick");
        self.source
    }

    fn dispatch(&self, sink: &mut dyn EventSink) {
        let (prev, curr) = self.states.both();
        let cal = &self.calibration;

        for button in 0..cal.button_count {
            let down = curr.button_down(button);
            if prev.button_down(button) != down {
                sink.on_event(&ChangeEvent::ButtonChanged { button, down });
            }
        }

        for direction in JOYSTICK_DIRECTIONS {
            let down = interpret::joystick_direction(curr, direction, cal);
            if interpret::joystick_direction(prev, direction, cal) != down {
                sink.on_event(&ChangeEvent::DirectionalChanged { direction, down });
            }
        }

        if !self.kind().is_atari_adaptor() {
            return;
        }

        let driving = interpret::driving_position(curr, cal);
        if interpret::driving_position(prev, cal) != driving {
            sink.on_event(&ChangeEvent::AnalogPositionChanged {
                channel: AnalogChannel::Driving,
                position: driving.code(),
            });
        }

        for paddle in 0..2u8 {
            let position = interpret::paddle_position(curr, paddle, cal);
            if interpret::paddle_position(prev, paddle, cal) != position {
                sink.on_event(&ChangeEvent::AnalogPositionChanged {
                    channel: AnalogChannel::Paddle(paddle),
                    position,
                });
            }
        }

        if self.kind().has_mode_switch() {
            let mode = interpret::daptor2_mode(curr, cal);
            if interpret::daptor2_mode(prev, cal) != mode {
                sink.on_event(&ChangeEvent::ModeChanged { mode: mode.code() });
            }
        }
    }
}

impl<S> Device for JoystickDevice<S>
where
    S: RawStateSource<State = JoystickState>,
{
    fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    fn poll(&mut self, sink: &mut dyn EventSink) -> Result<PollStatus> {
        JoystickDevice::poll(self, sink)
    }

    fn reset(&mut self) {
        JoystickDevice::reset(self)
    }

    fn mode(&self) -> Option<i32> {
        JoystickDevice::mode(self)
    }
}
