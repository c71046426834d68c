//! Device-facing traits.
//!
//! A [`RawStateSource`] is the narrow adapter to a platform input API: it knows
//! how to read one snapshot and how to re-acquire its handle, nothing more.
//! [`Device`] is what the pollers ([`JoystickDevice`](crate::joystick::JoystickDevice),
//! [`GamepadDevice`](crate::gamepad::GamepadDevice)) expose to the aggregator.

use crate::error::{Error, Result};
use crate::eventbus::EventSink;
use crate::metadata::DeviceIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a [`RawStateSource::read`] produced no snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceError {
    /// Input lost or not acquired. Re-acquiring usually fixes it.
    InputLost,
    /// Device is physically gone.
    Unplugged,
    /// Anything else the platform reported.
    Failed(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::InputLost => f.write_str("input lost"),
            SourceError::Unplugged => f.write_str("unplugged"),
            SourceError::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

impl From<SourceError> for Error {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::InputLost => Error::InputLost,
            SourceError::Unplugged => Error::Unplugged,
            SourceError::Failed(msg) => Error::Platform(msg),
        }
    }
}

/// Platform adapter that supplies one raw snapshot per poll.
pub trait RawStateSource {
    type State;

    /// Product name as reported by the platform.
    fn product_name(&self) -> &str;

    /// Read the current device state into `into`.
    fn read(&mut self, into: &mut Self::State) -> std::result::Result<(), SourceError>;

    /// (Re-)acquire the device handle.
    fn acquire(&mut self) -> std::result::Result<(), SourceError>;

    /// Release the handle; called on close.
    fn unacquire(&mut self) {}
}

/// Outcome of a single poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollStatus {
    /// State read and diffed; zero or more events were dispatched.
    Ok,
    /// Device is gone. Buffers untouched, no events. Polling again later is allowed.
    Unplugged,
    /// Input was lost. Buffers were reset and a re-acquire attempted; no events this tick.
    RecoverableLoss,
}

/// A pollable, classified input device.
pub trait Device {
    fn identity(&self) -> &DeviceIdentity;

    /// Read, diff and dispatch. Events reach `sink` in the documented order.
    fn poll(&mut self, sink: &mut dyn EventSink) -> Result<PollStatus>;

    /// Zero both state buffers so the next poll diffs against a neutral baseline.
    fn reset(&mut self);

    fn name(&self) -> &str {
        &self.identity().product_name
    }

    /// Current Daptor II mode code, for devices that have a mode switch.
    fn mode(&self) -> Option<i32> {
        None
    }
}
