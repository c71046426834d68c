//! Windows input backends.
//!
//! - **XInput** gamepads by user slot ([`xinput::XInputSource`]).
//!
//! Joysticks and Atari adapters are read through the portable `hid` backend.

pub mod xinput;

pub use xinput::{probe_gamepads, XInputSource};
