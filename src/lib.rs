//! joyframe: Atari controller input, rendering and audio plumbing for an
//! emulator host.
//!
//! Input side: a [`RawStateSource`] (HID report, XInput slot, test script)
//! feeds a [`JoystickDevice`] or [`GamepadDevice`], which double-buffers the
//! raw state and turns each difference into [`ChangeEvent`]s. A
//! [`ControllerSet`] holds the two controller jacks and tags events with the
//! controller number; [`HostBinding`] maps them onto machine inputs.
//!
//! Output side: [`render::RenderingContext`] owns the device-dependent graphics
//! resources and rebuilds them after device loss, and [`AudioDevice`] feeds
//! 8-bit sample frames to a voice.

pub mod audio;
pub mod backends;
pub mod binding;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod gamepad;
pub mod interpret;
pub mod joystick;
pub mod logger;
pub mod manager;
pub mod metadata;
pub mod render;
pub mod snapshot;
pub mod state;

pub use audio::*;
pub use binding::*;
pub use config::*;
pub use device::*;
pub use error::{Error, ErrorKind, Result};
pub use event::*;
pub use eventbus::*;
pub use filtered_listener::*;
pub use gamepad::*;
pub use joystick::*;
pub use logger::*;
pub use manager::*;
pub use metadata::*;
pub use snapshot::*;
pub use state::*;
