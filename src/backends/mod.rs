//! Platform input sources.
//!
//! Implementations of [`RawStateSource`](crate::device::RawStateSource) for real
//! hardware, plus [`discover`] to fill a [`ControllerSet`] from whatever is
//! plugged in.
//!
//! # Feature flags
//! - **`hid`**: joysticks and Atari adapters through `hidapi`.
//! - On Windows, XInput gamepads are always available.

use crate::config::Config;
use crate::manager::ControllerSet;

pub mod report;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

#[cfg(windows)]
#[cfg_attr(docsrs, doc(cfg(windows)))]
pub mod windows;

/// Attach discovered devices to free slots: HID joysticks first, then XInput gamepads.
///
/// Devices beyond the available slots are dropped.
#[cfg_attr(not(any(feature = "hid", windows)), allow(unused_variables))]
pub fn discover(config: &Config) -> ControllerSet {
    #[allow(unused_mut)]
    let mut set = ControllerSet::new();
    #[allow(unused_mut, unused_variables)]
    let mut next = 0usize;

    #[cfg(feature = "hid")]
    {
        match hidapi::HidApi::new() {
            Ok(api) => {
                let api = std::rc::Rc::new(api);
                for dev in hid::probe_joysticks(&api, config) {
                    if set.attach(next, dev).is_err() {
                        break;
                    }
                    next += 1;
                }
            }
            Err(e) => tracing::warn!(error = %e, "hidapi init failed"),
        }
    }

    #[cfg(windows)]
    {
        use crate::gamepad::GamepadDevice;
        for src in windows::probe_gamepads() {
            let dev = match GamepadDevice::open(src, config.gamepad.clone()) {
                Ok(dev) => dev,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping xinput slot");
                    continue;
                }
            };
            if set.attach(next, dev).is_err() {
                break;
            }
            next += 1;
        }
    }

    tracing::info!(controllers = set.len(), "controller discovery finished");
    set
}
