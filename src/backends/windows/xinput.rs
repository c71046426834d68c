//! XInput gamepad source.
//!
//! Gamepads are read by user slot (`0..4`) through `XInputGetState`. There is
//! no handle to acquire: an empty slot reads as `ERROR_DEVICE_NOT_CONNECTED`,
//! which maps to [`SourceError::Unplugged`], and the slot starts reporting again
//! as soon as a controller is plugged back in.

use crate::device::{RawStateSource, SourceError};
use crate::error::{Error, Result};
use crate::state::GamepadState;
use windows_sys::Win32::Foundation::{ERROR_DEVICE_NOT_CONNECTED, ERROR_SUCCESS};
use windows_sys::Win32::UI::Input::XboxController::{XInputGetState, XINPUT_STATE};

/// XInput supports four user slots.
pub const MAX_USERS: u32 = 4;

pub struct XInputSource {
    user: u32,
    name: String,
}

impl XInputSource {
    pub fn new(user: u32) -> Result<Self> {
        if user >= MAX_USERS {
            return Err(Error::InvalidArgument(format!(
                "xinput user index {user} out of range (max {MAX_USERS})"
            )));
        }
        Ok(Self {
            user,
            name: format!("XInput Controller {user}"),
        })
    }

    pub fn user(&self) -> u32 {
        self.user
    }

    fn get_state(&self) -> std::result::Result<XINPUT_STATE, u32> {
        // SAFETY: XINPUT_STATE is plain data; all-zero is a valid value.
        let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
        // SAFETY: `state` is a valid, writable XINPUT_STATE for the duration of the call.
        let rc = unsafe { XInputGetState(self.user, &mut state) };
        if rc == ERROR_SUCCESS {
            Ok(state)
        } else {
            Err(rc)
        }
    }

    pub fn is_connected(&self) -> bool {
        self.get_state().is_ok()
    }
}

impl RawStateSource for XInputSource {
    type State = GamepadState;

    fn product_name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, into: &mut GamepadState) -> std::result::Result<(), SourceError> {
        let state = match self.get_state() {
            Ok(state) => state,
            Err(ERROR_DEVICE_NOT_CONNECTED) => return Err(SourceError::Unplugged),
            Err(rc) => return Err(SourceError::Failed(format!("XInputGetState failed: {rc}"))),
        };
        let pad = state.Gamepad;
        *into = GamepadState {
            packet: state.dwPacketNumber,
            buttons: pad.wButtons,
            left_trigger: pad.bLeftTrigger,
            right_trigger: pad.bRightTrigger,
            thumb_lx: pad.sThumbLX,
            thumb_ly: pad.sThumbLY,
            thumb_rx: pad.sThumbRX,
            thumb_ry: pad.sThumbRY,
        };
        Ok(())
    }

    fn acquire(&mut self) -> std::result::Result<(), SourceError> {
        Ok(())
    }
}

/// Sources for every slot with a controller plugged in right now.
pub fn probe_gamepads() -> Vec<XInputSource> {
    (0..MAX_USERS)
        .filter_map(|user| XInputSource::new(user).ok())
        .filter(XInputSource::is_connected)
        .collect()
}
