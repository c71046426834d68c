//! Runtime configuration.
//!
//! Calibration constants differ between adapter hardware revisions, so none of
//! them are baked into the polling code. Everything here deserializes from TOML
//! and every field has a default, so an empty document is a valid config:
//!
//! ```
//! use joyframe::config::Config;
//!
//! let cfg = Config::from_toml_str(r#"
//!     [calibration]
//!     dead_zone = 500
//! "#).unwrap();
//! assert_eq!(cfg.calibration.dead_zone, 500);
//! assert_eq!(cfg.calibration.axis_range, 1000);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest button index range a [`JoystickState`](crate::state::JoystickState) can carry.
pub const MAX_BUTTONS: u8 = 32;

/// Axis calibration shared by every joystick-family device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Axes report values in `[-axis_range, axis_range]`.
    pub axis_range: i32,
    /// Symmetric dead zone; a value must be strictly beyond it to count.
    pub dead_zone: i32,
    /// Number of buttons scanned per poll, from index 0. Higher bits are discarded on read.
    pub button_count: u8,
    /// Third-axis values for Daptor II modes 0 (2600), 1 (7800) and 2 (keypad).
    pub daptor2_modes: [i32; 3],
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            axis_range: 1000,
            dead_zone: 100,
            button_count: 16,
            daptor2_modes: [-1000, -875, -750],
        }
    }
}

impl Calibration {
    /// Bits of [`JoystickState::buttons`](crate::state::JoystickState::buttons) that are scanned.
    pub fn button_mask(&self) -> u32 {
        match self.button_count {
            n if n >= MAX_BUTTONS => u32::MAX,
            n => (1u32 << n) - 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.axis_range <= 0 {
            return Err(Error::InvalidArgument(format!(
                "axis_range must be positive, got {}",
                self.axis_range
            )));
        }
        if self.dead_zone < 0 || self.dead_zone >= self.axis_range {
            return Err(Error::InvalidArgument(format!(
                "dead_zone must be in 0..{}, got {}",
                self.axis_range, self.dead_zone
            )));
        }
        if self.button_count > MAX_BUTTONS {
            return Err(Error::InvalidArgument(format!(
                "button_count must be at most {MAX_BUTTONS}, got {}",
                self.button_count
            )));
        }
        Ok(())
    }
}

/// Product names that identify Atari joystick adapters.
///
/// Matching is exact and case-insensitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterNames {
    pub stelladaptor: String,
    pub daptor: String,
    pub daptor2: String,
}

impl Default for AdapterNames {
    fn default() -> Self {
        Self {
            stelladaptor: "Stelladaptor 2600-to-USB Interface".to_string(),
            daptor: "2600-daptor".to_string(),
            daptor2: "2600-daptor II".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    /// Thumb stick magnitude that must be exceeded to count as a direction.
    pub thumb_dead_zone: i16,
    /// Fold the left thumb stick into the D-pad directions.
    pub thumb_as_dpad: bool,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            thumb_dead_zone: 0x4000,
            thumb_as_dpad: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Swap chain buffer count.
    pub buffer_count: u32,
    /// Frames DXGI may queue ahead of the display.
    pub max_frame_latency: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            buffer_count: 2,
            max_frame_latency: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Required length of every submitted buffer. `0` accepts any length.
    pub buffer_len: usize,
    /// Queue depth at which [`AudioDevice::is_saturated`](crate::audio::AudioDevice::is_saturated) reports true.
    pub max_queued: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            buffer_len: 0,
            max_queued: 8,
        }
    }
}

/// Top-level configuration document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calibration: Calibration,
    pub adapters: AdapterNames,
    pub gamepad: GamepadConfig,
    pub render: RenderConfig,
    pub audio: AudioConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.calibration.validate()?;
        if self.gamepad.thumb_dead_zone < 0 {
            return Err(Error::InvalidArgument(
                "thumb_dead_zone must not be negative".to_string(),
            ));
        }
        if self.render.buffer_count == 0 {
            return Err(Error::InvalidArgument(
                "buffer_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
