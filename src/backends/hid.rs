//! `hidapi`-backed joystick source.
//!
//! [`HidSource`] implements [`RawStateSource`] for joysticks and Atari adapters
//! that show up as plain HID devices. Reports are decoded with a
//! [`ReportLayout`]. The source keeps the last decoded state, so a poll that
//! finds no new report returns the previous one unchanged.
//!
//! Handle lifecycle:
//! - a read error drops the handle and reports `Unplugged`;
//! - a poll without a handle reports `InputLost`, and the poller's `acquire()`
//!   reopens the device by its path.

use crate::backends::report::ReportLayout;
use crate::config::Config;
use crate::device::{RawStateSource, SourceError};
use crate::error::{Error, Result};
use crate::joystick::JoystickDevice;
use crate::state::JoystickState;
use hidapi::{DeviceInfo, HidApi, HidDevice};
use std::ffi::CString;
use std::rc::Rc;
use tracing::{debug, trace, warn};

const GENERIC_DESKTOP: u16 = 0x01;
const USAGE_JOYSTICK: u16 = 0x04;
const USAGE_GAMEPAD: u16 = 0x05;

/// Reports are never larger than this for the devices we care about.
const REPORT_BUF_LEN: usize = 64;

pub struct HidSource {
    api: Rc<HidApi>,
    path: CString,
    product: String,
    device: Option<HidDevice>,
    layout: ReportLayout,
    axis_range: i32,
    last: JoystickState,
    buf: [u8; REPORT_BUF_LEN],
}

impl HidSource {
    pub fn open(
        api: Rc<HidApi>,
        info: &DeviceInfo,
        layout: ReportLayout,
        axis_range: i32,
    ) -> Result<Self> {
        let device = info
            .open_device(&api)
            .map_err(|e| Error::Platform(e.to_string()))?;
        device
            .set_blocking_mode(false)
            .map_err(|e| Error::Platform(e.to_string()))?;
        Ok(Self {
            path: info.path().to_owned(),
            product: info.product_string().unwrap_or_default().to_string(),
            api,
            device: Some(device),
            layout,
            axis_range,
            last: JoystickState::default(),
            buf: [0; REPORT_BUF_LEN],
        })
    }

    pub fn path(&self) -> &CString {
        &self.path
    }
}

impl RawStateSource for HidSource {
    type State = JoystickState;

    fn product_name(&self) -> &str {
        &self.product
    }

    fn read(&mut self, into: &mut JoystickState) -> std::result::Result<(), SourceError> {
        let Some(device) = self.device.as_ref() else {
            return Err(SourceError::InputLost);
        };
        match device.read_timeout(&mut self.buf, 0) {
            Ok(0) => {}
            Ok(n) => {
                self.layout
                    .decode(&self.buf[..n], self.axis_range, &mut self.last)?;
                trace!(product = %self.product, len = n, "hid report");
            }
            Err(e) => {
                debug!(product = %self.product, error = %e, "hid read failed");
                self.device = None;
                return Err(SourceError::Unplugged);
            }
        }
        *into = self.last;
        Ok(())
    }

    fn acquire(&mut self) -> std::result::Result<(), SourceError> {
        if self.device.is_some() {
            return Ok(());
        }
        let device = self
            .api
            .open_path(&self.path)
            .map_err(|_| SourceError::Unplugged)?;
        device
            .set_blocking_mode(false)
            .map_err(|e| SourceError::Failed(e.to_string()))?;
        self.device = Some(device);
        self.last = JoystickState::default();
        debug!(product = %self.product, "hid device reopened");
        Ok(())
    }

    fn unacquire(&mut self) {
        self.device = None;
    }
}

/// Joystick and gamepad collections, minus the XInput compatibility endpoints.
fn is_joystick(info: &DeviceInfo) -> bool {
    if info.usage_page() != GENERIC_DESKTOP {
        return false;
    }
    match info.usage() {
        USAGE_JOYSTICK => true,
        // "IG_" paths are XInput controllers; those are read through XInput.
        USAGE_GAMEPAD => !info.path().to_string_lossy().contains("IG_"),
        _ => false,
    }
}

/// Open every HID joystick that can be wrapped.
pub fn probe_joysticks(api: &Rc<HidApi>, config: &Config) -> Vec<JoystickDevice<HidSource>> {
    let mut found = Vec::new();
    for info in api.device_list().filter(|i| is_joystick(i)) {
        let opened = HidSource::open(
            Rc::clone(api),
            info,
            ReportLayout::default(),
            config.calibration.axis_range,
        )
        .and_then(|src| JoystickDevice::open(src, config.calibration.clone(), &config.adapters));
        match opened {
            Ok(dev) => found.push(dev),
            Err(e) => warn!(
                path = %info.path().to_string_lossy(),
                error = %e,
                "skipping hid device"
            ),
        }
    }
    debug!(count = found.len(), "hid joysticks found");
    found
}
