//! Raw HID input report decoding.
//!
//! Joystick adapters send small fixed-layout input reports. [`ReportLayout`]
//! describes where the buttons and axes sit in such a report so it can be
//! decoded into a [`JoystickState`] without a descriptor parser. Axis values
//! are rescaled from their logical range to `±axis_range`.

use crate::device::SourceError;
use crate::state::JoystickState;
use serde::{Deserialize, Serialize};

/// One axis inside a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisField {
    /// Byte offset from the start of the report payload.
    pub offset: usize,
    /// `1` or `2` bytes (little-endian).
    pub width: usize,
    pub logical_min: i32,
    pub logical_max: i32,
}

impl AxisField {
    pub const fn byte(offset: usize) -> Self {
        Self {
            offset,
            width: 1,
            logical_min: 0,
            logical_max: 255,
        }
    }

    fn raw(&self, payload: &[u8]) -> Option<i32> {
        let bytes = payload.get(self.offset..self.offset + self.width)?;
        match bytes {
            [lo] => Some(i32::from(*lo)),
            [lo, hi] => Some(i32::from(u16::from_le_bytes([*lo, *hi]))),
            _ => None,
        }
    }

    /// Map the raw value to `[-axis_range, axis_range]`.
    fn scaled(&self, payload: &[u8], axis_range: i32) -> Option<i32> {
        let span = i64::from(self.logical_max) - i64::from(self.logical_min);
        if span <= 0 {
            return None;
        }
        let v = i64::from(self.raw(payload)?.clamp(self.logical_min, self.logical_max));
        let range = i64::from(axis_range);
        let scaled = (v - i64::from(self.logical_min)) * 2 * range / span - range;
        i32::try_from(scaled).ok()
    }
}

/// Button bitfield: `count` bits starting at `offset`, LSB first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonField {
    pub offset: usize,
    pub count: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Leading report id byte to strip, if the device numbers its reports.
    pub report_id: Option<u8>,
    pub x: AxisField,
    pub y: AxisField,
    /// Third axis (Daptor II mode switch).
    pub z: Option<AxisField>,
    pub buttons: ButtonField,
}

impl Default for ReportLayout {
    /// X, Y, Z as unsigned bytes followed by one byte of buttons.
    fn default() -> Self {
        Self {
            report_id: None,
            x: AxisField::byte(0),
            y: AxisField::byte(1),
            z: Some(AxisField::byte(2)),
            buttons: ButtonField {
                offset: 3,
                count: 8,
            },
        }
    }
}

impl ReportLayout {
    pub fn decode(
        &self,
        report: &[u8],
        axis_range: i32,
        into: &mut JoystickState,
    ) -> Result<(), SourceError> {
        let payload = match self.report_id {
            Some(id) => match report.split_first() {
                Some((&first, rest)) if first == id => rest,
                Some((&first, _)) => {
                    return Err(SourceError::Failed(format!(
                        "unexpected report id {first:#04x}"
                    )))
                }
                None => return Err(short(report)),
            },
            None => report,
        };

        let axis = |field: &AxisField| field.scaled(payload, axis_range).ok_or_else(|| short(report));
        let x = axis(&self.x)?;
        let y = axis(&self.y)?;
        let z = match &self.z {
            Some(field) => axis(field)?,
            None => 0,
        };

        let mut buttons = 0u32;
        for bit in 0..self.buttons.count.min(32) {
            let byte = payload
                .get(self.buttons.offset + usize::from(bit / 8))
                .ok_or_else(|| short(report))?;
            if byte & (1 << (bit % 8)) != 0 {
                buttons |= 1 << bit;
            }
        }

        *into = JoystickState { buttons, x, y, z };
        Ok(())
    }
}

fn short(report: &[u8]) -> SourceError {
    SourceError::Failed(format!("input report too short ({} bytes)", report.len()))
}
