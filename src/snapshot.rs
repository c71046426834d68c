//! Point-in-time view of the controller slots.
//!
//! [`Snapshot`] is an **owned**, read-only list of [`ControllerInfo`] records,
//! produced by [`ControllerSet::snapshot`](crate::manager::ControllerSet::snapshot).
//! It does not poll anything; it reflects what the set saw on its last poll.
//!
//! # Examples
//! ```
//! use joyframe::manager::ControllerSet;
//!
//! let set = ControllerSet::new();
//! let snap = set.snapshot();
//! assert!(snap.is_empty());
//! assert_eq!(snap.to_json().unwrap(), "[]");
//! ```

use crate::device::PollStatus;
use crate::error::Result;
use crate::metadata::DeviceKind;
use serde::{Deserialize, Serialize};

/// Status of one occupied slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerInfo {
    pub slot: usize,
    pub product_name: String,
    /// Product name plus mode suffix, as shown to users.
    pub description: String,
    pub kind: DeviceKind,
    /// Daptor II mode code, `None` for devices without a mode switch.
    pub mode: Option<i32>,
    /// `None` until the slot has been polled.
    pub last_status: Option<PollStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<ControllerInfo>);

impl Snapshot {
    pub fn new(controllers: Vec<ControllerInfo>) -> Self {
        Self(controllers)
    }

    /// Info for `slot`, if occupied.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&ControllerInfo> {
        self.0.iter().find(|c| c.slot == slot)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ControllerInfo> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<ControllerInfo> {
        self.0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let snap = Snapshot::new(vec![ControllerInfo {
            slot: 0,
            product_name: "2600-daptor II".into(),
            description: "2600-daptor II (Keypad mode)".into(),
            kind: DeviceKind::Daptor2,
            mode: Some(2),
            last_status: Some(PollStatus::Ok),
        }]);
        let json = snap.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "Daptor2");
        assert_eq!(value[0]["mode"], 2);
        assert_eq!(value[0]["last_status"], "Ok");

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
