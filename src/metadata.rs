//! Device identity.
//!
//! [`DeviceIdentity`] is fixed at open time: the product name reported by the
//! platform plus the [`DeviceKind`] derived from it. The kind decides which
//! analog channels a poll looks at, and it never changes for the lifetime of
//! the device handle.
//!
//! # Classification
//! The product name is compared against the configured adapter names
//! ([`AdapterNames`]) with an exact, case-insensitive match. Any other
//! non-empty name is a generic joystick; an empty name is [`DeviceKind::None`].
//!
//! ```
//! use joyframe::config::AdapterNames;
//! use joyframe::metadata::{DeviceIdentity, DeviceKind};
//!
//! let id = DeviceIdentity::classify("2600-DAPTOR ii", &AdapterNames::default());
//! assert_eq!(id.kind, DeviceKind::Daptor2);
//! ```

use crate::config::AdapterNames;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// No device in this slot.
    None,
    /// Any joystick that is not a known adapter.
    Generic,
    /// Stelladaptor 2600-to-USB interface.
    Stelladaptor,
    /// 2600-daptor.
    Daptor,
    /// 2600-daptor II (adds a mode switch on the third axis).
    Daptor2,
    /// Modern gamepad (XInput layout).
    Gamepad,
}

impl DeviceKind {
    /// Atari adapters report paddle and driving channels.
    pub fn is_atari_adaptor(self) -> bool {
        matches!(self, Self::Stelladaptor | Self::Daptor | Self::Daptor2)
    }

    pub fn has_mode_switch(self) -> bool {
        self == Self::Daptor2
    }
}

/// Product name plus classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub product_name: String,
    pub kind: DeviceKind,
}

impl DeviceIdentity {
    /// Classify a joystick-family device by product name.
    pub fn classify(product_name: &str, names: &AdapterNames) -> Self {
        let matches = |known: &str| product_name.eq_ignore_ascii_case(known);
        let kind = if matches(&names.stelladaptor) {
            DeviceKind::Stelladaptor
        } else if matches(&names.daptor) {
            DeviceKind::Daptor
        } else if matches(&names.daptor2) {
            DeviceKind::Daptor2
        } else if product_name.trim().is_empty() {
            DeviceKind::None
        } else {
            DeviceKind::Generic
        };
        Self {
            product_name: product_name.to_string(),
            kind,
        }
    }

    pub fn gamepad(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            kind: DeviceKind::Gamepad,
        }
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:?}]", self.product_name, self.kind)
    }
}
