//! Error types.
//!
//! Every platform failure is caught where it happens and turned into an [`Error`]
//! variant that still names the original condition class (unplugged, input lost,
//! device removed, device reset, ...). [`Error::kind`] folds those into the four
//! handling categories the rest of the crate reasons about.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// How an error should be handled by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Retried internally (re-acquire, recreate). Never surfaced as a hard failure.
    Transient,
    /// Persists until something outside the process changes (replug, new adapter).
    Permanent,
    /// The call itself was invalid; nothing was changed.
    Contract,
    /// Allocation or resource exhaustion; sticky on the owning handle.
    Exhausted,
}

#[derive(Debug, Error)]
pub enum Error {
    /// The input device is physically disconnected.
    #[error("device unplugged")]
    Unplugged,

    /// Input was lost or never acquired; a re-acquire is needed.
    #[error("device input lost or not acquired")]
    InputLost,

    /// The graphics adapter was removed or replaced.
    #[error("graphics device removed")]
    DeviceRemoved,

    /// The graphics driver reset the device.
    #[error("graphics device reset")]
    DeviceReset,

    /// The render target must be recreated (HWND render target flavour of device loss).
    #[error("render target must be recreated")]
    RecreateTarget,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Any other platform failure, with the platform's description.
    #[error("platform error: {0}")]
    Platform(String),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InputLost | Error::DeviceReset | Error::RecreateTarget => ErrorKind::Transient,
            Error::Unplugged | Error::DeviceRemoved | Error::Platform(_) | Error::Io(_) => {
                ErrorKind::Permanent
            }
            Error::InvalidArgument(_) | Error::Config(_) | Error::Json(_) => ErrorKind::Contract,
            Error::ResourceExhausted(_) => ErrorKind::Exhausted,
        }
    }

    /// `true` for the conditions that require tearing down and rebuilding the graphics device.
    pub fn is_device_loss(&self) -> bool {
        matches!(
            self,
            Error::DeviceRemoved | Error::DeviceReset | Error::RecreateTarget
        )
    }

    /// Copy of the error for status reporting. I/O and serialization errors collapse to `Platform`.
    pub(crate) fn duplicate(&self) -> Error {
        match self {
            Error::Unplugged => Error::Unplugged,
            Error::InputLost => Error::InputLost,
            Error::DeviceRemoved => Error::DeviceRemoved,
            Error::DeviceReset => Error::DeviceReset,
            Error::RecreateTarget => Error::RecreateTarget,
            Error::InvalidArgument(s) => Error::InvalidArgument(s.clone()),
            Error::ResourceExhausted(s) => Error::ResourceExhausted(s.clone()),
            Error::Platform(s) => Error::Platform(s.clone()),
            other => Error::Platform(other.to_string()),
        }
    }
}
