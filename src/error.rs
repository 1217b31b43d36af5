use std::io;

use thiserror::Error;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
///
/// Variants that wrap an [`io::Error`] preserve the underlying OS error
/// code; use [`Error::os_error`] to get at the raw `errno` value.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid caller-supplied argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// None of the candidate device paths could be opened.
    #[error("no ipmi device could be opened: {0}")]
    DeviceUnavailable(#[source] io::Error),

    /// The device opened but enabling event delivery on it failed.
    #[error("failed to enable event delivery on ipmi device: {0}")]
    DeviceConfiguration(#[source] io::Error),

    /// A send was attempted on a device that is not open.
    #[error("device is not open")]
    SessionNotOpen,

    /// Submitting the request to the driver failed.
    #[error("failed to submit ipmi request: {0}")]
    SendFailed(#[source] io::Error),

    /// Waiting for the device to become readable failed.
    #[error("failed waiting for ipmi response: {0}")]
    WaitFailed(#[source] io::Error),

    /// No response arrived within the receive timeout.
    #[error("timeout waiting for ipmi response")]
    ResponseTimeout,

    /// Reading the response back from the driver failed.
    #[error("failed to receive ipmi response: {0}")]
    ReceiveFailed(#[source] io::Error),

    /// The reply's correlation tag did not match the request just sent.
    ///
    /// Only reported when strict correlation checking is enabled on the
    /// [`Device`](crate::Device).
    #[error("response correlation mismatch: sent tag {expected}, received tag {actual}")]
    CorrelationMismatch {
        /// Tag attached to the outbound request.
        expected: u64,
        /// Tag carried by the received reply.
        actual: u64,
    },
}

impl Error {
    /// Raw OS error code (`errno`) underlying this error, if any.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            Error::DeviceUnavailable(e)
            | Error::DeviceConfiguration(e)
            | Error::SendFailed(e)
            | Error::WaitFailed(e)
            | Error::ReceiveFailed(e) => e.raw_os_error(),
            Error::InvalidArgument(_)
            | Error::SessionNotOpen
            | Error::ResponseTimeout
            | Error::CorrelationMismatch { .. } => None,
        }
    }
}
