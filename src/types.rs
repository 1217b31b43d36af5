use core::fmt;
use std::time::Duration;

/// Response buffer capacity in bytes.
///
/// Matches the fixed receive buffer the in-kernel driver binding uses; a
/// reply longer than this is truncated by the driver and flagged via
/// [`Response::is_truncated`].
pub const RESPONSE_CAPACITY: usize = 1024;

/// Receive timeout applied when a request asks for the default (0 seconds).
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A single IPMI request to the local system interface.
///
/// The payload is borrowed for the duration of the exchange; the caller
/// keeps ownership.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    /// Network Function (NetFn) of the command.
    pub netfn: u8,
    /// Logical unit number. Accepted for completeness but not transmitted:
    /// the system-interface address always carries LUN 0.
    pub lun: u8,
    /// Command number.
    pub cmd: u8,
    /// Request payload (may be empty). At most 65535 bytes.
    pub data: &'a [u8],
    /// Receive timeout in whole seconds. 0 selects the 2-second default.
    pub recv_timeout_secs: u8,
}

impl<'a> Request<'a> {
    /// Create a request with no payload and the default receive timeout.
    pub fn new(netfn: u8, cmd: u8) -> Self {
        Self {
            netfn,
            lun: 0,
            cmd,
            data: &[],
            recv_timeout_secs: 0,
        }
    }

    /// Attach a payload to the request.
    pub fn with_data(mut self, data: &'a [u8]) -> Self {
        self.data = data;
        self
    }

    /// Set the receive timeout in whole seconds (0 = default).
    pub fn with_recv_timeout_secs(mut self, secs: u8) -> Self {
        self.recv_timeout_secs = secs;
        self
    }

    /// The wait deadline this request asks for, with 0 mapped to the
    /// default.
    pub fn effective_timeout(&self) -> Duration {
        if self.recv_timeout_secs == 0 {
            DEFAULT_RECV_TIMEOUT
        } else {
            Duration::from_secs(u64::from(self.recv_timeout_secs))
        }
    }
}

/// A fixed-capacity buffer a reply is received into.
///
/// The driver reports the reply's *original* length, not capped to the
/// buffer, so [`Response::data_len`] may exceed [`RESPONSE_CAPACITY`].
/// The readable slice returned by [`Response::data`] is always capped at
/// capacity; bytes beyond it were dropped by the driver and are
/// unavailable.
///
/// `data_len` is only meaningful after a send that returned `Ok`.
#[derive(Clone)]
pub struct Response {
    pub(crate) buf: [u8; RESPONSE_CAPACITY],
    pub(crate) data_len: usize,
}

impl Response {
    /// Create an empty response buffer.
    pub fn new() -> Self {
        Self {
            buf: [0u8; RESPONSE_CAPACITY],
            data_len: 0,
        }
    }

    /// Length of the reply as reported by the driver.
    ///
    /// May exceed [`RESPONSE_CAPACITY`]; see [`Response::is_truncated`].
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// The received bytes, capped at the buffer capacity.
    ///
    /// The first byte is the completion code the controller returned; this
    /// crate does not interpret it.
    pub fn data(&self) -> &[u8] {
        &self.buf[..self.data_len.min(RESPONSE_CAPACITY)]
    }

    /// True if the reply was longer than the buffer and the tail was
    /// dropped by the driver.
    pub fn is_truncated(&self) -> bool {
        self.data_len > RESPONSE_CAPACITY
    }

    /// Reset the reported length. The buffer contents are left as-is.
    pub fn clear(&mut self) {
        self.data_len = 0;
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("data_len", &self.data_len)
            .field("truncated", &self.is_truncated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_two_seconds() {
        let req = Request::new(0x0a, 0x20);
        assert_eq!(req.effective_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn explicit_timeout_is_honored() {
        let req = Request::new(0x0a, 0x20).with_recv_timeout_secs(1);
        assert_eq!(req.effective_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn over_capacity_length_reads_as_truncated() {
        let mut resp = Response::new();
        resp.data_len = 1500;
        assert!(resp.is_truncated());
        assert_eq!(resp.data_len(), 1500);
        assert_eq!(resp.data().len(), RESPONSE_CAPACITY);
    }

    #[test]
    fn in_capacity_length_is_not_truncated() {
        let mut resp = Response::new();
        resp.buf[..3].copy_from_slice(&[0x00, 0x01, 0x02]);
        resp.data_len = 3;
        assert!(!resp.is_truncated());
        assert_eq!(resp.data(), &[0x00, 0x01, 0x02]);
    }
}
