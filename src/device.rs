use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::channel::dev::DevChannel;
use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::types::{Request, Response};

/// An open session to the local BMC system interface.
///
/// `Device` owns the channel handle and performs one request/response
/// exchange at a time. It does no internal locking: callers sharing a
/// `Device` across threads must serialize [`Device::send`] themselves.
pub struct Device {
    channel: Option<Box<dyn Channel + Send>>,
    seq: AtomicU64,
    strict_correlation: bool,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("seq", &self.seq)
            .field("strict_correlation", &self.strict_correlation)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Device`].
#[derive(Debug, Clone, Copy)]
pub struct DeviceBuilder {
    index: u32,
    strict_correlation: bool,
}

impl Default for DeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceBuilder {
    /// Create a builder with device index 0 and strict correlation off.
    pub fn new() -> Self {
        Self {
            index: 0,
            strict_correlation: false,
        }
    }

    /// Select which BMC interface to open (the `N` in `/dev/ipmiN`).
    pub fn index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Reject replies whose correlation tag does not match the request
    /// just sent.
    ///
    /// Off by default: the driver may still buffer a late reply to an
    /// earlier timed-out request, and with checking off such a reply is
    /// returned as if it answered the current request.
    pub fn strict_correlation(mut self, strict: bool) -> Self {
        self.strict_correlation = strict;
        self
    }

    /// Open the device, trying each well-known path in order.
    pub fn open(self) -> Result<Device> {
        let file = open_first(&candidate_paths(self.index), |path| {
            OpenOptions::new().read(true).write(true).open(path)
        })?;
        self.attach(Box::new(DevChannel::new(file)))
    }

    /// Build a [`Device`] over an already-opened channel.
    ///
    /// Enables event delivery on the channel, as [`DeviceBuilder::open`]
    /// would; on failure the channel is dropped and its handle released.
    pub fn attach(self, mut channel: Box<dyn Channel + Send>) -> Result<Device> {
        channel
            .enable_events()
            .map_err(Error::DeviceConfiguration)?;
        Ok(Device {
            channel: Some(channel),
            seq: AtomicU64::new(0),
            strict_correlation: self.strict_correlation,
        })
    }
}

/// The well-known paths the kernel driver may expose interface `index`
/// under, in the order they are tried.
fn candidate_paths(index: u32) -> [PathBuf; 3] {
    [
        PathBuf::from(format!("/dev/ipmi{index}")),
        PathBuf::from(format!("/dev/ipmi/{index}")),
        PathBuf::from(format!("/dev/ipmidev/{index}")),
    ]
}

/// Try each candidate in order, returning the first that opens.
///
/// If none opens, the last OS error is surfaced in
/// [`Error::DeviceUnavailable`].
fn open_first<C>(
    paths: &[PathBuf],
    mut open: impl FnMut(&Path) -> io::Result<C>,
) -> Result<C> {
    let mut last_err = io::Error::from(io::ErrorKind::NotFound);
    for path in paths {
        match open(path) {
            Ok(channel) => return Ok(channel),
            Err(e) => last_err = e,
        }
    }
    Err(Error::DeviceUnavailable(last_err))
}

impl Device {
    /// Open interface 0 with default options.
    pub fn open() -> Result<Self> {
        DeviceBuilder::new().open()
    }

    /// Create a [`DeviceBuilder`].
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::new()
    }

    /// Build a [`Device`] over an already-opened channel with default
    /// options. See [`DeviceBuilder::attach`].
    pub fn from_channel(channel: Box<dyn Channel + Send>) -> Result<Self> {
        DeviceBuilder::new().attach(channel)
    }

    /// True until [`Device::close`] is called.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Perform one request/response exchange.
    ///
    /// Submits `request`, waits (bounded by the request's receive timeout)
    /// for the reply, and copies it into `response`. On error the
    /// response's reported length is not meaningful. No retries: every
    /// failure is returned to the caller immediately.
    pub fn send(&mut self, request: &Request<'_>, response: &mut Response) -> Result<()> {
        let start = Instant::now();
        let result = self.exchange(request, response);
        let elapsed = start.elapsed();
        match &result {
            Ok(()) => {
                crate::observe::record_ok(request.netfn, request.cmd, elapsed, response.data_len())
            }
            Err(err) => crate::observe::record_err(request.netfn, request.cmd, elapsed, err),
        }
        result
    }

    fn exchange(&mut self, request: &Request<'_>, response: &mut Response) -> Result<()> {
        if request.data.len() > usize::from(u16::MAX) {
            return Err(Error::InvalidArgument("payload longer than 65535 bytes"));
        }

        let channel = self.channel.as_mut().ok_or(Error::SessionNotOpen)?;
        let msgid = self.seq.fetch_add(1, Ordering::Relaxed);

        channel
            .submit(msgid, request.netfn, request.cmd, request.data)
            .map_err(Error::SendFailed)?;

        let ready = channel
            .wait_readable(request.effective_timeout())
            .map_err(Error::WaitFailed)?;
        if !ready {
            return Err(Error::ResponseTimeout);
        }

        let received = channel
            .receive_truncated(&mut response.buf)
            .map_err(Error::ReceiveFailed)?;

        if self.strict_correlation && received.msgid != msgid {
            return Err(Error::CorrelationMismatch {
                expected: msgid,
                actual: received.msgid,
            });
        }

        response.data_len = received.len;
        crate::debug::dump_hex("ipmi reply", response.data());
        Ok(())
    }

    /// Release the channel handle.
    ///
    /// Safe to call on an already-closed device (no-op); the handle is
    /// released exactly once. Dropping the device has the same effect.
    pub fn close(&mut self) {
        self.channel = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::channel::Received;

    struct CountingChannel {
        drops: Arc<AtomicUsize>,
        submits: Arc<AtomicUsize>,
    }

    impl Channel for CountingChannel {
        fn enable_events(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn submit(&mut self, _msgid: u64, _netfn: u8, _cmd: u8, _data: &[u8]) -> io::Result<()> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn wait_readable(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(true)
        }

        fn receive_truncated(&mut self, buf: &mut [u8]) -> io::Result<Received> {
            buf[0] = 0x00;
            Ok(Received {
                len: 1,
                msgid: 0,
                source_addr_type: crate::sys::IPMI_SYSTEM_INTERFACE_ADDR_TYPE as i32,
            })
        }
    }

    impl Drop for CountingChannel {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_device(drops: Arc<AtomicUsize>, submits: Arc<AtomicUsize>) -> Device {
        Device::from_channel(Box::new(CountingChannel { drops, submits })).expect("attach")
    }

    #[test]
    fn open_first_returns_first_success() {
        let paths = candidate_paths(0);
        let opened = open_first(&paths, |path| {
            if path == Path::new("/dev/ipmi/0") {
                Ok(42u32)
            } else {
                Err(io::Error::from(io::ErrorKind::NotFound))
            }
        })
        .expect("open");
        assert_eq!(opened, 42);
    }

    #[test]
    fn open_first_surfaces_last_os_error() {
        let paths = candidate_paths(0);
        let err = open_first(&paths, |_: &Path| -> io::Result<()> {
            Err(io::Error::from_raw_os_error(libc::EACCES))
        })
        .expect_err("expected DeviceUnavailable");
        assert!(matches!(err, Error::DeviceUnavailable(_)));
        assert_eq!(err.os_error(), Some(libc::EACCES));
    }

    #[test]
    fn candidate_paths_are_ordered() {
        let paths = candidate_paths(0);
        assert_eq!(paths[0], Path::new("/dev/ipmi0"));
        assert_eq!(paths[1], Path::new("/dev/ipmi/0"));
        assert_eq!(paths[2], Path::new("/dev/ipmidev/0"));
    }

    #[test]
    fn close_twice_releases_handle_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut device = counting_device(drops.clone(), Arc::new(AtomicUsize::new(0)));

        device.close();
        device.close();

        assert!(!device.is_open());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn send_after_close_is_session_not_open() {
        let mut device = counting_device(
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
        );
        device.close();

        let err = device
            .send(&Request::new(0x0a, 0x20), &mut Response::new())
            .expect_err("expected SessionNotOpen");
        assert!(matches!(err, Error::SessionNotOpen));
    }

    #[test]
    fn oversized_payload_is_rejected_before_the_os() {
        let submits = Arc::new(AtomicUsize::new(0));
        let mut device = counting_device(Arc::new(AtomicUsize::new(0)), submits.clone());

        let payload = vec![0u8; 65536];
        let err = device
            .send(
                &Request::new(0x0a, 0x20).with_data(&payload),
                &mut Response::new(),
            )
            .expect_err("expected InvalidArgument");

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(submits.load(Ordering::SeqCst), 0);
    }
}
