use std::io;
use std::time::Duration;

/// What the driver hands back for one received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Received {
    /// Length of the reply as reported by the driver.
    ///
    /// This is the reply's *original* length; it may exceed the buffer the
    /// message was received into, in which case the tail was dropped.
    pub len: usize,
    /// Correlation tag echoed back with the reply.
    pub msgid: u64,
    /// Address type the reply arrived from, as reported by the driver.
    /// Captured for diagnostics; not validated against the destination.
    pub source_addr_type: i32,
}

/// A raw exchange channel to one BMC system interface.
///
/// [`Device`](crate::Device) drives these four operations and owns all
/// sequencing, timeout, and error-mapping policy; implementations only
/// talk to the OS (or stand in for it in tests). Errors are plain
/// [`io::Error`]s so the underlying `errno` is preserved.
pub trait Channel {
    /// Enable delivery of asynchronous management events on the channel.
    fn enable_events(&mut self) -> io::Result<()>;

    /// Submit one request addressed to the local system interface
    /// (BMC channel, LUN 0), tagged with `msgid`.
    fn submit(&mut self, msgid: u64, netfn: u8, cmd: u8, data: &[u8]) -> io::Result<()>;

    /// Block until the channel has a message to read, bounded by
    /// `timeout`. `Ok(false)` means the timeout elapsed with no data.
    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read one message into `buf`, truncating if it does not fit.
    fn receive_truncated(&mut self, buf: &mut [u8]) -> io::Result<Received>;
}

pub(crate) mod dev;
