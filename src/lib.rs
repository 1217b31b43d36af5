#![warn(missing_docs)]

//! A blocking client for the Linux in-kernel IPMI system interface.
//!
//! The crate opens the BMC character device (`/dev/ipmi0`, with the two
//! legacy devfs layouts as fallbacks), submits one IPMI request at a time,
//! and waits with a bounded timeout for the matching response. Responses
//! land in a caller-owned fixed-capacity buffer; a reply longer than the
//! buffer is reported as truncated rather than grown or silently capped.
//!
//! It exposes a small public API (`Device`, `DeviceBuilder`, `Request`,
//! `Response`) while keeping the ioctl plumbing internal. The [`Channel`]
//! trait is the seam to the OS and can be implemented for alternate
//! channels or tests.
//!
//! Upper-layer IPMI semantics — completion-code handling, typed commands,
//! LAN sessions — are deliberately out of scope; callers get the raw reply
//! bytes.
//!
//! ```no_run
//! use ipmi_local::{Device, Request, Response};
//!
//! # fn main() -> ipmi_local::Result<()> {
//! let mut device = Device::open()?;
//! let mut response = Response::new();
//! device.send(&Request::new(0x0a, 0x20), &mut response)?;
//! println!("reply: {:02x?}", response.data());
//! # Ok(())
//! # }
//! ```

mod channel;
mod debug;
mod device;
mod error;
mod observe;
pub mod sys;
mod types;

pub use crate::channel::{Channel, Received};
pub use crate::device::{Device, DeviceBuilder};
pub use crate::error::{Error, Result};
pub use crate::types::{Request, Response, DEFAULT_RECV_TIMEOUT, RESPONSE_CAPACITY};
