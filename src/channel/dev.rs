use std::fs::File;
use std::io;
use std::os::fd::{AsFd, AsRawFd};
use std::ptr;
use std::time::Duration;

use libc::{c_int, c_long};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::channel::{Channel, Received};
use crate::sys;

/// [`Channel`] over an opened `/dev/ipmi*` character device.
///
/// The fd is owned by the wrapped [`File`] and released exactly once on
/// drop.
pub(crate) struct DevChannel {
    file: File,
}

impl DevChannel {
    pub(crate) fn new(file: File) -> Self {
        Self { file }
    }
}

impl Channel for DevChannel {
    fn enable_events(&mut self) -> io::Result<()> {
        let mut enable: c_int = 1;
        // SAFETY: `enable` outlives the call; the driver reads one int.
        unsafe { sys::ipmictl_set_gets_events_cmd(self.file.as_raw_fd(), &mut enable) }
            .map_err(io::Error::from)?;
        Ok(())
    }

    fn submit(&mut self, msgid: u64, netfn: u8, cmd: u8, data: &[u8]) -> io::Result<()> {
        let mut bmc_addr = sys::IpmiSystemInterfaceAddr {
            addr_type: sys::IPMI_SYSTEM_INTERFACE_ADDR_TYPE,
            channel: sys::IPMI_BMC_CHANNEL,
            lun: 0,
        };

        // The driver only reads the payload; the cast to *mut is an ABI
        // artifact of `struct ipmi_msg`.
        let data_ptr = if data.is_empty() {
            ptr::null_mut()
        } else {
            data.as_ptr().cast_mut()
        };

        let mut req = sys::IpmiReq {
            addr: (&mut bmc_addr as *mut sys::IpmiSystemInterfaceAddr).cast(),
            addr_len: std::mem::size_of::<sys::IpmiSystemInterfaceAddr>() as u32,
            msgid: msgid as c_long,
            msg: sys::IpmiMsg {
                netfn,
                cmd,
                data_len: data.len() as u16,
                data: data_ptr,
            },
        };

        // SAFETY: `bmc_addr` and `data` outlive the call; the ioctl copies
        // both into kernel space before returning.
        unsafe { sys::ipmictl_send_command(self.file.as_raw_fd(), &mut req) }
            .map_err(io::Error::from)?;
        Ok(())
    }

    fn wait_readable(&mut self, timeout: Duration) -> io::Result<bool> {
        let deadline = PollTimeout::try_from(timeout).unwrap_or(PollTimeout::MAX);
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
        let ready = poll(&mut fds, deadline).map_err(io::Error::from)?;
        Ok(ready > 0)
    }

    fn receive_truncated(&mut self, buf: &mut [u8]) -> io::Result<Received> {
        let mut source = sys::IpmiAddr::zeroed();
        let mut recv = sys::IpmiRecv {
            recv_type: 0,
            addr: (&mut source as *mut sys::IpmiAddr).cast(),
            addr_len: std::mem::size_of::<sys::IpmiAddr>() as u32,
            msgid: 0,
            msg: sys::IpmiMsg {
                netfn: 0,
                cmd: 0,
                data_len: buf.len() as u16,
                data: buf.as_mut_ptr(),
            },
        };

        // SAFETY: `source` and `buf` outlive the call; RECEIVE_MSG_TRUNC
        // writes at most `data_len` bytes into `buf` and truncates the
        // rest, reporting the original length back in `msg.data_len`.
        unsafe { sys::ipmictl_receive_msg_trunc(self.file.as_raw_fd(), &mut recv) }
            .map_err(io::Error::from)?;

        Ok(Received {
            len: recv.msg.data_len as usize,
            msgid: recv.msgid as u64,
            source_addr_type: source.addr_type,
        })
    }
}
