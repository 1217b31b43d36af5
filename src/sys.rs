//! User-space ABI of the Linux in-kernel IPMI driver.
//!
//! `#[repr(C)]` mirrors of the request/receive structures from
//! `linux/ipmi.h` plus the three ioctls this crate uses. Field layout and
//! ioctl numbers must match the kernel header exactly.

#![allow(missing_docs)]

use libc::{c_int, c_long, c_short};
use nix::{ioctl_read, ioctl_readwrite};

pub const IPMI_IOC_MAGIC: u8 = b'i';

/// Address type for the local system interface.
pub const IPMI_SYSTEM_INTERFACE_ADDR_TYPE: c_int = 0x0c;
/// Channel number addressing the BMC itself.
pub const IPMI_BMC_CHANNEL: c_short = 0xf;
/// `recv_type` value for a command response.
pub const IPMI_RESPONSE_RECV_TYPE: c_int = 1;

pub const IPMI_MAX_ADDR_SIZE: usize = 32;

/// Mirrors `struct ipmi_msg`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IpmiMsg {
    pub netfn: u8,
    pub cmd: u8,
    pub data_len: u16,
    pub data: *mut u8,
}

/// Mirrors `struct ipmi_req`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IpmiReq {
    pub addr: *mut u8,
    pub addr_len: u32,
    pub msgid: c_long,
    pub msg: IpmiMsg,
}

/// Mirrors `struct ipmi_recv`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IpmiRecv {
    pub recv_type: c_int,
    pub addr: *mut u8,
    pub addr_len: u32,
    pub msgid: c_long,
    pub msg: IpmiMsg,
}

/// Mirrors `struct ipmi_system_interface_addr`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IpmiSystemInterfaceAddr {
    pub addr_type: c_int,
    pub channel: c_short,
    pub lun: u8,
}

/// Mirrors `struct ipmi_addr`, the generic address the driver fills in on
/// receive.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct IpmiAddr {
    pub addr_type: c_int,
    pub channel: c_short,
    pub data: [u8; IPMI_MAX_ADDR_SIZE],
}

impl IpmiAddr {
    pub fn zeroed() -> Self {
        Self {
            addr_type: 0,
            channel: 0,
            data: [0u8; IPMI_MAX_ADDR_SIZE],
        }
    }
}

// IPMICTL_RECEIVE_MSG_TRUNC: _IOWR('i', 11, struct ipmi_recv)
ioctl_readwrite!(ipmictl_receive_msg_trunc, IPMI_IOC_MAGIC, 11, IpmiRecv);

// IPMICTL_SEND_COMMAND: _IOR('i', 13, struct ipmi_req)
ioctl_read!(ipmictl_send_command, IPMI_IOC_MAGIC, 13, IpmiReq);

// IPMICTL_SET_GETS_EVENTS_CMD: _IOR('i', 16, int)
ioctl_read!(ipmictl_set_gets_events_cmd, IPMI_IOC_MAGIC, 16, c_int);
