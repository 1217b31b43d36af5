//! Send `Get SDR Repository Info` (Storage NetFn 0x0a, cmd 0x20) to the
//! local BMC and print the raw reply.
//!
//! Run as root on a host with the `ipmi_devintf` driver loaded:
//!
//! ```sh
//! cargo run --example get_sdr_repository_info
//! ```

use ipmi_local::{Device, Request, Response};

fn main() -> ipmi_local::Result<()> {
    let mut device = Device::open()?;

    let request = Request::new(0x0a, 0x20);
    let mut response = Response::new();
    device.send(&request, &mut response)?;

    if response.is_truncated() {
        eprintln!(
            "reply truncated: {} bytes reported, {} available",
            response.data_len(),
            response.data().len()
        );
    }
    println!("reply ({} bytes): {:02x?}", response.data().len(), response.data());

    device.close();
    Ok(())
}
