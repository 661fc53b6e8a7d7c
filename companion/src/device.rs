//! Finding the pad's raw-HID interface and writing status reports to it.

use anyhow::{anyhow, Context, Result};
use hidapi::{DeviceInfo, HidApi, HidDevice};
use tracing::{debug, info};
use zoomer_keymap::conf::{RAW_REPORT_LEN, RAW_USAGE, RAW_USAGE_PAGE, USB_PID, USB_VID};
use zoomer_keymap::Status;

/// Which HID interfaces count as the pad.
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            vendor_id: Some(USB_VID),
            product_id: Some(USB_PID),
        }
    }
}

impl Filter {
    pub fn matches(&self, info: &DeviceInfo) -> bool {
        info.usage_page() == RAW_USAGE_PAGE
            && info.usage() == RAW_USAGE as u16
            && self.vendor_id.map_or(true, |vid| info.vendor_id() == vid)
            && self.product_id.map_or(true, |pid| info.product_id() == pid)
    }
}

pub fn matching<'a>(api: &'a HidApi, filter: &'a Filter) -> impl Iterator<Item = &'a DeviceInfo> {
    api.device_list().filter(move |info| filter.matches(info))
}

pub struct Pad {
    device: HidDevice,
    name: String,
}

impl Pad {
    pub fn open(api: &HidApi, filter: &Filter) -> Result<Self> {
        let info = matching(api, filter)
            .next()
            .ok_or_else(|| anyhow!("no pad found on usage page {:#06x}", RAW_USAGE_PAGE))?;
        let name = info
            .product_string()
            .unwrap_or("unknown product")
            .to_string();
        let device = info
            .open_device(api)
            .with_context(|| format!("Failed to open {:?}", info.path()))?;
        info!("Connected to {} ({:04x}:{:04x})", name, info.vendor_id(), info.product_id());
        Ok(Pad { device, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn send(&self, status: Status) -> Result<()> {
        let written = self
            .device
            .write(&report(status))
            .with_context(|| format!("Failed to write status to {}", self.name))?;
        debug!("wrote {} bytes, code {}", written, status.code());
        Ok(())
    }
}

/// Report id 0 followed by the padded payload.
fn report(status: Status) -> [u8; RAW_REPORT_LEN + 1] {
    let mut buf = [0u8; RAW_REPORT_LEN + 1];
    buf[1..].copy_from_slice(&status.encode());
    buf
}
