use crate::Duration;

pub const ROWS: usize = 3;
pub const COLS: usize = 3;
pub const KEY_COUNT: usize = ROWS * COLS;
pub const LAYERS: usize = 3;

/// A share key has to stay down strictly longer than this to fire.
pub const SHARE_HOLD: Duration = Duration::from_ticks(1500);

pub const TAP_QUEUE_LEN: usize = 8;
/// Modifiers plus the key itself.
pub const REPORT_KEYS_MAX: usize = 4;

pub const USB_VID: u16 = 0x594D;
pub const USB_PID: u16 = 0x4409;
pub const USB_MANUFACTURER: &str = "YMDK";
pub const USB_PRODUCT: &str = "YMD09 Zoomer";

pub const RAW_USAGE_PAGE: u16 = 0xFF60;
pub const RAW_USAGE: u8 = 0x61;
pub const RAW_REPORT_LEN: usize = 32;

pub const LED_COUNT: usize = KEY_COUNT;
pub const LED_BRIGHTNESS: u8 = 128;
