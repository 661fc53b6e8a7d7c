//! Vendor raw-HID interface the companion writes meeting status into.

use delegate::delegate;
use fugit::ExtU32;
use usb_device::bus::{UsbBus, UsbBusAllocator};
use usbd_human_interface_device::usb_class::prelude::*;
use zoomer_keymap::conf::{RAW_REPORT_LEN, RAW_USAGE, RAW_USAGE_PAGE};

const _: () = assert!(RAW_USAGE_PAGE == 0xFF60 && RAW_USAGE == 0x61 && RAW_REPORT_LEN == 32);

#[rustfmt::skip]
pub const STATUS_REPORT_DESCRIPTOR: &[u8] = &[
    0x06, 0x60, 0xFF, // Usage Page (Vendor Defined 0xFF60)
    0x09, 0x61,       // Usage (0x61)
    0xA1, 0x01,       // Collection (Application)
    0x09, 0x62,       //   Usage (Data In)
    0x15, 0x00,       //       Logical Minimum (0)
    0x26, 0xFF, 0x00, //       Logical Maximum (255)
    0x95, 0x20,       //       Report Count (32)
    0x75, 0x08,       //       Report Size (8)
    0x81, 0x02,       //       Input (Data | Variable | Absolute)
    0x09, 0x63,       //   Usage (Data Out)
    0x15, 0x00,       //       Logical Minimum (0)
    0x26, 0xFF, 0x00, //       Logical Maximum (255)
    0x95, 0x20,       //       Report Count (32)
    0x75, 0x08,       //       Report Size (8)
    0x91, 0x02,       //       Output (Data | Variable | Absolute)
    0xC0,             // End Collection
];

pub type StatusPacket = [u8; RAW_REPORT_LEN];

type RawInterface<'a, B> = Interface<'a, B, InBytes32, OutBytes32, ReportSingle>;
type RawInterfaceConfig<'a> = InterfaceConfig<'a, InBytes32, OutBytes32, ReportSingle>;
type RawInterfaceBuilder<'a> = InterfaceBuilder<'a, InBytes32, OutBytes32, ReportSingle>;

pub struct RawStatus<'a, B: UsbBus> {
    interface: RawInterface<'a, B>,
}

impl<'a, B: UsbBus> RawStatus<'a, B> {
    delegate! {
        to self.interface {
            pub fn read_report(&mut self, data: &mut [u8]) -> usb_device::Result<usize>;
        }
    }

    /// A status packet from the host, if one is waiting.
    pub fn read_packet(&mut self) -> usb_device::Result<(StatusPacket, usize)> {
        let mut packet = [0u8; RAW_REPORT_LEN];
        let len = self.read_report(&mut packet)?;
        Ok((packet, len))
    }
}

impl<'a, B: UsbBus> DeviceClass<'a> for RawStatus<'a, B> {
    type I = RawInterface<'a, B>;

    fn interface(&mut self) -> &mut Self::I {
        &mut self.interface
    }

    fn reset(&mut self) {}

    fn tick(&mut self) -> Result<(), UsbHidError> {
        Ok(())
    }
}

pub struct RawStatusConfig<'a> {
    interface: RawInterfaceConfig<'a>,
}

impl<'a> Default for RawStatusConfig<'a> {
    fn default() -> Self {
        Self {
            interface: RawInterfaceBuilder::new(STATUS_REPORT_DESCRIPTOR)
                .unwrap()
                .description("Zoomer Status")
                .in_endpoint(10.millis())
                .unwrap()
                .with_out_endpoint(10.millis())
                .unwrap()
                .build(),
        }
    }
}

impl<'a, B: UsbBus + 'a> UsbAllocatable<'a, B> for RawStatusConfig<'a> {
    type Allocated = RawStatus<'a, B>;

    fn allocate(self, usb_alloc: &'a UsbBusAllocator<B>) -> Self::Allocated {
        RawStatus {
            interface: RawInterface::new(usb_alloc, self.interface),
        }
    }
}
