#![no_main]
#![no_std]

use defmt_rtt as _;
// global logger
use panic_probe as _;

#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

use defmt::{info, warn};
use frunk::{HCons, HNil};
use smart_leds::{brightness, SmartLedsWrite};
use stm32f1xx_hal::gpio::{Alternate, Output, PushPull, PA7, PC13};
use stm32f1xx_hal::pac;
use stm32f1xx_hal::prelude::*;
use stm32f1xx_hal::spi::{NoMiso, NoSck, Spi, Spi1NoRemap};
use stm32f1xx_hal::timer::{CounterUs, Event};
use stm32f1xx_hal::usb::{Peripheral, UsbBus};
use usb_device::prelude::*;
use usbd_human_interface_device::device::keyboard::NKROBootKeyboard;
use usbd_human_interface_device::prelude::*;
use ws2812_spi::Ws2812;
use zoomer_keymap::conf::{LED_BRIGHTNESS, USB_MANUFACTURER, USB_PID, USB_PRODUCT, USB_VID};
use zoomer_keymap::typer::Report;
use zoomer_keymap::{Instant, Keypad, Matrix, Typer};

mod bootloader;
mod scan;
mod status_class;

use scan::{Cols, Rows, Scanner};
use status_class::{RawStatus, RawStatusConfig};

type UsbDev<'a> = UsbDevice<'a, UsbBus<Peripheral>>;
type UsbKb<'a> = UsbHidClass<
    'a,
    UsbBus<Peripheral>,
    HCons<RawStatus<'a, UsbBus<Peripheral>>, HCons<NKROBootKeyboard<'a, UsbBus<Peripheral>>, HNil>>,
>;
type LedSpi = Spi<pac::SPI1, Spi1NoRemap, (NoSck, NoMiso, PA7<Alternate<PushPull>>), u8>;

/// The report the tick task is pushing to the keyboard interface.
pub struct Outbox {
    report: Report,
    sent: bool,
}

#[rtic::app(device = stm32f1xx_hal::pac)]
mod app {
    use crate::*;
    use stm32f1xx_hal::backup_domain::BackupDomain;

    #[shared]
    struct Shared {
        usb_dev: UsbDev<'static>,
        hid: UsbKb<'static>,
        keypad: Keypad,
        typer: Typer,
        outbox: Outbox,
        clock_ms: u32,
    }

    #[local]
    struct Local {
        timer: CounterUs<pac::TIM2>,
        scanner: Scanner,
        matrix: Matrix,
        ws: Ws2812<LedSpi>,
        led: PC13<Output<PushPull>>,
        backup: BackupDomain,
    }

    #[init(local = [usb_bus: Option<usb_device::bus::UsbBusAllocator<UsbBus<Peripheral>>> = None])]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut dp = cx.device;
        let mut flash = dp.FLASH.constrain();
        let rcc = dp.RCC.constrain();
        let backup = rcc.bkp.constrain(dp.BKP, &mut dp.PWR);
        let clocks = rcc
            .cfgr
            .use_hse(8.MHz())
            .sysclk(72.MHz())
            .pclk1(36.MHz())
            .freeze(&mut flash.acr);

        assert!(clocks.usbclk_valid());

        let mut afio = dp.AFIO.constrain();
        let mut gpioa = dp.GPIOA.split();
        let mut gpiob = dp.GPIOB.split();
        let mut gpioc = dp.GPIOC.split();

        let mut led = gpioc.pc13.into_push_pull_output(&mut gpioc.crh);
        led.set_low();

        let rows: Rows = [
            gpiob.pb5.into_pull_up_input(&mut gpiob.crl).erase(),
            gpiob.pb6.into_pull_up_input(&mut gpiob.crl).erase(),
            gpiob.pb7.into_pull_up_input(&mut gpiob.crl).erase(),
        ];
        let cols: Cols = [
            gpiob.pb12.into_push_pull_output(&mut gpiob.crh).erase(),
            gpiob.pb13.into_push_pull_output(&mut gpiob.crh).erase(),
            gpiob.pb14.into_push_pull_output(&mut gpiob.crh).erase(),
        ];
        // ~1us for the rows to settle after a column goes low
        let scanner = Scanner::new(rows, cols, clocks.sysclk().raw() / 1_000_000);

        info!("Conf leds.");
        let mosi = gpioa.pa7.into_alternate_push_pull(&mut gpioa.crl);
        let spi = Spi::spi1(
            dp.SPI1,
            (NoSck, NoMiso, mosi),
            &mut afio.mapr,
            ws2812_spi::MODE,
            3.MHz(),
            clocks,
        );
        let ws = Ws2812::new(spi);

        info!("Conf tick timer.");
        let mut timer = dp.TIM2.counter_us(&clocks);
        match timer.start(1.millis()) {
            Ok(_) => timer.listen(Event::Update),
            Err(_) => warn!("tick timer error."),
        }

        info!("Start Usb");
        // pull D+ low so the host notices the re-enumeration
        let mut usb_dp = gpioa.pa12.into_push_pull_output(&mut gpioa.crh);
        usb_dp.set_low();
        cortex_m::asm::delay(clocks.sysclk().raw() / 100);

        let usb = Peripheral {
            usb: dp.USB,
            pin_dm: gpioa.pa11,
            pin_dp: usb_dp.into_floating_input(&mut gpioa.crh),
        };
        let usb_bus = cx.local.usb_bus.insert(UsbBus::new(usb));

        let hid: UsbKb = UsbHidClassBuilder::new()
            .add_device(usbd_human_interface_device::device::keyboard::NKROBootKeyboardConfig::default())
            .add_device(RawStatusConfig::default())
            .build(usb_bus);

        let usb_dev: UsbDev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(USB_VID, USB_PID))
            .manufacturer(USB_MANUFACTURER)
            .product(USB_PRODUCT)
            .serial_number("0")
            .build();
        info!("Usb done.");

        let outbox = Outbox {
            report: Report::new(),
            sent: true,
        };
        led.set_high();

        (
            Shared {
                usb_dev,
                hid,
                keypad: Keypad::new(),
                typer: Typer::new(),
                outbox,
                clock_ms: 0,
            },
            Local {
                timer,
                scanner,
                matrix: Matrix::new(),
                ws,
                led,
                backup,
            },
            init::Monotonics(),
        )
    }

    #[task(binds = USB_HP_CAN_TX, priority = 2, shared = [usb_dev, hid])]
    fn usb_tx(cx: usb_tx::Context) {
        let mut usb_dev = cx.shared.usb_dev;
        let mut hid = cx.shared.hid;
        (&mut usb_dev, &mut hid).lock(|usb_dev, hid| {
            usb_poll(usb_dev, hid);
        });
    }

    #[task(binds = USB_LP_CAN_RX0, priority = 2, shared = [usb_dev, hid])]
    fn usb_rx(cx: usb_rx::Context) {
        let mut usb_dev = cx.shared.usb_dev;
        let mut hid = cx.shared.hid;
        (&mut usb_dev, &mut hid).lock(|usb_dev, hid| {
            usb_poll(usb_dev, hid);
        });
    }

    #[task(binds = TIM2, priority = 3, shared = [hid, keypad, typer, outbox, clock_ms], local = [timer])]
    fn tick(cx: tick::Context) {
        let mut hid = cx.shared.hid;
        let mut keypad = cx.shared.keypad;
        let mut typer = cx.shared.typer;
        let mut outbox = cx.shared.outbox;
        let mut clock_ms = cx.shared.clock_ms;

        clock_ms.lock(|clock_ms| *clock_ms = clock_ms.wrapping_add(1));

        (&mut hid, &mut typer, &mut outbox).lock(|hid, typer, outbox| {
            match hid.tick() {
                Err(UsbHidError::WouldBlock) | Ok(_) => {}
                Err(_) => warn!("Failed to tick hid class"),
            }

            if outbox.sent {
                if let Some(report) = typer.next_report() {
                    outbox.report = report;
                    outbox.sent = false;
                }
            }

            let keyboard = hid.device::<NKROBootKeyboard<'_, _>, _>();
            match keyboard.write_report(outbox.report.iter().copied()) {
                Ok(_) | Err(UsbHidError::Duplicate) => outbox.sent = true,
                Err(UsbHidError::WouldBlock) => {}
                Err(_) => warn!("Failed to write keyboard report"),
            }
            // host lock leds are not shown on this pad, just drain them
            match keyboard.read_report() {
                Err(UsbError::WouldBlock) | Ok(_) => {}
                Err(_) => warn!("Failed to read keyboard leds report"),
            }
        });

        let packet = hid.lock(|hid| hid.device::<RawStatus<'_, _>, _>().read_packet());
        match packet {
            Err(UsbError::WouldBlock) => {}
            Ok((packet, len)) => keypad.lock(|keypad| keypad.raw_hid_receive(&packet[..len])),
            Err(_) => warn!("Failed to read status report"),
        }

        cx.local.timer.clear_interrupt(Event::Update);
    }

    #[idle(local = [scanner, matrix, ws, led, backup], shared = [keypad, typer, outbox, clock_ms])]
    fn idle(cx: idle::Context) -> ! {
        info!("idle");
        let scanner = cx.local.scanner;
        let matrix = cx.local.matrix;
        let ws = cx.local.ws;
        let mut keypad = cx.shared.keypad;
        let mut typer = cx.shared.typer;
        let mut outbox = cx.shared.outbox;
        let mut clock_ms = cx.shared.clock_ms;

        loop {
            let now = Instant::from_ticks(clock_ms.lock(|clock_ms| *clock_ms));
            let events = matrix.update(scanner.scan());

            let frame = (&mut keypad, &mut typer).lock(|keypad, typer| {
                for event in events {
                    keypad.key_event(event, now, typer);
                }
                keypad.poll(now, typer);
                keypad.take_frame()
            });

            if let Some(frame) = frame {
                if ws.write(brightness(frame.iter().cloned(), LED_BRIGHTNESS)).is_err() {
                    warn!("Failed to write leds");
                }
            }

            let reboot = (&mut typer, &mut outbox)
                .lock(|typer, outbox| outbox.sent && typer.take_reset_request());
            if reboot {
                cx.local.led.set_low();
                bootloader::enter(cx.local.backup);
            }
        }
    }
}

fn usb_poll(usb_dev: &mut UsbDev, hid: &mut UsbKb) {
    usb_dev.poll(&mut [hid]);
}
