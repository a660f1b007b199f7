//! Firmware entry point (§2 expansion, component C7): boots the board,
//! wires the concrete `MatrixIO`/`Clock` into a `cbmhid_core::Keyboard`, and
//! drives the scan/report loop over a standard USB HID boot-protocol
//! keyboard. Grounded on `dxkb-lily58l-stemcell::main`'s peripheral-setup
//! shape, trimmed of the split-link/layout machinery this board doesn't
//! have.

#![no_std]
#![no_main]

mod config;

use core::mem::MaybeUninit;
use core::ptr::addr_of_mut;

use cbmhid_common::dev_info;
use cbmhid_core::Keyboard;
use cbmhid_peripheral::clock::DwtClock;
use cortex_m_rt::entry;
#[allow(unused_imports)]
use panic_itm as _;
use stm32f4xx_hal::otg_fs::USB;
use stm32f4xx_hal::{pac, prelude::*, rcc::RccExt};
use synopsys_usb_otg::UsbBus;
use usb_device::bus::UsbBusAllocator;
use usb_device::device::{StringDescriptors, UsbDeviceBuilder, UsbRev, UsbVidPid};
use usb_device::LangID;
use usbd_hid::descriptor::{KeyboardReport, SerializedDescriptor};
use usbd_hid::hid_class::{
    HIDClass, HidClassSettings, HidCountryCode, HidProtocol, HidSubClass, ProtocolModeConfig,
};

static mut EP_MEMORY: [u32; 1024] = [0; 1024];
static mut USB_ALLOC: MaybeUninit<UsbBusAllocator<UsbBus<USB>>> = MaybeUninit::uninit();

#[entry]
fn main() -> ! {
    itm_logger::init_with_level(log::Level::Info).ok();

    let dp = pac::Peripherals::take().unwrap();
    let mut cortex = cortex_m::Peripherals::take().unwrap();

    let rcc = dp.RCC.constrain();
    let clocks = rcc
        .cfgr
        .use_hse(25.MHz())
        .sysclk(96.MHz())
        .pclk1(48.MHz())
        .pclk2(48.MHz())
        .require_pll48clk()
        .freeze();

    let clock = DwtClock::new(&clocks, &mut cortex.DCB, &mut cortex.DWT);

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();
    let mut matrix_io = config::init_matrix_io(
        (
            gpiob.pb0, gpiob.pb1, gpiob.pb2, gpiob.pb3, gpiob.pb4, gpiob.pb5, gpiob.pb6,
            gpiob.pb7,
        ),
        (
            gpioa.pa0, gpioa.pa1, gpioa.pa2, gpioa.pa3, gpioa.pa4, gpioa.pa5, gpioa.pa6,
            gpioa.pa7,
        ),
        gpioa.pa8,
    );

    let usb = USB {
        usb_global: dp.OTG_FS_GLOBAL,
        usb_device: dp.OTG_FS_DEVICE,
        usb_pwrclk: dp.OTG_FS_PWRCLK,
        pin_dm: gpioa.pa11.into(),
        pin_dp: gpioa.pa12.into(),
        hclk: clocks.hclk(),
    };

    let usb_alloc =
        unsafe { USB_ALLOC.write(UsbBus::new(usb, addr_of_mut!(EP_MEMORY).as_mut().unwrap())) };

    let mut hid = HIDClass::new_ep_in_with_settings(
        usb_alloc,
        KeyboardReport::desc(),
        config::USB_POLL_MS,
        HidClassSettings {
            subclass: HidSubClass::NoSubClass,
            protocol: HidProtocol::Keyboard,
            config: ProtocolModeConfig::DefaultBehavior,
            locale: HidCountryCode::NotSupported,
        },
    );
    let mut usb_dev = UsbDeviceBuilder::new(usb_alloc, UsbVidPid(config::USB_VID, config::USB_PID))
        .device_class(0x3) // HID Device
        .device_sub_class(HidSubClass::NoSubClass as u8) // No subclass
        .device_protocol(HidProtocol::Keyboard as u8)
        .usb_rev(UsbRev::Usb200)
        .strings(&[StringDescriptors::new(LangID::EN)
            .manufacturer(config::USB_MANUFACTURER)
            .product(config::USB_PRODUCT)
            .serial_number("0")])
        .unwrap()
        .build();

    dev_info!("Device startup complete.");

    let mut kb = Keyboard::new();
    kb.kb_init();

    loop {
        kb.kb_task(&mut matrix_io, &clock);

        if usb_dev.poll(&mut [&mut hid]) {
            let mut keycodes = [0u8; 6];
            let modifier = kb.kb_report(&mut keycodes);
            let report = KeyboardReport {
                modifier,
                reserved: 0,
                leds: 0,
                keycodes,
            };
            let _ = hid.push_input(&report);
        }
    }
}
