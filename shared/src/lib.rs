#![no_std]

mod command;
mod frame;
mod identity;
mod temperature;

pub use command::{Command, ControlRequest, INIT_QUERY};
pub use frame::{FrameLenError, HexBytes, ResponseFrame};
pub use identity::DeviceIdentity;
pub use temperature::{CELSIUS_PER_UNIT, Calibration, Temperature};

pub const USB_VID: u16 = 0x0c45;
pub const USB_PID: u16 = 0x7401;
/// Identity of the supported thermometer family.
pub const PCSENSOR: DeviceIdentity = DeviceIdentity::new(USB_VID, USB_PID);

/// Configuration value that has to be active before the interfaces get claimed.
pub const USB_CONFIGURATION: u8 = 0x01;
/// Both interfaces must be claimed for the device to answer.
pub const USB_INTERFACES: [u8; 2] = [0x00, 0x01];

pub const INTERRUPT_IN_ENDPOINT: u8 = 0x82;
pub const INTERRUPT_OUT_ENDPOINT: u8 = 0x00;
pub const BULK_IN_ENDPOINT: u8 = 0x82;
pub const BULK_OUT_ENDPOINT: u8 = 0x00;

/// Timeout applied to every transfer.
pub const USB_TIMEOUT_MS: u64 = 5000;

/// Length of both command and response frames.
pub const FRAME_LEN: usize = 8;
