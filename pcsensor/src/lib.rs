mod config;
pub mod error;
pub mod locator;
pub mod logging;
mod output;
mod session;
mod shutdown;
pub mod transfer;
mod usb;

pub use anyhow::Result as AnyResult;
pub use config::{Args, Config, Probe, SessionConfig};
pub use error::{SensorError, TransferError};
pub use output::{OutputFormat, Unit, render};
use rusb::{Context, DeviceHandle, UsbContext};
pub use session::{Session, SessionState};
use shared::PCSENSOR;
pub use shared::{Calibration, ResponseFrame, Temperature};
pub use shutdown::Shutdown;
use tracing::instrument;
pub use usb::UsbHandle;

use crate::locator::Enumerated;

/// A [`Session`] over a real libusb handle.
pub type UsbSession = Session<DeviceHandle<Context>>;

/// Locates the sensor selected by `config`, opens it and brings it to
/// [`SessionState::Ready`].
///
/// # Errors
#[instrument(skip_all, fields(ordinal = config.ordinal), err(Debug))]
pub fn open_session(config: &SessionConfig) -> Result<UsbSession, SensorError> {
    let context = logging::usb_context(config.usb_debug)?;
    let handle = locator::find(&context, PCSENSOR, config.ordinal)?;
    Session::initialize(handle)
}

/// Bus number and address of every attached sensor, indexed by ordinal.
///
/// # Errors
pub fn list_devices(usb_debug: bool) -> Result<Vec<(u8, u8)>, SensorError> {
    let context = logging::usb_context(usb_debug)?;
    let devices = context.devices().map_err(SensorError::Context)?;

    let locations = locator::matching(devices.iter(), PCSENSOR)
        .iter()
        .map(Enumerated::location)
        .collect();

    Ok(locations)
}
