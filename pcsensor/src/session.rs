use shared::{
    Calibration, Command, FRAME_LEN, ResponseFrame, Temperature, USB_CONFIGURATION,
    USB_INTERFACES,
};
use strum::Display;
use tracing::instrument;

use crate::{
    Probe, SensorError, UsbHandle,
    error::{HandshakeStep, TransferError},
    transfer,
};

/// Frame written to the interrupt OUT endpoint by [`Probe::Interrupt`].
const PROBE_FRAME: [u8; FRAME_LEN] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Commands sent after [`shared::INIT_QUERY`], in order.
const HANDSHAKE: [Command; 3] = [Command::QueryTemperature, Command::Init1, Command::Init2];

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum SessionState {
    Opened,
    DriverDetached,
    ConfigSet,
    InterfacesClaimed,
    Ready,
    Closed,
}

/// An open sensor, exclusively owning its handle.
///
/// Once [`Session::initialize`] returns, the configuration is set, both
/// interfaces are claimed and the handshake is done. The interfaces are
/// released, and detached kernel drivers re-attached, on [`Session::close`] or
/// when the session gets dropped, including when initialization fails half way.
#[derive(Debug)]
pub struct Session<H>
where
    H: UsbHandle,
{
    handle: H,
    state: SessionState,
    claimed: Vec<u8>,
    detached: Vec<u8>,
}

impl<H> Session<H>
where
    H: UsbHandle,
{
    /// Brings a freshly opened handle to [`SessionState::Ready`].
    ///
    /// # Errors
    #[instrument(skip_all, err(Debug))]
    pub fn initialize(handle: H) -> Result<Self, SensorError> {
        let mut session = Self {
            handle,
            state: SessionState::Opened,
            claimed: Vec::with_capacity(USB_INTERFACES.len()),
            detached: Vec::with_capacity(USB_INTERFACES.len()),
        };

        session.detach_kernel_drivers();
        session.set_configuration()?;
        session.claim_interfaces()?;
        session.handshake()?;

        Ok(session)
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Queries the sensor and decodes the answer.
    ///
    /// # Errors
    pub fn poll(&mut self, calibration: Calibration) -> Result<Temperature, SensorError> {
        let frame = self.exchange(Command::QueryTemperature)?;
        let temperature = frame.decode(calibration);

        tracing::debug!(
            raw = frame.raw_reading(),
            offset = calibration.offset(),
            "temperature {:.2}C",
            temperature.celsius()
        );

        Ok(temperature)
    }

    /// Runs a diagnostic exchange on the alternate endpoints and returns the
    /// frame the device answered with.
    ///
    /// # Errors
    pub fn probe(&mut self, probe: Probe) -> Result<ResponseFrame, SensorError> {
        let frame = match probe {
            Probe::Interrupt => {
                transfer::interrupt_write(&self.handle, &PROBE_FRAME)?;
                transfer::interrupt_read(&self.handle)?
            }
            Probe::Bulk => {
                transfer::bulk_write(&self.handle, &[])?;
                transfer::bulk_read(&self.handle)?
            }
        };

        Ok(frame)
    }

    /// Releases the interfaces and closes the device.
    pub fn close(mut self) {
        self.release();
    }

    fn detach_kernel_drivers(&mut self) {
        for interface in USB_INTERFACES {
            match self.handle.detach_kernel_driver(interface) {
                Ok(()) => {
                    tracing::debug!("detached kernel driver from interface {interface}");
                    self.detached.push(interface);
                }
                Err(rusb::Error::NotFound) => {
                    tracing::debug!("interface {interface} already detached");
                }
                Err(e) => {
                    tracing::warn!("detaching interface {interface} failed, continuing anyway: {e}");
                }
            }
        }

        self.advance(SessionState::DriverDetached);
    }

    fn set_configuration(&mut self) -> Result<(), SensorError> {
        self.handle
            .set_active_configuration(USB_CONFIGURATION)
            .map_err(|source| SensorError::ConfigurationFailed {
                config: USB_CONFIGURATION,
                source,
            })?;

        self.advance(SessionState::ConfigSet);
        Ok(())
    }

    fn claim_interfaces(&mut self) -> Result<(), SensorError> {
        for interface in USB_INTERFACES {
            self.handle
                .claim_interface(interface)
                .map_err(|source| SensorError::InterfaceClaimFailed { interface, source })?;

            self.claimed.push(interface);
        }

        self.advance(SessionState::InterfacesClaimed);
        Ok(())
    }

    fn handshake(&mut self) -> Result<(), SensorError> {
        transfer::init_query(&self.handle).map_err(|source| SensorError::HandshakeFailed {
            step: HandshakeStep::InitQuery,
            source,
        })?;

        for command in HANDSHAKE {
            self.exchange(command)
                .map_err(|source| SensorError::HandshakeFailed {
                    step: command.into(),
                    source,
                })?;
        }

        self.advance(SessionState::Ready);
        Ok(())
    }

    /// Sends the command and reads every frame it triggers, returning the last
    /// one.
    fn exchange(&self, command: Command) -> Result<ResponseFrame, TransferError> {
        transfer::control_write(&self.handle, command)?;

        let mut frame = transfer::interrupt_read(&self.handle)?;
        for _ in 1..command.response_count() {
            frame = transfer::interrupt_read(&self.handle)?;
        }

        Ok(frame)
    }

    fn release(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        for interface in self.claimed.drain(..) {
            if let Err(e) = self.handle.release_interface(interface) {
                tracing::warn!("releasing interface {interface} failed: {e}");
            }
        }

        for interface in self.detached.drain(..) {
            if let Err(e) = self.handle.attach_kernel_driver(interface) {
                tracing::debug!("re-attaching kernel driver to interface {interface} failed: {e}");
            }
        }

        self.advance(SessionState::Closed);
    }

    fn advance(&mut self, state: SessionState) {
        tracing::debug!("session {} -> {state}", self.state);
        self.state = state;
    }
}

impl<H> Drop for Session<H>
where
    H: UsbHandle,
{
    fn drop(&mut self) {
        self.release();
    }
}
