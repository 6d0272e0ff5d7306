use core::fmt;

use crate::FRAME_LEN;

/// Payload of the short control write that primes the device before the
/// handshake commands.
pub const INIT_QUERY: [u8; 2] = [0x01, 0x01];

/// Vendor commands understood by the sensor.
///
/// Every command travels as the 8 byte payload of a [`ControlRequest::COMMAND`]
/// request and the device answers on the interrupt IN endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(strum::EnumIter))]
pub enum Command {
    /// Asks for the current sensor reading.
    QueryTemperature,
    /// First initialization command of the handshake.
    Init1,
    /// Second initialization command of the handshake.
    Init2,
}

impl Command {
    /// The raw frame sent to the device.
    #[must_use]
    pub const fn frame(self) -> [u8; FRAME_LEN] {
        match self {
            Command::QueryTemperature => [0x01, 0x80, 0x33, 0x01, 0x00, 0x00, 0x00, 0x00],
            Command::Init1 => [0x01, 0x82, 0x77, 0x01, 0x00, 0x00, 0x00, 0x00],
            Command::Init2 => [0x01, 0x86, 0xff, 0x01, 0x00, 0x00, 0x00, 0x00],
        }
    }

    /// Number of frames the device emits on the interrupt IN endpoint after
    /// receiving the command.
    ///
    /// [`Command::Init2`] is followed by an extra unsolicited frame that must be
    /// drained before the next exchange.
    #[must_use]
    pub const fn response_count(self) -> usize {
        match self {
            Command::Init2 => 2,
            Command::QueryTemperature | Command::Init1 => 1,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::QueryTemperature => "query-temperature",
            Command::Init1 => "init-1",
            Command::Init2 => "init-2",
        };

        f.write_str(name)
    }
}

/// Parameters of a class specific, interface recipient, host to device
/// control request (`SET_REPORT`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlRequest {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
}

impl ControlRequest {
    /// Request carrying a [`Command`] frame.
    pub const COMMAND: Self = Self::set_report(0x0200, 0x01);
    /// Request carrying [`INIT_QUERY`].
    pub const INIT_QUERY: Self = Self::set_report(0x0201, 0x00);

    const REQUEST_TYPE: u8 = 0x21;
    const SET_REPORT: u8 = 0x09;

    const fn set_report(value: u16, index: u16) -> Self {
        Self {
            request_type: Self::REQUEST_TYPE,
            request: Self::SET_REPORT,
            value,
            index,
        }
    }
}
