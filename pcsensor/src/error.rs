use shared::{Command, DeviceIdentity};
use strum::Display;
use thiserror::Error as ThisError;

/// Exit status used for setup failures.
pub const EXIT_SETUP_FAILURE: u8 = 1;
/// Exit status used for failed transfers, during or after the handshake.
pub const EXIT_TRANSFER_FAILURE: u8 = 17;

#[derive(Debug, ThisError)]
pub enum SensorError {
    #[error("libusb error")]
    Context(#[source] rusb::Error),
    #[error("no device {identity} found at ordinal {ordinal}")]
    DeviceNotFound {
        identity: DeviceIdentity,
        ordinal: usize,
    },
    #[error("unable to open device {identity}")]
    OpenFailed {
        identity: DeviceIdentity,
        #[source]
        source: rusb::Error,
    },
    #[error("unable to set configuration {config}")]
    ConfigurationFailed {
        config: u8,
        #[source]
        source: rusb::Error,
    },
    #[error("unable to claim interface {interface}")]
    InterfaceClaimFailed {
        interface: u8,
        #[source]
        source: rusb::Error,
    },
    #[error("handshake failed at step {step}")]
    HandshakeFailed {
        step: HandshakeStep,
        #[source]
        source: TransferError,
    },
    #[error(transparent)]
    Io(#[from] TransferError),
}

impl SensorError {
    /// Process exit status for the error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            SensorError::HandshakeFailed { .. } | SensorError::Io(_) => EXIT_TRANSFER_FAILURE,
            SensorError::Context(_)
            | SensorError::DeviceNotFound { .. }
            | SensorError::OpenFailed { .. }
            | SensorError::ConfigurationFailed { .. }
            | SensorError::InterfaceClaimFailed { .. } => EXIT_SETUP_FAILURE,
        }
    }
}

/// A control, interrupt or bulk transfer that failed or moved the wrong number
/// of bytes. Timeouts end up here too.
#[derive(Debug, ThisError)]
pub enum TransferError {
    #[error("{kind} transfer on {endpoint:#04x} failed")]
    Usb {
        kind: TransferKind,
        endpoint: u8,
        #[source]
        source: rusb::Error,
    },
    #[error("{kind} transfer on {endpoint:#04x} moved {actual} of {expected} bytes")]
    Length {
        kind: TransferKind,
        endpoint: u8,
        expected: usize,
        actual: usize,
    },
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum TransferKind {
    ControlWrite,
    InterruptWrite,
    InterruptRead,
    BulkWrite,
    BulkRead,
}

/// Handshake steps, each being a control write plus the reads that follow it.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum HandshakeStep {
    InitQuery,
    QueryTemperature,
    #[strum(serialize = "init-1")]
    Init1,
    #[strum(serialize = "init-2")]
    Init2,
}

impl From<Command> for HandshakeStep {
    fn from(value: Command) -> Self {
        match value {
            Command::QueryTemperature => HandshakeStep::QueryTemperature,
            Command::Init1 => HandshakeStep::Init1,
            Command::Init2 => HandshakeStep::Init2,
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::{Command, PCSENSOR};

    use super::{
        EXIT_SETUP_FAILURE, EXIT_TRANSFER_FAILURE, HandshakeStep, SensorError, TransferError,
        TransferKind,
    };

    fn transfer_error() -> TransferError {
        TransferError::Length {
            kind: TransferKind::InterruptRead,
            endpoint: 0x82,
            expected: 8,
            actual: 3,
        }
    }

    #[test]
    fn test_exit_codes() {
        let not_found = SensorError::DeviceNotFound {
            identity: PCSENSOR,
            ordinal: 0,
        };
        assert_eq!(not_found.exit_code(), EXIT_SETUP_FAILURE);

        let claim = SensorError::InterfaceClaimFailed {
            interface: 1,
            source: rusb::Error::Busy,
        };
        assert_eq!(claim.exit_code(), EXIT_SETUP_FAILURE);

        let handshake = SensorError::HandshakeFailed {
            step: HandshakeStep::Init2,
            source: transfer_error(),
        };
        assert_eq!(handshake.exit_code(), EXIT_TRANSFER_FAILURE);
        assert_eq!(SensorError::from(transfer_error()).exit_code(), EXIT_TRANSFER_FAILURE);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            transfer_error().to_string(),
            "interrupt-read transfer on 0x82 moved 3 of 8 bytes"
        );

        let not_found = SensorError::DeviceNotFound {
            identity: PCSENSOR,
            ordinal: 2,
        };
        assert_eq!(not_found.to_string(), "no device 0c45:7401 found at ordinal 2");

        let handshake = SensorError::HandshakeFailed {
            step: Command::Init1.into(),
            source: transfer_error(),
        };
        assert_eq!(handshake.to_string(), "handshake failed at step init-1");
    }
}
