//! Blocking transfer primitives.
//!
//! Every function issues exactly one transfer against [`TIMEOUT`] and fails
//! unless the whole buffer was moved. Callers must not run two transfers on the
//! same handle concurrently.

use std::time::Duration;

use shared::{
    BULK_IN_ENDPOINT, BULK_OUT_ENDPOINT, Command, ControlRequest, FRAME_LEN, HexBytes, INIT_QUERY,
    INTERRUPT_IN_ENDPOINT, INTERRUPT_OUT_ENDPOINT, ResponseFrame, USB_TIMEOUT_MS,
};

use crate::{
    UsbHandle,
    error::{TransferError, TransferKind},
};

pub const TIMEOUT: Duration = Duration::from_millis(USB_TIMEOUT_MS);

/// Control endpoint address, used for error reporting.
const CONTROL_ENDPOINT: u8 = 0x00;

/// Sends a [`Command`] frame through a [`ControlRequest::COMMAND`] request.
///
/// # Errors
pub fn control_write<H>(handle: &H, command: Command) -> Result<(), TransferError>
where
    H: UsbHandle,
{
    tracing::debug!("sending {command}");
    write_control(handle, ControlRequest::COMMAND, &command.frame())
}

/// Sends the short [`INIT_QUERY`] that primes the device.
///
/// # Errors
pub fn init_query<H>(handle: &H) -> Result<(), TransferError>
where
    H: UsbHandle,
{
    write_control(handle, ControlRequest::INIT_QUERY, &INIT_QUERY)
}

/// Writes a frame to the interrupt OUT endpoint.
///
/// # Errors
pub fn interrupt_write<H>(handle: &H, frame: &[u8; FRAME_LEN]) -> Result<(), TransferError>
where
    H: UsbHandle,
{
    let endpoint = INTERRUPT_OUT_ENDPOINT;
    let kind = TransferKind::InterruptWrite;

    let written = handle
        .write_interrupt(endpoint, frame, TIMEOUT)
        .map_err(|source| usb_error(kind, endpoint, source))?;

    check_len(kind, endpoint, frame.len(), written)?;
    tracing::debug!("{kind}: {}", HexBytes(frame));
    Ok(())
}

/// Reads one frame from the interrupt IN endpoint.
///
/// # Errors
pub fn interrupt_read<H>(handle: &H) -> Result<ResponseFrame, TransferError>
where
    H: UsbHandle,
{
    let endpoint = INTERRUPT_IN_ENDPOINT;
    let kind = TransferKind::InterruptRead;
    let mut buf = [0; FRAME_LEN];

    let read = handle
        .read_interrupt(endpoint, &mut buf, TIMEOUT)
        .map_err(|source| usb_error(kind, endpoint, source))?;

    let frame = to_frame(kind, endpoint, &buf[..read.min(FRAME_LEN)])?;
    tracing::debug!("{kind}: {frame}");
    Ok(frame)
}

/// Writes `data` to the bulk OUT endpoint. An empty slice sends a zero length
/// packet.
///
/// # Errors
pub fn bulk_write<H>(handle: &H, data: &[u8]) -> Result<(), TransferError>
where
    H: UsbHandle,
{
    let endpoint = BULK_OUT_ENDPOINT;
    let kind = TransferKind::BulkWrite;

    let written = handle
        .write_bulk(endpoint, data, TIMEOUT)
        .map_err(|source| usb_error(kind, endpoint, source))?;

    check_len(kind, endpoint, data.len(), written)?;
    tracing::debug!("{kind}: {}", HexBytes(data));
    Ok(())
}

/// Reads one frame from the bulk IN endpoint.
///
/// # Errors
pub fn bulk_read<H>(handle: &H) -> Result<ResponseFrame, TransferError>
where
    H: UsbHandle,
{
    let endpoint = BULK_IN_ENDPOINT;
    let kind = TransferKind::BulkRead;
    let mut buf = [0; FRAME_LEN];

    let read = handle
        .read_bulk(endpoint, &mut buf, TIMEOUT)
        .map_err(|source| usb_error(kind, endpoint, source))?;

    let frame = to_frame(kind, endpoint, &buf[..read.min(FRAME_LEN)])?;
    tracing::debug!("{kind}: {frame}");
    Ok(frame)
}

fn write_control<H>(handle: &H, request: ControlRequest, data: &[u8]) -> Result<(), TransferError>
where
    H: UsbHandle,
{
    let kind = TransferKind::ControlWrite;

    let written = handle
        .write_control(
            request.request_type,
            request.request,
            request.value,
            request.index,
            data,
            TIMEOUT,
        )
        .map_err(|source| usb_error(kind, CONTROL_ENDPOINT, source))?;

    check_len(kind, CONTROL_ENDPOINT, data.len(), written)?;
    tracing::debug!("{kind} {:#06x}: {}", request.value, HexBytes(data));
    Ok(())
}

fn usb_error(kind: TransferKind, endpoint: u8, source: rusb::Error) -> TransferError {
    TransferError::Usb {
        kind,
        endpoint,
        source,
    }
}

fn check_len(
    kind: TransferKind,
    endpoint: u8,
    expected: usize,
    actual: usize,
) -> Result<(), TransferError> {
    if expected == actual {
        return Ok(());
    }

    Err(TransferError::Length {
        kind,
        endpoint,
        expected,
        actual,
    })
}

fn to_frame(kind: TransferKind, endpoint: u8, data: &[u8]) -> Result<ResponseFrame, TransferError> {
    ResponseFrame::try_from(data).map_err(|e| TransferError::Length {
        kind,
        endpoint,
        expected: e.expected,
        actual: e.actual,
    })
}
