use std::time::Duration;

use rusb::{DeviceHandle, UsbContext};

/// The subset of an open USB device handle the session needs.
///
/// Implemented by [`rusb::DeviceHandle`]; everything above this trait only ever
/// talks to the device through it.
pub trait UsbHandle {
    ///
    /// # Errors
    fn detach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()>;

    ///
    /// # Errors
    fn attach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()>;

    ///
    /// # Errors
    fn set_active_configuration(&mut self, config: u8) -> rusb::Result<()>;

    ///
    /// # Errors
    fn claim_interface(&mut self, interface: u8) -> rusb::Result<()>;

    ///
    /// # Errors
    fn release_interface(&mut self, interface: u8) -> rusb::Result<()>;

    /// Returns the number of bytes written.
    ///
    /// # Errors
    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> rusb::Result<usize>;

    /// Returns the number of bytes read.
    ///
    /// # Errors
    fn read_interrupt(&self, endpoint: u8, buf: &mut [u8], timeout: Duration)
    -> rusb::Result<usize>;

    /// Returns the number of bytes written.
    ///
    /// # Errors
    fn write_interrupt(&self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize>;

    /// Returns the number of bytes read.
    ///
    /// # Errors
    fn read_bulk(&self, endpoint: u8, buf: &mut [u8], timeout: Duration) -> rusb::Result<usize>;

    /// Returns the number of bytes written.
    ///
    /// # Errors
    fn write_bulk(&self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize>;
}

impl<T> UsbHandle for DeviceHandle<T>
where
    T: UsbContext,
{
    fn detach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::detach_kernel_driver(self, interface)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::attach_kernel_driver(self, interface)
    }

    fn set_active_configuration(&mut self, config: u8) -> rusb::Result<()> {
        DeviceHandle::set_active_configuration(self, config)
    }

    fn claim_interface(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::claim_interface(self, interface)
    }

    fn release_interface(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::release_interface(self, interface)
    }

    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &[u8],
        timeout: Duration,
    ) -> rusb::Result<usize> {
        DeviceHandle::write_control(self, request_type, request, value, index, buf, timeout)
    }

    fn read_interrupt(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> rusb::Result<usize> {
        DeviceHandle::read_interrupt(self, endpoint, buf, timeout)
    }

    fn write_interrupt(&self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize> {
        DeviceHandle::write_interrupt(self, endpoint, buf, timeout)
    }

    fn read_bulk(&self, endpoint: u8, buf: &mut [u8], timeout: Duration) -> rusb::Result<usize> {
        DeviceHandle::read_bulk(self, endpoint, buf, timeout)
    }

    fn write_bulk(&self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize> {
        DeviceHandle::write_bulk(self, endpoint, buf, timeout)
    }
}
