use rusb::{Device, DeviceHandle, UsbContext};
use shared::DeviceIdentity;

use crate::SensorError;

/// What the locator needs to know about an enumerated device.
pub trait Enumerated {
    type Handle;

    /// Identity from the device descriptor, [`None`] if it cannot be read.
    fn identity(&self) -> Option<DeviceIdentity>;

    /// Bus number and device address.
    fn location(&self) -> (u8, u8);

    /// Opens the device without claiming or configuring anything.
    ///
    /// # Errors
    fn open(&self) -> rusb::Result<Self::Handle>;
}

impl<T> Enumerated for Device<T>
where
    T: UsbContext,
{
    type Handle = DeviceHandle<T>;

    fn identity(&self) -> Option<DeviceIdentity> {
        let desc = self.device_descriptor().ok()?;
        Some(DeviceIdentity::new(desc.vendor_id(), desc.product_id()))
    }

    fn location(&self) -> (u8, u8) {
        (self.bus_number(), self.address())
    }

    fn open(&self) -> rusb::Result<Self::Handle> {
        Device::open(self)
    }
}

/// Filters `devices` down to the ones matching `identity`, in bus order.
pub fn matching<I>(devices: I, identity: DeviceIdentity) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Enumerated,
{
    let mut matches = devices
        .into_iter()
        .filter(|device| device.identity() == Some(identity))
        .collect::<Vec<_>>();

    matches.sort_by_key(Enumerated::location);
    matches
}

/// Picks the match at `ordinal`, with `0` being the first one in bus order.
pub fn select<I>(devices: I, identity: DeviceIdentity, ordinal: usize) -> Option<I::Item>
where
    I: IntoIterator,
    I::Item: Enumerated,
{
    matching(devices, identity).into_iter().nth(ordinal)
}

/// Opens the device with the given `identity` at `ordinal`.
///
/// Nothing is claimed or configured on the returned handle.
///
/// # Errors
pub fn find<T>(
    context: &T,
    identity: DeviceIdentity,
    ordinal: usize,
) -> Result<DeviceHandle<T>, SensorError>
where
    T: UsbContext,
{
    let devices = context.devices().map_err(SensorError::Context)?;
    open_nth(devices.iter(), identity, ordinal)
}

/// Opens the match at `ordinal` among `devices`.
///
/// # Errors
pub fn open_nth<I>(
    devices: I,
    identity: DeviceIdentity,
    ordinal: usize,
) -> Result<<I::Item as Enumerated>::Handle, SensorError>
where
    I: IntoIterator,
    I::Item: Enumerated,
{
    let device = select(devices, identity, ordinal)
        .ok_or(SensorError::DeviceNotFound { identity, ordinal })?;

    let (bus, address) = device.location();
    tracing::debug!("device {identity} found on bus {bus:03} address {address:03}");

    device
        .open()
        .map_err(|source| SensorError::OpenFailed { identity, source })
}

#[cfg(test)]
mod tests {
    use shared::{DeviceIdentity, PCSENSOR};

    use super::{Enumerated, matching, open_nth, select};
    use crate::SensorError;

    const OTHER: DeviceIdentity = DeviceIdentity::new(0x1d6b, 0x0002);

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct FakeDevice {
        identity: Option<DeviceIdentity>,
        bus: u8,
        address: u8,
        open_error: Option<rusb::Error>,
    }

    impl FakeDevice {
        fn new(identity: DeviceIdentity, bus: u8, address: u8) -> Self {
            Self {
                identity: Some(identity),
                bus,
                address,
                open_error: None,
            }
        }
    }

    impl Enumerated for FakeDevice {
        /// Location of the opened device.
        type Handle = (u8, u8);

        fn identity(&self) -> Option<DeviceIdentity> {
            self.identity
        }

        fn location(&self) -> (u8, u8) {
            (self.bus, self.address)
        }

        fn open(&self) -> rusb::Result<Self::Handle> {
            self.open_error.map_or(Ok(self.location()), Err)
        }
    }

    fn devices() -> Vec<FakeDevice> {
        vec![
            FakeDevice::new(PCSENSOR, 3, 2),
            FakeDevice::new(OTHER, 1, 1),
            FakeDevice::new(PCSENSOR, 1, 7),
            FakeDevice {
                identity: None,
                bus: 1,
                address: 2,
                open_error: None,
            },
            FakeDevice::new(PCSENSOR, 2, 4),
        ]
    }

    #[test]
    fn test_matches_are_in_bus_order() {
        let found = matching(devices(), PCSENSOR);
        let locations = found.iter().map(Enumerated::location).collect::<Vec<_>>();
        assert_eq!(locations, [(1, 7), (2, 4), (3, 2)]);
    }

    #[test]
    fn test_ordinal_selects_nth_match() {
        assert_eq!(
            select(devices(), PCSENSOR, 0),
            Some(FakeDevice::new(PCSENSOR, 1, 7))
        );
        assert_eq!(
            select(devices(), PCSENSOR, 2),
            Some(FakeDevice::new(PCSENSOR, 3, 2))
        );
    }

    #[test]
    fn test_missing_ordinal() {
        assert_eq!(select(devices(), PCSENSOR, 3), None);
        assert_eq!(select(Vec::<FakeDevice>::new(), PCSENSOR, 0), None);
        assert_eq!(select(devices(), DeviceIdentity::new(0, 0), 0), None);
    }

    #[test]
    fn test_open_nth_opens_selected_device() {
        assert_eq!(open_nth(devices(), PCSENSOR, 1).unwrap(), (2, 4));
    }

    #[test]
    fn test_open_nth_not_found() {
        let err = open_nth(devices(), PCSENSOR, 3).unwrap_err();
        assert!(matches!(
            err,
            SensorError::DeviceNotFound {
                identity: PCSENSOR,
                ordinal: 3,
            }
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_open_nth_open_failure() {
        let mut devices = devices();
        devices[2].open_error = Some(rusb::Error::Access);

        let err = open_nth(devices, PCSENSOR, 0).unwrap_err();
        assert!(matches!(
            err,
            SensorError::OpenFailed {
                identity: PCSENSOR,
                source: rusb::Error::Access,
            }
        ));
    }
}
