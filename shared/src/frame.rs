use core::fmt;

use thiserror::Error as ThisError;

use crate::{Calibration, FRAME_LEN, Temperature};

/// Frame read from the interrupt IN endpoint.
///
/// Only bytes 2 (high) and 3 (low) carry the sensor reading, the rest is
/// ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResponseFrame([u8; FRAME_LEN]);

impl ResponseFrame {
    #[must_use]
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// The uncalibrated sensor value.
    #[inline]
    #[must_use]
    pub const fn raw_reading(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }

    /// Decodes the frame into a temperature, applying the calibration offset.
    #[inline]
    #[must_use]
    pub fn decode(&self, calibration: Calibration) -> Temperature {
        Temperature::from_raw(self.raw_reading(), calibration)
    }
}

/// Anything other than exactly [`FRAME_LEN`] bytes is rejected, so a short read
/// can never pass for a valid frame.
impl TryFrom<&[u8]> for ResponseFrame {
    type Error = FrameLenError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        <[u8; FRAME_LEN]>::try_from(value)
            .map(Self)
            .map_err(|_| FrameLenError {
                expected: FRAME_LEN,
                actual: value.len(),
            })
    }
}

impl fmt::Display for ResponseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&HexBytes(&self.0), f)
    }
}

#[derive(Clone, Copy, Debug, ThisError)]
#[cfg_attr(test, derive(PartialEq))]
#[error("expected {expected} bytes, got {actual}")]
pub struct FrameLenError {
    pub expected: usize,
    pub actual: usize,
}

/// Displays bytes as space separated lowercase hex, e.g. `01 80 33 01`.
#[derive(Clone, Copy, Debug)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }

            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::{FrameLenError, HexBytes, ResponseFrame};
    use crate::Calibration;

    #[test]
    fn test_raw_reading_uses_bytes_2_and_3() {
        let frame = ResponseFrame::new([0xff, 0xff, 0x03, 0xe8, 0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(frame.raw_reading(), 1000);

        let frame = ResponseFrame::new([0, 0, 0x80, 0x01, 0, 0, 0, 0]);
        assert_eq!(frame.raw_reading(), 0x8001);
    }

    #[test]
    fn test_short_frame_is_rejected() {
        let bytes: [u8; 3] = [0x01, 0x02, 0x03];
        assert_eq!(
            ResponseFrame::try_from(&bytes[..]),
            Err(FrameLenError {
                expected: 8,
                actual: 3
            })
        );

        let bytes = [0_u8; 9];
        assert!(ResponseFrame::try_from(&bytes[..]).is_err());

        let bytes: [u8; 8] = [0x00, 0x00, 0x03, 0xe8, 0x00, 0x00, 0x00, 0x00];
        let frame = ResponseFrame::try_from(&bytes[..]).unwrap();
        assert_eq!(frame, ResponseFrame::new(bytes));
    }

    #[test]
    fn test_decode_matches_temperature() {
        let frame = ResponseFrame::new([0, 0, 0x03, 0xe8, 0, 0, 0, 0]);
        let celsius = frame.decode(Calibration::new(0)).celsius();
        assert_eq!(celsius.to_bits(), 3.906_25_f64.to_bits());
    }

    #[test]
    fn test_hex_display() {
        let frame = ResponseFrame::new([0x01, 0x80, 0x33, 0x01, 0x00, 0x00, 0x0a, 0xff]);
        assert_eq!(frame.to_string(), "01 80 33 01 00 00 0a ff");
        assert_eq!(HexBytes(&[]).to_string(), "");
        assert_eq!(HexBytes(&[0x01, 0x01]).to_string(), "01 01");
    }
}
