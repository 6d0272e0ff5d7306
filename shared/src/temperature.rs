/// Degrees Celsius per raw sensor unit.
pub const CELSIUS_PER_UNIT: f64 = 125.0 / 32000.0;

/// Per-unit correction, in raw sensor units, added to every reading before
/// conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Calibration(i32);

impl Calibration {
    #[must_use]
    pub const fn new(offset: i32) -> Self {
        Self(offset)
    }

    #[inline]
    #[must_use]
    pub const fn offset(self) -> i32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Temperature {
    celsius: f64,
}

impl Temperature {
    /// Converts a raw sensor value, shifted by the calibration offset, to a
    /// temperature.
    ///
    /// The raw value is used as is: a set top bit is not interpreted as a sign.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "a u16 plus an i32 offset always fits in the f64 mantissa"
    )]
    pub fn from_raw(raw: u16, calibration: Calibration) -> Self {
        let calibrated = i64::from(raw) + i64::from(calibration.offset());

        Self {
            celsius: calibrated as f64 * CELSIUS_PER_UNIT,
        }
    }

    #[inline]
    #[must_use]
    pub fn celsius(self) -> f64 {
        self.celsius
    }

    #[inline]
    #[must_use]
    pub fn fahrenheit(self) -> f64 {
        9.0 / 5.0 * self.celsius + 32.0
    }
}
