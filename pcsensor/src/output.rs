use chrono::NaiveDateTime;
use shared::Temperature;

/// Name printed as the last line of the mrtg output.
const MRTG_TARGET: &str = "pcsensor";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
    #[default]
    Both,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputFormat {
    pub unit: Unit,
    pub mrtg: bool,
}

/// Renders one reading taken at `at`, including the trailing newline.
///
/// The mrtg form is four lines: the value twice (Fahrenheit only when
/// explicitly asked for, Celsius otherwise), the time of day and the target
/// name.
#[must_use]
pub fn render(temperature: Temperature, at: &NaiveDateTime, format: OutputFormat) -> String {
    if format.mrtg {
        let value = match format.unit {
            Unit::Fahrenheit => temperature.fahrenheit(),
            Unit::Celsius | Unit::Both => temperature.celsius(),
        };

        return format!(
            "{value:.2}\n{value:.2}\n{}\n{MRTG_TARGET}\n",
            at.format("%H:%M")
        );
    }

    let reading = match format.unit {
        Unit::Celsius => format!("{:.2}C", temperature.celsius()),
        Unit::Fahrenheit => format!("{:.2}F", temperature.fahrenheit()),
        Unit::Both => format!(
            "{:.2}F {:.2}C",
            temperature.fahrenheit(),
            temperature.celsius()
        ),
    };

    format!(
        "{} Temperature {reading}\n",
        at.format("%Y/%m/%d %H:%M:%S")
    )
}
