use std::time::Duration;

use clap::{Parser, ValueEnum};
use shared::Calibration;

use crate::output::{OutputFormat, Unit};

/// Loop interval used when `--loop` is given without a value.
const DEFAULT_INTERVAL_SECS: &str = "5";

#[derive(Clone, Copy, Debug, Parser)]
#[command(name = "pcsensor", version, about)]
pub struct Args {
    /// Verbose output, including libusb debug messages and raw frames
    #[arg(short, long)]
    pub verbose: bool,

    /// Use device number N (0 is the first one found on the bus)
    #[arg(short = 'n', long, value_name = "N", default_value_t = 0)]
    pub device: usize,

    /// Loop every SECS seconds
    #[arg(
        short = 'l',
        long = "loop",
        value_name = "SECS",
        num_args = 0..=1,
        default_missing_value = DEFAULT_INTERVAL_SECS
    )]
    pub interval: Option<u64>,

    /// Output only in Celsius
    #[arg(short, long, conflicts_with = "fahrenheit")]
    pub celsius: bool,

    /// Output only in Fahrenheit
    #[arg(short, long)]
    pub fahrenheit: bool,

    /// Raw sensor units added to every reading, for device calibration
    #[arg(
        short = 'a',
        long,
        value_name = "N",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub calibration: i32,

    /// Output for mrtg integration
    #[arg(short, long)]
    pub mrtg: bool,

    /// Send logs to the systemd journal instead of stderr
    #[arg(long)]
    pub journald: bool,

    /// List the attached devices and exit
    #[arg(long, conflicts_with = "probe")]
    pub list: bool,

    /// Run a diagnostic exchange after the handshake, print the answer and exit
    #[arg(long, value_enum, value_name = "KIND")]
    pub probe: Option<Probe>,
}

/// Diagnostic exchanges on the endpoints not used for polling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Probe {
    /// Write a frame to the interrupt OUT endpoint and read one back
    Interrupt,
    /// Write a zero length bulk packet and read one frame back
    Bulk,
}

/// What the session needs to open and poll a device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub ordinal: usize,
    pub calibration: Calibration,
    /// Raise libusb's own log level.
    pub usb_debug: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub session: SessionConfig,
    pub output: OutputFormat,
    /// [`None`] for a single reading.
    pub interval: Option<Duration>,
    pub verbose: bool,
    pub journald: bool,
    pub list: bool,
    pub probe: Option<Probe>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let unit = match (args.celsius, args.fahrenheit) {
            (true, _) => Unit::Celsius,
            (false, true) => Unit::Fahrenheit,
            (false, false) => Unit::Both,
        };

        Self {
            session: SessionConfig {
                ordinal: args.device,
                calibration: Calibration::new(args.calibration),
                usb_debug: args.verbose,
            },
            output: OutputFormat {
                unit,
                mrtg: args.mrtg,
            },
            interval: args.interval.map(Duration::from_secs),
            verbose: args.verbose,
            journald: args.journald,
            list: args.list,
            probe: args.probe,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use shared::Calibration;

    use super::{Args, Config, Probe};
    use crate::output::Unit;

    fn parse(args: &[&str]) -> Config {
        let args = Args::try_parse_from(std::iter::once("pcsensor").chain(args.iter().copied()))
            .unwrap();
        Config::from(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);

        assert_eq!(config.session.ordinal, 0);
        assert_eq!(config.session.calibration, Calibration::new(0));
        assert!(!config.session.usb_debug);
        assert_eq!(config.output.unit, Unit::Both);
        assert!(!config.output.mrtg);
        assert_eq!(config.interval, None);
        assert_eq!(config.probe, None);
    }

    #[test]
    fn test_short_options() {
        let config = parse(&["-v", "-n", "2", "-c", "-m", "-a", "-20", "-l", "10"]);

        assert!(config.verbose);
        assert!(config.session.usb_debug);
        assert_eq!(config.session.ordinal, 2);
        assert_eq!(config.session.calibration, Calibration::new(-20));
        assert_eq!(config.output.unit, Unit::Celsius);
        assert!(config.output.mrtg);
        assert_eq!(config.interval, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_loop_without_value() {
        let config = parse(&["-l"]);
        assert_eq!(config.interval, Some(Duration::from_secs(5)));

        let config = parse(&["-f", "-l"]);
        assert_eq!(config.output.unit, Unit::Fahrenheit);
        assert_eq!(config.interval, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_attached_values() {
        let config = parse(&["-n1", "-l3", "-a5"]);

        assert_eq!(config.session.ordinal, 1);
        assert_eq!(config.interval, Some(Duration::from_secs(3)));
        assert_eq!(config.session.calibration, Calibration::new(5));
    }

    #[test]
    fn test_probe() {
        assert_eq!(parse(&["--probe", "bulk"]).probe, Some(Probe::Bulk));
        assert_eq!(
            parse(&["--probe", "interrupt"]).probe,
            Some(Probe::Interrupt)
        );
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(Args::try_parse_from(["pcsensor", "-c", "-f"]).is_err());
        assert!(Args::try_parse_from(["pcsensor", "-n", "abc"]).is_err());
        assert!(Args::try_parse_from(["pcsensor", "extra"]).is_err());
        assert!(Args::try_parse_from(["pcsensor", "--list", "--probe", "bulk"]).is_err());
    }
}
