use std::process::ExitCode;

use anyhow::Context as _;
use chrono::Local;
use clap::Parser;
use pcsensor::{AnyResult, Args, Config, SensorError, Shutdown, error::EXIT_SETUP_FAILURE};

fn main() -> ExitCode {
    let config = Config::from(Args::parse());

    if let Err(err) = pcsensor::logging::init(config.verbose, config.journald) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            let code = err
                .downcast_ref::<SensorError>()
                .map_or(EXIT_SETUP_FAILURE, SensorError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(config: &Config) -> AnyResult<()> {
    if config.list {
        let locations = pcsensor::list_devices(config.session.usb_debug)?;
        for (ordinal, (bus, address)) in locations.into_iter().enumerate() {
            println!("{ordinal}: bus {bus:03} address {address:03}");
        }

        return Ok(());
    }

    let shutdown = Shutdown::install().context("failed to install Ctrl-C handler")?;

    // Dropping the session on an early return releases the device as well.
    let mut session = pcsensor::open_session(&config.session).context("opening device")?;

    if let Some(probe) = config.probe {
        let frame = session.probe(probe).context("probing device")?;
        println!("{frame}");
        session.close();
        return Ok(());
    }

    while !shutdown.requested() {
        let temperature = session
            .poll(config.session.calibration)
            .context("reading temperature")?;

        let now = Local::now().naive_local();
        print!("{}", pcsensor::render(temperature, &now, config.output));

        let Some(interval) = config.interval else {
            break;
        };

        if shutdown.wait(interval) {
            tracing::debug!("interrupted");
            break;
        }
    }

    tracing::debug!("closing session");
    session.close();
    Ok(())
}
