use anyhow::Context as _;
use rusb::{Context, LogCallbackMode, LogLevel, UsbContext};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{AnyResult, SensorError};

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the `verbose` based default.
///
/// # Errors
pub fn init(verbose: bool, journald: bool) -> AnyResult<()> {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);

    if journald {
        let layer = tracing_journald::layer().context("unable to connect to journald")?;
        registry.with(layer).try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

/// Creates a libusb context whose own messages end up in `tracing`.
///
/// # Errors
pub fn usb_context(usb_debug: bool) -> Result<Context, SensorError> {
    let mut context = Context::new().map_err(SensorError::Context)?;

    let log_fn = Box::new(|level: LogLevel, message: String| match level {
        LogLevel::Error | LogLevel::Warning => {
            tracing::warn!(target: "libusb", "{}", message.trim_end());
        }
        LogLevel::Info | LogLevel::Debug | LogLevel::None => {
            tracing::debug!(target: "libusb", "{}", message.trim_end());
        }
    });

    let level = if usb_debug {
        LogLevel::Debug
    } else {
        LogLevel::Warning
    };

    context.set_log_level(level);
    context.set_log_callback(log_fn, LogCallbackMode::Global);

    Ok(context)
}
