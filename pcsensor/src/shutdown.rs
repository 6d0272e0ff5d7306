use std::{
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, TryRecvError},
    },
    time::Duration,
};

/// Status used when a second Ctrl-C arrives before the first one was handled.
const EXIT_INTERRUPTED: i32 = 130;

/// Ctrl-C notifications, delivered between transfers.
///
/// The first signal is queued for the polling loop. A second one exits the
/// process right away.
#[derive(Debug)]
pub struct Shutdown {
    signal: Receiver<()>,
}

impl Shutdown {
    /// Installs the process wide Ctrl-C handler.
    ///
    /// # Errors
    pub fn install() -> Result<Self, ctrlc::Error> {
        let (tx, rx) = mpsc::channel();
        let interrupted = AtomicBool::new(false);

        ctrlc::set_handler(move || {
            if interrupted.swap(true, Ordering::Relaxed) {
                process::exit(EXIT_INTERRUPTED);
            }

            let _ = tx.send(());
        })?;

        Ok(Self::new(rx))
    }

    fn new(signal: Receiver<()>) -> Self {
        Self { signal }
    }

    /// Whether a signal arrived, without blocking.
    #[must_use]
    pub fn requested(&self) -> bool {
        match self.signal.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        }
    }

    /// Sleeps for `interval`, returning early with `true` if a signal arrives.
    #[must_use]
    pub fn wait(&self, interval: Duration) -> bool {
        match self.signal.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}
