//! Log setup.

use std::{
    io::{self, Write},
    sync::Mutex,
};

use anyhow::{anyhow, Result};
use indicatif::MultiProgress;
use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to stderr with the given filter (e.g. `info` or
/// `glodap=debug`), hiding `progress` bars while a line is written.
pub fn init_logging(filter: &str, progress: MultiProgress) -> Result<()> {
    let filter = EnvFilter::try_new(filter).map_err(|e| anyhow!("Invalid log level `{filter}`: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(Mutex::new(ConsoleLogger::new(progress)))
        .try_init()
        .map_err(|e| anyhow!("Could not set up logging: {e}"))
}

struct ConsoleLogger {
    stderr: io::Stderr,
    progress: MultiProgress,
}

impl ConsoleLogger {
    fn new(progress: MultiProgress) -> Self {
        ConsoleLogger {
            stderr: io::stderr(),
            progress,
        }
    }
}

impl Write for ConsoleLogger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let stderr = &mut self.stderr;
        self.progress.suspend(|| stderr.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        let stderr = &mut self.stderr;
        self.progress.suspend(|| stderr.flush())
    }
}
