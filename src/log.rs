// src/log.rs
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use tracing_subscriber::{fmt::time::uptime, EnvFilter};

use crate::config::options::LogOptions;

/// Send `tracing` events to the log file (plain text, uptime stamps).
/// `RUST_LOG` wins over the configured level. Calling twice is harmless.
pub fn init(opts: &LogOptions) -> io::Result<()> {
    if let Some(parent) = opts.file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(&opts.file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&opts.level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(uptime())
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
