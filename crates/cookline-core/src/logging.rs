//! File logging for hosts that own the terminal.

use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::HostError;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "COOKLINE_LOG";

/// Send `tracing` output to a file opened in append mode.
///
/// A host that echoes into the terminal cannot also log there, so this is
/// the usual way to see what the engine is doing. The filter comes from
/// `COOKLINE_LOG` (for example `cookline_edit=trace`) and defaults to
/// `info`.
///
/// # Example
///
/// ```no_run
/// cookline_core::logging::log_to_file("cookline.log").unwrap();
/// tracing::info!("host started");
/// ```
pub fn log_to_file(path: impl AsRef<Path>) -> Result<(), HostError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| HostError::Subscriber(err.to_string()))
}
