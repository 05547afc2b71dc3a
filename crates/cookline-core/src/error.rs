/// Errors reported by a [`ScreenSurface`](crate::screen::ScreenSurface).
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// The surface cannot be written right now; the call may be retried.
    #[error("screen surface is temporarily unavailable")]
    Unavailable,
    /// An I/O error from the underlying terminal.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScreenError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScreenError::Unavailable)
    }
}

/// Errors raised while setting up the host side (terminal, logging).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// An I/O error from terminal setup or the log file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A global tracing subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}
