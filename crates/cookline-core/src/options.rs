//! Per-read configuration.

/// Configuration for a cooked read.
///
/// All fields have sensible defaults (see [`Default`] impl). Use struct
/// update syntax to override only what you need:
///
/// ```
/// use cookline_core::CookedReadOptions;
///
/// let opts = CookedReadOptions {
///     echo: false,
///     ..CookedReadOptions::default()
/// };
/// assert!(opts.insert_mode);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookedReadOptions {
    /// Start in insert mode rather than overwrite mode (default: true).
    pub insert_mode: bool,
    /// Echo typed text to the screen (default: true).
    pub echo: bool,
    /// Follow the carriage return with a line feed in the delivered text
    /// (default: true).
    pub append_line_feed: bool,
    /// Extra attempts for an echo that hits a transiently unavailable
    /// surface before it is deferred to the next keystroke (default: 3).
    pub echo_retries: u8,
}

impl Default for CookedReadOptions {
    fn default() -> Self {
        Self {
            insert_mode: true,
            echo: true,
            append_line_feed: true,
            echo_retries: 3,
        }
    }
}
