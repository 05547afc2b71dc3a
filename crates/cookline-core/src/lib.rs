//! Collaborator contracts and host plumbing for **cookline**.
//!
//! `cookline-core` defines everything a cooked (line-buffered) console read
//! needs from the world around it, and the host-side pieces that drive a
//! parked read. The engine itself lives in `cookline-edit`.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`ReadData`] | Contract of a suspendable read: `read`, `notify`, `migrate_buffers`, resize hooks |
//! | [`ReadIo`] | Collaborators lent to a read for one call |
//! | [`ReadOutcome`] | Counts, modifier state and [`ReadStatus`] of a finished read |
//! | [`Keystroke`] | One key press with its [`ControlKeyState`] |
//! | [`WakeMask`] | Control characters that complete a line without Enter |
//! | [`BufferHandle`] | Indirection to a caller-owned destination buffer |
//! | [`ScreenSurface`] | What the engine needs from the display |
//! | [`CrosstermScreen`] | A real terminal surface |
//! | [`TestScreen`](testing::TestScreen) | Headless surface for tests |
//! | [`WaitQueue`] | Parked reads and their wake-up routing |
//! | [`drive`] | Async loop running one read against a stream of [`HostEvent`]s |
//!
//! # Lifecycle of a read
//!
//! 1. **start** -- The host creates a read and calls [`ReadData::read`]. If
//!    the line is already satisfiable it completes immediately.
//! 2. **park** -- Otherwise the read keeps all of its state and waits.
//! 3. **resume** -- Each keystroke is queued into [`ReadIo::input`] and the
//!    read resumed. Resizes, buffer moves and terminations arrive through
//!    the other [`ReadData`] methods.
//! 4. **finish** -- The read delivers into its destination and returns a
//!    [`ReadOutcome`].

pub mod buffer;
pub mod error;
pub mod event;
pub mod history;
pub mod host;
pub mod key;
pub mod logging;
pub mod options;
pub mod read_data;
pub mod screen;
pub mod terminal;
pub mod testing;
pub mod wait;

pub use buffer::{BufferHandle, BufferStore, Destination, Encoding, Transcoded, UserBuffers};
pub use error::{HostError, ScreenError};
pub use event::HostEvent;
pub use history::{CommandHistory, SharedHistory};
pub use host::{drive, event_channel, EventSender};
pub use key::{classify, ControlKeyState, EditCommand, KeyClass, Keystroke, WakeMask};
pub use logging::log_to_file;
pub use options::CookedReadOptions;
pub use read_data::{
    ClientId, CompletionTrigger, KeystrokeSource, ReadData, ReadIo, ReadOutcome, ReadStatus,
    TerminationReason, WaitTerminationReason,
};
pub use screen::{HostScreen, Position, ScreenSurface, Size};
pub use terminal::CrosstermScreen;
pub use wait::WaitQueue;
