//! The cooked line-input engine for **cookline**.
//!
//! [`CookedRead`] implements [`cookline_core::ReadData`]: it turns
//! keystrokes into an edited line, echoes that line on a
//! [`ScreenSurface`](cookline_core::ScreenSurface), and delivers it into the
//! caller's buffer when Enter or a wake character arrives.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cooked_read`] | The read state machine, delivery and resize hooks |
//! | [`line_buffer`] | Line text, insertion index and dirty tracking |
//! | [`layout`] | Where each character lands once the line wraps |
//! | [`echo`] | Anchor, partial repaint and erase on the surface |

pub mod cooked_read;
pub mod echo;
pub mod layout;
pub mod line_buffer;

pub use cooked_read::{CookedRead, ReadState};
pub use echo::{Anchor, EchoLine};
pub use layout::{CellPos, Layout};
pub use line_buffer::LineBuffer;
