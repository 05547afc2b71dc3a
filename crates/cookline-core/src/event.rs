use crossterm::event::{Event, KeyEventKind};

use crate::buffer::BufferHandle;
use crate::key::Keystroke;
use crate::read_data::TerminationReason;
use crate::screen::Size;

/// Events a host pushes at a parked read.
///
/// The async driver ([`drive`](crate::host::drive)) consumes a stream of
/// these and maps each onto the matching [`ReadData`](crate::ReadData) call.
///
/// # Example
///
/// ```rust,ignore
/// use cookline_core::HostEvent;
/// use futures::StreamExt;
///
/// let events = crossterm::event::EventStream::new()
///     .filter_map(|ev| async move { ev.ok().and_then(HostEvent::from_terminal) });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A keystroke from the input source.
    Key(Keystroke),
    /// The surface was resized to the given dimensions.
    Resize(Size),
    /// Explicit wake with no termination.
    Wake,
    /// End the read.
    Terminate(TerminationReason),
    /// The destination buffer moved.
    Migrate {
        old: BufferHandle,
        new: BufferHandle,
    },
}

impl HostEvent {
    /// Map a crossterm terminal event. Key releases, mouse, focus and
    /// paste events have no meaning for a cooked read.
    pub fn from_terminal(event: Event) -> Option<HostEvent> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                Some(HostEvent::Key(Keystroke::from(key)))
            }
            Event::Resize(cols, rows) => Some(HostEvent::Resize(Size::new(cols, rows))),
            _ => None,
        }
    }
}
