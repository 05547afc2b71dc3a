//! The contract every suspendable console read satisfies.
//!
//! A read is started by a client, may complete immediately, and otherwise
//! parks until the host pushes more keystrokes ([`ReadData::read`]) or an
//! out-of-band event ([`ReadData::notify`]). All state needed to resume
//! lives in the read value itself.

use std::collections::VecDeque;

use crate::buffer::{BufferHandle, UserBuffers};
use crate::key::{ControlKeyState, Keystroke};
use crate::screen::ScreenSurface;

/// Identity of the client process waiting on a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u32);

/// Why the host is waking a parked read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTerminationReason {
    /// No termination: new input may be available, try to make progress.
    NoReason,
    /// The waiting client process exited.
    ProcessExited,
    /// The input handle the read was issued on was closed.
    HandleClosed,
    /// The console is being torn down.
    ConsoleShutdown,
    /// The read was cancelled explicitly.
    Cancelled,
}

impl WaitTerminationReason {
    /// The termination this reason implies, if any.
    pub fn termination(self) -> Option<TerminationReason> {
        match self {
            WaitTerminationReason::NoReason => None,
            WaitTerminationReason::ProcessExited => Some(TerminationReason::ProcessExited),
            WaitTerminationReason::HandleClosed => Some(TerminationReason::HandleClosed),
            WaitTerminationReason::ConsoleShutdown => Some(TerminationReason::ConsoleShutdown),
            WaitTerminationReason::Cancelled => Some(TerminationReason::Cancelled),
        }
    }
}

/// Causes for a read ending other than line completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    ProcessExited,
    HandleClosed,
    ConsoleShutdown,
    Cancelled,
}

impl From<TerminationReason> for WaitTerminationReason {
    fn from(reason: TerminationReason) -> Self {
        match reason {
            TerminationReason::ProcessExited => WaitTerminationReason::ProcessExited,
            TerminationReason::HandleClosed => WaitTerminationReason::HandleClosed,
            TerminationReason::ConsoleShutdown => WaitTerminationReason::ConsoleShutdown,
            TerminationReason::Cancelled => WaitTerminationReason::Cancelled,
        }
    }
}

/// What finished a line normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTrigger {
    /// Enter / carriage return.
    CarriageReturn,
    /// A control character from the wake mask.
    WakeChar(char),
}

/// How a read ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Completed(CompletionTrigger),
    Terminated(TerminationReason),
}

impl ReadStatus {
    /// `true` for a normal completion.
    pub fn is_success(&self) -> bool {
        matches!(self, ReadStatus::Completed(_))
    }
}

/// The result handed back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    pub status: ReadStatus,
    /// Characters delivered into the destination.
    pub chars: usize,
    /// Bytes delivered into the destination.
    pub bytes: usize,
    /// Modifier state sampled at the last processed keystroke.
    pub control_key_state: ControlKeyState,
}

impl ReadOutcome {
    /// An outcome with nothing delivered.
    pub fn empty(status: ReadStatus) -> Self {
        Self {
            status,
            chars: 0,
            bytes: 0,
            control_key_state: ControlKeyState::empty(),
        }
    }
}

/// Supplies keystrokes the host has queued for a read.
pub trait KeystrokeSource {
    fn next_keystroke(&mut self) -> Option<Keystroke>;
}

impl KeystrokeSource for VecDeque<Keystroke> {
    fn next_keystroke(&mut self) -> Option<Keystroke> {
        self.pop_front()
    }
}

/// Collaborators lent to a read for exactly one call.
pub struct ReadIo<'a> {
    pub screen: &'a mut dyn ScreenSurface,
    pub buffers: &'a mut dyn UserBuffers,
    pub input: &'a mut dyn KeystrokeSource,
}

impl<'a> ReadIo<'a> {
    pub fn new(
        screen: &'a mut dyn ScreenSurface,
        buffers: &'a mut dyn UserBuffers,
        input: &'a mut dyn KeystrokeSource,
    ) -> Self {
        Self {
            screen,
            buffers,
            input,
        }
    }
}

/// A blocking console read that can be parked and resumed.
pub trait ReadData: Send {
    /// The client waiting on this read.
    fn client(&self) -> ClientId;

    /// Make progress with whatever keystrokes `io.input` holds.
    ///
    /// Returns `Some` once the line is done and delivered, `None` if more
    /// input is needed. After completion every further call returns the
    /// same outcome without consuming input.
    fn read(&mut self, io: &mut ReadIo<'_>) -> Option<ReadOutcome>;

    /// Out-of-band wake.
    ///
    /// [`WaitTerminationReason::NoReason`] behaves like [`read`](Self::read).
    /// Any other reason ends the read, delivering whatever text has
    /// accumulated and reporting the reason in the status.
    fn notify(&mut self, reason: WaitTerminationReason, io: &mut ReadIo<'_>) -> Option<ReadOutcome>;

    /// The destination moved from `old` to `new` while the read was parked.
    /// A no-op if the read does not target `old`.
    fn migrate_buffers(&mut self, old: BufferHandle, new: BufferHandle);

    /// The surface is about to change size; remove any echoed text.
    fn erase_before_resize(&mut self, _screen: &mut dyn ScreenSurface) {}

    /// The surface changed size; echo the text again.
    fn redraw_after_resize(&mut self, _screen: &mut dyn ScreenSurface) {}
}
