//! The cooked read: a suspendable line read with echo and editing.
//!
//! A [`CookedRead`] is created when a client asks for a line and lives until
//! the line is delivered or the read is terminated. Between keystrokes it is
//! parked by the host and holds everything needed to resume: the line, the
//! echo anchor, the insert mode, and the last sampled modifier state. It
//! never holds the screen or the destination buffer; those are lent to each
//! call through [`ReadIo`].

use cookline_core::{
    classify, BufferHandle, ClientId, CommandHistory, CompletionTrigger, ControlKeyState,
    CookedReadOptions, Destination, EditCommand, Encoding, KeyClass, Keystroke, ReadData, ReadIo,
    ReadOutcome, ReadStatus, ScreenSurface, SharedHistory, TerminationReason, Transcoded,
    UserBuffers, WaitTerminationReason, WakeMask,
};

use crate::echo::{Anchor, EchoLine};
use crate::line_buffer::LineBuffer;

/// Where a cooked read is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Parked with no unprocessed keystrokes.
    AwaitingInput,
    /// Processing keystrokes.
    Accumulating,
    /// The line was finished by Enter or a wake character and delivered.
    Completed(CompletionTrigger),
    /// The read was ended by the host and whatever had been typed delivered.
    Terminated(TerminationReason),
}

impl ReadState {
    pub fn is_finished(&self) -> bool {
        matches!(self, ReadState::Completed(_) | ReadState::Terminated(_))
    }
}

/// A line-buffered console read.
///
/// ```
/// use std::collections::VecDeque;
/// use cookline_core::testing::TestScreen;
/// use cookline_core::{BufferStore, ClientId, Destination, Encoding, Keystroke, ReadData, ReadIo};
/// use cookline_edit::CookedRead;
///
/// let mut screen = TestScreen::new(20, 2);
/// let mut buffers = BufferStore::new();
/// let handle = buffers.allocate(16);
/// let mut input: VecDeque<Keystroke> = "hi\r".chars().map(Keystroke::char).collect();
///
/// let mut read = CookedRead::new(ClientId(1), Destination::new(handle, 16), Encoding::Narrow);
/// let outcome = read
///     .read(&mut ReadIo::new(&mut screen, &mut buffers, &mut input))
///     .unwrap();
/// assert_eq!(&buffers.get(handle).unwrap()[..outcome.bytes], b"hi\r\n");
/// ```
#[derive(Debug)]
pub struct CookedRead {
    client: ClientId,
    destination: Destination,
    encoding: Encoding,
    wake_mask: WakeMask,
    options: CookedReadOptions,
    history: Option<SharedHistory>,
    line: LineBuffer,
    echo: Option<EchoLine>,
    started: bool,
    erased: bool,
    insert_mode: bool,
    control_key_state: ControlKeyState,
    state: ReadState,
    outcome: Option<ReadOutcome>,
}

impl CookedRead {
    pub fn new(client: ClientId, destination: Destination, encoding: Encoding) -> Self {
        let options = CookedReadOptions::default();
        Self {
            client,
            destination,
            encoding,
            wake_mask: WakeMask::NONE,
            insert_mode: options.insert_mode,
            options,
            history: None,
            line: LineBuffer::new(),
            echo: None,
            started: false,
            erased: false,
            control_key_state: ControlKeyState::empty(),
            state: ReadState::AwaitingInput,
            outcome: None,
        }
    }

    /// Control characters that finish the line without being inserted.
    pub fn with_wake_mask(mut self, mask: WakeMask) -> Self {
        self.wake_mask = mask;
        self
    }

    /// Text the line starts with, echoed when the read starts.
    pub fn with_initial_text(mut self, text: impl Into<String>) -> Self {
        self.line.set_value(&text.into());
        self.line.take_dirty();
        self
    }

    pub fn with_options(mut self, options: CookedReadOptions) -> Self {
        self.insert_mode = options.insert_mode;
        self.options = options;
        self
    }

    /// Share a command history with other reads. Completed lines are added
    /// to it, and the history keys recall from it.
    pub fn with_history(mut self, history: SharedHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    pub fn control_key_state(&self) -> ControlKeyState {
        self.control_key_state
    }

    /// Where the echo begins, once the read has started echoing.
    pub fn anchor(&self) -> Option<Anchor> {
        self.echo.as_ref().map(EchoLine::anchor)
    }

    /// Rows the echoed line currently occupies.
    pub fn rows_occupied(&self) -> u32 {
        self.echo.as_ref().map_or(0, EchoLine::rows)
    }

    fn ensure_started(&mut self, screen: &mut dyn ScreenSurface) {
        if self.started {
            return;
        }
        self.started = true;
        if let Some(history) = &self.history {
            match history.lock() {
                Ok(mut history) => history.reset_browse(),
                Err(_) => tracing::warn!("command history lock poisoned"),
            }
        }
        if self.options.echo {
            let mut echo = EchoLine::new(Anchor::at(screen.cursor()), self.options.echo_retries);
            echo.draw(screen, self.line.chars(), 0, self.line.cursor());
            self.echo = Some(echo);
        }
        self.line.take_dirty();
        tracing::debug!(
            client = self.client.0,
            anchor = ?self.anchor(),
            seed = self.line.len(),
            "cooked read started"
        );
    }

    /// Apply one keystroke. Returns the trigger when it finishes the line.
    fn process_keystroke(
        &mut self,
        key: Keystroke,
        screen: &mut dyn ScreenSurface,
    ) -> Option<CompletionTrigger> {
        self.control_key_state = key.state;
        tracing::trace!(code = ?key.code, state = ?key.state, "keystroke");

        if let Some(c) = key.as_char() {
            if c != '\r' && self.wake_mask.contains(c) {
                return Some(CompletionTrigger::WakeChar(c));
            }
        }

        let cursor_before = self.line.cursor();
        match classify(&key) {
            KeyClass::Text(c) if self.insert_mode => self.line.insert_char(c),
            KeyClass::Text(c) => self.line.overwrite_char(c),
            KeyClass::Enter => {
                self.complete_line(screen);
                return Some(CompletionTrigger::CarriageReturn);
            }
            KeyClass::Edit(command) => self.apply(command),
            KeyClass::Control(c) => tracing::trace!(?c, "control character ignored"),
            KeyClass::Ignored => {}
        }
        self.refresh(screen, cursor_before);
        None
    }

    fn apply(&mut self, command: EditCommand) {
        let line = &mut self.line;
        match command {
            EditCommand::Backspace => {
                line.delete_back();
            }
            EditCommand::Delete => {
                line.delete_forward();
            }
            EditCommand::DeleteWordBack => {
                line.delete_word_back();
            }
            EditCommand::DeleteToStart => {
                line.kill_to_start();
            }
            EditCommand::DeleteToEnd => {
                line.kill_to_end();
            }
            EditCommand::ClearLine => {
                line.clear();
            }
            EditCommand::Left => line.move_left(),
            EditCommand::Right => line.move_right(),
            EditCommand::WordLeft => line.word_left(),
            EditCommand::WordRight => line.word_right(),
            EditCommand::Home => line.move_home(),
            EditCommand::End => line.move_end(),
            EditCommand::ToggleInsert => {
                self.insert_mode = !self.insert_mode;
                tracing::debug!(insert_mode = self.insert_mode, "insert mode toggled");
            }
            EditCommand::HistoryOlder => {
                self.recall(|history, current| history.older(current).map(str::to_owned))
            }
            EditCommand::HistoryNewer => {
                self.recall(|history, _| history.newer().map(str::to_owned))
            }
            EditCommand::ReplayLast => self.replay_last(),
        }
    }

    fn recall(&mut self, step: impl FnOnce(&mut CommandHistory, &str) -> Option<String>) {
        let Some(history) = &self.history else {
            return;
        };
        let current = self.line.value();
        let recalled = match history.lock() {
            Ok(mut history) => step(&mut *history, &current),
            Err(_) => {
                tracing::warn!("command history lock poisoned");
                None
            }
        };
        if let Some(text) = recalled {
            self.line.set_value(&text);
        }
    }

    /// Copy the part of the last command that lies past the current length.
    fn replay_last(&mut self) {
        let Some(history) = &self.history else {
            return;
        };
        let last = match history.lock() {
            Ok(history) => history.last().map(str::to_owned),
            Err(_) => {
                tracing::warn!("command history lock poisoned");
                None
            }
        };
        if let Some(last) = last {
            let tail: String = last.chars().skip(self.line.len()).collect();
            if !tail.is_empty() {
                self.line.move_end();
                self.line.insert_str(&tail);
            }
        }
    }

    /// Repaint whatever the last edit changed and move the cursor.
    fn refresh(&mut self, screen: &mut dyn ScreenSurface, cursor_before: usize) {
        debug_assert!(!self.options.echo || self.echo.is_some(), "echo not anchored");
        let dirty = self.line.take_dirty();
        let Some(echo) = self.echo.as_mut() else {
            return;
        };
        match dirty {
            Some(from) => echo.draw(screen, self.line.chars(), from, self.line.cursor()),
            None if echo.is_stale() => echo.draw(screen, self.line.chars(), 0, self.line.cursor()),
            None if self.line.cursor() != cursor_before => {
                echo.place_cursor(screen, self.line.chars(), self.line.cursor())
            }
            None => {}
        }
    }

    fn complete_line(&mut self, screen: &mut dyn ScreenSurface) {
        if let Some(history) = &self.history {
            match history.lock() {
                Ok(mut history) => history.push(self.line.value()),
                Err(_) => tracing::warn!("command history lock poisoned"),
            }
        }
        if let Some(echo) = self.echo.as_mut() {
            if self.line.take_dirty().is_some() || echo.is_stale() {
                echo.draw(screen, self.line.chars(), 0, self.line.len());
            }
            echo.newline(screen, self.line.chars());
        }
        let ending = if self.options.append_line_feed { "\r\n" } else { "\r" };
        self.line.append(ending);
        self.line.take_dirty();
    }

    fn finish(&mut self, status: ReadStatus, buffers: &mut dyn UserBuffers) -> ReadOutcome {
        self.state = match status {
            ReadStatus::Completed(trigger) => ReadState::Completed(trigger),
            ReadStatus::Terminated(reason) => ReadState::Terminated(reason),
        };
        let outcome = self.deliver(status, buffers);
        tracing::debug!(
            client = self.client.0,
            ?status,
            chars = outcome.chars,
            bytes = outcome.bytes,
            "cooked read finished"
        );
        self.outcome = Some(outcome);
        outcome
    }

    /// Transcode the line into the destination, truncated to its capacity.
    fn deliver(&self, status: ReadStatus, buffers: &mut dyn UserBuffers) -> ReadOutcome {
        let text = self.line.value();
        let delivered = match buffers.slot_mut(self.destination.handle) {
            Some(slot) => {
                let capacity = self.destination.capacity.min(slot.len());
                let written = self.encoding.transcode_into(&text, &mut slot[..capacity]);
                let needed = self.encoding.encoded_len(&text);
                if written.bytes < needed {
                    tracing::debug!(
                        dropped_bytes = needed - written.bytes,
                        capacity,
                        "line truncated to destination capacity"
                    );
                }
                written
            }
            None => {
                tracing::warn!(
                    handle = self.destination.handle.raw(),
                    "destination buffer missing; nothing delivered"
                );
                Transcoded::default()
            }
        };
        ReadOutcome {
            status,
            chars: delivered.chars,
            bytes: delivered.bytes,
            control_key_state: self.control_key_state,
        }
    }
}

impl ReadData for CookedRead {
    fn client(&self) -> ClientId {
        self.client
    }

    fn read(&mut self, io: &mut ReadIo<'_>) -> Option<ReadOutcome> {
        if let Some(outcome) = self.outcome {
            return Some(outcome);
        }
        if self.erased {
            tracing::trace!("resize in progress; input deferred");
            return None;
        }
        self.ensure_started(&mut *io.screen);
        if let Some(echo) = self.echo.as_mut().filter(|echo| echo.is_stale()) {
            echo.draw(&mut *io.screen, self.line.chars(), 0, self.line.cursor());
        }
        while let Some(key) = io.input.next_keystroke() {
            self.state = ReadState::Accumulating;
            if let Some(trigger) = self.process_keystroke(key, &mut *io.screen) {
                return Some(self.finish(ReadStatus::Completed(trigger), &mut *io.buffers));
            }
        }
        self.state = ReadState::AwaitingInput;
        None
    }

    fn notify(&mut self, reason: WaitTerminationReason, io: &mut ReadIo<'_>) -> Option<ReadOutcome> {
        if let Some(outcome) = self.outcome {
            return Some(outcome);
        }
        match reason.termination() {
            None => self.read(io),
            Some(reason) => {
                tracing::debug!(client = self.client.0, ?reason, "read terminated");
                Some(self.finish(ReadStatus::Terminated(reason), &mut *io.buffers))
            }
        }
    }

    fn migrate_buffers(&mut self, old: BufferHandle, new: BufferHandle) {
        if self.destination.handle != old {
            tracing::trace!(old = old.raw(), "migration does not target this read");
            return;
        }
        tracing::debug!(old = old.raw(), new = new.raw(), "destination migrated");
        self.destination.handle = new;
    }

    fn erase_before_resize(&mut self, screen: &mut dyn ScreenSurface) {
        if self.erased || self.outcome.is_some() {
            return;
        }
        if let Some(echo) = self.echo.as_mut() {
            echo.erase(screen);
        }
        self.erased = true;
    }

    fn redraw_after_resize(&mut self, screen: &mut dyn ScreenSurface) {
        self.erased = false;
        if self.outcome.is_some() {
            return;
        }
        if let Some(echo) = self.echo.as_mut() {
            echo.revalidate(screen.dimensions());
            echo.redraw(screen, self.line.chars(), self.line.cursor());
        }
    }
}
