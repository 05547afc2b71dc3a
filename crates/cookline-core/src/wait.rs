//! Parked reads waiting for input or termination.

use crate::buffer::BufferHandle;
use crate::read_data::{ClientId, ReadData, ReadIo, ReadOutcome, WaitTerminationReason};
use crate::screen::ScreenSurface;

/// Reads that could not complete synchronously, in the order they parked.
///
/// The queue owns the reads. Waking them returns the outcomes of every read
/// that finished and drops those reads; unfinished reads stay parked.
#[derive(Default)]
pub struct WaitQueue {
    waiters: Vec<Box<dyn ReadData>>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a read.
    pub fn park(&mut self, read: Box<dyn ReadData>) {
        tracing::debug!(client = ?read.client(), "read parked");
        self.waiters.push(read);
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Wake every parked read with `reason`.
    pub fn notify_all(
        &mut self,
        reason: WaitTerminationReason,
        io: &mut ReadIo<'_>,
    ) -> Vec<(ClientId, ReadOutcome)> {
        self.notify_where(|_| true, reason, io)
    }

    /// Wake only the reads belonging to `client`.
    pub fn notify_client(
        &mut self,
        client: ClientId,
        reason: WaitTerminationReason,
        io: &mut ReadIo<'_>,
    ) -> Vec<(ClientId, ReadOutcome)> {
        self.notify_where(|read| read.client() == client, reason, io)
    }

    /// Forward a buffer relocation to every parked read.
    pub fn migrate(&mut self, old: BufferHandle, new: BufferHandle) {
        for read in &mut self.waiters {
            read.migrate_buffers(old, new);
        }
    }

    /// Ask every parked read to remove its echo before a resize.
    pub fn erase_before_resize(&mut self, screen: &mut dyn ScreenSurface) {
        for read in &mut self.waiters {
            read.erase_before_resize(screen);
        }
    }

    /// Ask every parked read to echo again after a resize.
    pub fn redraw_after_resize(&mut self, screen: &mut dyn ScreenSurface) {
        for read in &mut self.waiters {
            read.redraw_after_resize(screen);
        }
    }

    fn notify_where(
        &mut self,
        matches: impl Fn(&dyn ReadData) -> bool,
        reason: WaitTerminationReason,
        io: &mut ReadIo<'_>,
    ) -> Vec<(ClientId, ReadOutcome)> {
        let mut finished = Vec::new();
        let mut still_waiting = Vec::with_capacity(self.waiters.len());
        for mut read in self.waiters.drain(..) {
            if !matches(read.as_ref()) {
                still_waiting.push(read);
                continue;
            }
            match read.notify(reason, io) {
                Some(outcome) => {
                    tracing::debug!(client = ?read.client(), status = ?outcome.status, "read finished");
                    finished.push((read.client(), outcome));
                }
                None => still_waiting.push(read),
            }
        }
        self.waiters = still_waiting;
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferStore;
    use crate::key::{ControlKeyState, Keystroke};
    use crate::read_data::{CompletionTrigger, ReadStatus, TerminationReason};
    use crate::testing::TestScreen;
    use std::collections::VecDeque;

    /// Completes after `needed` keystrokes.
    struct CountingRead {
        client: ClientId,
        needed: usize,
        seen: usize,
        target: BufferHandle,
    }

    impl ReadData for CountingRead {
        fn client(&self) -> ClientId {
            self.client
        }

        fn read(&mut self, io: &mut ReadIo<'_>) -> Option<ReadOutcome> {
            while self.seen < self.needed {
                io.input.next_keystroke()?;
                self.seen += 1;
            }
            Some(ReadOutcome {
                status: ReadStatus::Completed(CompletionTrigger::CarriageReturn),
                chars: self.seen,
                bytes: self.seen,
                control_key_state: ControlKeyState::empty(),
            })
        }

        fn notify(
            &mut self,
            reason: WaitTerminationReason,
            io: &mut ReadIo<'_>,
        ) -> Option<ReadOutcome> {
            match reason.termination() {
                Some(t) => Some(ReadOutcome::empty(ReadStatus::Terminated(t))),
                None => self.read(io),
            }
        }

        fn migrate_buffers(&mut self, old: BufferHandle, new: BufferHandle) {
            if self.target == old {
                self.target = new;
            }
        }
    }

    fn counting(client: u32, needed: usize) -> Box<CountingRead> {
        Box::new(CountingRead {
            client: ClientId(client),
            needed,
            seen: 0,
            target: BufferHandle::from_raw(1),
        })
    }

    #[test]
    fn notify_client_only_touches_that_client() {
        let mut queue = WaitQueue::new();
        queue.park(counting(1, 5));
        queue.park(counting(2, 5));

        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let mut input = VecDeque::<Keystroke>::new();
        let mut io = ReadIo::new(&mut screen, &mut buffers, &mut input);

        let done = queue.notify_client(ClientId(1), WaitTerminationReason::ProcessExited, &mut io);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, ClientId(1));
        assert_eq!(
            done[0].1.status,
            ReadStatus::Terminated(TerminationReason::ProcessExited)
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn no_reason_wake_keeps_unfinished_reads_parked() {
        let mut queue = WaitQueue::new();
        queue.park(counting(1, 1));
        queue.park(counting(2, 3));

        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let mut input: VecDeque<Keystroke> =
            VecDeque::from(vec![Keystroke::char('a'), Keystroke::char('b')]);
        let mut io = ReadIo::new(&mut screen, &mut buffers, &mut input);

        let done = queue.notify_all(WaitTerminationReason::NoReason, &mut io);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, ClientId(1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn shutdown_drains_everything() {
        let mut queue = WaitQueue::new();
        queue.park(counting(1, 3));
        queue.park(counting(2, 3));

        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let mut input = VecDeque::<Keystroke>::new();
        let mut io = ReadIo::new(&mut screen, &mut buffers, &mut input);

        let done = queue.notify_all(WaitTerminationReason::ConsoleShutdown, &mut io);
        assert_eq!(done.len(), 2);
        assert!(queue.is_empty());
    }
}
