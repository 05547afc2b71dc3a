//! Async host loop that runs one parked read to completion.

use std::collections::VecDeque;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::buffer::UserBuffers;
use crate::event::HostEvent;
use crate::key::Keystroke;
use crate::read_data::{
    ReadData, ReadIo, ReadOutcome, ReadStatus, TerminationReason, WaitTerminationReason,
};
use crate::screen::HostScreen;

/// Sending half of an [`event_channel`].
pub type EventSender = mpsc::UnboundedSender<HostEvent>;

/// A channel whose receiving end can be handed straight to [`drive`].
///
/// Dropping every sender ends the stream, which [`drive`] treats as console
/// shutdown.
pub fn event_channel() -> (EventSender, UnboundedReceiverStream<HostEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}

/// Drive `read` with events from `events` until it produces an outcome.
///
/// The read gets one synchronous attempt first, so a line that is already
/// satisfiable completes without awaiting anything. After that each event
/// is applied in arrival order:
///
/// * `Key` is queued and the read resumed.
/// * `Resize` runs erase, resize, redraw in that order.
/// * `Wake` and `Terminate` are forwarded to [`ReadData::notify`].
/// * `Migrate` is forwarded to [`ReadData::migrate_buffers`].
///
/// If the stream ends first, the read is terminated with
/// [`TerminationReason::ConsoleShutdown`]. Keystrokes queued behind the
/// line ending are returned alongside the outcome so the host can hand them
/// to the next read.
///
/// # Example
///
/// ```rust,ignore
/// let (tx, events) = event_channel();
/// tx.send(HostEvent::Key(Keystroke::char('a')))?;
/// let (outcome, _) = drive(&mut read, &mut screen, &mut buffers, events).await;
/// ```
pub async fn drive<R, S, B, E>(
    read: &mut R,
    screen: &mut S,
    buffers: &mut B,
    mut events: E,
) -> (ReadOutcome, VecDeque<Keystroke>)
where
    R: ReadData + ?Sized,
    S: HostScreen,
    B: UserBuffers,
    E: Stream<Item = HostEvent> + Unpin,
{
    let mut pending = VecDeque::new();

    let first = read.read(&mut ReadIo::new(&mut *screen, &mut *buffers, &mut pending));
    if let Some(outcome) = first {
        return (outcome, pending);
    }

    while let Some(event) = events.next().await {
        tracing::trace!(?event, "host event");
        let outcome = match event {
            HostEvent::Key(key) => {
                pending.push_back(key);
                read.read(&mut ReadIo::new(&mut *screen, &mut *buffers, &mut pending))
            }
            HostEvent::Resize(size) => {
                read.erase_before_resize(&mut *screen);
                if let Err(err) = screen.resize(size) {
                    tracing::warn!(%err, "screen resize failed");
                }
                read.redraw_after_resize(&mut *screen);
                None
            }
            HostEvent::Wake => read.notify(
                WaitTerminationReason::NoReason,
                &mut ReadIo::new(&mut *screen, &mut *buffers, &mut pending),
            ),
            HostEvent::Terminate(reason) => read.notify(
                reason.into(),
                &mut ReadIo::new(&mut *screen, &mut *buffers, &mut pending),
            ),
            HostEvent::Migrate { old, new } => {
                read.migrate_buffers(old, new);
                None
            }
        };
        if let Some(outcome) = outcome {
            return (outcome, pending);
        }
    }

    tracing::debug!("host event stream ended; shutting read down");
    let outcome = read
        .notify(
            WaitTerminationReason::ConsoleShutdown,
            &mut ReadIo::new(&mut *screen, &mut *buffers, &mut pending),
        )
        .unwrap_or_else(|| {
            ReadOutcome::empty(ReadStatus::Terminated(TerminationReason::ConsoleShutdown))
        });
    (outcome, pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BufferHandle, BufferStore};
    use crate::key::ControlKeyState;
    use crate::read_data::{ClientId, CompletionTrigger};
    use crate::screen::{ScreenSurface, Size};
    use crate::testing::TestScreen;
    use tokio_stream::iter;

    /// Counts keystrokes until Enter; records resize hooks and migration.
    #[derive(Default)]
    struct RecordingRead {
        keys: usize,
        log: Vec<String>,
        target: u64,
    }

    impl ReadData for RecordingRead {
        fn client(&self) -> ClientId {
            ClientId(7)
        }

        fn read(&mut self, io: &mut ReadIo<'_>) -> Option<ReadOutcome> {
            while let Some(key) = io.input.next_keystroke() {
                if key.code == crossterm::event::KeyCode::Enter {
                    return Some(ReadOutcome {
                        status: ReadStatus::Completed(CompletionTrigger::CarriageReturn),
                        chars: self.keys,
                        bytes: self.keys,
                        control_key_state: key.state,
                    });
                }
                self.keys += 1;
            }
            None
        }

        fn notify(
            &mut self,
            reason: WaitTerminationReason,
            io: &mut ReadIo<'_>,
        ) -> Option<ReadOutcome> {
            match reason.termination() {
                Some(t) => Some(ReadOutcome {
                    status: ReadStatus::Terminated(t),
                    chars: self.keys,
                    bytes: self.keys,
                    control_key_state: ControlKeyState::empty(),
                }),
                None => self.read(io),
            }
        }

        fn migrate_buffers(&mut self, old: BufferHandle, new: BufferHandle) {
            if old.raw() == self.target {
                self.target = new.raw();
                self.log.push("migrate".into());
            }
        }

        fn erase_before_resize(&mut self, screen: &mut dyn ScreenSurface) {
            self.log.push(format!("erase {}", screen.dimensions().cols));
        }

        fn redraw_after_resize(&mut self, screen: &mut dyn ScreenSurface) {
            self.log.push(format!("redraw {}", screen.dimensions().cols));
        }
    }

    #[tokio::test]
    async fn keys_then_enter_complete() {
        let mut read = RecordingRead::default();
        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let events = iter(vec![
            HostEvent::Key(Keystroke::char('a')),
            HostEvent::Key(Keystroke::char('b')),
            HostEvent::Key(Keystroke::new(crossterm::event::KeyCode::Enter)),
            HostEvent::Key(Keystroke::char('z')),
        ]);
        let (outcome, leftover) = drive(&mut read, &mut screen, &mut buffers, events).await;
        assert_eq!(
            outcome.status,
            ReadStatus::Completed(CompletionTrigger::CarriageReturn)
        );
        assert_eq!(outcome.chars, 2);
        // The stream stops being polled once the read finishes.
        assert!(leftover.is_empty());
    }

    #[tokio::test]
    async fn resize_runs_erase_resize_redraw_in_order() {
        let mut read = RecordingRead::default();
        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let events = iter(vec![
            HostEvent::Resize(Size::new(20, 2)),
            HostEvent::Terminate(TerminationReason::Cancelled),
        ]);
        let (outcome, _) = drive(&mut read, &mut screen, &mut buffers, events).await;
        assert_eq!(read.log, vec!["erase 10", "redraw 20"]);
        assert_eq!(
            outcome.status,
            ReadStatus::Terminated(TerminationReason::Cancelled)
        );
    }

    #[tokio::test]
    async fn migrate_is_forwarded() {
        let mut read = RecordingRead {
            target: 3,
            ..RecordingRead::default()
        };
        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let events = iter(vec![HostEvent::Migrate {
            old: BufferHandle::from_raw(3),
            new: BufferHandle::from_raw(4),
        }]);
        let _ = drive(&mut read, &mut screen, &mut buffers, events).await;
        assert_eq!(read.target, 4);
        assert_eq!(read.log, vec!["migrate"]);
    }

    #[tokio::test]
    async fn ended_stream_is_console_shutdown() {
        let mut read = RecordingRead::default();
        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let events = iter(vec![HostEvent::Key(Keystroke::char('a'))]);
        let (outcome, _) = drive(&mut read, &mut screen, &mut buffers, events).await;
        assert_eq!(
            outcome.status,
            ReadStatus::Terminated(TerminationReason::ConsoleShutdown)
        );
        assert_eq!(outcome.chars, 1);
    }

    #[tokio::test]
    async fn channel_feeds_drive() {
        let mut read = RecordingRead::default();
        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let (tx, events) = event_channel();
        tx.send(HostEvent::Key(Keystroke::char('a'))).unwrap();
        tx.send(HostEvent::Wake).unwrap();
        tx.send(HostEvent::Key(Keystroke::new(crossterm::event::KeyCode::Enter)))
            .unwrap();
        let (outcome, _) = drive(&mut read, &mut screen, &mut buffers, events).await;
        assert!(outcome.status.is_success());
        assert_eq!(outcome.chars, 1);
    }

    #[tokio::test]
    async fn dropped_sender_shuts_down() {
        let mut read = RecordingRead::default();
        let mut screen = TestScreen::new(10, 2);
        let mut buffers = BufferStore::new();
        let (tx, events) = event_channel();
        drop(tx);
        let (outcome, _) = drive(&mut read, &mut screen, &mut buffers, events).await;
        assert_eq!(
            outcome.status,
            ReadStatus::Terminated(TerminationReason::ConsoleShutdown)
        );
    }
}
