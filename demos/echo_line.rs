//! # Echo Line Example
//!
//! A tiny prompt loop built on cookline:
//! - Raw mode with crossterm's `EventStream` feeding [`drive`]
//! - A command history shared across reads (Up, Down, F3)
//! - Ctrl+D in the wake mask to leave the loop
//!
//! Run with: `cargo run --example echo_line`
//!
//! Logs go to `echo_line.log`; set `COOKLINE_LOG=cookline_edit=trace` for
//! per-keystroke detail.

use std::collections::VecDeque;
use std::io::{self, Stdout};

use cookline::crossterm::event::EventStream;
use cookline::crossterm::terminal;
use cookline::{
    drive, log_to_file, BufferStore, ClientId, CommandHistory, CompletionTrigger, CookedRead,
    CrosstermScreen, Destination, Encoding, HostEvent, Keystroke, Position, ReadStatus,
    ScreenError, ScreenSurface, WakeMask,
};
use futures::StreamExt;

const CAPACITY: usize = 512;
const PROMPT: &str = "> ";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    log_to_file("echo_line.log")?;
    terminal::enable_raw_mode()?;
    let result = session().await;
    terminal::disable_raw_mode()?;
    result
}

async fn session() -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = CrosstermScreen::new(io::stdout())?;
    let mut buffers = BufferStore::new();
    let history = CommandHistory::shared(50);
    let mut events = Box::pin(
        EventStream::new().filter_map(|event| async move { event.ok().and_then(HostEvent::from_terminal) }),
    );
    let mut leftover: VecDeque<Keystroke> = VecDeque::new();

    for client in 1.. {
        let at = screen.cursor();
        screen.echo(PROMPT, at)?;

        let handle = buffers.allocate(CAPACITY);
        let mut read = CookedRead::new(
            ClientId(client),
            Destination::new(handle, CAPACITY),
            Encoding::Narrow,
        )
        .with_wake_mask(WakeMask::NONE.with('\x04'))
        .with_history(history.clone());

        let queued = futures::stream::iter(leftover.drain(..).map(HostEvent::Key));
        let (outcome, rest) = drive(&mut read, &mut screen, &mut buffers, queued.chain(&mut events)).await;
        leftover = rest;

        let bytes = buffers.release(handle).unwrap_or_default();
        let line = String::from_utf8_lossy(bytes.get(..outcome.bytes).unwrap_or_default());
        match outcome.status {
            ReadStatus::Completed(CompletionTrigger::CarriageReturn) => {
                let text = line.trim_end_matches(['\r', '\n']);
                tracing::info!(client, text, "line read");
                say(&mut screen, &format!("you typed: {text}"))?;
            }
            status => {
                tracing::info!(client, ?status, "leaving");
                say(&mut screen, "bye")?;
                break;
            }
        }
    }
    Ok(())
}

/// Print `text` on the cursor row and move to the start of the next one.
fn say(screen: &mut CrosstermScreen<Stdout>, text: &str) -> Result<(), ScreenError> {
    let at = Position::new(0, screen.cursor().row);
    screen.echo(text, at)?;
    let last = screen.dimensions().rows.saturating_sub(1);
    if at.row >= last {
        screen.scroll_up(1)?;
        screen.set_cursor(Position::new(0, last))
    } else {
        screen.set_cursor(Position::new(0, at.row + 1))
    }
}
