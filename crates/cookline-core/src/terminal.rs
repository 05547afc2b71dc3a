//! A [`ScreenSurface`] that draws to a real terminal through crossterm.

use std::io::Write;

use crossterm::{
    cursor::{self, MoveTo},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType, ScrollUp},
};
use unicode_width::UnicodeWidthStr;

use crate::error::ScreenError;
use crate::screen::{HostScreen, Position, ScreenSurface, Size};

/// Terminal-backed surface.
///
/// Dimensions are sampled when the surface is created and updated by the
/// host through [`HostScreen::resize`] when a resize event arrives. Each
/// operation is flushed before it returns, so nothing stays buffered
/// between keystrokes.
pub struct CrosstermScreen<W: Write> {
    out: W,
    size: Size,
    cursor: Position,
}

impl<W: Write> CrosstermScreen<W> {
    /// Wrap `out`, querying the terminal for its size and cursor position.
    ///
    /// The cursor query needs raw mode to be enabled.
    pub fn new(out: W) -> Result<Self, ScreenError> {
        let (cols, rows) = terminal::size()?;
        let (col, row) = cursor::position()?;
        Ok(Self::with_geometry(
            out,
            Size::new(cols, rows),
            Position::new(col, row),
        ))
    }

    /// Wrap `out` with a known geometry, without querying the terminal.
    pub fn with_geometry(out: W, size: Size, cursor: Position) -> Self {
        Self { out, size, cursor }
    }

    /// Consume the surface, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ScreenSurface for CrosstermScreen<W> {
    fn echo(&mut self, text: &str, at: Position) -> Result<(), ScreenError> {
        queue!(self.out, MoveTo(at.col, at.row), Print(text))?;
        self.out.flush()?;
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let last_col = self.size.cols.saturating_sub(1);
        self.cursor = Position::new(at.col.saturating_add(width).min(last_col), at.row);
        Ok(())
    }

    fn erase_region(&mut self, start_row: u16, row_count: u16) -> Result<(), ScreenError> {
        let end = start_row.saturating_add(row_count).min(self.size.rows);
        for row in start_row..end {
            queue!(self.out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        }
        queue!(self.out, MoveTo(self.cursor.col, self.cursor.row))?;
        self.out.flush()?;
        Ok(())
    }

    fn dimensions(&self) -> Size {
        self.size
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, at: Position) -> Result<(), ScreenError> {
        queue!(self.out, MoveTo(at.col, at.row))?;
        self.out.flush()?;
        self.cursor = at;
        Ok(())
    }

    fn scroll_up(&mut self, rows: u16) -> Result<(), ScreenError> {
        queue!(self.out, ScrollUp(rows))?;
        self.out.flush()?;
        self.cursor.row = self.cursor.row.saturating_sub(rows);
        Ok(())
    }
}

impl<W: Write> HostScreen for CrosstermScreen<W> {
    fn resize(&mut self, size: Size) -> Result<(), ScreenError> {
        self.size = size;
        self.cursor = Position::new(
            self.cursor.col.min(size.cols.saturating_sub(1)),
            self.cursor.row.min(size.rows.saturating_sub(1)),
        );
        Ok(())
    }
}
