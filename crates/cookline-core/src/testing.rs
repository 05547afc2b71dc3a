//! A headless screen surface for tests.

use crate::error::ScreenError;
use crate::screen::{HostScreen, Position, ScreenSurface, Size};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// A headless [`ScreenSurface`] backed by a ratatui [`Buffer`].
///
/// `TestScreen` lets you drive a read in a plain `#[test]` function and
/// assert on what it echoed, cell by cell or row by row. Echo failures can
/// be injected with [`fail_next_echoes`](TestScreen::fail_next_echoes).
///
/// # Example
///
/// ```
/// use cookline_core::testing::TestScreen;
/// use cookline_core::screen::{Position, ScreenSurface};
///
/// let mut screen = TestScreen::new(20, 3);
/// screen.echo("C:\\> ", Position::new(0, 0)).unwrap();
/// assert_eq!(screen.row(0), "C:\\>");
/// assert_eq!(screen.cursor(), Position::new(5, 0));
/// ```
#[derive(Debug, Clone)]
pub struct TestScreen {
    buffer: Buffer,
    cursor: Position,
    failing_echoes: u32,
    echo_calls: u32,
}

impl TestScreen {
    /// Create a blank screen of `cols` x `rows` cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, cols, rows)),
            cursor: Position::default(),
            failing_echoes: 0,
            echo_calls: 0,
        }
    }

    /// Make the next `count` echo calls fail with [`ScreenError::Unavailable`].
    pub fn fail_next_echoes(&mut self, count: u32) {
        self.failing_echoes = count;
    }

    /// Number of echo calls made so far, failed ones included.
    pub fn echo_calls(&self) -> u32 {
        self.echo_calls
    }

    /// The text of one row with trailing blanks removed.
    pub fn row(&self, row: u16) -> String {
        let area = self.buffer.area;
        if row >= area.height {
            return String::new();
        }
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(self.buffer[(x, row)].symbol());
        }
        line.trim_end().to_string()
    }

    /// The whole surface, rows separated by newlines. Trailing blanks
    /// within each row are preserved.
    pub fn render_string(&self) -> String {
        let area = self.buffer.area;
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(self.buffer[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }
}

impl ScreenSurface for TestScreen {
    fn echo(&mut self, text: &str, at: Position) -> Result<(), ScreenError> {
        self.echo_calls += 1;
        if self.failing_echoes > 0 {
            self.failing_echoes -= 1;
            return Err(ScreenError::Unavailable);
        }
        let area = self.buffer.area;
        if at.row >= area.height || at.col >= area.width {
            return Ok(());
        }
        let max = usize::from(area.width - at.col);
        let (x, _) = self
            .buffer
            .set_stringn(at.col, at.row, text, max, Style::default());
        self.cursor = Position::new(x.min(area.width.saturating_sub(1)), at.row);
        Ok(())
    }

    fn erase_region(&mut self, start_row: u16, row_count: u16) -> Result<(), ScreenError> {
        let area = self.buffer.area;
        let end = start_row.saturating_add(row_count).min(area.height);
        for y in start_row..end {
            for x in area.left()..area.right() {
                self.buffer[(x, y)].reset();
            }
        }
        Ok(())
    }

    fn dimensions(&self) -> Size {
        Size::new(self.buffer.area.width, self.buffer.area.height)
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, at: Position) -> Result<(), ScreenError> {
        self.cursor = at;
        Ok(())
    }

    fn scroll_up(&mut self, rows: u16) -> Result<(), ScreenError> {
        let area = self.buffer.area;
        let rows = rows.min(area.height);
        for y in 0..area.height - rows {
            for x in 0..area.width {
                let cell = self.buffer[(x, y + rows)].clone();
                self.buffer[(x, y)] = cell;
            }
        }
        self.erase_region(area.height - rows, rows)?;
        self.cursor.row = self.cursor.row.saturating_sub(rows);
        Ok(())
    }
}

impl HostScreen for TestScreen {
    fn resize(&mut self, size: Size) -> Result<(), ScreenError> {
        let mut resized = Buffer::empty(Rect::new(0, 0, size.cols, size.rows));
        let old = self.buffer.area;
        for y in 0..old.height.min(size.rows) {
            for x in 0..old.width.min(size.cols) {
                resized[(x, y)] = self.buffer[(x, y)].clone();
            }
        }
        self.buffer = resized;
        self.cursor = Position::new(
            self.cursor.col.min(size.cols.saturating_sub(1)),
            self.cursor.row.min(size.rows.saturating_sub(1)),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_writes_row_and_moves_cursor() {
        let mut screen = TestScreen::new(10, 2);
        screen.echo("abc", Position::new(2, 1)).unwrap();
        assert_eq!(screen.row(1), "  abc");
        assert_eq!(screen.cursor(), Position::new(5, 1));
    }

    #[test]
    fn echo_clips_at_row_end() {
        let mut screen = TestScreen::new(4, 1);
        screen.echo("abcdef", Position::new(1, 0)).unwrap();
        assert_eq!(screen.row(0), " abc");
    }

    #[test]
    fn injected_failures_are_consumed() {
        let mut screen = TestScreen::new(4, 1);
        screen.fail_next_echoes(1);
        assert!(matches!(
            screen.echo("a", Position::new(0, 0)),
            Err(ScreenError::Unavailable)
        ));
        assert!(screen.echo("a", Position::new(0, 0)).is_ok());
        assert_eq!(screen.echo_calls(), 2);
    }

    #[test]
    fn erase_region_blanks_rows() {
        let mut screen = TestScreen::new(3, 3);
        for row in 0..3 {
            screen.echo("xyz", Position::new(0, row)).unwrap();
        }
        screen.erase_region(1, 5).unwrap();
        assert_eq!(screen.render_string(), "xyz\n   \n   ");
    }

    #[test]
    fn scroll_up_shifts_rows() {
        let mut screen = TestScreen::new(3, 3);
        screen.echo("a", Position::new(0, 0)).unwrap();
        screen.echo("b", Position::new(0, 1)).unwrap();
        screen.echo("c", Position::new(0, 2)).unwrap();
        screen.scroll_up(1).unwrap();
        assert_eq!(screen.row(0), "b");
        assert_eq!(screen.row(1), "c");
        assert_eq!(screen.row(2), "");
        assert_eq!(screen.cursor().row, 1);
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut screen = TestScreen::new(5, 2);
        screen.echo("hello", Position::new(0, 0)).unwrap();
        screen.resize(Size::new(3, 4)).unwrap();
        assert_eq!(screen.dimensions(), Size::new(3, 4));
        assert_eq!(screen.row(0), "hel");
        assert_eq!(screen.cursor(), Position::new(2, 0));
    }
}
