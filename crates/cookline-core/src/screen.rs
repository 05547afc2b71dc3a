//! The display surface a cooked read echoes into.

use crate::error::ScreenError;

/// A cell coordinate on the surface (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub col: u16,
    pub row: u16,
}

impl Position {
    pub fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }
}

/// Surface dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Everything the engine needs from the screen.
///
/// Implementations are borrowed for a single echo or erase and never held
/// across keystrokes, so other writers may use the surface in between.
pub trait ScreenSurface {
    /// Write `text` starting at `at`. The text is already laid out by the
    /// caller and never crosses the end of the row.
    fn echo(&mut self, text: &str, at: Position) -> Result<(), ScreenError>;

    /// Blank `row_count` whole rows starting at `start_row`.
    fn erase_region(&mut self, start_row: u16, row_count: u16) -> Result<(), ScreenError>;

    /// Current dimensions.
    fn dimensions(&self) -> Size;

    /// Current cursor position.
    fn cursor(&self) -> Position;

    /// Move the cursor.
    fn set_cursor(&mut self, at: Position) -> Result<(), ScreenError>;

    /// Scroll the whole surface up by `rows`, discarding the top rows.
    fn scroll_up(&mut self, rows: u16) -> Result<(), ScreenError>;
}

/// A surface the host can resize.
///
/// The engine never calls this; the host does, between
/// `erase_before_resize` and `redraw_after_resize`.
pub trait HostScreen: ScreenSurface {
    fn resize(&mut self, size: Size) -> Result<(), ScreenError>;
}
