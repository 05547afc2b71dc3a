//! Echo of the line on the display surface.
//!
//! `EchoLine` remembers where the line started (the anchor) and how far its
//! last paint reached, so it can repaint only the changed span, blank what a
//! longer previous version left behind, and erase itself before a resize.

use cookline_core::{Position, ScreenSurface, Size};

use crate::layout::{glyph_text, CellPos, Layout};

/// Screen cell where the echo of the line begins.
///
/// The row is signed: once a line longer than the surface has scrolled,
/// its first row can sit above the top of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub col: u16,
    pub row: i32,
}

impl Anchor {
    pub fn at(pos: Position) -> Self {
        Self {
            col: pos.col,
            row: i32::from(pos.row),
        }
    }

    /// Absolute screen position of a cell relative to this anchor, or
    /// `None` when it lies above the top row.
    pub fn to_screen(&self, cell: CellPos) -> Option<Position> {
        let row = i64::from(self.row) + i64::from(cell.row);
        u16::try_from(row).ok().map(|row| Position::new(cell.col, row))
    }
}

/// A run of glyphs drawn with one echo call.
struct Run {
    start: CellPos,
    text: String,
    end_col: u16,
}

/// Echo bookkeeping for one line.
#[derive(Debug, Clone)]
pub struct EchoLine {
    anchor: Anchor,
    /// End of the last paint, relative to the anchor. `None` when nothing
    /// of the line is on screen.
    drawn_end: Option<CellPos>,
    /// A paint failed; the next one starts from the beginning of the line.
    stale: bool,
    retries: u8,
}

impl EchoLine {
    pub fn new(anchor: Anchor, retries: u8) -> Self {
        Self {
            anchor,
            drawn_end: None,
            stale: false,
            retries,
        }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Rows the line occupied when last painted.
    pub fn rows(&self) -> u32 {
        self.drawn_end.map_or(0, |end| end.row + 1)
    }

    /// Repaint `chars[from..]`, blank cells the previous paint reached past
    /// the new end, and put the cursor at insertion index `cursor`.
    pub fn draw(&mut self, screen: &mut dyn ScreenSurface, chars: &[char], from: usize, cursor: usize) {
        let from = if self.stale || self.drawn_end.is_none() { 0 } else { from };
        let size = screen.dimensions();
        let layout = Layout::compute(chars, self.anchor.col, size.cols);
        self.scroll_into_view(screen, layout.end().row, size);

        let cols = size.cols.max(1);
        let mut ok = true;
        let mut run: Option<Run> = None;
        for (i, &c) in chars.iter().enumerate().skip(from) {
            let Some(p) = layout.placement(i) else { break };
            let glyph = glyph_text(c, p.width);
            match run.as_mut() {
                Some(r) if r.start.row == p.at.row && r.end_col == p.at.col => {
                    r.text.push_str(&glyph);
                    r.end_col += p.width;
                }
                _ => {
                    if let Some(mut done) = run.take() {
                        if done.start.row != p.at.row && done.end_col < cols {
                            // A wide glyph wrapped early; clear the gap it left.
                            let gap = usize::from(cols - done.end_col);
                            done.text.push_str(&" ".repeat(gap));
                        }
                        ok &= self.echo(screen, &done.text, done.start);
                    }
                    run = Some(Run {
                        start: p.at,
                        text: glyph,
                        end_col: p.at.col + p.width,
                    });
                }
            }
        }
        if let Some(done) = run {
            ok &= self.echo(screen, &done.text, done.start);
        }

        if let Some(old_end) = self.drawn_end {
            if old_end > layout.end() {
                ok &= self.blank(screen, layout.end(), old_end, cols);
            }
        }

        self.drawn_end = Some(layout.end());
        if !ok {
            tracing::warn!("echo incomplete; repainting on next keystroke");
        }
        self.stale = !ok;
        self.place(screen, layout.cursor_at(cursor));
    }

    /// Paint the whole line as if nothing were on screen.
    pub fn redraw(&mut self, screen: &mut dyn ScreenSurface, chars: &[char], cursor: usize) {
        self.drawn_end = None;
        self.draw(screen, chars, 0, cursor);
    }

    /// Move the cursor to insertion index `cursor` without painting.
    pub fn place_cursor(&mut self, screen: &mut dyn ScreenSurface, chars: &[char], cursor: usize) {
        let layout = Layout::compute(chars, self.anchor.col, screen.dimensions().cols);
        self.place(screen, layout.cursor_at(cursor));
    }

    /// Move the cursor to the start of the row after the line, as echoing
    /// a line ending does.
    pub fn newline(&mut self, screen: &mut dyn ScreenSurface, chars: &[char]) {
        let size = screen.dimensions();
        let end = Layout::compute(chars, self.anchor.col, size.cols).end();
        let next = if end.col == 0 && end.row > 0 {
            end
        } else {
            CellPos {
                row: end.row + 1,
                col: 0,
            }
        };
        self.scroll_into_view(screen, next.row, size);
        self.place(screen, next);
    }

    /// Remove the echoed line from the surface without touching the text.
    pub fn erase(&mut self, screen: &mut dyn ScreenSurface) {
        let Some(end) = self.drawn_end.take() else {
            return;
        };
        let cols = screen.dimensions().cols.max(1);
        let first_row_end = if end.row == 0 { end.col } else { cols };
        if first_row_end > self.anchor.col {
            let blank = " ".repeat(usize::from(first_row_end - self.anchor.col));
            self.echo(
                screen,
                &blank,
                CellPos {
                    row: 0,
                    col: self.anchor.col,
                },
            );
        }
        if end.row > 0 {
            let first = i64::from(self.anchor.row) + 1;
            let last = i64::from(self.anchor.row) + i64::from(end.row);
            let first = first.max(0);
            if last >= first {
                let start = u16::try_from(first).unwrap_or(u16::MAX);
                let count = u16::try_from(last - first + 1).unwrap_or(u16::MAX);
                if let Err(err) = screen.erase_region(start, count) {
                    tracing::warn!(%err, "erase_region failed");
                }
            }
        }
        self.stale = false;
    }

    /// Bring the anchor back inside a surface of `size`.
    pub fn revalidate(&mut self, size: Size) {
        let cols = size.cols.max(1);
        let rows = size.rows.max(1);
        let anchor = Anchor {
            col: self.anchor.col.min(cols - 1),
            row: self.anchor.row.min(i32::from(rows) - 1),
        };
        if anchor != self.anchor {
            tracing::debug!(?anchor, old = ?self.anchor, "anchor revalidated");
        }
        self.anchor = anchor;
    }

    fn scroll_into_view(&mut self, screen: &mut dyn ScreenSurface, last_row: u32, size: Size) {
        let bottom = i64::from(self.anchor.row) + i64::from(last_row);
        let max_row = i64::from(size.rows.max(1)) - 1;
        if bottom <= max_row {
            return;
        }
        let by = u16::try_from(bottom - max_row).unwrap_or(u16::MAX);
        match screen.scroll_up(by) {
            Ok(()) => self.anchor.row -= i32::from(by),
            Err(err) => tracing::warn!(%err, "scroll failed"),
        }
    }

    fn blank(&mut self, screen: &mut dyn ScreenSurface, from: CellPos, to: CellPos, cols: u16) -> bool {
        let mut ok = true;
        for row in from.row..=to.row {
            let start = if row == from.row { from.col } else { 0 };
            let end = if row == to.row { to.col } else { cols };
            if end > start {
                let blank = " ".repeat(usize::from(end - start));
                ok &= self.echo(screen, &blank, CellPos { row, col: start });
            }
        }
        ok
    }

    fn place(&mut self, screen: &mut dyn ScreenSurface, cell: CellPos) {
        if let Some(pos) = self.anchor.to_screen(cell) {
            if let Err(err) = screen.set_cursor(pos) {
                tracing::warn!(%err, "set_cursor failed");
            }
        }
    }

    /// Echo with retries on a transiently unavailable surface.
    fn echo(&self, screen: &mut dyn ScreenSurface, text: &str, cell: CellPos) -> bool {
        let Some(at) = self.anchor.to_screen(cell) else {
            // Scrolled off the top.
            return true;
        };
        let mut attempt = 0;
        loop {
            match screen.echo(text, at) {
                Ok(()) => return true,
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    tracing::trace!(attempt, "echo retry");
                }
                Err(err) => {
                    tracing::warn!(%err, attempt, "echo failed");
                    return false;
                }
            }
        }
    }
}
