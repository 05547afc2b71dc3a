//! Wrap accounting: where each character of the line lands on screen.
//!
//! Positions are relative to the anchor: row 0 is the anchor row and starts
//! at the anchor column, later rows start at column 0. The layout of a
//! prefix never depends on what follows it, so a repaint can start at any
//! index and reuse the positions before it.

use unicode_width::UnicodeWidthChar;

/// Columns between tab stops.
pub const TAB_WIDTH: u16 = 8;

/// A cell relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CellPos {
    pub row: u32,
    pub col: u16,
}

/// Screen placement of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub at: CellPos,
    pub width: u16,
}

/// Placement of a whole line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    cells: Vec<Placement>,
    end: CellPos,
}

impl Layout {
    /// Lay out `chars` starting at `anchor_col` on a surface `cols` wide.
    pub fn compute(chars: &[char], anchor_col: u16, cols: u16) -> Self {
        let cols = cols.max(1);
        let mut row = 0u32;
        let mut col = anchor_col.min(cols - 1);
        let mut cells = Vec::with_capacity(chars.len());
        for &c in chars {
            let mut width = glyph_width(c, col).min(cols - col);
            if c != '\t' && glyph_width(c, col) > cols - col {
                // Does not fit: wrap the whole glyph.
                row += 1;
                col = 0;
                width = glyph_width(c, col).min(cols);
            }
            cells.push(Placement {
                at: CellPos { row, col },
                width,
            });
            col += width;
            if col >= cols {
                row += 1;
                col = 0;
            }
        }
        Self {
            cells,
            end: CellPos { row, col },
        }
    }

    /// Placement of the character at `index`.
    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.cells.get(index).copied()
    }

    /// Where the insertion index `index` puts the cursor.
    pub fn cursor_at(&self, index: usize) -> CellPos {
        self.cells.get(index).map_or(self.end, |p| p.at)
    }

    /// Cell just past the last character.
    pub fn end(&self) -> CellPos {
        self.end
    }

    /// Rows the line occupies, counting the row the cursor sits on at the
    /// end of the line.
    pub fn rows(&self) -> u32 {
        self.end.row + 1
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Columns `c` occupies when drawn at column `col`.
///
/// Tabs run to the next tab stop, control characters are shown in caret
/// notation, everything else uses its Unicode display width (at least 1).
pub fn glyph_width(c: char, col: u16) -> u16 {
    if c == '\t' {
        TAB_WIDTH - col % TAB_WIDTH
    } else if c.is_control() {
        2
    } else {
        c.width().unwrap_or(1).clamp(1, 2) as u16
    }
}

/// The text drawn for `c` given the width it was laid out with.
pub fn glyph_text(c: char, width: u16) -> String {
    if c == '\t' {
        " ".repeat(usize::from(width))
    } else if c.is_control() {
        let shown = match c as u32 {
            cp @ 0..=0x1f => char::from(cp as u8 | 0x40),
            _ => '?',
        };
        format!("^{shown}")
    } else {
        c.to_string()
    }
}
