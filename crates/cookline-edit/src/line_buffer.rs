//! The line being typed, independent of the caller's destination.
//!
//! `LineBuffer` owns the characters and the insertion index. Every mutation
//! records the lowest index it touched so the echo can repaint only from
//! there to the end of the line.

/// Editable line with an insertion index and dirty tracking.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
    dirty_from: Option<usize>,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text.
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the text and move the cursor to the end.
    pub fn set_value(&mut self, s: &str) {
        let common = self
            .chars
            .iter()
            .zip(s.chars())
            .take_while(|(a, b)| *a == b)
            .count();
        self.chars = s.chars().collect();
        self.cursor = self.chars.len();
        self.mark_dirty(common);
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Insertion index (char index, 0-based).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Set the insertion index, clamped to `0..=len`.
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.chars.len());
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Reserve room for at least `additional` more characters.
    pub fn reserve(&mut self, additional: usize) {
        self.chars.reserve(additional);
    }

    /// Allocated room, in characters.
    pub fn capacity(&self) -> usize {
        self.chars.capacity()
    }

    /// Lowest index changed since the last call, if any.
    pub fn take_dirty(&mut self) -> Option<usize> {
        self.dirty_from.take()
    }

    /// Insert a character at the cursor and advance past it.
    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.mark_dirty(self.cursor);
        self.cursor += 1;
    }

    /// Replace the character under the cursor (or append at the end) and
    /// advance past it.
    pub fn overwrite_char(&mut self, c: char) {
        match self.chars.get_mut(self.cursor) {
            Some(slot) => *slot = c,
            None => self.chars.push(c),
        }
        self.mark_dirty(self.cursor);
        self.cursor += 1;
    }

    /// Insert a string at the cursor and advance past it. Returns the
    /// number of characters inserted.
    pub fn insert_str(&mut self, s: &str) -> usize {
        let at = self.cursor;
        let before = self.chars.len();
        self.chars.splice(at..at, s.chars());
        let inserted = self.chars.len() - before;
        if inserted > 0 {
            self.mark_dirty(at);
            self.cursor += inserted;
        }
        inserted
    }

    /// Append to the end of the line without moving the cursor.
    pub fn append(&mut self, s: &str) {
        let at = self.chars.len();
        self.chars.extend(s.chars());
        if self.chars.len() > at {
            self.mark_dirty(at);
        }
    }

    /// Delete the character before the cursor (backspace).
    /// Returns true if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
            self.mark_dirty(self.cursor);
            true
        } else {
            false
        }
    }

    /// Delete the character at the cursor (delete key).
    /// Returns true if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
            self.mark_dirty(self.cursor);
            true
        } else {
            false
        }
    }

    /// Delete the word before the cursor, along with any spaces between it
    /// and the cursor.
    pub fn delete_word_back(&mut self) -> bool {
        let end = self.cursor;
        let mut start = end;
        while start > 0 && self.chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && self.chars[start - 1] != ' ' {
            start -= 1;
        }
        if start == end {
            return false;
        }
        self.chars.drain(start..end);
        self.cursor = start;
        self.mark_dirty(start);
        true
    }

    /// Delete from the start of the line to the cursor.
    pub fn kill_to_start(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.chars.drain(..self.cursor);
        self.cursor = 0;
        self.mark_dirty(0);
        true
    }

    /// Delete from the cursor to the end of the line.
    pub fn kill_to_end(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.truncate(self.cursor);
        self.mark_dirty(self.cursor);
        true
    }

    /// Empty the line.
    pub fn clear(&mut self) -> bool {
        if self.chars.is_empty() {
            return false;
        }
        self.chars.clear();
        self.cursor = 0;
        self.mark_dirty(0);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Move to the start of the previous word.
    pub fn word_left(&mut self) {
        while self.cursor > 0 && !self.chars[self.cursor - 1].is_alphanumeric() {
            self.cursor -= 1;
        }
        while self.cursor > 0 && self.chars[self.cursor - 1].is_alphanumeric() {
            self.cursor -= 1;
        }
    }

    /// Move to the start of the next word.
    pub fn word_right(&mut self) {
        let len = self.chars.len();
        while self.cursor < len && self.chars[self.cursor].is_alphanumeric() {
            self.cursor += 1;
        }
        while self.cursor < len && !self.chars[self.cursor].is_alphanumeric() {
            self.cursor += 1;
        }
    }

    fn mark_dirty(&mut self, from: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(from, |d| d.min(from)));
        debug_assert!(self.cursor <= self.chars.len(), "insertion index out of bounds");
    }
}
