//! Input handling for the TUI.
//!
//! The cursor is tracked in chars so multi-byte input edits cleanly.

use super::app::App;

impl App {
    /// Byte offset of the cursor.
    fn cursor_byte(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Number of chars in the input.
    fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Handle character input.
    pub fn enter_char(&mut self, c: char) {
        let at = self.cursor_byte();
        self.input.insert(at, c);
        self.cursor_pos += 1;
    }

    /// Delete character before cursor.
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.cursor_byte();
            self.input.remove(at);
        }
    }

    /// Delete character under cursor.
    pub fn delete_char_forward(&mut self) {
        if self.cursor_pos < self.input_len() {
            let at = self.cursor_byte();
            self.input.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_pos < self.input_len() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to start of input.
    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor to end of input.
    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.input_len();
    }

    /// Clear the input.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Paste text at the cursor, dropping line breaks.
    pub fn paste(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.enter_char(c);
        }
    }
}
