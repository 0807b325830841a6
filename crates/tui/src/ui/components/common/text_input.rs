//! UTF-8 safe single-buffer text editing with a cursor.

use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    input: String,
    /// Byte index into `input`, always on a char boundary.
    cursor: usize,
}

impl TextInputState {
    /// Buffer holding `text` with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let input = text.into();
        let cursor = input.len();
        Self { input, cursor }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display width of the text before the cursor on the cursor's line.
    pub fn cursor_column(&self) -> usize {
        let before = &self.input[..self.cursor];
        let line_start = before.rfind('\n').map(|index| index + 1).unwrap_or(0);
        before[line_start..].width()
    }

    /// Zero-based line of the cursor.
    pub fn cursor_line(&self) -> usize {
        self.input[..self.cursor].matches('\n').count()
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(char::len_utf8).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.input[..self.cursor].chars().last().map(char::len_utf8).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Remove the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut st = TextInputState::with_text("h🙂llo");
        st.move_home();
        st.move_right();
        st.insert_char('e');
        assert_eq!(st.input(), "he🙂llo");
        st.move_right();
        st.backspace();
        assert_eq!(st.input(), "hello");
        st.move_left();
        st.delete();
        assert_eq!(st.input(), "hllo");
    }

    #[test]
    fn cursor_position_tracks_lines() {
        let mut st = TextInputState::with_text("first\nsec");
        assert_eq!((st.cursor_line(), st.cursor_column()), (1, 3));
        st.move_home();
        assert_eq!((st.cursor_line(), st.cursor_column()), (0, 0));
        st.clear();
        assert_eq!((st.input(), st.cursor()), ("", 0));
    }
}
