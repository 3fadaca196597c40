/// Single-line text input used by dashboard forms.
/// The cursor is a char index, so Persian text edits correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    chars: Vec<char>,
    pub cursor: usize,
    undo_stack: Vec<(Vec<char>, usize)>,
}

const MAX_HISTORY: usize = 100;

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(content: &str) -> Self {
        let chars: Vec<char> = content.chars().filter(|c| *c != '\n').collect();
        let cursor = chars.len();
        Self {
            chars,
            cursor,
            undo_stack: Vec::new(),
        }
    }

    fn snapshot(&mut self) {
        if self.undo_stack.len() == MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push((self.chars.clone(), self.cursor));
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        self.snapshot();
        self.cursor = self.cursor.min(self.chars.len());
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor == 0 || self.chars.is_empty() {
            return;
        }
        self.snapshot();
        self.cursor = self.cursor.min(self.chars.len());
        self.chars.remove(self.cursor - 1);
        self.cursor -= 1;
    }

    /// Delete the char under the cursor
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.chars.len() {
            return;
        }
        self.snapshot();
        self.chars.remove(self.cursor);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((chars, cursor)) => {
                self.chars = chars;
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        if !self.chars.is_empty() {
            self.snapshot();
            self.chars.clear();
            self.cursor = 0;
        }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Slice of the text that fits `width` columns with the cursor visible,
    /// and the cursor column inside that slice
    pub fn visible(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let start = (self.cursor + 1).saturating_sub(width);
        let end = (start + width).min(self.chars.len());
        (self.chars[start..end].iter().collect(), self.cursor - start)
    }
}
