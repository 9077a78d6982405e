//! Cursor-addressed buffer for the line being composed.

/// Ordered sequence of characters plus a cursor offset.
///
/// Invariant: `0 <= cursor <= len()` after every operation. All editing is
/// pure data manipulation; no I/O happens here.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn content(&self) -> String {
        self.chars.iter().collect()
    }

    /// Characters from the cursor to the end of the buffer.
    pub fn tail(&self) -> String {
        self.chars[self.cursor..].iter().collect()
    }

    /// Insert at the cursor, shifting subsequent characters right.
    pub fn insert(&mut self, ch: char) {
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor. No-op at offset 0.
    pub fn delete_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Forward delete at the cursor. No-op at the end of the buffer.
    pub fn delete_at(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_to_start(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_to_end(&mut self) -> bool {
        let moved = self.cursor != self.chars.len();
        self.cursor = self.chars.len();
        moved
    }

    /// Move to the start of the previous word: skip separators behind the
    /// cursor, then the word run before them.
    pub fn move_word_left(&mut self) -> bool {
        let start = self.cursor;
        while self.cursor > 0 && !is_word_char(self.chars[self.cursor - 1]) {
            self.cursor -= 1;
        }
        while self.cursor > 0 && is_word_char(self.chars[self.cursor - 1]) {
            self.cursor -= 1;
        }
        self.cursor != start
    }

    /// Move to the start of the next word: skip the current word run, then
    /// the separators after it.
    pub fn move_word_right(&mut self) -> bool {
        let start = self.cursor;
        while self.cursor < self.chars.len() && is_word_char(self.chars[self.cursor]) {
            self.cursor += 1;
        }
        while self.cursor < self.chars.len() && !is_word_char(self.chars[self.cursor]) {
            self.cursor += 1;
        }
        self.cursor != start
    }

    /// Replace the whole buffer, cursor at the end.
    pub fn load(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::LineBuffer;

    #[test]
    fn insert_shifts_and_advances_cursor() {
        let mut buffer = LineBuffer::new();
        for ch in "hi".chars() {
            buffer.insert(ch);
        }
        buffer.move_left();
        buffer.insert('!');
        assert_eq!(buffer.content(), "h!i");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn deletes_at_boundaries_are_no_ops() {
        let mut buffer = LineBuffer::new();
        assert!(!buffer.delete_before());
        assert!(!buffer.delete_at());

        buffer.load("ab");
        assert!(!buffer.delete_at(), "forward delete at end");
        buffer.move_to_start();
        assert!(!buffer.delete_before(), "backspace at start");
        assert_eq!(buffer.content(), "ab");
    }

    #[test]
    fn cursor_stays_within_bounds() {
        let mut buffer = LineBuffer::new();
        buffer.load("abc");
        for _ in 0..5 {
            buffer.move_right();
        }
        assert_eq!(buffer.cursor(), 3);
        for _ in 0..5 {
            buffer.move_left();
        }
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn word_motion_from_inside_word_and_whitespace() {
        let mut buffer = LineBuffer::new();
        buffer.load("list  vm_pool  all");

        buffer.move_to_start();
        assert!(buffer.move_word_right());
        assert_eq!(buffer.cursor(), 6, "start of vm_pool");
        assert!(buffer.move_word_right());
        assert_eq!(buffer.cursor(), 15, "start of all");

        // From inside whitespace, left lands on the previous word start.
        let mut buffer = LineBuffer::new();
        buffer.load("list  vm_pool");
        while buffer.cursor() != 5 {
            buffer.move_left();
        }
        assert!(buffer.move_word_left());
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn word_motion_clamps_at_ends() {
        let mut buffer = LineBuffer::new();
        buffer.load("one");
        assert!(!buffer.move_word_right());
        buffer.move_to_start();
        assert!(!buffer.move_word_left());
    }

    #[test]
    fn length_tracks_insertions_minus_deletions() {
        let mut buffer = LineBuffer::new();
        let inserted = "command line";
        for ch in inserted.chars() {
            buffer.insert(ch);
        }
        let mut deletions = 0;
        for _ in 0..3 {
            if buffer.delete_before() {
                deletions += 1;
            }
        }
        assert_eq!(buffer.len(), inserted.chars().count() - deletions);
        assert!(buffer.cursor() <= buffer.len());
    }
}
