//! Input line editing
//!
//! Emacs-style editing operations on the geocoder input. The cursor is a char
//! index, so multi-byte place names edit correctly.

/// Input operations for unified input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOperation {
    InsertChar(char),
    MoveCursorToStart,
    MoveCursorToEnd,
    MoveCursorLeft,
    MoveCursorRight,
    DeleteCharForward,
    DeleteCharBackward,
    KillLine,
    Yank,
}

/// Editable text with a cursor and a one-entry kill ring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    pub text: String,
    /// Char index, `0..=text.chars().count()`
    pub cursor: usize,
    pub kill_ring: String,
}

impl InputBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            kill_ring: String::new(),
        }
    }

    /// Replace the text and park the cursor at its end
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_len();
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Apply an operation; returns true if the text changed
    pub fn apply(&mut self, operation: InputOperation) -> bool {
        let len = self.char_len();
        self.cursor = self.cursor.min(len);

        match operation {
            InputOperation::InsertChar(c) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                true
            }
            InputOperation::MoveCursorToStart => {
                self.cursor = 0;
                false
            }
            InputOperation::MoveCursorToEnd => {
                self.cursor = len;
                false
            }
            InputOperation::MoveCursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            InputOperation::MoveCursorRight => {
                if self.cursor < len {
                    self.cursor += 1;
                }
                false
            }
            InputOperation::DeleteCharForward => {
                if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                    true
                } else {
                    false
                }
            }
            InputOperation::DeleteCharBackward => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                    true
                } else {
                    false
                }
            }
            InputOperation::KillLine => {
                if self.cursor < len {
                    let at = self.byte_index(self.cursor);
                    self.kill_ring = self.text[at..].to_string();
                    self.text.truncate(at);
                    true
                } else {
                    false
                }
            }
            InputOperation::Yank => {
                if self.kill_ring.is_empty() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.text.insert_str(at, &self.kill_ring);
                self.cursor += self.kill_ring.chars().count();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_operations() {
        let mut input = InputBuffer::new("hello");
        input.cursor = 2;

        assert!(input.apply(InputOperation::InsertChar('X')));
        assert_eq!(input.text, "heXllo");
        assert_eq!(input.cursor, 3);

        assert!(!input.apply(InputOperation::MoveCursorToStart));
        assert_eq!(input.cursor, 0);

        assert!(!input.apply(InputOperation::MoveCursorToEnd));
        assert_eq!(input.cursor, 6);
    }

    #[test]
    fn test_kill_and_yank() {
        let mut input = InputBuffer::new("hello world");
        input.cursor = 6;

        assert!(input.apply(InputOperation::KillLine));
        assert_eq!(input.text, "hello ");
        assert_eq!(input.kill_ring, "world");
        assert_eq!(input.cursor, 6);

        input.cursor = 5;
        assert!(input.apply(InputOperation::Yank));
        assert_eq!(input.text, "helloworld ");
        assert_eq!(input.cursor, 10);
    }

    #[test]
    fn test_cursor_boundaries() {
        let mut input = InputBuffer::new("test");
        input.cursor = 0;
        input.apply(InputOperation::MoveCursorLeft);
        assert_eq!(input.cursor, 0);

        input.cursor = 4;
        input.apply(InputOperation::MoveCursorRight);
        assert_eq!(input.cursor, 4);
    }

    #[test]
    fn test_delete_operations() {
        let mut input = InputBuffer::new("hello");
        input.cursor = 2;

        assert!(input.apply(InputOperation::DeleteCharForward));
        assert_eq!(input.text, "helo");
        assert_eq!(input.cursor, 2);

        assert!(input.apply(InputOperation::DeleteCharBackward));
        assert_eq!(input.text, "hlo");
        assert_eq!(input.cursor, 1);

        input.cursor = 0;
        assert!(!input.apply(InputOperation::DeleteCharBackward));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = InputBuffer::new("Zürich");
        input.cursor = 2;
        input.apply(InputOperation::DeleteCharBackward);
        assert_eq!(input.text, "Zrich");

        input.apply(InputOperation::InsertChar('ü'));
        assert_eq!(input.text, "Zürich");
        assert_eq!(input.cursor, 2);
    }
}
