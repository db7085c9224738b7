// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::span::Span;

/// A forward-only cursor over the pattern text.
///
/// The cursor never copies the text; positions are byte offsets.
/// Peeking is cheap for the small offsets the parser uses (at most 3).
pub struct Cursor<'a> {
    source: &'a str,
    position: usize, // position of the next char
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The unconsumed text, starting at the current position.
    pub fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    pub fn next_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.position += c.len_utf8();
        Some(c)
    }

    pub fn peek_char(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    pub fn peek_char_and_equals(&self, offset: usize, expected_char: char) -> bool {
        matches!(self.peek_char(offset), Some(c) if c == expected_char)
    }

    /// Consumes the given char if it is the next one.
    pub fn eat_char(&mut self, expected_char: char) -> bool {
        if self.peek_char_and_equals(0, expected_char) {
            self.position += expected_char.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes `length` bytes, the length must come from a scan of `rest()`.
    pub fn advance(&mut self, length: usize) {
        debug_assert!(self.source.is_char_boundary(self.position + length));
        self.position += length;
    }

    /// The text from `start` to the current position.
    pub fn text_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    pub fn text(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    pub fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.position)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::span::Span;

    use super::Cursor;

    #[test]
    fn test_cursor_next_and_peek() {
        // "a文😊b"
        //  0 1  4   8  // byte index
        let mut cursor = Cursor::new("a文😊b");

        assert_eq!(cursor.peek_char(0), Some('a'));
        assert_eq!(cursor.peek_char(2), Some('😊'));
        assert_eq!(cursor.peek_char(4), None);
        assert!(cursor.peek_char_and_equals(1, '文'));

        assert_eq!(cursor.next_char(), Some('a'));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.next_char(), Some('文'));
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.rest(), "😊b");

        assert!(!cursor.eat_char('b'));
        assert!(cursor.eat_char('😊'));
        assert_eq!(cursor.position(), 8);

        assert_eq!(cursor.next_char(), Some('b'));
        assert_eq!(cursor.rest(), "");
        assert_eq!(cursor.next_char(), None);
    }

    #[test]
    fn test_cursor_spans() {
        let mut cursor = Cursor::new(r#"(?:ab)"#);

        cursor.advance(3);
        cursor.next_char();
        cursor.next_char();

        assert_eq!(cursor.span_from(3), Span::new(3, 5));
        assert_eq!(cursor.text_from(3), "ab");
        assert_eq!(cursor.text(Span::new(0, 3)), "(?:");

        cursor.next_char();
        assert_eq!(cursor.span_from(1), Span::new(1, 6));
    }
}
