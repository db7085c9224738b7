// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::ops::Range;

/// A `[start, end)` range of byte offsets into the pattern text.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize, // exclusive
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start after end");
        Self { start, end }
    }

    /// Create an empty `Span` representing a single position.
    pub fn new_position(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Create a `Span` from a starting position and a length in bytes.
    pub fn from_position_and_length(position: usize, length: usize) -> Self {
        Self::new(position, position + length)
    }

    /// Combine two spans into a single span, from the start of the
    /// first to the end of the second.
    pub fn from_span_pair(span_start: &Span, span_end: &Span) -> Self {
        Self::new(span_start.start, span_end.end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the text covered by this span.
    ///
    /// `source` must be the text the span was produced from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Span;

    #[test]
    fn test_span_constructors() {
        assert_eq!(Span::new_position(3), Span { start: 3, end: 3 });
        assert_eq!(Span::from_position_and_length(2, 4), Span::new(2, 6));
        assert_eq!(
            Span::from_span_pair(&Span::new(1, 2), &Span::new(5, 9)),
            Span::new(1, 9)
        );

        assert!(Span::new_position(7).is_empty());
        assert_eq!(Span::new(2, 6).len(), 4);
        assert!(Span::new(0, 10).contains(&Span::new(3, 4)));
        assert!(!Span::new(3, 4).contains(&Span::new(0, 10)));
    }

    #[test]
    fn test_span_text() {
        // "a文b"
        //  0 1  4   // byte index
        let source = "a文b";
        assert_eq!(Span::new(1, 4).text(source), "文");
        assert_eq!(Span::new(4, 5).text(source), "b");

        let range: std::ops::Range<usize> = Span::new(1, 4).into();
        assert_eq!(range, 1..4);
    }
}
