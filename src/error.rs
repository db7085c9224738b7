// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::{self, Display};

use crate::span::Span;

/// Errors visible to the caller.
///
/// Parsing a pattern text never fails, malformed patterns are
/// represented in the tree instead. Errors only come from misuse
/// of the entry points, e.g. non UTF-8 input or unknown flags.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    Message(String),
    MessageWithLocation(String, Span),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Message(msg) => f.write_str(msg),
            Error::MessageWithLocation(msg, span) => {
                write!(f, "{} (at {}..{})", msg, span.start, span.end)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::span::Span;

    use super::Error;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Message("Invalid UTF-8 sequence.".to_owned()).to_string(),
            "Invalid UTF-8 sequence."
        );

        assert_eq!(
            Error::MessageWithLocation("Unknown flag 'x'.".to_owned(), Span::new(2, 3))
                .to_string(),
            "Unknown flag 'x'. (at 2..3)"
        );
    }
}
