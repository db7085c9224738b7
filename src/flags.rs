// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::{fmt::Display, str::FromStr};

use crate::{error::Error, span::Span};

/// The flags of a regular expression literal.
///
/// Only `unicode` changes how a pattern is parsed: it enables the
/// `\u{...}` code point escapes and the `\p{...}` property escapes,
/// and restricts identity escapes to the syntax characters.
/// The other flags are recorded so that a host can round-trip them.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Flags {
    pub has_indices: bool,  // d
    pub global: bool,       // g
    pub ignore_case: bool,  // i
    pub multiline: bool,    // m
    pub dot_all: bool,      // s
    pub unicode: bool,      // u
    pub unicode_sets: bool, // v
    pub sticky: bool,       // y
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags with only the Unicode mode enabled.
    pub fn unicode() -> Self {
        Self {
            unicode: true,
            ..Self::default()
        }
    }

    /// Whether the pattern is parsed in Unicode-aware mode.
    ///
    /// The `v` flag is a superset of `u` as far as escapes are concerned.
    pub fn is_unicode_mode(&self) -> bool {
        self.unicode || self.unicode_sets
    }
}

impl FromStr for Flags {
    type Err = Error;

    /// Parses the flag letters that follow the closing `/` of a
    /// regular expression literal, e.g. `"gu"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Flags::default();

        for (index, c) in s.char_indices() {
            let flag = match c {
                'd' => &mut flags.has_indices,
                'g' => &mut flags.global,
                'i' => &mut flags.ignore_case,
                'm' => &mut flags.multiline,
                's' => &mut flags.dot_all,
                'u' => &mut flags.unicode,
                'v' => &mut flags.unicode_sets,
                'y' => &mut flags.sticky,
                _ => {
                    return Err(Error::MessageWithLocation(
                        format!("Unknown flag '{}'.", c),
                        Span::from_position_and_length(index, c.len_utf8()),
                    ));
                }
            };

            if *flag {
                return Err(Error::MessageWithLocation(
                    format!("Duplicate flag '{}'.", c),
                    Span::from_position_and_length(index, 1),
                ));
            }

            *flag = true;
        }

        if flags.unicode && flags.unicode_sets {
            return Err(Error::Message(
                "Flags 'u' and 'v' cannot be used together.".to_owned(),
            ));
        }

        Ok(flags)
    }
}

impl Display for Flags {
    // in the canonical order of `RegExp.prototype.flags`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letters = [
            (self.has_indices, 'd'),
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.unicode_sets, 'v'),
            (self.sticky, 'y'),
        ];

        let s: String = letters
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, c)| *c)
            .collect();
        f.write_str(&s)
    }
}
