// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! Forward-scanning predicates.
//!
//! Each function looks at the text starting at an opening delimiter
//! and never consumes anything. The `scan_*` functions return the
//! byte length of the whole construct (delimiters included), which
//! is exactly what the parser consumes when it builds the node, and
//! the `is_*` predicates are defined on top of them.
//!
//! Every scan stops at its own closing delimiter or at the first
//! character that cannot belong to the construct.

use crate::flags::Flags;

pub const MAX_CODEPOINT: u32 = 0x10ffff;
pub const CODEPOINT_MAX_DIGITS: usize = 6;

pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// `^ $ \ . * + ? ( ) [ ] { } | /`
pub fn is_syntax_character(c: char) -> bool {
    matches!(
        c,
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/'
    )
}

pub fn is_group_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'$' || b == b'_'
}

pub fn is_property_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// The byte length of the leading run of bytes matching `predicate`.
fn leading_run(text: &[u8], predicate: impl Fn(u8) -> bool) -> usize {
    text.iter().take_while(|b| predicate(**b)).count()
}

/// Whether `text` starts with exactly `count` hex digits.
///
/// Extra digits after them are not part of the escape.
pub fn has_hex_digits(text: &str, count: usize) -> bool {
    text.len() >= count && text.as_bytes()[..count].iter().all(u8::is_ascii_hexdigit)
}

/// `{` digit+ (`,` digit*)? `}`
pub fn scan_count_quantifier(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }

    let min_length = leading_run(&bytes[1..], |b| b.is_ascii_digit());
    if min_length == 0 {
        // `{}` and `{,n}`
        return None;
    }

    let mut index = 1 + min_length;
    if bytes.get(index) == Some(&b',') {
        index += 1;
        index += leading_run(&bytes[index..], |b| b.is_ascii_digit());
    }

    if bytes.get(index) == Some(&b'}') {
        Some(index + 1)
    } else {
        None
    }
}

pub fn is_count_quantifier_body(text: &str) -> bool {
    scan_count_quantifier(text).is_some()
}

/// `{` 1 to 6 hex digits `}` with a value up to U+10FFFF, Unicode mode only.
pub fn scan_unicode_codepoint(text: &str, flags: &Flags) -> Option<usize> {
    if !flags.is_unicode_mode() {
        return None;
    }

    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }

    let digits_length = leading_run(&bytes[1..], |b| b.is_ascii_hexdigit());
    if digits_length == 0 || digits_length > CODEPOINT_MAX_DIGITS {
        return None;
    }

    if bytes.get(1 + digits_length) != Some(&b'}') {
        return None;
    }

    let digits = &text[1..1 + digits_length];
    match u32::from_str_radix(digits, 16) {
        Ok(codepoint) if codepoint <= MAX_CODEPOINT => Some(digits_length + 2),
        _ => None,
    }
}

pub fn is_unicode_codepoint_body(text: &str, flags: &Flags) -> bool {
    scan_unicode_codepoint(text, flags).is_some()
}

/// `<` (name char | `\uHHHH` | `\u{H...}`)+ `>`
///
/// The `\u{...}` form is only accepted in Unicode mode.
pub fn scan_group_name(text: &str, flags: &Flags) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }

    let mut index = 1;
    loop {
        match bytes.get(index) {
            Some(b'>') if index > 1 => return Some(index + 1),
            Some(b) if is_group_name_char(*b) => index += 1,
            Some(b'\\') if bytes.get(index + 1) == Some(&b'u') => {
                let body = &text[index + 2..];
                if has_hex_digits(body, 4) {
                    index += 6;
                } else if let Some(length) = scan_unicode_codepoint(body, flags) {
                    index += 2 + length;
                } else {
                    return None;
                }
            }
            _ => return None, // `<>`, invalid char or EOF
        }
    }
}

pub fn is_group_name(text: &str, flags: &Flags) -> bool {
    scan_group_name(text, flags).is_some()
}

/// `?<name>`, but neither `?<=` nor `?<!`.
pub fn is_named_capturing_prefix(text: &str, flags: &Flags) -> bool {
    let bytes = text.as_bytes();
    bytes.starts_with(b"?<")
        && !matches!(bytes.get(2), Some(b'=' | b'!'))
        && is_group_name(&text[1..], flags)
}

/// `{` identifier (`=` identifier)? `}`
pub fn scan_unicode_property(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }

    let name_length = leading_run(&bytes[1..], is_property_char);
    if name_length == 0 {
        return None;
    }

    let mut index = 1 + name_length;
    if bytes.get(index) == Some(&b'=') {
        index += 1;
        let value_length = leading_run(&bytes[index..], is_property_char);
        if value_length == 0 {
            return None;
        }
        index += value_length;
    }

    if bytes.get(index) == Some(&b'}') {
        Some(index + 1)
    } else {
        None
    }
}

pub fn is_unicode_property_body(text: &str) -> bool {
    scan_unicode_property(text).is_some()
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CharacterSetScan {
    /// The byte length of the set, brackets included.
    Closed(usize),

    /// No closing bracket, the offset where the scan stopped
    /// (end of text or an unescaped line terminator).
    Unclosed(usize),
}

/// Looks for the `]` closing the set that starts at `text`.
///
/// The char after every `\` is skipped, escapes never contain
/// a `]` beyond their first char.
pub fn scan_character_set(text: &str) -> CharacterSetScan {
    let mut chars = text.char_indices().skip(1); // skip '['

    while let Some((index, c)) = chars.next() {
        match c {
            ']' => return CharacterSetScan::Closed(index + 1),
            '\\' => {
                if chars.next().is_none() {
                    return CharacterSetScan::Unclosed(text.len());
                }
            }
            _ if is_line_terminator(c) => return CharacterSetScan::Unclosed(index),
            _ => {}
        }
    }

    CharacterSetScan::Unclosed(text.len())
}
