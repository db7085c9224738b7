// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Escape sequences:
//
// Character escapes:
//
// - \0        Null character (not followed by a digit)
// - \f \n \r \t \v
//             Form feed, line feed, carriage return, tabs
// - \b        Backspace, in a character set only
// - \cX       Control character, X is an ASCII letter
// - \xHH      Two hex digits
// - \uHHHH    Four hex digits
// - \u{H...}  Code point, 1 to 6 hex digits, Unicode mode only
// - \^ \$ \\ \. \* \+ \? \( \) \[ \] \{ \} \| \/
//             Identity escapes of the syntax characters, plus \- in a character set
//
// Character class escapes:
//
// - \d \D \s \S \w \W
// - \p{Name} \p{Name=Value} \P{Name} \P{Name=Value}
//             Unicode mode only
//
// Outside of character sets also:
//
// - \b \B     Word boundary assertions
// - \1 \2 ... Backreference by group number
// - \k<name>  Backreference by group name
//
// An escape with a malformed body becomes an invalid escape that
// covers only the backslash and the escape letter, the text after
// them is parsed as ordinary pattern text.

use crate::{
    ast::{
        Assertion, AssertionKind, Backreference, BackreferenceKind, CharacterEscape,
        CharacterEscapeKind, ClassEscape, ClassEscapeKind, GroupName, Number, UnicodeProperty,
    },
    cursor::Cursor,
    flags::Flags,
    lookahead::{
        has_hex_digits, is_line_terminator, is_syntax_character, scan_group_name,
        scan_unicode_codepoint, scan_unicode_property,
    },
    span::Span,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EscapeContext {
    Pattern,
    CharacterSet,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Escape {
    Assertion(Assertion),
    Backreference(Backreference),
    ClassEscape(ClassEscape),
    CharacterEscape(CharacterEscape),
}

/// Recognizes the escape sequence starting at the cursor.
///
/// The cursor must be at a `\`. At least the backslash is consumed,
/// and the whole escape when it is well-formed.
pub fn recognize_escape(cursor: &mut Cursor, flags: &Flags, context: EscapeContext) -> Escape {
    // \xxxx?  //
    // ^    ^__// to here
    // |_______// current char, validated

    let start = cursor.position();
    cursor.next_char(); // consume '\'

    let Some(current_char) = cursor.peek_char(0) else {
        // `\` | EOF
        return character_escape(cursor, start, CharacterEscapeKind::InvalidIdentity(None));
    };

    match current_char {
        'b' if context == EscapeContext::Pattern => {
            cursor.next_char(); // consume 'b'
            assertion(cursor, start, AssertionKind::WordBoundary)
        }
        'B' if context == EscapeContext::Pattern => {
            cursor.next_char(); // consume 'B'
            assertion(cursor, start, AssertionKind::NonWordBoundary)
        }
        'd' | 'D' | 's' | 'S' | 'w' | 'W' => {
            cursor.next_char();
            let kind = match current_char {
                'd' => ClassEscapeKind::Digit,
                'D' => ClassEscapeKind::NotDigit,
                's' => ClassEscapeKind::Space,
                'S' => ClassEscapeKind::NotSpace,
                'w' => ClassEscapeKind::Word,
                _ => ClassEscapeKind::NotWord,
            };
            class_escape(cursor, start, kind)
        }
        'p' | 'P' if flags.is_unicode_mode() => {
            cursor.next_char(); // consume 'p' or 'P'
            let kind = recognize_unicode_property(cursor, current_char == 'P');
            class_escape(cursor, start, kind)
        }
        'f' | 'n' | 'r' | 't' | 'v' | 'b' => {
            // '\b' reaches here in a character set only
            cursor.next_char();
            character_escape(cursor, start, CharacterEscapeKind::Special(current_char))
        }
        'c' => {
            // control letter, e.g. '\cJ'
            cursor.next_char(); // consume 'c'
            let kind = match cursor.peek_char(0) {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    cursor.next_char(); // consume letter
                    CharacterEscapeKind::ControlLetter(letter)
                }
                _ => CharacterEscapeKind::InvalidControlLetter,
            };
            character_escape(cursor, start, kind)
        }
        'x' => {
            // e.g. '\x2d'
            cursor.next_char(); // consume 'x'
            let kind = if has_hex_digits(cursor.rest(), 2) {
                let digits = cursor.rest()[..2].to_owned();
                cursor.advance(2);
                CharacterEscapeKind::Hex(digits)
            } else {
                CharacterEscapeKind::InvalidHex
            };
            character_escape(cursor, start, kind)
        }
        'u' => {
            // e.g. '\u002d', or '\u{2d}' in Unicode mode
            cursor.next_char(); // consume 'u'
            let kind = recognize_unicode_escape(cursor, flags);
            character_escape(cursor, start, kind)
        }
        '0' => {
            cursor.next_char(); // consume '0'
            let kind = if matches!(cursor.peek_char(0), Some('0'..='9')) {
                CharacterEscapeKind::InvalidNull
            } else {
                CharacterEscapeKind::Null
            };
            character_escape(cursor, start, kind)
        }
        '1'..='9' if context == EscapeContext::Pattern => {
            // back reference by index
            let digits_start = cursor.position();
            while matches!(cursor.peek_char(0), Some('0'..='9')) {
                cursor.next_char(); // consume digit
            }
            let number = Number {
                digits: cursor.text_from(digits_start).to_owned(),
            };
            backreference(cursor, start, BackreferenceKind::Numeric(number))
        }
        'k' if context == EscapeContext::Pattern => {
            // back reference by name
            cursor.next_char(); // consume 'k'
            let kind = match scan_group_name(cursor.rest(), flags) {
                Some(length) => {
                    let name_start = cursor.position() + 1;
                    cursor.advance(length);
                    let name_span = Span::new(name_start, cursor.position() - 1);
                    BackreferenceKind::Named(GroupName {
                        raw: cursor.text(name_span).to_owned(),
                        span: name_span,
                    })
                }
                None => BackreferenceKind::InvalidNamed,
            };
            backreference(cursor, start, kind)
        }
        _ => {
            cursor.next_char(); // consume the escaped char
            let kind = if is_identity_escape(current_char, flags, context) {
                CharacterEscapeKind::Identity(current_char)
            } else {
                CharacterEscapeKind::InvalidIdentity(Some(current_char))
            };
            character_escape(cursor, start, kind)
        }
    }
}

/// In Unicode mode only the syntax characters (and `-` in a character
/// set) can be escaped. Otherwise any char except ASCII letters, digits
/// and line terminators is accepted too, letters and digits are kept
/// for the escapes above.
pub fn is_identity_escape(c: char, flags: &Flags, context: EscapeContext) -> bool {
    if is_syntax_character(c) || (context == EscapeContext::CharacterSet && c == '-') {
        return true;
    }

    !flags.is_unicode_mode() && !c.is_ascii_alphanumeric() && !is_line_terminator(c)
}

fn recognize_unicode_escape(cursor: &mut Cursor, flags: &Flags) -> CharacterEscapeKind {
    // \uHHHH?  //
    //   ^   ^__// to here
    //   |______// current char

    if has_hex_digits(cursor.rest(), 4) {
        let digits = cursor.rest()[..4].to_owned();
        cursor.advance(4);
        return CharacterEscapeKind::Unicode(digits);
    }

    match scan_unicode_codepoint(cursor.rest(), flags) {
        Some(length) => {
            let digits = cursor.rest()[1..length - 1].to_owned();
            cursor.advance(length);
            CharacterEscapeKind::UnicodeCodepoint(digits)
        }
        None => CharacterEscapeKind::InvalidUnicode,
    }
}

fn recognize_unicode_property(cursor: &mut Cursor, negated: bool) -> ClassEscapeKind {
    // \p{Name=Value}?  //
    //   ^           ^__// to here
    //   |______________// current char

    let Some(length) = scan_unicode_property(cursor.rest()) else {
        return ClassEscapeKind::InvalidProperty { negated };
    };

    let body = &cursor.rest()[1..length - 1];
    let property = match body.split_once('=') {
        Some((name, value)) => UnicodeProperty {
            negated,
            name: name.to_owned(),
            value: Some(value.to_owned()),
        },
        None => UnicodeProperty {
            negated,
            name: body.to_owned(),
            value: None,
        },
    };

    cursor.advance(length);
    ClassEscapeKind::Property(property)
}

fn assertion(cursor: &Cursor, start: usize, kind: AssertionKind) -> Escape {
    Escape::Assertion(Assertion {
        kind,
        span: cursor.span_from(start),
    })
}

fn backreference(cursor: &Cursor, start: usize, kind: BackreferenceKind) -> Escape {
    Escape::Backreference(Backreference {
        kind,
        span: cursor.span_from(start),
    })
}

fn class_escape(cursor: &Cursor, start: usize, kind: ClassEscapeKind) -> Escape {
    Escape::ClassEscape(ClassEscape {
        kind,
        span: cursor.span_from(start),
    })
}

fn character_escape(cursor: &Cursor, start: usize, kind: CharacterEscapeKind) -> Escape {
    Escape::CharacterEscape(CharacterEscape {
        kind,
        span: cursor.span_from(start),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ast::{
            Assertion, AssertionKind, Backreference, BackreferenceKind, CharacterEscape,
            CharacterEscapeKind, ClassEscape, ClassEscapeKind, GroupName, Number,
            UnicodeProperty,
        },
        cursor::Cursor,
        flags::Flags,
        span::Span,
    };

    use super::{recognize_escape, Escape, EscapeContext};

    /// Recognizes the escape at the start of `s` and returns it along
    /// with the number of bytes consumed.
    fn recognize(s: &str, flags: Flags, context: EscapeContext) -> (Escape, usize) {
        let mut cursor = Cursor::new(s);
        let escape = recognize_escape(&mut cursor, &flags, context);
        (escape, cursor.position())
    }

    fn recognize_in_pattern(s: &str) -> (Escape, usize) {
        recognize(s, Flags::default(), EscapeContext::Pattern)
    }

    fn character_escape_kind(escape: Escape) -> CharacterEscapeKind {
        match escape {
            Escape::CharacterEscape(CharacterEscape { kind, .. }) => kind,
            _ => panic!("expect a character escape, found: {:?}", escape),
        }
    }

    #[test]
    fn test_special_and_control_escapes() {
        for letter in ['f', 'n', 'r', 't', 'v'] {
            let s = format!("\\{}", letter);
            let (escape, consumed) = recognize_in_pattern(&s);
            assert_eq!(
                escape,
                Escape::CharacterEscape(CharacterEscape {
                    kind: CharacterEscapeKind::Special(letter),
                    span: Span::new(0, 2),
                })
            );
            assert_eq!(consumed, 2);
        }

        let (escape, consumed) = recognize_in_pattern(r#"\cJx"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::ControlLetter('J')
        );
        assert_eq!(consumed, 3);

        // err: not a letter
        let (escape, consumed) = recognize_in_pattern(r#"\c1"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidControlLetter
        );
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        let (escape, consumed) = recognize_in_pattern(r#"\x4aB"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::Hex("4a".to_owned())
        );
        assert_eq!(consumed, 4);

        let (escape, consumed) = recognize_in_pattern(r#"\x4"#);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::InvalidHex);
        assert_eq!(consumed, 2);

        let (escape, consumed) = recognize_in_pattern(r#"\u65870"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::Unicode("6587".to_owned())
        );
        assert_eq!(consumed, 6);

        let (escape, consumed) = recognize_in_pattern(r#"\u658"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidUnicode
        );
        assert_eq!(consumed, 2);

        // code point escapes are not recognized without the Unicode mode
        let (escape, consumed) = recognize_in_pattern(r#"\u{1F600}"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidUnicode
        );
        assert_eq!(consumed, 2);

        let (escape, consumed) =
            recognize(r#"\u{1F600}"#, Flags::unicode(), EscapeContext::Pattern);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::UnicodeCodepoint("1F600".to_owned())
        );
        assert_eq!(consumed, 9);

        // err: out of range
        let (escape, consumed) =
            recognize(r#"\u{110000}"#, Flags::unicode(), EscapeContext::Pattern);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidUnicode
        );
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_null_escape() {
        let (escape, consumed) = recognize_in_pattern(r#"\0a"#);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::Null);
        assert_eq!(consumed, 2);

        let (escape, consumed) = recognize_in_pattern(r#"\0"#);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::Null);
        assert_eq!(consumed, 2);

        // err: followed by a digit
        let (escape, consumed) = recognize_in_pattern(r#"\01"#);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::InvalidNull);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_identity_escapes() {
        for c in r#"^$\.*+?()[]{}|/"#.chars() {
            let s = format!("\\{}", c);
            let (escape, _) = recognize(&s, Flags::unicode(), EscapeContext::Pattern);
            assert_eq!(character_escape_kind(escape), CharacterEscapeKind::Identity(c));
        }

        // '-' only in a character set in Unicode mode
        let (escape, _) = recognize(r#"\-"#, Flags::unicode(), EscapeContext::Pattern);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(Some('-'))
        );

        let (escape, _) = recognize(r#"\-"#, Flags::unicode(), EscapeContext::CharacterSet);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::Identity('-'));

        // the lenient identity escapes without the Unicode mode
        let (escape, _) = recognize_in_pattern(r#"\@"#);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::Identity('@'));

        let (escape, consumed) = recognize_in_pattern(r#"\文"#);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::Identity('文'));
        assert_eq!(consumed, 4);

        let (escape, _) = recognize(r#"\@"#, Flags::unicode(), EscapeContext::Pattern);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(Some('@'))
        );

        // err: letters are never identity escapes
        let (escape, consumed) = recognize_in_pattern(r#"\a"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(Some('a'))
        );
        assert_eq!(consumed, 2);

        // err: a trailing backslash
        let (escape, consumed) = recognize_in_pattern(r#"\"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(None)
        );
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_assertion_escapes() {
        assert_eq!(
            recognize_in_pattern(r#"\b"#).0,
            Escape::Assertion(Assertion {
                kind: AssertionKind::WordBoundary,
                span: Span::new(0, 2),
            })
        );

        assert_eq!(
            recognize_in_pattern(r#"\B"#).0,
            Escape::Assertion(Assertion {
                kind: AssertionKind::NonWordBoundary,
                span: Span::new(0, 2),
            })
        );

        // backspace in a character set
        let (escape, _) = recognize(r#"\b"#, Flags::default(), EscapeContext::CharacterSet);
        assert_eq!(character_escape_kind(escape), CharacterEscapeKind::Special('b'));

        let (escape, _) = recognize(r#"\B"#, Flags::default(), EscapeContext::CharacterSet);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(Some('B'))
        );
    }

    #[test]
    fn test_class_escapes() {
        assert_eq!(
            recognize_in_pattern(r#"\W"#).0,
            Escape::ClassEscape(ClassEscape {
                kind: ClassEscapeKind::NotWord,
                span: Span::new(0, 2),
            })
        );

        let unicode = Flags::unicode();

        assert_eq!(
            recognize(r#"\p{Script=Greek}"#, unicode, EscapeContext::Pattern),
            (
                Escape::ClassEscape(ClassEscape {
                    kind: ClassEscapeKind::Property(UnicodeProperty {
                        negated: false,
                        name: "Script".to_owned(),
                        value: Some("Greek".to_owned()),
                    }),
                    span: Span::new(0, 16),
                }),
                16
            )
        );

        assert_eq!(
            recognize(r#"\P{L}"#, unicode, EscapeContext::CharacterSet),
            (
                Escape::ClassEscape(ClassEscape {
                    kind: ClassEscapeKind::Property(UnicodeProperty {
                        negated: true,
                        name: "L".to_owned(),
                        value: None,
                    }),
                    span: Span::new(0, 5),
                }),
                5
            )
        );

        // err: no braces
        assert_eq!(
            recognize(r#"\pL"#, unicode, EscapeContext::Pattern),
            (
                Escape::ClassEscape(ClassEscape {
                    kind: ClassEscapeKind::InvalidProperty { negated: false },
                    span: Span::new(0, 2),
                }),
                2
            )
        );

        // without the Unicode mode '\p' is an ordinary (invalid) escape
        let (escape, consumed) = recognize_in_pattern(r#"\p{L}"#);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(Some('p'))
        );
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_backreference_escapes() {
        assert_eq!(
            recognize_in_pattern(r#"\12a"#),
            (
                Escape::Backreference(Backreference {
                    kind: BackreferenceKind::Numeric(Number {
                        digits: "12".to_owned()
                    }),
                    span: Span::new(0, 3),
                }),
                3
            )
        );

        assert_eq!(
            recognize_in_pattern(r#"\k<tag>"#),
            (
                Escape::Backreference(Backreference {
                    kind: BackreferenceKind::Named(GroupName {
                        raw: "tag".to_owned(),
                        span: Span::new(3, 6),
                    }),
                    span: Span::new(0, 7),
                }),
                7
            )
        );

        // err: invalid group name
        assert_eq!(
            recognize_in_pattern(r#"\k<ta-g>"#),
            (
                Escape::Backreference(Backreference {
                    kind: BackreferenceKind::InvalidNamed,
                    span: Span::new(0, 2),
                }),
                2
            )
        );

        // digits and 'k' are not back references in a character set
        let (escape, consumed) =
            recognize(r#"\1"#, Flags::default(), EscapeContext::CharacterSet);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(Some('1'))
        );
        assert_eq!(consumed, 2);

        let (escape, _) = recognize(r#"\k<a>"#, Flags::default(), EscapeContext::CharacterSet);
        assert_eq!(
            character_escape_kind(escape),
            CharacterEscapeKind::InvalidIdentity(Some('k'))
        );
    }
}
