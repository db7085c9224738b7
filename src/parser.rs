// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::{
    ast::{
        Assertion, AssertionKind, BodyBuilder, CharacterRange, CharacterSet, CountMax, Group,
        GroupKind, GroupName, Invalid, InvalidReason, Literal, Number, QuantifiedSymbol,
        Quantifier, QuantifierKind, RangeUnit, Regex, RepeatableSymbol, SetItem, Term,
    },
    cursor::Cursor,
    error::Error,
    escape::{recognize_escape, Escape, EscapeContext},
    flags::Flags,
    lookahead::{
        is_line_terminator, is_named_capturing_prefix, scan_character_set,
        scan_count_quantifier, scan_group_name, CharacterSetScan,
    },
    span::Span,
};

/// Parses the pattern text of a regular expression literal, i.e. the
/// text between the two slashes.
///
/// Parsing never fails: malformed text is kept in the tree as invalid
/// nodes, and the leaves of the tree always cover the whole text.
pub fn parse(text: &str, flags: Flags) -> Regex {
    let mut parser = Parser::new(text, flags);
    parser.parse_regex()
}

/// Parses a pattern text without any flags.
pub fn parse_from_str(text: &str) -> Regex {
    parse(text, Flags::default())
}

/// Parses a pattern given as bytes, which must be valid UTF-8.
pub fn parse_bytes(bytes: &[u8], flags: Flags) -> Result<Regex, Error> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(parse(text, flags)),
        Err(e) => {
            let position = e.valid_up_to();
            let length = e.error_len().unwrap_or(bytes.len() - position);
            Err(Error::MessageWithLocation(
                "Invalid UTF-8 sequence.".to_owned(),
                Span::from_position_and_length(position, length),
            ))
        }
    }
}

enum SetAtom {
    Unit(RangeUnit),
    Other(SetItem), // a class escape or an invalid escape, which cannot bound a range
}

// a group whose closing parenthesis has not been reached yet
struct OpenGroup {
    kind: GroupKind,
    open: Span,
    body: BodyBuilder,
}

impl OpenGroup {
    fn finish(self, close: Option<Span>, end: usize) -> Group {
        let body_end = close.map_or(end, |close| close.start);
        Group {
            kind: self.kind,
            open: self.open,
            body: self.body.finish(body_end),
            close,
            span: Span::new(self.open.start, end),
        }
    }
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    flags: Flags,

    // a '[' before this position is known to have no closing ']',
    // it saves rescanning the same text for every '[' in it.
    unclosed_set_horizon: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, flags: Flags) -> Self {
        Self {
            cursor: Cursor::new(text),
            flags,
            unclosed_set_horizon: 0,
        }
    }

    fn invalid(&self, start: usize, reason: InvalidReason) -> Invalid {
        Invalid {
            text: self.cursor.text_from(start).to_owned(),
            reason,
            span: self.cursor.span_from(start),
        }
    }
}

impl Parser<'_> {
    fn parse_regex(&mut self) -> Regex {
        // body = pattern ("|" pattern)*
        // group = "(" header body ")"?
        //
        // the open groups are kept in a stack instead of the call stack,
        // so the nesting depth is limited by memory only. a ')' closes
        // the innermost open group, a ')' without any open group is
        // an invalid term.

        let mut root = BodyBuilder::new(0);
        let mut groups: Vec<OpenGroup> = vec![];

        while let Some(current_char) = self.cursor.peek_char(0) {
            match current_char {
                '|' => {
                    let start = self.cursor.position();
                    self.cursor.next_char(); // consume '|'
                    let delimiter = self.cursor.span_from(start);
                    current_body(&mut root, &mut groups).add_delimiter(delimiter);
                }
                '(' => {
                    let group = self.open_group();
                    groups.push(group);
                }
                ')' if !groups.is_empty() => {
                    let close_start = self.cursor.position();
                    self.cursor.next_char(); // consume ')'
                    let close = self.cursor.span_from(close_start);

                    if let Some(open_group) = groups.pop() {
                        let group = open_group.finish(Some(close), close.end);
                        let quantifier = self.parse_quantifier();
                        let has_quantifier = quantifier.is_some();

                        let body = current_body(&mut root, &mut groups);
                        body.push_group(group, quantifier);
                        if has_quantifier {
                            self.parse_redundant_quantifiers(&mut body.terms);
                        }
                    }
                }
                _ => {
                    let body = current_body(&mut root, &mut groups);
                    self.parse_term(&mut body.terms);
                }
            }
        }

        // the groups still open at the end of text are unclosed
        let end = self.cursor.position();
        while let Some(open_group) = groups.pop() {
            let group = open_group.finish(None, end);
            current_body(&mut root, &mut groups).push_group(group, None);
        }

        let body = root.finish(end);

        Regex {
            span: body.span(),
            body,
            flags: self.flags,
        }
    }

    fn open_group(&mut self) -> OpenGroup {
        // "(" header
        //  ^       ^__// to here
        //  |__________// current char, validated

        let start = self.cursor.position();
        self.cursor.next_char(); // consume '('
        let kind = self.parse_group_header();
        let open = self.cursor.span_from(start);

        OpenGroup {
            kind,
            open,
            body: BodyBuilder::new(open.end),
        }
    }

    /// Parses a symbol and its quantifier, or an assertion, or an
    /// invalid fragment.
    ///
    /// The redundant quantifiers following a quantifier are pushed
    /// as invalid terms after the quantified symbol.
    fn parse_term(&mut self, terms: &mut Vec<Term>) {
        let start = self.cursor.position();

        let Some(current_char) = self.cursor.peek_char(0) else {
            return;
        };

        let symbol = match current_char {
            '^' | '$' => {
                self.cursor.next_char();
                let kind = if current_char == '^' {
                    AssertionKind::Start
                } else {
                    AssertionKind::End
                };
                terms.push(Term::Assertion(Assertion {
                    kind,
                    span: self.cursor.span_from(start),
                }));
                return;
            }
            '\\' => match recognize_escape(&mut self.cursor, &self.flags, EscapeContext::Pattern)
            {
                Escape::Assertion(assertion) => {
                    terms.push(Term::Assertion(assertion));
                    return;
                }
                Escape::Backreference(backreference) => {
                    RepeatableSymbol::Backreference(backreference)
                }
                Escape::ClassEscape(class_escape) => RepeatableSymbol::ClassEscape(class_escape),
                Escape::CharacterEscape(character_escape) => {
                    RepeatableSymbol::CharacterEscape(character_escape)
                }
            },
            '[' => match self.parse_character_set() {
                Some(character_set) => RepeatableSymbol::CharacterSet(character_set),
                None => {
                    self.cursor.next_char(); // consume '['
                    RepeatableSymbol::Invalid(
                        self.invalid(start, InvalidReason::UnmatchedDelimiter),
                    )
                }
            },
            ')' | ']' => {
                // a ')' reaches here only when no group is open.
                // a stray delimiter takes a quantifier like any other symbol.
                self.cursor.next_char();
                RepeatableSymbol::Invalid(self.invalid(start, InvalidReason::UnmatchedDelimiter))
            }
            '?' | '*' | '+' | '{' => {
                // nothing to repeat, or a '{' that does not start a well-formed
                // count quantifier
                self.cursor.next_char();
                terms.push(Term::Invalid(
                    self.invalid(start, InvalidReason::BareQuantifierCharacter),
                ));
                return;
            }
            '.' => {
                self.cursor.next_char(); // consume '.'
                RepeatableSymbol::AnyCharacter(self.cursor.span_from(start))
            }
            _ if is_line_terminator(current_char) => {
                self.cursor.next_char();
                terms.push(Term::Invalid(
                    self.invalid(start, InvalidReason::LineTerminator),
                ));
                return;
            }
            _ => {
                // including '}' and '/'
                self.cursor.next_char();
                RepeatableSymbol::Literal(Literal {
                    value: current_char,
                    span: self.cursor.span_from(start),
                })
            }
        };

        let quantifier = self.parse_quantifier();
        let has_quantifier = quantifier.is_some();

        terms.push(Term::QuantifiedSymbol(QuantifiedSymbol {
            symbol,
            quantifier,
            span: self.cursor.span_from(start),
        }));

        if has_quantifier {
            self.parse_redundant_quantifiers(terms);
        }
    }

    fn parse_quantifier(&mut self) -> Option<Quantifier> {
        // quantifier "?"?

        let start = self.cursor.position();

        let kind = match self.cursor.peek_char(0)? {
            '?' => {
                self.cursor.next_char(); // consume '?'
                QuantifierKind::Optional
            }
            '*' => {
                self.cursor.next_char(); // consume '*'
                QuantifierKind::ZeroOrMore
            }
            '+' => {
                self.cursor.next_char(); // consume '+'
                QuantifierKind::OneOrMore
            }
            '{' => {
                let length = scan_count_quantifier(self.cursor.rest())?;
                let kind = count_quantifier_kind(&self.cursor.rest()[..length]);
                self.cursor.advance(length);
                kind
            }
            _ => {
                return None;
            }
        };

        let lazy = self.cursor.eat_char('?');

        Some(Quantifier {
            kind,
            lazy,
            span: self.cursor.span_from(start),
        })
    }

    fn parse_redundant_quantifiers(&mut self, terms: &mut Vec<Term>) {
        // e.g. "a+*", "a{2}{3}", "a??+"
        //
        // the first quantifier (and its lazy mark) binds to the symbol,
        // every following quantifier-like char or count is flagged
        // on its own.

        loop {
            let start = self.cursor.position();

            match self.cursor.peek_char(0) {
                Some('?' | '*' | '+') => {
                    self.cursor.next_char();
                }
                Some('{') => match scan_count_quantifier(self.cursor.rest()) {
                    Some(length) => self.cursor.advance(length),
                    None => break,
                },
                _ => break,
            }

            terms.push(Term::Invalid(
                self.invalid(start, InvalidReason::RedundantQuantifier),
            ));
        }
    }

    fn parse_group_header(&mut self) -> GroupKind {
        // "(" ("?" header_tail)?
        //      ^__// current char

        if !self.cursor.peek_char_and_equals(0, '?') {
            return GroupKind::AnonymousCapturing;
        }

        let rest = self.cursor.rest();

        // the longest recognized header wins, e.g. "(?<=" over "(?<name>"
        let (kind, length) = if rest.starts_with("?<=") {
            (GroupKind::Lookbehind, 3)
        } else if rest.starts_with("?<!") {
            (GroupKind::NegativeLookbehind, 3)
        } else if rest.starts_with("?=") {
            (GroupKind::Lookahead, 2)
        } else if rest.starts_with("?!") {
            (GroupKind::NegativeLookahead, 2)
        } else if rest.starts_with("?:") {
            (GroupKind::NonCapturing, 2)
        } else if is_named_capturing_prefix(rest, &self.flags) {
            // "?<name>"
            match scan_group_name(&rest[1..], &self.flags) {
                Some(name_length) => {
                    let name_start = self.cursor.position() + 2;
                    let name_span = Span::new(name_start, name_start + name_length - 2);
                    let name = GroupName {
                        raw: self.cursor.text(name_span).to_owned(),
                        span: name_span,
                    };
                    (GroupKind::NamedCapturing(name), 1 + name_length)
                }
                None => (GroupKind::Invalid, 1),
            }
        } else {
            // e.g. "(?a", "(?<a-b>", or a "(?" at the end of text
            (GroupKind::Invalid, 1)
        };

        self.cursor.advance(length);
        kind
    }

    /// Parses a character set, or returns `None` without consuming
    /// anything when the '[' has no closing ']'.
    fn parse_character_set(&mut self) -> Option<CharacterSet> {
        // "[" "^"? items "]"
        //  ^              ^__// to here
        //  |_________________// current char, validated

        let start = self.cursor.position();

        if start < self.unclosed_set_horizon {
            return None;
        }

        if let CharacterSetScan::Unclosed(stop_offset) = scan_character_set(self.cursor.rest()) {
            self.unclosed_set_horizon = start + stop_offset;
            return None;
        }

        self.cursor.next_char(); // consume '['
        let negated = self.cursor.eat_char('^');
        let open = self.cursor.span_from(start);

        let items = self.parse_set_items();

        let close_start = self.cursor.position();
        let found_close = self.cursor.eat_char(']');
        debug_assert!(found_close, "a scanned character set is closed");
        let close = self.cursor.span_from(close_start);

        Some(CharacterSet {
            negated,
            open,
            items,
            close,
            span: self.cursor.span_from(start),
        })
    }

    fn parse_set_items(&mut self) -> Vec<SetItem> {
        // ranges are formed greedily from left to right, e.g.
        // "a-b-c" is the range 'a'..'b', a literal '-' and a literal 'c'.

        let mut items = vec![];

        while let Some(current_char) = self.cursor.peek_char(0) {
            if current_char == ']' {
                break;
            }

            let low = match self.parse_set_atom() {
                SetAtom::Unit(unit) => unit,
                SetAtom::Other(item) => {
                    items.push(item);
                    continue;
                }
            };

            // a '-' before ']' is a literal
            if !self.cursor.peek_char_and_equals(0, '-')
                || matches!(self.cursor.peek_char(1), None | Some(']'))
            {
                items.push(low.into());
                continue;
            }

            let dash_start = self.cursor.position();
            self.cursor.next_char(); // consume '-'
            let dash = self.cursor.span_from(dash_start);

            match self.parse_set_atom() {
                SetAtom::Unit(high) => {
                    let span = Span::from_span_pair(&low.span(), &high.span());
                    items.push(SetItem::Range(CharacterRange {
                        low,
                        dash,
                        high,
                        span,
                    }));
                }
                SetAtom::Other(item) => {
                    // e.g. "a-\d"
                    items.push(low.into());
                    items.push(SetItem::Literal(Literal {
                        value: '-',
                        span: dash,
                    }));
                    items.push(item);
                }
            }
        }

        items
    }

    fn parse_set_atom(&mut self) -> SetAtom {
        let start = self.cursor.position();

        match self.cursor.peek_char(0) {
            Some('\\') => {
                match recognize_escape(&mut self.cursor, &self.flags, EscapeContext::CharacterSet)
                {
                    Escape::CharacterEscape(character_escape) if !character_escape.is_invalid() => {
                        SetAtom::Unit(RangeUnit::CharacterEscape(character_escape))
                    }
                    Escape::CharacterEscape(character_escape) => {
                        SetAtom::Other(SetItem::CharacterEscape(character_escape))
                    }
                    Escape::ClassEscape(class_escape) => {
                        SetAtom::Other(SetItem::ClassEscape(class_escape))
                    }
                    Escape::Assertion(_) | Escape::Backreference(_) => {
                        unreachable!("no assertion or back reference in a character set")
                    }
                }
            }
            Some(c) => {
                self.cursor.next_char();
                SetAtom::Unit(RangeUnit::Literal(Literal {
                    value: c,
                    span: self.cursor.span_from(start),
                }))
            }
            None => unreachable!("a scanned character set is closed"),
        }
    }
}

impl From<RangeUnit> for SetItem {
    fn from(unit: RangeUnit) -> Self {
        match unit {
            RangeUnit::Literal(literal) => SetItem::Literal(literal),
            RangeUnit::CharacterEscape(character_escape) => {
                SetItem::CharacterEscape(character_escape)
            }
        }
    }
}

fn current_body<'b>(root: &'b mut BodyBuilder, groups: &'b mut [OpenGroup]) -> &'b mut BodyBuilder {
    match groups.last_mut() {
        Some(group) => &mut group.body,
        None => root,
    }
}

fn count_quantifier_kind(text: &str) -> QuantifierKind {
    // "{m}", "{m,}" or "{m,n}", validated by `scan_count_quantifier`
    let body = &text[1..text.len() - 1];

    let number = |digits: &str| Number {
        digits: digits.to_owned(),
    };

    match body.split_once(',') {
        None => QuantifierKind::Count {
            min: number(body),
            max: CountMax::Exact,
        },
        Some((min, "")) => QuantifierKind::Count {
            min: number(min),
            max: CountMax::Unbounded,
        },
        Some((min, max)) => QuantifierKind::Count {
            min: number(min),
            max: CountMax::Bounded(number(max)),
        },
    }
}
