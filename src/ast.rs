// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! The concrete syntax tree.
//!
//! Every node records the span of the text it was built from, and
//! the spans of the children of a node are contiguous, so the leaves
//! of a tree cover the whole pattern text without gap or overlap.
//! Malformed text is kept in the tree as invalid nodes.

use std::{cmp::Ordering, fmt::Display};

use crate::{
    flags::Flags,
    span::Span,
    visit::{Step, Steps},
};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Regex {
    pub body: Body,
    pub flags: Flags,
    pub span: Span,
}

/// The content of the whole pattern or of a group.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Body {
    Disjunction(Disjunction),
    Pattern(Pattern),
}

impl Body {
    pub fn span(&self) -> Span {
        match self {
            Body::Disjunction(d) => d.span,
            Body::Pattern(p) => p.span,
        }
    }

    /// The alternatives of this body, a plain pattern is the only alternative.
    pub fn alternatives(&self) -> &[Pattern] {
        match self {
            Body::Disjunction(d) => &d.alternatives,
            Body::Pattern(p) => std::slice::from_ref(p),
        }
    }

    fn alternatives_mut(&mut self) -> &mut [Pattern] {
        match self {
            Body::Disjunction(d) => &mut d.alternatives,
            Body::Pattern(p) => std::slice::from_mut(p),
        }
    }

    /// The spans of the `|` between the alternatives.
    pub fn delimiters(&self) -> &[Span] {
        match self {
            Body::Disjunction(d) => &d.delimiters,
            Body::Pattern(_) => &[],
        }
    }
}

/// Collects the alternatives of a body from left to right.
pub(crate) struct BodyBuilder {
    alternatives: Vec<Pattern>,
    delimiters: Vec<Span>,
    pattern_start: usize,
    pub(crate) terms: Vec<Term>,
}

impl BodyBuilder {
    pub(crate) fn new(start: usize) -> Self {
        Self {
            alternatives: vec![],
            delimiters: vec![],
            pattern_start: start,
            terms: vec![],
        }
    }

    /// Ends the current alternative at the `|`.
    pub(crate) fn add_delimiter(&mut self, delimiter: Span) {
        let terms = std::mem::take(&mut self.terms);
        self.alternatives.push(Pattern {
            terms,
            span: Span::new(self.pattern_start, delimiter.start),
        });
        self.delimiters.push(delimiter);
        self.pattern_start = delimiter.end;
    }

    pub(crate) fn push_group(&mut self, group: Group, quantifier: Option<Quantifier>) {
        let end = quantifier.as_ref().map_or(group.span.end, |q| q.span.end);
        let span = Span::new(group.span.start, end);
        self.terms.push(Term::QuantifiedSymbol(QuantifiedSymbol {
            symbol: RepeatableSymbol::Group(Box::new(group)),
            quantifier,
            span,
        }));
    }

    pub(crate) fn finish(mut self, end: usize) -> Body {
        let last = Pattern {
            terms: self.terms,
            span: Span::new(self.pattern_start, end),
        };

        if self.delimiters.is_empty() {
            return Body::Pattern(last);
        }

        self.alternatives.push(last);
        let start = self.alternatives.first().map_or(end, |p| p.span.start);

        Body::Disjunction(Disjunction {
            alternatives: self.alternatives,
            delimiters: self.delimiters,
            span: Span::new(start, end),
        })
    }
}

/// Alternatives separated by `|`.
///
/// There is always one more alternative than delimiters,
/// an empty alternative is an empty pattern.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Disjunction {
    pub alternatives: Vec<Pattern>,
    pub delimiters: Vec<Span>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Pattern {
    pub terms: Vec<Term>,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Term {
    Assertion(Assertion),
    QuantifiedSymbol(QuantifiedSymbol),
    Invalid(Invalid),
}

impl Term {
    pub fn span(&self) -> Span {
        match self {
            Term::Assertion(a) => a.span,
            Term::QuantifiedSymbol(q) => q.span,
            Term::Invalid(i) => i.span,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QuantifiedSymbol {
    pub symbol: RepeatableSymbol,
    pub quantifier: Option<Quantifier>,
    pub span: Span,
}

/// The symbols that accept a quantifier.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RepeatableSymbol {
    Backreference(Backreference),
    Group(Box<Group>),
    CharacterSet(CharacterSet),
    ClassEscape(ClassEscape),
    CharacterEscape(CharacterEscape),
    AnyCharacter(Span),
    Literal(Literal),
    Invalid(Invalid), // a stray ')', '[' or ']'
}

impl RepeatableSymbol {
    pub fn span(&self) -> Span {
        match self {
            RepeatableSymbol::Backreference(b) => b.span,
            RepeatableSymbol::Group(g) => g.span,
            RepeatableSymbol::CharacterSet(s) => s.span,
            RepeatableSymbol::ClassEscape(c) => c.span,
            RepeatableSymbol::CharacterEscape(c) => c.span,
            RepeatableSymbol::AnyCharacter(span) => *span,
            RepeatableSymbol::Literal(l) => l.span,
            RepeatableSymbol::Invalid(i) => i.span,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Literal {
    pub value: char,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    pub lazy: bool,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum QuantifierKind {
    Optional,   // ?
    ZeroOrMore, // *
    OneOrMore,  // +
    Count { min: Number, max: CountMax },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CountMax {
    Exact,            // {m}
    Unbounded,        // {m,}
    Bounded(Number),  // {m,n}
}

/// An unsigned decimal number of any size, as written in the pattern.
///
/// The digits are kept verbatim (leading zeros included) so the node
/// prints back to its source text; compare values with [`Number::cmp_value`].
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Number {
    pub(crate) digits: String,
}

impl Number {
    /// Returns `None` unless `digits` is a non-empty run of ASCII digits.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            digits: digits.to_owned(),
        })
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    fn significant_digits(&self) -> &str {
        let trimmed = self.digits.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }

    /// The value, or `None` when it does not fit in an `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        self.significant_digits().parse::<u64>().ok()
    }

    pub fn cmp_value(&self, other: &Number) -> Ordering {
        let left = self.significant_digits();
        let right = other.significant_digits();
        left.len().cmp(&right.len()).then_with(|| left.cmp(right))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Backreference {
    pub kind: BackreferenceKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BackreferenceKind {
    Numeric(Number),   // \1
    Named(GroupName),  // \k<name>
    InvalidNamed,      // \k without a valid name
}

/// The name of a named capturing group or a named backreference,
/// without the angle brackets.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GroupName {
    /// The name as written, it may contain `\uHHHH` and `\u{H...}` escapes.
    pub raw: String,
    pub span: Span,
}

impl GroupName {
    /// The name with its Unicode escapes decoded.
    ///
    /// Escaped surrogate pairs are combined, a lone surrogate
    /// becomes U+FFFD.
    pub fn value(&self) -> String {
        let mut units: Vec<u16> = vec![];
        let mut chars = self.raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '\\' {
                let mut buf = [0u16; 2];
                units.extend_from_slice(c.encode_utf16(&mut buf));
                continue;
            }

            chars.next(); // consume 'u'

            let mut digits = String::new();
            if chars.peek() == Some(&'{') {
                chars.next(); // consume '{'
                for d in chars.by_ref() {
                    if d == '}' {
                        break;
                    }
                    digits.push(d);
                }

                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                let mut buf = [0u16; 2];
                units.extend_from_slice(decoded.encode_utf16(&mut buf));
            } else {
                digits.extend(chars.by_ref().take(4));
                units.push(u16::from_str_radix(&digits, 16).unwrap_or(0xfffd));
            }
        }

        String::from_utf16_lossy(&units)
    }
}

/// A group or a lookaround assertion.
///
/// Groups can nest as deep as the text allows, so cloning, comparing
/// and dropping walk the nested groups with an explicit stack.
/// The derived `Debug` still recurses.
#[derive(Debug)]
pub struct Group {
    pub kind: GroupKind,
    /// The header, e.g. `(`, `(?:` or `(?<name>`.
    pub open: Span,
    pub body: Body,
    /// `None` when the text ends before the closing parenthesis.
    pub close: Option<Span>,
    pub span: Span,
}

impl Group {
    /// The end of the body, where the closing parenthesis starts.
    pub fn body_end(&self) -> usize {
        self.close.map_or(self.span.end, |close| close.start)
    }

    fn same_header(&self, other: &Group) -> bool {
        self.kind == other.kind
            && self.open == other.open
            && self.close == other.close
            && self.span == other.span
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        if !self.same_header(other) {
            return false;
        }

        let mut left = Steps::new(&self.body);
        let mut right = Steps::new(&other.body);

        loop {
            let same = match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(Step::Pattern(a)), Some(Step::Pattern(b))) => a.span == b.span,
                (Some(Step::Delimiter(a)), Some(Step::Delimiter(b))) => a == b,
                (Some(Step::Term(a)), Some(Step::Term(b))) => a == b,
                (Some(Step::Open(a, _)), Some(Step::Open(b, _))) => a.same_header(b),
                (Some(Step::Close(_, a)), Some(Step::Close(_, b))) => a == b,
                _ => false,
            };

            if !same {
                return false;
            }
        }
    }
}

impl Eq for Group {}

impl Clone for Group {
    fn clone(&self) -> Self {
        let mut root = BodyBuilder::new(self.open.end);
        let mut builders: Vec<BodyBuilder> = vec![];

        for step in Steps::new(&self.body) {
            let current = builders.last_mut().unwrap_or(&mut root);
            match step {
                Step::Pattern(_) => {}
                Step::Delimiter(delimiter) => current.add_delimiter(delimiter),
                Step::Term(term) => current.terms.push(term.clone()),
                Step::Open(group, _) => builders.push(BodyBuilder::new(group.open.end)),
                Step::Close(group, quantifier) => {
                    let Some(builder) = builders.pop() else {
                        continue;
                    };

                    let copy = Group {
                        kind: group.kind.clone(),
                        open: group.open,
                        body: builder.finish(group.body_end()),
                        close: group.close,
                        span: group.span,
                    };
                    builders
                        .last_mut()
                        .unwrap_or(&mut root)
                        .push_group(copy, quantifier.cloned());
                }
            }
        }

        Group {
            kind: self.kind.clone(),
            open: self.open,
            body: root.finish(self.body_end()),
            close: self.close,
            span: self.span,
        }
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        // the nested groups are detached before they are dropped,
        // so no drop goes deeper than one level.
        let mut detached = vec![];
        detach_groups(&mut self.body, &mut detached);

        while let Some(mut group) = detached.pop() {
            detach_groups(&mut group.body, &mut detached);
        }
    }
}

fn detach_groups(body: &mut Body, detached: &mut Vec<Box<Group>>) {
    for pattern in body.alternatives_mut() {
        for term in pattern.terms.drain(..) {
            if let Term::QuantifiedSymbol(QuantifiedSymbol {
                symbol: RepeatableSymbol::Group(group),
                ..
            }) = term
            {
                detached.push(group);
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GroupKind {
    Lookahead,                 // (?=...)
    NegativeLookahead,         // (?!...)
    Lookbehind,                // (?<=...)
    NegativeLookbehind,        // (?<!...)
    NonCapturing,              // (?:...)
    NamedCapturing(GroupName), // (?<name>...)
    AnonymousCapturing,        // (...)
    Invalid,                   // (?...) with an unrecognized header
}

impl GroupKind {
    pub fn is_capturing(&self) -> bool {
        matches!(
            self,
            GroupKind::NamedCapturing(_) | GroupKind::AnonymousCapturing
        )
    }

    pub fn is_lookaround(&self) -> bool {
        matches!(
            self,
            GroupKind::Lookahead
                | GroupKind::NegativeLookahead
                | GroupKind::Lookbehind
                | GroupKind::NegativeLookbehind
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Assertion {
    pub kind: AssertionKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AssertionKind {
    WordBoundary,    // \b
    NonWordBoundary, // \B
    Start,           // ^
    End,             // $
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CharacterSet {
    pub negated: bool,
    /// `[` or `[^`
    pub open: Span,
    pub items: Vec<SetItem>,
    pub close: Span,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SetItem {
    Range(CharacterRange),
    ClassEscape(ClassEscape),
    CharacterEscape(CharacterEscape),
    Literal(Literal),
}

impl SetItem {
    pub fn span(&self) -> Span {
        match self {
            SetItem::Range(r) => r.span,
            SetItem::ClassEscape(c) => c.span,
            SetItem::CharacterEscape(c) => c.span,
            SetItem::Literal(l) => l.span,
        }
    }
}

/// `low-high`, the order of the bounds is not checked.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CharacterRange {
    pub low: RangeUnit,
    pub dash: Span,
    pub high: RangeUnit,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RangeUnit {
    Literal(Literal),
    CharacterEscape(CharacterEscape), // never an invalid escape
}

impl RangeUnit {
    pub fn span(&self) -> Span {
        match self {
            RangeUnit::Literal(l) => l.span,
            RangeUnit::CharacterEscape(e) => e.span,
        }
    }

    /// The character this unit stands for.
    pub fn value(&self) -> Option<char> {
        match self {
            RangeUnit::Literal(l) => Some(l.value),
            RangeUnit::CharacterEscape(e) => e.value(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ClassEscape {
    pub kind: ClassEscapeKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ClassEscapeKind {
    Digit,    // \d
    NotDigit, // \D
    Space,    // \s
    NotSpace, // \S
    Word,     // \w
    NotWord,  // \W
    Property(UnicodeProperty),
    InvalidProperty { negated: bool }, // \p or \P without a well-formed body
}

/// `\p{name}`, `\p{name=value}` and the negated `\P` forms.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UnicodeProperty {
    pub negated: bool,
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CharacterEscape {
    pub kind: CharacterEscapeKind,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CharacterEscapeKind {
    Null,                     // \0
    Special(char),            // \f \n \r \t \v, and \b in a character set
    ControlLetter(char),      // \cX
    Hex(String),              // \xHH
    Unicode(String),          // \uHHHH
    UnicodeCodepoint(String), // \u{H...}
    Identity(char),           // \$ \. etc.

    InvalidNull,                   // \0 followed by a digit
    InvalidControlLetter,          // \c
    InvalidHex,                    // \x
    InvalidUnicode,                // \u
    InvalidIdentity(Option<char>), // \a, or a trailing \
}

impl CharacterEscapeKind {
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            CharacterEscapeKind::InvalidNull
                | CharacterEscapeKind::InvalidControlLetter
                | CharacterEscapeKind::InvalidHex
                | CharacterEscapeKind::InvalidUnicode
                | CharacterEscapeKind::InvalidIdentity(_)
        )
    }
}

impl CharacterEscape {
    pub fn is_invalid(&self) -> bool {
        self.kind.is_invalid()
    }

    /// The code point this escape stands for, `None` for invalid escapes.
    ///
    /// `\uHHHH` gives the UTF-16 code unit, which may be a surrogate.
    pub fn code_point(&self) -> Option<u32> {
        let code = match &self.kind {
            CharacterEscapeKind::Null => 0,
            CharacterEscapeKind::Special(letter) => match letter {
                'b' => 0x08,
                't' => 0x09,
                'n' => 0x0a,
                'v' => 0x0b,
                'f' => 0x0c,
                'r' => 0x0d,
                _ => return None,
            },
            CharacterEscapeKind::ControlLetter(letter) => (*letter as u32) % 32,
            CharacterEscapeKind::Hex(digits)
            | CharacterEscapeKind::Unicode(digits)
            | CharacterEscapeKind::UnicodeCodepoint(digits) => {
                u32::from_str_radix(digits, 16).ok()?
            }
            CharacterEscapeKind::Identity(c) => *c as u32,
            _ => return None,
        };
        Some(code)
    }

    pub fn value(&self) -> Option<char> {
        self.code_point().and_then(char::from_u32)
    }
}

/// A fragment of text that does not form any construct.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Invalid {
    pub text: String,
    pub reason: InvalidReason,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum InvalidReason {
    UnmatchedDelimiter,
    MalformedEscape,
    MalformedBackreferenceOrGroupHeader,
    RedundantQuantifier,
    BareQuantifierCharacter,
    LineTerminator,
}

impl Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name_str = match self {
            InvalidReason::UnmatchedDelimiter => "unmatched-delimiter",
            InvalidReason::MalformedEscape => "malformed-escape",
            InvalidReason::MalformedBackreferenceOrGroupHeader => {
                "malformed-backreference-or-group-header"
            }
            InvalidReason::RedundantQuantifier => "redundant-quantifier",
            InvalidReason::BareQuantifierCharacter => "bare-quantifier-character",
            InvalidReason::LineTerminator => "line-terminator",
        };
        f.write_str(name_str)
    }
}
