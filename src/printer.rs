// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

// Two printers for the tree:
//
// - `Display` prints a node back to exactly the text it was parsed
//   from, so `parse(s, flags).to_string() == s` for every `s`.
// - `Describe` prints a node in a readable functional notation, e.g.
//   "a+|[^b-d]" is described as `one_or_more('a') || !['b'..'d']`.

//
// Both walk nested groups through `Steps`, so printing a deep tree
// does not recurse.

use std::fmt::{Display, Write};

use crate::{
    ast::{
        Assertion, AssertionKind, Backreference, BackreferenceKind, Body, CharacterEscape,
        CharacterEscapeKind, CharacterRange, CharacterSet, ClassEscape, ClassEscapeKind,
        CountMax, Disjunction, Group, GroupKind, GroupName, Invalid, InvalidReason, Literal,
        Number, Pattern, QuantifiedSymbol, Quantifier, QuantifierKind, RangeUnit, Regex,
        RepeatableSymbol, SetItem, Term,
    },
    visit::{Step, Steps},
};

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.body)
    }
}

fn write_body(f: &mut impl Write, body: &Body) -> std::fmt::Result {
    for step in Steps::new(body) {
        match step {
            Step::Pattern(_) => {}
            Step::Delimiter(_) => f.write_char('|')?,
            Step::Term(term) => write!(f, "{}", term)?,
            Step::Open(group, _) => write!(f, "{}", group.kind)?,
            Step::Close(group, quantifier) => {
                if group.close.is_some() {
                    f.write_char(')')?;
                }
                if let Some(quantifier) = quantifier {
                    write!(f, "{}", quantifier)?;
                }
            }
        }
    }
    Ok(())
}

impl Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_body(f, self)
    }
}

impl Display for Disjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, pattern) in self.alternatives.iter().enumerate() {
            if index > 0 {
                f.write_char('|')?;
            }
            write!(f, "{}", pattern)?;
        }
        Ok(())
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for term in &self.terms {
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Assertion(a) => write!(f, "{}", a),
            Term::QuantifiedSymbol(q) => write!(f, "{}", q),
            Term::Invalid(i) => write!(f, "{}", i),
        }
    }
}

impl Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self.kind {
            AssertionKind::WordBoundary => "\\b",
            AssertionKind::NonWordBoundary => "\\B",
            AssertionKind::Start => "^",
            AssertionKind::End => "$",
        };
        f.write_str(s)
    }
}

impl Display for QuantifiedSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.quantifier {
            Some(quantifier) => write!(f, "{}{}", self.symbol, quantifier),
            None => write!(f, "{}", self.symbol),
        }
    }
}

impl Display for RepeatableSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepeatableSymbol::Backreference(b) => write!(f, "{}", b),
            RepeatableSymbol::Group(g) => write!(f, "{}", g),
            RepeatableSymbol::CharacterSet(s) => write!(f, "{}", s),
            RepeatableSymbol::ClassEscape(c) => write!(f, "{}", c),
            RepeatableSymbol::CharacterEscape(c) => write!(f, "{}", c),
            RepeatableSymbol::AnyCharacter(_) => f.write_str("."),
            RepeatableSymbol::Literal(l) => write!(f, "{}", l),
            RepeatableSymbol::Invalid(i) => write!(f, "{}", i),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.digits())
    }
}

impl Display for Quantifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            QuantifierKind::Optional => f.write_str("?")?,
            QuantifierKind::ZeroOrMore => f.write_str("*")?,
            QuantifierKind::OneOrMore => f.write_str("+")?,
            QuantifierKind::Count { min, max } => match max {
                CountMax::Exact => write!(f, "{{{}}}", min)?,
                CountMax::Unbounded => write!(f, "{{{},}}", min)?,
                CountMax::Bounded(max) => write!(f, "{{{},{}}}", min, max)?,
            },
        }

        if self.lazy {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl Display for GroupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Display for Backreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            BackreferenceKind::Numeric(number) => write!(f, "\\{}", number),
            BackreferenceKind::Named(name) => write!(f, "\\k<{}>", name),
            BackreferenceKind::InvalidNamed => f.write_str("\\k"),
        }
    }
}

impl Display for GroupKind {
    // the group header
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKind::Lookahead => f.write_str("(?="),
            GroupKind::NegativeLookahead => f.write_str("(?!"),
            GroupKind::Lookbehind => f.write_str("(?<="),
            GroupKind::NegativeLookbehind => f.write_str("(?<!"),
            GroupKind::NonCapturing => f.write_str("(?:"),
            GroupKind::NamedCapturing(name) => write!(f, "(?<{}>", name),
            GroupKind::AnonymousCapturing => f.write_str("("),
            GroupKind::Invalid => f.write_str("(?"),
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        write_body(f, &self.body)?;
        if self.close.is_some() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl Display for CharacterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.negated { "[^" } else { "[" })?;
        for item in &self.items {
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}

impl Display for SetItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetItem::Range(r) => write!(f, "{}", r),
            SetItem::ClassEscape(c) => write!(f, "{}", c),
            SetItem::CharacterEscape(c) => write!(f, "{}", c),
            SetItem::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl Display for CharacterRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl Display for RangeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeUnit::Literal(l) => write!(f, "{}", l),
            RangeUnit::CharacterEscape(c) => write!(f, "{}", c),
        }
    }
}

impl Display for ClassEscape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ClassEscapeKind::Digit => f.write_str("\\d"),
            ClassEscapeKind::NotDigit => f.write_str("\\D"),
            ClassEscapeKind::Space => f.write_str("\\s"),
            ClassEscapeKind::NotSpace => f.write_str("\\S"),
            ClassEscapeKind::Word => f.write_str("\\w"),
            ClassEscapeKind::NotWord => f.write_str("\\W"),
            ClassEscapeKind::Property(property) => {
                let letter = if property.negated { 'P' } else { 'p' };
                match &property.value {
                    Some(value) => write!(f, "\\{}{{{}={}}}", letter, property.name, value),
                    None => write!(f, "\\{}{{{}}}", letter, property.name),
                }
            }
            ClassEscapeKind::InvalidProperty { negated } => {
                f.write_str(if *negated { "\\P" } else { "\\p" })
            }
        }
    }
}

impl Display for CharacterEscape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            CharacterEscapeKind::Null | CharacterEscapeKind::InvalidNull => f.write_str("\\0"),
            CharacterEscapeKind::Special(c) => write!(f, "\\{}", c),
            CharacterEscapeKind::ControlLetter(c) => write!(f, "\\c{}", c),
            CharacterEscapeKind::Hex(digits) => write!(f, "\\x{}", digits),
            CharacterEscapeKind::Unicode(digits) => write!(f, "\\u{}", digits),
            CharacterEscapeKind::UnicodeCodepoint(digits) => write!(f, "\\u{{{}}}", digits),
            CharacterEscapeKind::Identity(c) => write!(f, "\\{}", c),
            CharacterEscapeKind::InvalidControlLetter => f.write_str("\\c"),
            CharacterEscapeKind::InvalidHex => f.write_str("\\x"),
            CharacterEscapeKind::InvalidUnicode => f.write_str("\\u"),
            CharacterEscapeKind::InvalidIdentity(Some(c)) => write!(f, "\\{}", c),
            CharacterEscapeKind::InvalidIdentity(None) => f.write_str("\\"),
        }
    }
}

impl Display for Invalid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// A readable, structural rendering of a node.
pub trait Describe {
    fn describe(&self) -> String;
}

fn describe_invalid(text: &dyn Display, reason: InvalidReason) -> String {
    format!("invalid(\"{}\", {})", text, reason)
}

impl Describe for Regex {
    fn describe(&self) -> String {
        self.body.describe()
    }
}

fn join_terms(terms: &[String]) -> String {
    if terms.is_empty() {
        "()".to_owned()
    } else {
        terms.join(", ")
    }
}

// `has_terms` tells for each open body whether its current
// alternative has a term yet.

fn begin_term(out: &mut String, has_terms: &mut [bool]) {
    if let Some(has_term) = has_terms.last_mut() {
        if *has_term {
            out.push_str(", ");
        }
        *has_term = true;
    }
}

fn end_alternative(out: &mut String, has_terms: &mut [bool]) {
    if let Some(has_term) = has_terms.last_mut() {
        if !*has_term {
            out.push_str("()");
        }
        *has_term = false;
    }
}

impl Describe for Body {
    fn describe(&self) -> String {
        // written front to back, a group is opened with the prefixes
        // of its quantifier and its kind, and closed with the suffixes.
        let mut out = String::new();
        let mut has_terms = vec![false];

        for step in Steps::new(self) {
            match step {
                Step::Pattern(_) => {}
                Step::Delimiter(_) => {
                    end_alternative(&mut out, &mut has_terms);
                    out.push_str(" || ");
                }
                Step::Term(term) => {
                    begin_term(&mut out, &mut has_terms);
                    out.push_str(&term.describe());
                }
                Step::Open(group, quantifier) => {
                    begin_term(&mut out, &mut has_terms);
                    if let Some(quantifier) = quantifier {
                        out.push_str(&quantifier_prefix(quantifier));
                    }
                    out.push_str(&group_prefix(group));
                    has_terms.push(false);
                }
                Step::Close(_, quantifier) => {
                    end_alternative(&mut out, &mut has_terms);
                    has_terms.pop();
                    out.push(')');
                    if let Some(quantifier) = quantifier {
                        out.push_str(&quantifier_suffix(quantifier));
                    }
                }
            }
        }

        end_alternative(&mut out, &mut has_terms);
        out
    }
}

impl Describe for Pattern {
    fn describe(&self) -> String {
        let terms: Vec<String> = self.terms.iter().map(|t| t.describe()).collect();
        join_terms(&terms)
    }
}

impl Describe for Term {
    fn describe(&self) -> String {
        match self {
            Term::Assertion(a) => match a.kind {
                AssertionKind::WordBoundary => "is_bound".to_owned(),
                AssertionKind::NonWordBoundary => "is_not_bound".to_owned(),
                AssertionKind::Start => "start".to_owned(),
                AssertionKind::End => "end".to_owned(),
            },
            Term::QuantifiedSymbol(q) => q.describe(),
            Term::Invalid(i) => describe_invalid(&i.text, i.reason),
        }
    }
}

impl Describe for QuantifiedSymbol {
    fn describe(&self) -> String {
        describe_quantified(self.symbol.describe(), self.quantifier.as_ref())
    }
}

fn describe_quantified(symbol: String, quantifier: Option<&Quantifier>) -> String {
    match quantifier {
        Some(quantifier) => format!(
            "{}{}{}",
            quantifier_prefix(quantifier),
            symbol,
            quantifier_suffix(quantifier)
        ),
        None => symbol,
    }
}

// e.g. "one_or_more(" or "repeat_range_lazy("
fn quantifier_prefix(quantifier: &Quantifier) -> String {
    let name = match &quantifier.kind {
        QuantifierKind::Optional => "optional",
        QuantifierKind::ZeroOrMore => "zero_or_more",
        QuantifierKind::OneOrMore => "one_or_more",
        QuantifierKind::Count { max, .. } => match max {
            CountMax::Exact => "repeat",
            CountMax::Unbounded => "at_least",
            CountMax::Bounded(_) => "repeat_range",
        },
    };

    let lazy = if quantifier.lazy { "_lazy" } else { "" };
    format!("{}{}(", name, lazy)
}

// e.g. ")" or ", 2, 5)"
fn quantifier_suffix(quantifier: &Quantifier) -> String {
    match &quantifier.kind {
        QuantifierKind::Count { min, max } => match max {
            CountMax::Exact | CountMax::Unbounded => format!(", {})", min),
            CountMax::Bounded(max) => format!(", {}, {})", min, max),
        },
        _ => ")".to_owned(),
    }
}

impl Describe for RepeatableSymbol {
    fn describe(&self) -> String {
        match self {
            RepeatableSymbol::Backreference(b) => match &b.kind {
                BackreferenceKind::Numeric(number) => format!("backref({})", number),
                BackreferenceKind::Named(name) => format!("backref({})", name),
                BackreferenceKind::InvalidNamed => {
                    describe_invalid(b, InvalidReason::MalformedBackreferenceOrGroupHeader)
                }
            },
            RepeatableSymbol::Group(g) => g.describe(),
            RepeatableSymbol::CharacterSet(s) => s.describe(),
            RepeatableSymbol::ClassEscape(c) => c.describe(),
            RepeatableSymbol::CharacterEscape(c) => c.describe(),
            RepeatableSymbol::AnyCharacter(_) => "char_any".to_owned(),
            RepeatableSymbol::Literal(l) => format!("'{}'", l.value),
            RepeatableSymbol::Invalid(i) => describe_invalid(&i.text, i.reason),
        }
    }
}

impl Describe for Group {
    fn describe(&self) -> String {
        describe_group(self, &self.body.describe())
    }
}

fn describe_group(group: &Group, body: &str) -> String {
    format!("{}{})", group_prefix(group), body)
}

// e.g. "index(" or "unclosed_name<x>("
fn group_prefix(group: &Group) -> String {
    let name = match &group.kind {
        GroupKind::Lookahead => "is_before".to_owned(),
        GroupKind::NegativeLookahead => "is_not_before".to_owned(),
        GroupKind::Lookbehind => "is_after".to_owned(),
        GroupKind::NegativeLookbehind => "is_not_after".to_owned(),
        GroupKind::NonCapturing => "group".to_owned(),
        GroupKind::NamedCapturing(name) => format!("name<{}>", name),
        GroupKind::AnonymousCapturing => "index".to_owned(),
        GroupKind::Invalid => "invalid_group".to_owned(),
    };

    let prefix = if group.close.is_some() { "" } else { "unclosed_" };
    format!("{}{}(", prefix, name)
}

impl Describe for CharacterSet {
    fn describe(&self) -> String {
        let s: Vec<String> = self.items.iter().map(|e| e.describe()).collect();
        if self.negated {
            format!("![{}]", s.join(", "))
        } else {
            format!("[{}]", s.join(", "))
        }
    }
}

impl Describe for SetItem {
    fn describe(&self) -> String {
        match self {
            SetItem::Range(r) => format!("{}..{}", r.low.describe(), r.high.describe()),
            SetItem::ClassEscape(c) => c.describe(),
            SetItem::CharacterEscape(c) => c.describe(),
            SetItem::Literal(l) => format!("'{}'", l.value),
        }
    }
}

impl Describe for RangeUnit {
    fn describe(&self) -> String {
        match self {
            RangeUnit::Literal(l) => format!("'{}'", l.value),
            RangeUnit::CharacterEscape(c) => c.describe(),
        }
    }
}

impl Describe for ClassEscape {
    fn describe(&self) -> String {
        match &self.kind {
            ClassEscapeKind::Digit => "char_digit".to_owned(),
            ClassEscapeKind::NotDigit => "char_not_digit".to_owned(),
            ClassEscapeKind::Space => "char_space".to_owned(),
            ClassEscapeKind::NotSpace => "char_not_space".to_owned(),
            ClassEscapeKind::Word => "char_word".to_owned(),
            ClassEscapeKind::NotWord => "char_not_word".to_owned(),
            ClassEscapeKind::Property(property) => {
                let name = if property.negated { "not_prop" } else { "prop" };
                match &property.value {
                    Some(value) => format!("{}({}={})", name, property.name, value),
                    None => format!("{}({})", name, property.name),
                }
            }
            ClassEscapeKind::InvalidProperty { .. } => {
                describe_invalid(self, InvalidReason::MalformedEscape)
            }
        }
    }
}

impl Describe for CharacterEscape {
    fn describe(&self) -> String {
        if self.is_invalid() {
            describe_invalid(self, InvalidReason::MalformedEscape)
        } else {
            format!("esc({})", self)
        }
    }
}
