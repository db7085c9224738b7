// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::{
    ast::{
        Backreference, BackreferenceKind, Body, CharacterEscape, CharacterSet, ClassEscape,
        ClassEscapeKind, Group, GroupKind, Quantifier, RangeUnit, Regex, RepeatableSymbol,
        SetItem, Term,
    },
    span::Span,
    visit::{Step, Steps},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Literal,
    AnyCharacter,
    Assertion,
    DisjunctionDelimiter, // |
    GroupBegin,           // (
    GroupIdentifier,      // ?:, ?=, ?<, > etc.
    GroupName,
    GroupEnd, // )
    SetBegin, // [
    SetNegation,
    SetEnd, // ]
    RangeDelimiter,
    Quantifier,
    LazyModifier,
    ClassEscape,
    CharacterEscape,
    Backreference,
    Invalid,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Regex {
    /// The leaves of the tree as a flat list of tokens, in source order.
    ///
    /// The tokens are contiguous and together cover the whole pattern
    /// text, so concatenating their text reproduces it.
    pub fn tokens(&self) -> Vec<Token> {
        let mut tokens = vec![];
        push_body(&mut tokens, &self.body);
        tokens
    }
}

fn push_body(tokens: &mut Vec<Token>, body: &Body) {
    for step in Steps::new(body) {
        match step {
            Step::Pattern(_) => {}
            Step::Delimiter(delimiter) => {
                tokens.push(Token::new(TokenKind::DisjunctionDelimiter, delimiter))
            }
            Step::Term(term) => push_term(tokens, term),
            Step::Open(group, _) => push_group_open(tokens, group),
            Step::Close(group, quantifier) => {
                push_group_close(tokens, group);
                if let Some(quantifier) = quantifier {
                    push_quantifier(tokens, quantifier);
                }
            }
        }
    }
}

fn push_term(tokens: &mut Vec<Token>, term: &Term) {
    match term {
        Term::Assertion(assertion) => {
            tokens.push(Token::new(TokenKind::Assertion, assertion.span))
        }
        Term::Invalid(invalid) => tokens.push(Token::new(TokenKind::Invalid, invalid.span)),
        Term::QuantifiedSymbol(quantified_symbol) => {
            push_symbol(tokens, &quantified_symbol.symbol);
            if let Some(quantifier) = &quantified_symbol.quantifier {
                push_quantifier(tokens, quantifier);
            }
        }
    }
}

fn push_symbol(tokens: &mut Vec<Token>, symbol: &RepeatableSymbol) {
    match symbol {
        RepeatableSymbol::Backreference(backreference) => push_backreference(tokens, backreference),
        RepeatableSymbol::Group(group) => {
            push_group_open(tokens, group);
            push_body(tokens, &group.body);
            push_group_close(tokens, group);
        }
        RepeatableSymbol::CharacterSet(character_set) => push_character_set(tokens, character_set),
        RepeatableSymbol::ClassEscape(class_escape) => push_class_escape(tokens, class_escape),
        RepeatableSymbol::CharacterEscape(character_escape) => {
            push_character_escape(tokens, character_escape)
        }
        RepeatableSymbol::AnyCharacter(span) => {
            tokens.push(Token::new(TokenKind::AnyCharacter, *span))
        }
        RepeatableSymbol::Literal(literal) => {
            tokens.push(Token::new(TokenKind::Literal, literal.span))
        }
        RepeatableSymbol::Invalid(invalid) => {
            tokens.push(Token::new(TokenKind::Invalid, invalid.span))
        }
    }
}

fn push_quantifier(tokens: &mut Vec<Token>, quantifier: &Quantifier) {
    let span = quantifier.span;
    if quantifier.lazy {
        // the lazy mark is always the last char
        let mark = Span::new(span.end - 1, span.end);
        tokens.push(Token::new(
            TokenKind::Quantifier,
            Span::new(span.start, mark.start),
        ));
        tokens.push(Token::new(TokenKind::LazyModifier, mark));
    } else {
        tokens.push(Token::new(TokenKind::Quantifier, span));
    }
}

fn push_backreference(tokens: &mut Vec<Token>, backreference: &Backreference) {
    let kind = match backreference.kind {
        BackreferenceKind::InvalidNamed => TokenKind::Invalid,
        _ => TokenKind::Backreference,
    };
    tokens.push(Token::new(kind, backreference.span));
}

fn push_class_escape(tokens: &mut Vec<Token>, class_escape: &ClassEscape) {
    let kind = match class_escape.kind {
        ClassEscapeKind::InvalidProperty { .. } => TokenKind::Invalid,
        _ => TokenKind::ClassEscape,
    };
    tokens.push(Token::new(kind, class_escape.span));
}

fn push_character_escape(tokens: &mut Vec<Token>, character_escape: &CharacterEscape) {
    let kind = if character_escape.is_invalid() {
        TokenKind::Invalid
    } else {
        TokenKind::CharacterEscape
    };
    tokens.push(Token::new(kind, character_escape.span));
}

fn push_group_open(tokens: &mut Vec<Token>, group: &Group) {
    // "(?<name>"
    //  ^^ ^   ^__// GroupIdentifier
    //  || |______// GroupName
    //  ||________// GroupIdentifier
    //  |_________// GroupBegin

    let open = group.open;
    let paren = Span::from_position_and_length(open.start, 1);

    match &group.kind {
        GroupKind::AnonymousCapturing => {
            tokens.push(Token::new(TokenKind::GroupBegin, open));
        }
        GroupKind::NamedCapturing(name) => {
            tokens.push(Token::new(TokenKind::GroupBegin, paren));
            tokens.push(Token::new(
                TokenKind::GroupIdentifier,
                Span::new(paren.end, name.span.start),
            ));
            tokens.push(Token::new(TokenKind::GroupName, name.span));
            tokens.push(Token::new(
                TokenKind::GroupIdentifier,
                Span::new(name.span.end, open.end),
            ));
        }
        GroupKind::Invalid => {
            tokens.push(Token::new(TokenKind::Invalid, open));
        }
        _ => {
            tokens.push(Token::new(TokenKind::GroupBegin, paren));
            tokens.push(Token::new(
                TokenKind::GroupIdentifier,
                Span::new(paren.end, open.end),
            ));
        }
    }
}

fn push_group_close(tokens: &mut Vec<Token>, group: &Group) {
    if let Some(close) = group.close {
        let kind = if group.kind == GroupKind::Invalid {
            TokenKind::Invalid
        } else {
            TokenKind::GroupEnd
        };
        tokens.push(Token::new(kind, close));
    }
}

fn push_character_set(tokens: &mut Vec<Token>, character_set: &CharacterSet) {
    let open = character_set.open;
    let bracket = Span::from_position_and_length(open.start, 1);
    tokens.push(Token::new(TokenKind::SetBegin, bracket));
    if character_set.negated {
        tokens.push(Token::new(
            TokenKind::SetNegation,
            Span::new(bracket.end, open.end),
        ));
    }

    for item in &character_set.items {
        match item {
            SetItem::Range(range) => {
                push_range_unit(tokens, &range.low);
                tokens.push(Token::new(TokenKind::RangeDelimiter, range.dash));
                push_range_unit(tokens, &range.high);
            }
            SetItem::ClassEscape(class_escape) => push_class_escape(tokens, class_escape),
            SetItem::CharacterEscape(character_escape) => {
                push_character_escape(tokens, character_escape)
            }
            SetItem::Literal(literal) => {
                tokens.push(Token::new(TokenKind::Literal, literal.span))
            }
        }
    }

    tokens.push(Token::new(TokenKind::SetEnd, character_set.close));
}

fn push_range_unit(tokens: &mut Vec<Token>, unit: &RangeUnit) {
    match unit {
        RangeUnit::Literal(literal) => tokens.push(Token::new(TokenKind::Literal, literal.span)),
        RangeUnit::CharacterEscape(character_escape) => {
            push_character_escape(tokens, character_escape)
        }
    }
}
