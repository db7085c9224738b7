// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! Read-only walks over the tree.
//!
//! [`Steps`] flattens a body into a depth-first sequence of steps,
//! keeping the open groups on an explicit stack, so a walk does not
//! recurse however deep the groups nest. [`Visitor`] is driven by it:
//! override the `visit_*` and `leave_*` methods of interest and pass
//! the visitor to [`walk_regex`]. Nodes are visited in source order.

use crate::{
    ast::{
        Assertion, Backreference, Body, CharacterEscape, CharacterRange, CharacterSet,
        ClassEscape, Group, GroupKind, GroupName, Invalid, Literal, Pattern, QuantifiedSymbol,
        Quantifier, RangeUnit, Regex, RepeatableSymbol, SetItem, Term,
    },
    span::Span,
};

/// One step of a depth-first walk over a body.
#[derive(Clone, Copy)]
pub enum Step<'ast> {
    /// The start of an alternative, before its terms.
    Pattern(&'ast Pattern),
    /// A `|` between two alternatives.
    Delimiter(Span),
    /// A term that holds no group.
    Term(&'ast Term),
    /// The header of a group, the steps of its body follow.
    /// The quantifier of the group is given with both ends.
    Open(&'ast Group, Option<&'ast Quantifier>),
    /// The end of a group, and the quantifier of the group if any.
    Close(&'ast Group, Option<&'ast Quantifier>),
}

struct Frame<'ast> {
    alternatives: &'ast [Pattern],
    delimiters: &'ast [Span],
    alternative: usize,
    // `None` until the `Step::Pattern` of the current alternative
    term: Option<usize>,
    group: Option<(&'ast Group, Option<&'ast Quantifier>)>,
}

impl<'ast> Frame<'ast> {
    fn new(body: &'ast Body, group: Option<(&'ast Group, Option<&'ast Quantifier>)>) -> Self {
        Self {
            alternatives: body.alternatives(),
            delimiters: body.delimiters(),
            alternative: 0,
            term: None,
            group,
        }
    }
}

pub struct Steps<'ast> {
    frames: Vec<Frame<'ast>>,
}

impl<'ast> Steps<'ast> {
    /// The steps of `body`, the group owning it is not included.
    pub fn new(body: &'ast Body) -> Self {
        Self {
            frames: vec![Frame::new(body, None)],
        }
    }
}

impl<'ast> Iterator for Steps<'ast> {
    type Item = Step<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.last_mut()?;
        let alternatives = frame.alternatives;
        let pattern = alternatives.get(frame.alternative)?;

        match frame.term {
            None => {
                frame.term = Some(0);
                return Some(Step::Pattern(pattern));
            }
            Some(index) => {
                if let Some(term) = pattern.terms.get(index) {
                    frame.term = Some(index + 1);

                    if let Term::QuantifiedSymbol(QuantifiedSymbol {
                        symbol: RepeatableSymbol::Group(group),
                        quantifier,
                        ..
                    }) = term
                    {
                        let group: &'ast Group = group;
                        let quantifier = quantifier.as_ref();
                        self.frames
                            .push(Frame::new(&group.body, Some((group, quantifier))));
                        return Some(Step::Open(group, quantifier));
                    }

                    return Some(Step::Term(term));
                }
            }
        }

        // the current alternative is done
        if let Some(delimiter) = frame.delimiters.get(frame.alternative) {
            frame.alternative += 1;
            frame.term = None;
            return Some(Step::Delimiter(*delimiter));
        }

        let frame = self.frames.pop()?;
        frame
            .group
            .map(|(group, quantifier)| Step::Close(group, quantifier))
    }
}

pub trait Visitor<'ast> {
    fn visit_regex(&mut self, regex: &'ast Regex) {
        walk_regex(self, regex);
    }

    fn visit_pattern(&mut self, _pattern: &'ast Pattern) {}

    /// A `|` between two alternatives.
    fn visit_delimiter(&mut self, _span: Span) {}

    /// Called before the body of the group.
    fn visit_group(&mut self, _group: &'ast Group) {}

    /// Called after the body of the group, before its quantifier.
    fn leave_group(&mut self, _group: &'ast Group) {}

    fn visit_character_set(&mut self, _character_set: &'ast CharacterSet) {}

    fn leave_character_set(&mut self, _character_set: &'ast CharacterSet) {}

    /// Called before the bounds of the range.
    fn visit_range(&mut self, _range: &'ast CharacterRange) {}

    fn visit_assertion(&mut self, _assertion: &'ast Assertion) {}

    fn visit_quantifier(&mut self, _quantifier: &'ast Quantifier) {}

    fn visit_backreference(&mut self, _backreference: &'ast Backreference) {}

    fn visit_class_escape(&mut self, _class_escape: &'ast ClassEscape) {}

    fn visit_character_escape(&mut self, _character_escape: &'ast CharacterEscape) {}

    fn visit_any_character(&mut self, _span: Span) {}

    fn visit_literal(&mut self, _literal: &'ast Literal) {}

    fn visit_invalid(&mut self, _invalid: &'ast Invalid) {}
}

pub fn walk_regex<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, regex: &'ast Regex) {
    walk_body(visitor, &regex.body);
}

pub fn walk_body<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, body: &'ast Body) {
    for step in Steps::new(body) {
        match step {
            Step::Pattern(pattern) => visitor.visit_pattern(pattern),
            Step::Delimiter(span) => visitor.visit_delimiter(span),
            Step::Term(term) => walk_term(visitor, term),
            Step::Open(group, _) => visitor.visit_group(group),
            Step::Close(group, quantifier) => {
                visitor.leave_group(group);
                if let Some(quantifier) = quantifier {
                    visitor.visit_quantifier(quantifier);
                }
            }
        }
    }
}

pub fn walk_term<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, term: &'ast Term) {
    match term {
        Term::Assertion(assertion) => visitor.visit_assertion(assertion),
        Term::QuantifiedSymbol(quantified_symbol) => {
            walk_symbol(visitor, &quantified_symbol.symbol);
            if let Some(quantifier) = &quantified_symbol.quantifier {
                visitor.visit_quantifier(quantifier);
            }
        }
        Term::Invalid(invalid) => visitor.visit_invalid(invalid),
    }
}

fn walk_symbol<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, symbol: &'ast RepeatableSymbol) {
    match symbol {
        RepeatableSymbol::Backreference(backreference) => {
            visitor.visit_backreference(backreference)
        }
        RepeatableSymbol::Group(group) => walk_group(visitor, group),
        RepeatableSymbol::CharacterSet(character_set) => {
            walk_character_set(visitor, character_set)
        }
        RepeatableSymbol::ClassEscape(class_escape) => visitor.visit_class_escape(class_escape),
        RepeatableSymbol::CharacterEscape(character_escape) => {
            visitor.visit_character_escape(character_escape)
        }
        RepeatableSymbol::AnyCharacter(span) => visitor.visit_any_character(*span),
        RepeatableSymbol::Literal(literal) => visitor.visit_literal(literal),
        RepeatableSymbol::Invalid(invalid) => visitor.visit_invalid(invalid),
    }
}

pub fn walk_group<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, group: &'ast Group) {
    visitor.visit_group(group);
    walk_body(visitor, &group.body);
    visitor.leave_group(group);
}

pub fn walk_character_set<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    character_set: &'ast CharacterSet,
) {
    visitor.visit_character_set(character_set);
    for item in &character_set.items {
        walk_set_item(visitor, item);
    }
    visitor.leave_character_set(character_set);
}

pub fn walk_set_item<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, set_item: &'ast SetItem) {
    match set_item {
        SetItem::Range(range) => {
            visitor.visit_range(range);
            walk_range_unit(visitor, &range.low);
            walk_range_unit(visitor, &range.high);
        }
        SetItem::ClassEscape(class_escape) => visitor.visit_class_escape(class_escape),
        SetItem::CharacterEscape(character_escape) => {
            visitor.visit_character_escape(character_escape)
        }
        SetItem::Literal(literal) => visitor.visit_literal(literal),
    }
}

fn walk_range_unit<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, unit: &'ast RangeUnit) {
    match unit {
        RangeUnit::Literal(literal) => visitor.visit_literal(literal),
        RangeUnit::CharacterEscape(character_escape) => {
            visitor.visit_character_escape(character_escape)
        }
    }
}

#[derive(Default)]
struct GroupCollector<'ast> {
    capturing_count: usize,
    names: Vec<&'ast GroupName>,
}

impl<'ast> Visitor<'ast> for GroupCollector<'ast> {
    fn visit_group(&mut self, group: &'ast Group) {
        if group.kind.is_capturing() {
            self.capturing_count += 1;
        }

        if let GroupKind::NamedCapturing(name) = &group.kind {
            self.names.push(name);
        }
    }
}

impl Regex {
    /// The names of the named capturing groups, in the order of
    /// their opening parentheses. Duplicates are kept.
    pub fn named_groups(&self) -> Vec<&GroupName> {
        let mut collector = GroupCollector::default();
        collector.visit_regex(self);
        collector.names
    }

    /// The number of capturing groups, named or not.
    ///
    /// Unclosed groups are counted, invalid groups are not.
    pub fn capturing_group_count(&self) -> usize {
        let mut collector = GroupCollector::default();
        collector.visit_regex(self);
        collector.capturing_count
    }
}
