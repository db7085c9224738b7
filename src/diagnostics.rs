// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::{
    ast::{
        Backreference, BackreferenceKind, CharacterEscape, CharacterEscapeKind, ClassEscape,
        ClassEscapeKind, Group, GroupKind, Invalid, InvalidReason, Regex,
    },
    span::Span,
    visit::Visitor,
};

/// A malformed fragment of a pattern.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Diagnostic {
    pub reason: InvalidReason,
    pub span: Span,
    pub message: String,
}

impl Regex {
    /// Every malformed fragment of the pattern, in source order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut collector = DiagnosticCollector::default();
        collector.visit_regex(self);
        collector.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics().is_empty()
    }
}

#[derive(Default)]
struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    fn add(&mut self, reason: InvalidReason, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            reason,
            span,
            message: message.into(),
        });
    }
}

impl<'ast> Visitor<'ast> for DiagnosticCollector {
    fn visit_invalid(&mut self, invalid: &'ast Invalid) {
        let message = match invalid.reason {
            InvalidReason::UnmatchedDelimiter => match invalid.text.as_str() {
                ")" => "Unmatched right parenthesis \")\".".to_owned(),
                "[" => "Missing the right bracket \"]\" for character set.".to_owned(),
                _ => format!("Unmatched delimiter \"{}\".", invalid.text),
            },
            InvalidReason::RedundantQuantifier => {
                format!("Redundant quantifier \"{}\".", invalid.text)
            }
            InvalidReason::BareQuantifierCharacter => {
                format!("Nothing to repeat for \"{}\".", invalid.text)
            }
            InvalidReason::LineTerminator => {
                "Line terminator is not allowed in a pattern.".to_owned()
            }
            InvalidReason::MalformedEscape | InvalidReason::MalformedBackreferenceOrGroupHeader => {
                format!("Invalid text \"{}\".", invalid.text)
            }
        };

        self.add(invalid.reason, invalid.span, message);
    }

    fn visit_character_escape(&mut self, character_escape: &'ast CharacterEscape) {
        let message = match &character_escape.kind {
            CharacterEscapeKind::InvalidNull => {
                "The null char escape \"\\0\" cannot be followed by a digit.".to_owned()
            }
            CharacterEscapeKind::InvalidControlLetter => {
                "Expect an ASCII letter after \"\\c\".".to_owned()
            }
            CharacterEscapeKind::InvalidHex => {
                "Expect two hex digits after \"\\x\".".to_owned()
            }
            CharacterEscapeKind::InvalidUnicode => {
                "Expect four hex digits, or a code point in braces, after \"\\u\".".to_owned()
            }
            CharacterEscapeKind::InvalidIdentity(Some(c)) => {
                format!("Unsupported escape char '{}'.", c)
            }
            CharacterEscapeKind::InvalidIdentity(None) => {
                "Incomplete escape character sequence.".to_owned()
            }
            _ => return,
        };

        self.add(InvalidReason::MalformedEscape, character_escape.span, message);
    }

    fn visit_class_escape(&mut self, class_escape: &'ast ClassEscape) {
        if let ClassEscapeKind::InvalidProperty { negated } = class_escape.kind {
            let letter = if negated { 'P' } else { 'p' };
            self.add(
                InvalidReason::MalformedEscape,
                class_escape.span,
                format!("Expect a property name in braces after \"\\{}\".", letter),
            );
        }
    }

    fn visit_backreference(&mut self, backreference: &'ast Backreference) {
        if backreference.kind == BackreferenceKind::InvalidNamed {
            self.add(
                InvalidReason::MalformedBackreferenceOrGroupHeader,
                backreference.span,
                "Missing the group name for back reference \"\\k\".",
            );
        }
    }

    fn visit_group(&mut self, group: &'ast Group) {
        if group.kind == GroupKind::Invalid {
            self.add(
                InvalidReason::MalformedBackreferenceOrGroupHeader,
                group.open,
                "Invalid group header \"(?\".",
            );
        }

        if group.close.is_none() {
            self.add(
                InvalidReason::UnmatchedDelimiter,
                group.open,
                "Missing the right parenthesis \")\" for group.",
            );
        }
    }

    fn leave_group(&mut self, group: &'ast Group) {
        if let (GroupKind::Invalid, Some(close)) = (&group.kind, group.close) {
            self.add(
                InvalidReason::MalformedBackreferenceOrGroupHeader,
                close,
                "Right parenthesis of an invalid group.",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ast::InvalidReason,
        flags::Flags,
        parser::{parse, parse_from_str},
        span::Span,
    };

    use super::Diagnostic;

    fn reasons_and_spans(diagnostics: &[Diagnostic]) -> Vec<(InvalidReason, Span)> {
        diagnostics.iter().map(|d| (d.reason, d.span)).collect()
    }

    #[test]
    fn test_no_diagnostics() {
        let regex = parse_from_str(r#"^(?<y>\d{4})-(?:[a-z\-]+|\x41)*?\k<y>\1$"#);
        assert_eq!(regex.diagnostics(), vec![]);
        assert!(!regex.has_errors());

        assert!(!parse(r#"\p{L}\u{1F600}"#, Flags::unicode()).has_errors());
    }

    #[test]
    fn test_term_diagnostics() {
        // the stray ')' takes the '+'
        let regex = parse_from_str("a)+b**[c");
        assert_eq!(
            reasons_and_spans(&regex.diagnostics()),
            vec![
                (InvalidReason::UnmatchedDelimiter, Span::new(1, 2)),
                (InvalidReason::RedundantQuantifier, Span::new(5, 6)),
                (InvalidReason::UnmatchedDelimiter, Span::new(6, 7)),
            ]
        );
        assert!(regex.has_errors());

        assert_eq!(
            reasons_and_spans(&parse_from_str("]{2}+").diagnostics()),
            vec![
                (InvalidReason::UnmatchedDelimiter, Span::new(0, 1)),
                (InvalidReason::RedundantQuantifier, Span::new(4, 5)),
            ]
        );

        assert_eq!(
            parse_from_str("a++").diagnostics(),
            vec![Diagnostic {
                reason: InvalidReason::RedundantQuantifier,
                span: Span::new(2, 3),
                message: "Redundant quantifier \"+\".".to_owned(),
            }]
        );

        assert_eq!(
            reasons_and_spans(&parse_from_str("a\nb").diagnostics()),
            vec![(InvalidReason::LineTerminator, Span::new(1, 2))]
        );
    }

    #[test]
    fn test_escape_diagnostics() {
        let regex = parse_from_str(r#"[\x]\c\k<>\01\"#);
        assert_eq!(
            reasons_and_spans(&regex.diagnostics()),
            vec![
                (InvalidReason::MalformedEscape, Span::new(1, 3)),
                (InvalidReason::MalformedEscape, Span::new(4, 6)),
                (
                    InvalidReason::MalformedBackreferenceOrGroupHeader,
                    Span::new(6, 8)
                ),
                (InvalidReason::MalformedEscape, Span::new(10, 12)),
                (InvalidReason::MalformedEscape, Span::new(13, 14)),
            ]
        );

        let regex = parse(r#"\pL\P"#, Flags::unicode());
        assert_eq!(
            regex
                .diagnostics()
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>(),
            vec![
                "Expect a property name in braces after \"\\p\".",
                "Expect a property name in braces after \"\\P\".",
            ]
        );

        assert_eq!(
            parse(r#"\a"#, Flags::unicode()).diagnostics()[0].message,
            "Unsupported escape char 'a'."
        );
    }

    #[test]
    fn test_group_diagnostics() {
        // the delimiters of an invalid group are flagged,
        // its content is not
        let regex = parse_from_str("(?a)");
        assert_eq!(
            reasons_and_spans(&regex.diagnostics()),
            vec![
                (
                    InvalidReason::MalformedBackreferenceOrGroupHeader,
                    Span::new(0, 2)
                ),
                (
                    InvalidReason::MalformedBackreferenceOrGroupHeader,
                    Span::new(3, 4)
                ),
            ]
        );

        let regex = parse_from_str("(a(?:b)");
        assert_eq!(
            regex.diagnostics(),
            vec![Diagnostic {
                reason: InvalidReason::UnmatchedDelimiter,
                span: Span::new(0, 1),
                message: "Missing the right parenthesis \")\" for group.".to_owned(),
            }]
        );

        // invalid and unclosed
        let regex = parse_from_str("(?");
        assert_eq!(
            reasons_and_spans(&regex.diagnostics()),
            vec![
                (
                    InvalidReason::MalformedBackreferenceOrGroupHeader,
                    Span::new(0, 2)
                ),
                (InvalidReason::UnmatchedDelimiter, Span::new(0, 2)),
            ]
        );
    }

    #[test]
    fn test_diagnostics_of_deep_groups() {
        let depth = 100_000;
        let regex = parse_from_str(&"(?".repeat(depth));
        let diagnostics = regex.diagnostics();

        // each header is both invalid and unclosed
        assert_eq!(diagnostics.len(), depth * 2);
        assert_eq!(
            reasons_and_spans(&diagnostics[diagnostics.len() - 2..]),
            vec![
                (
                    InvalidReason::MalformedBackreferenceOrGroupHeader,
                    Span::new(depth * 2 - 2, depth * 2)
                ),
                (InvalidReason::UnmatchedDelimiter, Span::new(depth * 2 - 2, depth * 2)),
            ]
        );
    }
}
