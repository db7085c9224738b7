// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

mod cursor;
mod escape;
mod parser;
mod printer;

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod flags;
pub mod highlight;
pub mod lookahead;
pub mod span;
pub mod visit;

pub use ast::{InvalidReason, Regex};
pub use diagnostics::Diagnostic;
pub use error::Error;
pub use flags::Flags;
pub use highlight::{Token, TokenKind};
pub use parser::{parse, parse_bytes, parse_from_str};
pub use printer::Describe;
pub use span::Span;
