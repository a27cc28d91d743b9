// MIT License
//
// Copyright (c) 2024 Jerome Johnson
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Error handling for the template parser
//!
//! Every failure carries the byte offset of the offending marker and a short
//! excerpt of the template around it, so the template author can find it.

use std::{error::Error, fmt::Display};

use crate::parser::expression::Expression;

/// Error type for template parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset of the marker that failed to parse
    pub position: usize,
    /// What went wrong
    pub reason: String,
    /// Excerpt of the template starting at `position`
    pub near: String,
}

/// Returns at most the first 32 characters of a string for error context
pub(crate) fn cap(src: &str) -> &str {
    const CAP_AT: usize = 32;

    match src.char_indices().nth(CAP_AT) {
        Some((end, _)) => &src[..end],
        None => src,
    }
}

impl ParseError {
    /// Creates a new parse error located at an expression
    pub(crate) fn new(reason: &str, expression: &Expression<'_>) -> Self {
        Self {
            position: expression.offset,
            reason: reason.to_string(),
            near: cap(expression.raw).to_string(),
        }
    }

    /// Creates an error at a raw byte offset, `src` being the template from that offset on
    pub(crate) fn at(position: usize, reason: &str, src: &str) -> Self {
        Self {
            position,
            reason: reason.to_string(),
            near: cap(src).to_string(),
        }
    }

    /// Creates an error for a marker whose closing delimiter never appears
    pub(crate) fn unterminated(position: usize, src: &str) -> Self {
        Self::at(position, "unterminated marker", src)
    }

    /// Creates an error for a block that is still open at the end of the template
    pub(crate) fn unclosed(name: &str, expression: &Expression<'_>) -> Self {
        Self::new(&format!("unclosed {} block", name), expression)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {} near \"{}\"", self.reason, self.position, self.near)
    }
}

impl Error for ParseError {}

/// Result type for template parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;
