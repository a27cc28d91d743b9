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

//! Template marker scanning
//!
//! Splits a template into the text before a marker, the marker itself and
//! the rest of the template. The scanner recognizes:
//! - Merge fields: `{{name}}` and `{{{name}}}`
//! - Block markers: `{{#if name}}`, `{{else}}`, `{{/if}}`
//! - Comments: `{{! comment }}` or `{{!-- comment --}}`
//! - Escaped markers: `\{{name}}`, and raw blocks
//!   `{{{{raw}}}}not {{parsed}} here{{{{/raw}}}}`
//! - Whitespace control: `{{~name~}}` trims the whitespace on either side
//!
//! # Examples
//!
//! ```rust
//! use mailmerge_engine::parser::expression::{Expression, ExpressionType};
//!
//! let expr = Expression::from("Hello {{name}}!").unwrap().unwrap();
//! assert_eq!(expr.expression_type, ExpressionType::Variable);
//! assert_eq!(expr.content, "name");
//! assert_eq!(expr.offset, 6);
//! ```

use std::fmt::Display;

use crate::parser::error::{ParseError, Result};

/// Types of template markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionType {
    /// Comment: `{{! comment }}`
    Comment,
    /// Merge field: `{{name}}`
    Variable,
    /// Triple-stash merge field: `{{{name}}}`
    Raw,
    /// Block open: `{{#if name}}`
    Open,
    /// Block close: `{{/if}}`
    Close,
    /// Text emitted as written: `\{{name}}` or the body of a raw block
    Escaped,
}

/// A marker found in a template, with the text around it
#[derive(Debug, Clone, Copy)]
pub struct Expression<'a> {
    /// The type of marker
    pub expression_type: ExpressionType,
    /// Text before the marker
    pub prefix: &'a str,
    /// The marker content without delimiters
    pub content: &'a str,
    /// Text after the marker
    pub postfix: &'a str,
    /// The complete marker including delimiters
    pub raw: &'a str,
    /// Byte offset of `raw` in the template
    pub offset: usize,
    total: usize,
}

impl<'a> Expression<'a> {
    /// Parses the first marker of a template
    pub fn from(src: &'a str) -> Result<Option<Self>> {
        Self::scan(src, src.len())
    }

    /// Parses the marker following this one
    pub fn next(&self) -> Result<Option<Self>> {
        Self::scan(self.postfix, self.total)
    }

    /// Scans `src`, a suffix of a template `total` bytes long
    fn scan(src: &'a str, total: usize) -> Result<Option<Self>> {
        let base = total - src.len();
        let start = match src.find("{{") {
            Some(start) => start,
            None => return Ok(None),
        };
        if src[..start].ends_with('\\') {
            return Self::escaped(src, start, base, total).map(Some);
        }
        let mut prefix = &src[..start];
        let mut body = &src[start + 2..];
        if let Some(rest) = body.strip_prefix("{{") {
            return Self::raw_block(src, start, rest, base, total).map(Some);
        }
        if let Some(rest) = body.strip_prefix('~') {
            prefix = prefix.trim_end();
            body = rest;
        }
        let (expression_type, close) = match body.as_bytes().first() {
            Some(b'{') => {
                body = &body[1..];
                if let Some(rest) = body.strip_prefix('~') {
                    prefix = prefix.trim_end();
                    body = rest;
                }
                (ExpressionType::Raw, "}}}")
            }
            Some(b'!') => match body[1..].strip_prefix("--") {
                Some(rest) => {
                    body = rest;
                    (ExpressionType::Comment, "--}}")
                }
                None => {
                    body = &body[1..];
                    (ExpressionType::Comment, "}}")
                }
            },
            Some(b'#') => {
                body = &body[1..];
                (ExpressionType::Open, "}}")
            }
            Some(b'/') => {
                body = &body[1..];
                (ExpressionType::Close, "}}")
            }
            _ => (ExpressionType::Variable, "}}"),
        };
        let offset = base + start;
        let end = body
            .find(close)
            .ok_or_else(|| ParseError::unterminated(offset, &src[start..]))?;
        let after = &body[end + close.len()..];
        let raw = &src[start..src.len() - after.len()];
        let (content, postfix) = match body[..end].strip_suffix('~') {
            Some(content) => (content, after.trim_start()),
            None => (&body[..end], after),
        };
        Ok(Some(Self {
            expression_type,
            prefix,
            content,
            postfix,
            raw,
            offset,
            total,
        }))
    }

    /// Parses `\{{...}}`, which is emitted without the backslash
    fn escaped(src: &'a str, start: usize, base: usize, total: usize) -> Result<Self> {
        let offset = base + start - 1;
        let body = &src[start..];
        let end = body
            .find("}}")
            .ok_or_else(|| ParseError::unterminated(offset, &src[start - 1..]))?
            + 2;
        Ok(Self {
            expression_type: ExpressionType::Escaped,
            prefix: &src[..start - 1],
            content: &body[..end],
            postfix: &body[end..],
            raw: &src[start - 1..start + end],
            offset,
            total,
        })
    }

    /// Parses `{{{{name}}}}...{{{{/name}}}}`, `rest` following the four opening braces
    fn raw_block(src: &'a str, start: usize, rest: &'a str, base: usize, total: usize) -> Result<Self> {
        let offset = base + start;
        let name_end = rest
            .find("}}}}")
            .ok_or_else(|| ParseError::unterminated(offset, &src[start..]))?;
        let body = &rest[name_end + 4..];
        let closing = ["{{{{/", rest[..name_end].trim(), "}}}}"].concat();
        let close = body
            .find(&closing)
            .ok_or_else(|| ParseError::at(offset, "unclosed raw block", &src[start..]))?;
        let postfix = &body[close + closing.len()..];
        Ok(Self {
            expression_type: ExpressionType::Escaped,
            prefix: &src[..start],
            content: &body[..close],
            postfix,
            raw: &src[start..src.len() - postfix.len()],
            offset,
            total,
        })
    }
}

impl<'a> Display for Expression<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw)
    }
}
