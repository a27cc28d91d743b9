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

//! Marker content tokenization
//!
//! Splits the content of a marker into whitespace separated tokens, so
//! `#if premium` becomes the block name `if` followed by the key `premium`.
//!
//! # Examples
//!
//! ```rust
//! use mailmerge_engine::parser::expression_tokenizer::Token;
//!
//! let token = Token::first(" if user.premium ").unwrap();
//! assert_eq!(token.value, "if");
//! assert_eq!(token.next().unwrap().value, "user.premium");
//! ```

/// A token parsed from marker content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token's value
    pub value: &'a str,
    /// The remaining text after this token
    pub tail: &'a str,
}

/// Finds the end of a token
fn find_end(src: &str) -> usize {
    src.find(char::is_whitespace).unwrap_or(src.len())
}

/// Parses a single token from the input string
fn parse(src: &str) -> Option<Token<'_>> {
    if src.is_empty() {
        return None;
    }
    let end = find_end(src);
    Some(Token {
        value: &src[..end],
        tail: src[end..].trim_start(),
    })
}

impl<'a> Token<'a> {
    /// Parses the first token of marker content
    pub fn first(src: &'a str) -> Option<Self> {
        parse(src.trim())
    }

    /// Parses the next token after this one
    pub fn next(&self) -> Option<Self> {
        parse(self.tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        let token = Token::first("if\n  premium\textra").unwrap();
        assert_eq!(token.value, "if");
        let token = token.next().unwrap();
        assert_eq!(token.value, "premium");
        let token = token.next().unwrap();
        assert_eq!(token.value, "extra");
        assert!(token.next().is_none());
    }

    #[test]
    fn empty_content() {
        assert!(Token::first("").is_none());
        assert!(Token::first("   ").is_none());
    }
}
