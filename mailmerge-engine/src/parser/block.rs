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

//! Conditional block helpers
//!
//! Two block helpers exist:
//! - `{{#if key}}...{{else}}...{{/if}}` renders the first arm when `key` is truthy
//! - `{{#unless key}}...{{else}}...{{/unless}}` renders the first arm when `key` is falsy
//!
//! Both compile to [`Node::Conditional`]; `unless` simply swaps the arms.
//! Blocks may nest inside either arm of another block.

use crate::{
    node::{Node, push_node},
    parser::{
        error::{ParseError, Result},
        expression::Expression,
        expression_tokenizer::Token,
    },
};

/// The supported block helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Unless,
}

impl BlockKind {
    /// Looks up a block helper by the name used in `{{#name ...}}`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Self::If),
            "unless" => Some(Self::Unless),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Unless => "unless",
        }
    }
}

/// A block whose close marker has not been reached yet
pub(crate) struct OpenBlock<'a> {
    kind: BlockKind,
    condition: String,
    expression: Expression<'a>,
    then_branch: Vec<Node>,
    else_branch: Option<Vec<Node>>,
}

impl<'a> OpenBlock<'a> {
    /// Opens a block from a `{{#helper key}}` marker
    pub(crate) fn open(expression: Expression<'a>) -> Result<Self> {
        let token = Token::first(expression.content)
            .ok_or_else(|| ParseError::new("expected block helper", &expression))?;
        let kind = BlockKind::from_name(token.value).ok_or_else(|| {
            ParseError::new(
                &format!("unsupported block helper {}", token.value),
                &expression,
            )
        })?;
        let condition = match token.next() {
            Some(key) => {
                if let Some(extra) = key.next() {
                    return Err(ParseError::new(
                        &format!("unexpected token {}", extra.value),
                        &expression,
                    ));
                }
                key.value.to_string()
            }
            None => String::new(),
        };
        Ok(Self {
            kind,
            condition,
            expression,
            then_branch: Vec::new(),
            else_branch: None,
        })
    }

    /// Adds a node to the arm currently being filled
    pub(crate) fn push(&mut self, node: Node) {
        match &mut self.else_branch {
            Some(nodes) => push_node(nodes, node),
            None => push_node(&mut self.then_branch, node),
        }
    }

    /// Switches to the else arm
    pub(crate) fn handle_else(&mut self, expression: &Expression<'a>) -> Result<()> {
        if self.else_branch.is_some() {
            return Err(ParseError::new(
                &format!("duplicate else in {} block", self.kind.name()),
                expression,
            ));
        }
        self.else_branch = Some(Vec::new());
        Ok(())
    }

    /// Closes the block, checking the close marker names the same helper
    pub(crate) fn close(self, expression: &Expression<'a>) -> Result<Node> {
        let token = Token::first(expression.content);
        let name = token.map_or("", |token| token.value);
        if name != self.kind.name() {
            return Err(ParseError::new(
                &format!("mismatched block close, expected /{}", self.kind.name()),
                expression,
            ));
        }
        if let Some(extra) = token.and_then(|token| token.next()) {
            return Err(ParseError::new(
                &format!("unexpected token {}", extra.value),
                expression,
            ));
        }
        let other = self.else_branch.unwrap_or_default();
        let (then_branch, else_branch) = match self.kind {
            BlockKind::If => (self.then_branch, other),
            BlockKind::Unless => (other, self.then_branch),
        };
        Ok(Node::Conditional {
            condition: self.condition,
            then_branch,
            else_branch,
        })
    }

    /// The error reported when the template ends inside this block
    pub(crate) fn unclosed(&self) -> ParseError {
        ParseError::unclosed(self.kind.name(), &self.expression)
    }
}
