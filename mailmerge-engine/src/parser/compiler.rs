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

//! Template compilation
//!
//! Walks the markers of a template left to right and builds the node tree.
//! Open blocks are kept on a stack; text and merge fields go to the arm of the
//! innermost open block, or to the top level when no block is open.

use crate::{
    node::{CompiledTemplate, Node, push_node},
    parser::{
        block::OpenBlock,
        error::{ParseError, Result},
        expression::{Expression, ExpressionType},
        expression_tokenizer::Token,
    },
};

/// Compiler state
#[derive(Default)]
struct Compile<'a> {
    /// Top-level nodes
    root: Vec<Node>,
    /// Stack of open blocks
    open_stack: Vec<OpenBlock<'a>>,
}

impl<'a> Compile<'a> {
    /// Adds a node where the template currently is
    fn push(&mut self, node: Node) {
        match self.open_stack.last_mut() {
            Some(block) => block.push(node),
            None => push_node(&mut self.root, node),
        }
    }

    fn literal(&mut self, text: &str) {
        self.push(Node::Literal(text.to_string()));
    }

    /// Handles `{{key}}`, `{{{key}}}` and `{{else}}`
    fn variable(&mut self, expression: &Expression<'a>) -> Result<()> {
        let key = match Token::first(expression.content) {
            Some(token) => {
                if let Some(extra) = token.next() {
                    let reason = match token.value {
                        "else" => "chained else is not supported".to_string(),
                        _ => format!("unexpected token {}", extra.value),
                    };
                    return Err(ParseError::new(&reason, expression));
                }
                token.value
            }
            None => "",
        };
        if key == "else" && expression.expression_type == ExpressionType::Variable {
            return self.handle_else(expression);
        }
        self.push(Node::Variable(key.to_string()));
        Ok(())
    }

    fn handle_else(&mut self, expression: &Expression<'a>) -> Result<()> {
        match self.open_stack.last_mut() {
            Some(block) => block.handle_else(expression),
            None => Err(ParseError::new("else not expected here", expression)),
        }
    }

    fn open(&mut self, expression: Expression<'a>) -> Result<()> {
        self.open_stack.push(OpenBlock::open(expression)?);
        Ok(())
    }

    fn close(&mut self, expression: &Expression<'a>) -> Result<()> {
        let block = self
            .open_stack
            .pop()
            .ok_or_else(|| ParseError::new("close without matching open block", expression))?;
        let node = block.close(expression)?;
        self.push(node);
        Ok(())
    }

    fn finish(self) -> Result<CompiledTemplate> {
        match self.open_stack.last() {
            Some(block) => Err(block.unclosed()),
            None => Ok(CompiledTemplate::new(self.root)),
        }
    }
}

/// Compiles a template into its node tree
pub fn compile(src: &str) -> Result<CompiledTemplate> {
    let mut compile = Compile::default();
    let mut rest = src;
    let mut expression = Expression::from(src)?;
    while let Some(expr) = expression {
        rest = expr.postfix;
        compile.literal(expr.prefix);
        match expr.expression_type {
            ExpressionType::Variable | ExpressionType::Raw => compile.variable(&expr)?,
            ExpressionType::Open => compile.open(expr)?,
            ExpressionType::Close => compile.close(&expr)?,
            ExpressionType::Escaped => compile.literal(expr.content),
            ExpressionType::Comment => (),
        }
        expression = expr.next()?;
    }
    compile.literal(rest);
    let compiled = compile.finish()?;
    log::debug!(
        "compiled {} byte template into {} top-level nodes",
        src.len(),
        compiled.nodes().len()
    );
    Ok(compiled)
}
