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

//! Template parser
//!
//! Turns a template string into a [`CompiledTemplate`](crate::node::CompiledTemplate).
//!
//! # Example
//!
//! ```rust
//! use mailmerge_engine::parser::compile;
//!
//! let compiled = compile("Hello {{name}}!").unwrap();
//! assert_eq!(compiled.nodes().len(), 3);
//! ```
//!
//! # Module Structure
//!
//! - `compiler.rs`: builds the node tree from the marker stream
//! - `block.rs`: `if` / `unless` block handling
//! - `expression.rs`: marker scanning
//! - `expression_tokenizer.rs`: tokenization of marker content
//! - `error.rs`: error types and handling

pub mod block;
pub mod compiler;
pub mod error;
pub mod expression;
pub mod expression_tokenizer;

pub use compiler::compile;
pub use error::ParseError;
