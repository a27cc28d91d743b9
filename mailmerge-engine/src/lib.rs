//! Template engine behind the `mailmerge` crate
//!
//! The pipeline has four stages, each usable on its own:
//!
//! - [`parser`]: compiles a template into a [`CompiledTemplate`]
//! - [`sanitizer`]: rewrites the strings of a [`Context`] through an allow-list [`Policy`]
//! - [`evaluator`]: renders a compiled template against a context
//! - [`plain_text`]: derives plain text from the rendered markup
//!
//! # Example
//!
//! ```rust
//! use mailmerge_engine::{Context, Policy, evaluator, parser, plain_text, sanitizer};
//!
//! let compiled = parser::compile("<p>Hi {{name}}</p>").unwrap();
//! let context = Context::new().with("name", "<b>Ann</b><script>x()</script>");
//! let context = sanitizer::sanitize(&Policy::default(), context);
//! let rich = evaluator::render(&compiled, &context);
//! assert_eq!(rich, "<p>Hi <b>Ann</b></p>");
//! assert_eq!(plain_text::to_plain_text(&rich), "Hi Ann");
//! ```

pub mod context;
pub mod evaluator;
pub mod node;
pub mod parser;
pub mod plain_text;
pub mod sanitizer;

pub use context::Context;
pub use node::{CompiledTemplate, Node};
pub use parser::{ParseError, compile};
pub use plain_text::to_plain_text;
pub use sanitizer::{AttributeRule, Policy, PolicyBuilder, sanitize};
