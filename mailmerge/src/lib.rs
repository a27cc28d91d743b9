//! Sanitized mail merge
//!
//! Merges a Handlebars-style template with a JSON data context and returns
//! two outputs from one evaluation: the rich (HTML) text and a plain-text
//! rendition of it.
//!
//! Supported markers:
//! - `{{name}}` / `{{{name}}}` merge fields, with dotted paths into objects (`{{user.name}}`)
//! - `{{#if key}}...{{else}}...{{/if}}` and `{{#unless key}}...{{/unless}}`, nestable
//! - `{{! comments }}`, `\{{escaped}}` markers and `{{~whitespace control~}}`
//!
//! String values in the data are sanitized against an allow-list [`Policy`]
//! before they are merged, so untrusted data can carry basic formatting but
//! never scripts or event handlers. Missing data renders as nothing.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//!
//! let template = "Hi {{name}}, {{#if premium}}Thanks for being a premium user!{{else}}Check out our premium plan.{{/if}}";
//! let result = mailmerge::render(template, json!({"name": "Alice", "premium": true})).unwrap();
//! assert_eq!(result.rich_text, "Hi Alice, Thanks for being a premium user!");
//! assert_eq!(result.plain_text, "Hi Alice, Thanks for being a premium user!");
//! ```

mod cache;
mod engine;
mod error;

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use cache::TemplateCache;
pub use engine::{Engine, Options};
pub use error::TemplateError;
pub use mailmerge_engine::{CompiledTemplate, Context, Node, Policy, PolicyBuilder};

/// The two renditions produced by one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub rich_text: String,
    pub plain_text: String,
}

/// A render request as received by a service: `{"template": .., "data": {..}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub template: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

static DEFAULT_ENGINE: LazyLock<Engine> = LazyLock::new(Engine::default);

/// Renders with a shared engine using the default [`Options`]
pub fn render(template: &str, data: impl Into<Context>) -> Result<RenderResult, TemplateError> {
    DEFAULT_ENGINE.render(template, data)
}
