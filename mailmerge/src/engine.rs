use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use mailmerge_engine::{CompiledTemplate, Context, Policy, compile, evaluator, sanitize, to_plain_text};

use crate::{RenderRequest, RenderResult, TemplateError, cache::TemplateCache};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Options {
    /// Markup allowed in data values
    pub policy: Policy,
    /// Number of compiled templates to keep; 0 disables the cache
    pub cache_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            cache_capacity: 256,
        }
    }
}

/// Renders templates against untrusted data
///
/// An engine holds only immutable configuration and the compiled template
/// cache, so one instance can serve any number of threads.
pub struct Engine {
    policy: Policy,
    cache: TemplateCache,
}

impl Engine {
    pub fn new(options: Options) -> Self {
        Self {
            policy: options.policy,
            cache: TemplateCache::new(options.cache_capacity),
        }
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Compiles a template, reusing the cached result when there is one
    pub fn compile(&self, template: &str) -> Result<Arc<CompiledTemplate>, TemplateError> {
        self.cache.get_or_compile(template, compile).map_err(|err| {
            log::warn!("rejected template: {err}");
            TemplateError::from(err)
        })
    }

    /// Renders `template` against `data`, producing rich and plain text
    ///
    /// String values in `data` go through the sanitizer before they are
    /// merged. Missing keys render as nothing; the only expected error is a
    /// malformed template.
    pub fn render(&self, template: &str, data: impl Into<Context>) -> Result<RenderResult, TemplateError> {
        let data = data.into();
        guarded(|| {
            let compiled = self.compile(template)?;
            let context = sanitize(&self.policy, data);
            let rich_text = evaluator::render(&compiled, &context);
            let plain_text = to_plain_text(&rich_text);
            Ok(RenderResult { rich_text, plain_text })
        })
    }

    pub fn render_request(&self, request: RenderRequest) -> Result<RenderResult, TemplateError> {
        self.render(&request.template, request.data)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// Runs `render`, turning a panic into [`TemplateError::Internal`]
fn guarded<T>(render: impl FnOnce() -> Result<T, TemplateError>) -> Result<T, TemplateError> {
    panic::catch_unwind(AssertUnwindSafe(render)).unwrap_or_else(|panic| {
        log::error!("template rendering panicked: {}", panic_message(panic.as_ref()));
        Err(TemplateError::Internal)
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    match panic.downcast_ref::<&str>() {
        Some(message) => *message,
        None => panic
            .downcast_ref::<String>()
            .map_or("unknown panic", String::as_str),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn panics_become_internal_errors() {
        let result: Result<(), _> = guarded(|| panic!("index out of bounds"));
        assert_eq!(result, Err(TemplateError::Internal));
    }

    #[test]
    fn guarded_passes_results_through() {
        assert_eq!(guarded(|| Ok(1)), Ok(1));
        let syntax = TemplateError::Syntax {
            position: 0,
            reason: "x".to_string(),
        };
        assert_eq!(guarded::<()>(|| Err(syntax.clone())), Err(syntax));
    }

    #[test]
    fn panic_messages() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&"owned".to_string()), "owned");
        assert_eq!(panic_message(&42), "unknown panic");
    }

    #[test]
    fn compiled_templates_are_cached() {
        let engine = Engine::default();
        engine.render("Hi {{name}}", json!({"name": "A"})).unwrap();
        engine.render("Hi {{name}}", json!({"name": "B"})).unwrap();
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn cache_can_be_disabled() {
        let engine = Engine::new(Options {
            cache_capacity: 0,
            ..Options::default()
        });
        let result = engine.render("Hi {{name}}", json!({"name": "A"})).unwrap();
        assert_eq!(result.rich_text, "Hi A");
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn custom_policy() {
        let engine = Engine::new(Options {
            policy: Policy::text_only(),
            ..Options::default()
        });
        let result = engine.render("<p>{{bio}}</p>", json!({"bio": "<b>bold</b>"})).unwrap();
        assert_eq!(result.rich_text, "<p>bold</p>");
        assert_eq!(result.plain_text, "bold");
    }
}
