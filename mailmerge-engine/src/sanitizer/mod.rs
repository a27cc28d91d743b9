//! Sanitizer gate
//!
//! Every string in the data context is rewritten through an allow-list
//! [`Policy`] before evaluation, so a merged value can carry basic formatting
//! but never scripts, event handlers or foreign URL schemes. Template text
//! itself is authored by the template owner and is not touched.

mod html;
mod policy;

use serde_json::Value;

use crate::context::Context;

pub use policy::{AttributeRule, Policy, PolicyBuilder};

/// Sanitizes every string value of a context, including strings nested in
/// arrays and objects. Other values pass through unchanged.
pub fn sanitize(policy: &Policy, context: Context) -> Context {
    context
        .into_iter()
        .map(|(key, value)| {
            let value = sanitize_value(policy, value);
            (key, value)
        })
        .collect()
}

/// Sanitizes one value
pub fn sanitize_value(policy: &Policy, value: Value) -> Value {
    match value {
        Value::String(text) => {
            let clean = policy.sanitize(&text);
            if clean != text {
                log::debug!("sanitizer rewrote a {} byte value", text.len());
            }
            Value::String(clean)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| sanitize_value(policy, item))
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, item)| (key, sanitize_value(policy, item)))
                .collect(),
        ),
        other => other,
    }
}
