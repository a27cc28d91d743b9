//! Template evaluation
//!
//! Walks a compiled template against a context and produces the rich output.
//! Evaluation cannot fail: a key that is missing, null, or holds an array or
//! object renders as nothing, and as false when used as a condition.

use serde_json::Value;

use crate::{
    context::Context,
    node::{CompiledTemplate, Node},
};

/// Renders a compiled template
pub fn render(template: &CompiledTemplate, context: &Context) -> String {
    let mut out = String::new();
    render_nodes(template.nodes(), context, &mut out);
    out
}

fn render_nodes(nodes: &[Node], context: &Context, out: &mut String) {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Variable(path) => write_value(context.lookup(path), out),
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if is_truthy(context.lookup(condition)) {
                    then_branch
                } else {
                    else_branch
                };
                render_nodes(branch, context, out);
            }
        }
    }
}

/// Absent, `null` and `false` are falsy; every other value is truthy
pub fn is_truthy(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null) | Some(Value::Bool(false)))
}

fn write_value(value: Option<&Value>, out: &mut String) {
    match value {
        Some(Value::String(text)) => out.push_str(text),
        Some(Value::Bool(true)) => out.push_str("true"),
        Some(Value::Bool(false)) => out.push_str("false"),
        Some(Value::Number(number)) => out.push_str(&number.to_string()),
        Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => (),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parser::compile;

    const GREETING: &str = "Hi {{name}}, {{#if premium}}Thanks for being a premium user!{{else}}Check out our premium plan.{{/if}}";

    fn eval(src: &str, data: Value) -> String {
        render(&compile(src).unwrap(), &Context::from(data))
    }

    #[test]
    fn premium_user() {
        assert_eq!(
            eval(GREETING, json!({"name": "Alice", "premium": true})),
            "Hi Alice, Thanks for being a premium user!"
        );
    }

    #[test]
    fn regular_user() {
        assert_eq!(
            eval(GREETING, json!({"name": "Bob", "premium": false})),
            "Hi Bob, Check out our premium plan."
        );
    }

    #[test]
    fn missing_data_falls_back() {
        assert_eq!(eval(GREETING, json!({})), "Hi , Check out our premium plan.");
        assert_eq!(eval("[{{undefined}}]", json!({"other": 1})), "[]");
        assert_eq!(eval("[{{#if nope}}x{{/if}}]", json!({})), "[]");
    }

    #[test]
    fn scalar_formatting() {
        let data = json!({"n": 42, "f": 3.5, "neg": -7, "yes": true, "no": false, "nil": null});
        assert_eq!(
            eval("{{n}} {{f}} {{neg}} {{yes}} {{no}} [{{nil}}]", data),
            "42 3.5 -7 true false []"
        );
    }

    #[test]
    fn opaque_values_render_empty() {
        let data = json!({"list": [1, 2], "obj": {"a": 1}});
        assert_eq!(eval("[{{list}}][{{obj}}]", data), "[][]");
    }

    #[test]
    fn truthiness() {
        let cases = [
            (json!({"k": true}), "T"),
            (json!({"k": false}), "F"),
            (json!({"k": null}), "F"),
            (json!({}), "F"),
            (json!({"k": ""}), "T"),
            (json!({"k": 0}), "T"),
            (json!({"k": "no"}), "T"),
            (json!({"k": []}), "T"),
            (json!({"k": {}}), "T"),
        ];
        for (data, expected) in cases {
            assert_eq!(eval("{{#if k}}T{{else}}F{{/if}}", data.clone()), expected, "{data}");
        }
    }

    #[test]
    fn unless_inverts() {
        let src = "{{#unless paid}}Please pay{{else}}Thanks{{/unless}}";
        assert_eq!(eval(src, json!({"paid": true})), "Thanks");
        assert_eq!(eval(src, json!({})), "Please pay");
    }

    #[test]
    fn nested_conditionals_and_paths() {
        let src = "{{#if user}}{{#if user.premium}}Gold {{user.name}}{{else}}{{user.name}}{{/if}}{{else}}Guest{{/if}}";
        assert_eq!(eval(src, json!({"user": {"name": "Ann", "premium": true}})), "Gold Ann");
        assert_eq!(eval(src, json!({"user": {"name": "Ann"}})), "Ann");
        assert_eq!(eval(src, json!({})), "Guest");
    }

    #[test]
    fn repeated_renders_are_identical() {
        let compiled = compile(GREETING).unwrap();
        let context = Context::from(json!({"name": "Alice", "premium": true}));
        assert_eq!(render(&compiled, &context), render(&compiled, &context));
    }
}
