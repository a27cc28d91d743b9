//! Compiled template representation
//!
//! A template compiles to an ordered list of [`Node`]s. The node set is closed:
//! literal text, merge fields and conditional blocks.

use std::{collections::BTreeSet, str::FromStr};

use crate::parser::{compiler::compile, error::ParseError};

/// A single element of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Text authored in the template, emitted verbatim
    Literal(String),
    /// A merge field resolved against the data context
    Variable(String),
    /// A block gated on the truthiness of one context key
    Conditional {
        condition: String,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },
}

/// Appends a node, merging adjacent literals
pub(crate) fn push_node(nodes: &mut Vec<Node>, node: Node) {
    if let Node::Literal(text) = &node {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Literal(last)) = nodes.last_mut() {
            last.push_str(text);
            return;
        }
    }
    nodes.push(node);
}

/// An immutable, parsed template ready for evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledTemplate {
    nodes: Vec<Node>,
}

impl CompiledTemplate {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// The top-level nodes in template order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every context key the template reads, sorted and deduplicated
    pub fn keys(&self) -> BTreeSet<&str> {
        let mut keys = BTreeSet::new();
        collect_keys(&self.nodes, &mut keys);
        keys
    }
}

fn collect_keys<'a>(nodes: &'a [Node], keys: &mut BTreeSet<&'a str>) {
    for node in nodes {
        match node {
            Node::Literal(_) => (),
            Node::Variable(path) => {
                keys.insert(path.as_str());
            }
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                keys.insert(condition.as_str());
                collect_keys(then_branch, keys);
                collect_keys(else_branch, keys);
            }
        }
    }
}

impl FromStr for CompiledTemplate {
    type Err = ParseError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        compile(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_literals_are_merged() {
        let mut nodes = Vec::new();
        push_node(&mut nodes, Node::Literal("Hi ".to_string()));
        push_node(&mut nodes, Node::Literal(String::new()));
        push_node(&mut nodes, Node::Literal("there".to_string()));
        push_node(&mut nodes, Node::Variable("name".to_string()));
        push_node(&mut nodes, Node::Literal("!".to_string()));
        assert_eq!(
            nodes,
            vec![
                Node::Literal("Hi there".to_string()),
                Node::Variable("name".to_string()),
                Node::Literal("!".to_string()),
            ]
        );
    }

    #[test]
    fn keys_cover_nested_blocks() {
        let template: CompiledTemplate = "{{name}}{{#if premium}}{{#unless trial}}{{plan}}{{/unless}}{{else}}{{name}}{{/if}}"
            .parse()
            .unwrap();
        let keys: Vec<_> = template.keys().into_iter().collect();
        assert_eq!(keys, vec!["name", "plan", "premium", "trial"]);
    }
}
