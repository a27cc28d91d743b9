//! Allow-list policy for markup in data values
//!
//! # Example
//!
//! ```rust
//! use mailmerge_engine::sanitizer::Policy;
//!
//! let policy = Policy::builder()
//!     .allow_standard_url_protocols()
//!     .allow_elements(&["a", "b", "p"])
//!     .allow_attributes(&["href"])
//!     .on_elements(&["a"])
//!     .build();
//! assert_eq!(
//!     policy.sanitize(r#"<p onclick="x()"><a href="https://example.com">hi</a></p>"#),
//!     r#"<p><a href="https://example.com">hi</a></p>"#
//! );
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::sanitizer::html::sanitize_html;

/// Attributes whose value is a URL and must use an allowed protocol
const URL_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "cite",
    "action",
    "formaction",
    "background",
    "poster",
    "xlink:href",
];

/// Fragments that make a `style` value able to load or run code
const UNSAFE_STYLE: &[&str] = &[
    "expression",
    "url(",
    "javascript:",
    "vbscript:",
    "@import",
    "behavior",
    "-moz-binding",
    "<",
    "\\",
];

/// An immutable set of allowed elements, attributes and URL protocols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    elements: BTreeSet<String>,
    /// element -> attributes allowed on it
    attributes: BTreeMap<String, BTreeSet<String>>,
    url_protocols: BTreeSet<String>,
}

impl Policy {
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// A policy that allows no markup at all
    pub fn text_only() -> Self {
        Self::builder().build()
    }

    pub fn allows_element(&self, element: &str) -> bool {
        self.elements.contains(element)
    }

    /// Whether `attribute` may appear on `element` with the given value
    ///
    /// `value` is the parsed value, with character references already resolved.
    pub fn allows_attribute(&self, element: &str, attribute: &str, value: &str) -> bool {
        let allowed = self
            .attributes
            .get(element)
            .is_some_and(|attributes| attributes.contains(attribute));
        if !allowed {
            return false;
        }
        if URL_ATTRIBUTES.contains(&attribute) {
            return self.allows_url(value);
        }
        if attribute == "style" {
            return allows_style(value);
        }
        true
    }

    /// Relative URLs are allowed; absolute ones need an allowed protocol
    pub fn allows_url(&self, url: &str) -> bool {
        let url: String = url
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect();
        match url.find([':', '/', '?', '#']) {
            Some(pos) if url[pos..].starts_with(':') => {
                self.url_protocols.contains(&url[..pos].to_ascii_lowercase())
            }
            _ => true,
        }
    }

    /// Rewrites `html` so only allowed markup survives
    pub fn sanitize(&self, html: &str) -> String {
        sanitize_html(self, html)
    }
}

fn allows_style(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    !UNSAFE_STYLE.iter().any(|unsafe_part| value.contains(unsafe_part))
}

/// The policy of the mail merge service: basic formatting, lists, links and
/// `class`/`style` hooks on containers
impl Default for Policy {
    fn default() -> Self {
        Self::builder()
            .allow_standard_url_protocols()
            .allow_elements(&[
                "a", "b", "i", "u", "p", "br", "strong", "em", "ul", "ol", "li", "span", "div",
            ])
            .allow_attributes(&["href", "class", "style"])
            .on_elements(&["a", "span", "div"])
            .build()
    }
}

/// Builds a [`Policy`]
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    elements: BTreeSet<String>,
    attributes: BTreeMap<String, BTreeSet<String>>,
    url_protocols: BTreeSet<String>,
}

impl PolicyBuilder {
    pub fn allow_elements(mut self, elements: &[&str]) -> Self {
        self.elements
            .extend(elements.iter().map(|element| element.to_ascii_lowercase()));
        self
    }

    /// Starts an attribute rule; finish it with [`AttributeRule::on_elements`]
    pub fn allow_attributes<'b>(self, attributes: &'b [&'b str]) -> AttributeRule<'b> {
        AttributeRule {
            builder: self,
            attributes,
        }
    }

    pub fn allow_url_protocols(mut self, protocols: &[&str]) -> Self {
        self.url_protocols
            .extend(protocols.iter().map(|protocol| protocol.to_ascii_lowercase()));
        self
    }

    /// `http`, `https` and `mailto`
    pub fn allow_standard_url_protocols(self) -> Self {
        self.allow_url_protocols(&["http", "https", "mailto"])
    }

    pub fn build(self) -> Policy {
        Policy {
            elements: self.elements,
            attributes: self.attributes,
            url_protocols: self.url_protocols,
        }
    }
}

/// A pending `allow_attributes(..)` call
#[derive(Debug)]
pub struct AttributeRule<'b> {
    builder: PolicyBuilder,
    attributes: &'b [&'b str],
}

impl AttributeRule<'_> {
    pub fn on_elements(mut self, elements: &[&str]) -> PolicyBuilder {
        for element in elements {
            self.builder
                .attributes
                .entry(element.to_ascii_lowercase())
                .or_default()
                .extend(self.attributes.iter().map(|attribute| attribute.to_ascii_lowercase()));
        }
        self.builder
    }
}
