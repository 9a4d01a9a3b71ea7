//! Declarative element options.
//!
//! Options are applied in order. Two keys are reserved: `inner` replaces the
//! element's content with trusted markup, and `children` appends nodes.
//! Every other key becomes an attribute.

use serde_json::Value;

use crate::build::{build, DomError};
use crate::node::Node;

/// Reserved key that sets the element's content.
pub const INNER_KEY: &str = "inner";

/// Reserved key that appends child nodes.
pub const CHILDREN_KEY: &str = "children";

/// A single option entry.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Replace content with trusted markup (not escaped)
    Inner(String),
    /// Replace content with text (escaped on output)
    Text(String),
    /// Append nodes in order
    Children(Vec<Node>),
    /// Set an attribute
    Attr(String, String),
}

/// Ordered options for building an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    entries: Vec<OptionValue>,
}

impl Options {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content to trusted markup.
    ///
    /// The markup is written verbatim, so it must come from a trusted
    /// source such as the site's own content document.
    pub fn inner(mut self, markup: impl Into<String>) -> Self {
        self.entries.push(OptionValue::Inner(markup.into()));
        self
    }

    /// Set the content to escaped text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.entries.push(OptionValue::Text(text.into()));
        self
    }

    /// Append one child.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.entries.push(OptionValue::Children(vec![node.into()]));
        self
    }

    /// Append several children in order.
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.entries.push(OptionValue::Children(
            nodes.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push(OptionValue::Attr(name.into(), value.into()));
        self
    }

    /// Shorthand for the `id` attribute.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Shorthand for the `class` attribute.
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in application order.
    pub fn entries(&self) -> &[OptionValue] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<OptionValue> {
        self.entries
    }

    /// Read options from a JSON object.
    ///
    /// `inner` takes a string. `children` takes an array whose items are
    /// strings (text nodes) or objects with a `tag` key plus nested options.
    /// Other keys become attributes: strings verbatim, numbers stringified,
    /// `true` as an empty (boolean) attribute, `false` and `null` skipped.
    pub fn from_json(value: &Value) -> Result<Self, DomError> {
        let map = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(DomError::InvalidOption {
                    key: String::new(),
                    message: format!("expected an object, found {}", json_kind(other)),
                })
            }
        };

        let mut options = Self::new();

        for (key, value) in map {
            match key.as_str() {
                INNER_KEY => {
                    let markup = scalar_to_string(key, value)?.unwrap_or_default();
                    options = options.inner(markup);
                }
                CHILDREN_KEY => {
                    let Value::Array(items) = value else {
                        return Err(DomError::InvalidOption {
                            key: key.clone(),
                            message: format!("expected an array, found {}", json_kind(value)),
                        });
                    };
                    let children = items
                        .iter()
                        .map(child_from_json)
                        .collect::<Result<Vec<_>, _>>()?;
                    options = options.children(children);
                }
                _ => match value {
                    Value::Bool(true) => options = options.attr(key.clone(), ""),
                    Value::Bool(false) | Value::Null => {}
                    _ => {
                        if let Some(text) = scalar_to_string(key, value)? {
                            options = options.attr(key.clone(), text);
                        }
                    }
                },
            }
        }

        Ok(options)
    }
}

/// Build a child node from its JSON description.
fn child_from_json(value: &Value) -> Result<Node, DomError> {
    match value {
        Value::String(text) => Ok(Node::Text(text.clone())),
        Value::Object(map) => {
            let tag = map
                .get("tag")
                .and_then(Value::as_str)
                .ok_or_else(|| DomError::InvalidOption {
                    key: CHILDREN_KEY.to_string(),
                    message: "child object is missing a string `tag`".to_string(),
                })?;

            let rest: serde_json::Map<String, Value> = map
                .iter()
                .filter(|(key, _)| key.as_str() != "tag")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let options = Options::from_json(&Value::Object(rest))?;

            Ok(Node::Element(build(tag, options)?))
        }
        other => Err(DomError::InvalidOption {
            key: CHILDREN_KEY.to_string(),
            message: format!("unsupported child {}", json_kind(other)),
        }),
    }
}

fn scalar_to_string(key: &str, value: &Value) -> Result<Option<String>, DomError> {
    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Null => Ok(None),
        other => Err(DomError::InvalidOption {
            key: key.to_string(),
            message: format!("expected a scalar, found {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn keeps_entry_order() {
        let options = Options::new().id("a").inner("<b>x</b>").class("c");

        assert_eq!(
            options.entries(),
            &[
                OptionValue::Attr("id".into(), "a".into()),
                OptionValue::Inner("<b>x</b>".into()),
                OptionValue::Attr("class".into(), "c".into()),
            ]
        );
    }

    #[test]
    fn reads_json_options() {
        let options = Options::from_json(&json!({
            "class": "card",
            "tabindex": 0,
            "hidden": true,
            "title": null,
            "inner": "<p>hi</p>",
        }))
        .unwrap();

        assert_eq!(
            options.entries(),
            &[
                OptionValue::Attr("class".into(), "card".into()),
                OptionValue::Attr("tabindex".into(), "0".into()),
                OptionValue::Attr("hidden".into(), "".into()),
                OptionValue::Inner("<p>hi</p>".into()),
            ]
        );
    }

    #[test]
    fn reads_nested_children() {
        let options = Options::from_json(&json!({
            "children": [
                "plain",
                { "tag": "span", "class": "x", "inner": "y" },
            ]
        }))
        .unwrap();

        let OptionValue::Children(children) = &options.entries()[0] else {
            panic!("expected children");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], Node::text("plain"));
        assert_eq!(
            children[1].to_html(),
            r#"<span class="x">y</span>"#
        );
    }

    #[test]
    fn null_is_empty_options() {
        assert!(Options::from_json(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_object_options() {
        let err = Options::from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, DomError::InvalidOption { .. }));
    }

    #[test]
    fn rejects_child_without_tag() {
        let err = Options::from_json(&json!({ "children": [{ "class": "x" }] })).unwrap_err();
        assert!(matches!(err, DomError::InvalidOption { key, .. } if key == "children"));
    }
}
