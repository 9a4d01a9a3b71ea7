//! Turning a tag plus options into an element.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::{Element, Node};
use crate::options::{OptionValue, Options};

/// Errors that can occur while building or mutating elements.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomError {
    #[error("Invalid tag name: {0:?}")]
    InvalidTag(String),

    #[error("Invalid attribute name: {0:?}")]
    InvalidAttribute(String),

    #[error("Invalid option {key:?}: {message}")]
    InvalidOption { key: String, message: String },
}

/// Build an element from a tag name and options.
///
/// Options are applied in order: `inner`/text replace the content,
/// children are appended, and attributes are set with later writes
/// overwriting earlier ones.
pub fn build(tag: &str, options: Options) -> Result<Element, DomError> {
    let mut element = Element::new(tag)?;

    for entry in options.into_entries() {
        match entry {
            OptionValue::Inner(markup) => element.set_inner(markup),
            OptionValue::Text(text) => element.set_text(text),
            OptionValue::Children(children) => {
                for child in children {
                    element.append(child);
                }
            }
            OptionValue::Attr(name, value) => {
                validate_attribute(&name)?;
                element.set_attr_unchecked(&name, value);
            }
        }
    }

    Ok(element)
}

/// Build an element holding only escaped text.
pub fn text_element(tag: &str, text: impl Into<String>) -> Result<Element, DomError> {
    let mut element = Element::new(tag)?;
    element.append(Node::Text(text.into()));
    Ok(element)
}

/// Check a tag name: an ASCII letter followed by letters, digits, `-`, `_` or `.`.
pub(crate) fn validate_tag(tag: &str) -> Result<(), DomError> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").expect("Invalid tag name regex")
    });

    if RE.is_match(tag) {
        Ok(())
    } else {
        Err(DomError::InvalidTag(tag.to_string()))
    }
}

/// Check an attribute name: non-empty, no whitespace, quotes, `>`, `/`, `=` or controls.
pub(crate) fn validate_attribute(name: &str) -> Result<(), DomError> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"^[^\s"'>/=\x00-\x1F\x7F]+$"#).expect("Invalid attribute name regex")
    });

    if RE.is_match(name) {
        Ok(())
    } else {
        Err(DomError::InvalidAttribute(name.to_string()))
    }
}
