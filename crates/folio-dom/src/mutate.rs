//! In-place element mutation: ids, classes and attributes.

use crate::build::{validate_attribute, DomError};
use crate::node::Element;

/// Set (overwrite) the element id.
pub fn set_id(element: &mut Element, id: &str) {
    element.set_attr_unchecked("id", id);
}

/// Remove the element id.
pub fn remove_id(element: &mut Element) {
    element.remove_attr("id");
}

/// Add space-separated class tokens, skipping ones already present.
pub fn add_class(element: &mut Element, classes: &str) {
    let mut tokens = current_classes(element);
    for class in classes.split_whitespace() {
        if !tokens.iter().any(|t| t == class) {
            tokens.push(class.to_string());
        }
    }
    write_classes(element, tokens);
}

/// Remove space-separated class tokens.
pub fn remove_class(element: &mut Element, classes: &str) {
    let remove: Vec<&str> = classes.split_whitespace().collect();
    let tokens = current_classes(element)
        .into_iter()
        .filter(|t| !remove.contains(&t.as_str()))
        .collect();
    write_classes(element, tokens);
}

/// Toggle each space-separated class token independently.
pub fn toggle_class(element: &mut Element, classes: &str) {
    let mut tokens = current_classes(element);
    let mut seen: Vec<&str> = Vec::new();
    for class in classes.split_whitespace() {
        // A token repeated in the input is toggled once.
        if seen.contains(&class) {
            continue;
        }
        seen.push(class);

        if let Some(pos) = tokens.iter().position(|t| t == class) {
            tokens.remove(pos);
        } else {
            tokens.push(class.to_string());
        }
    }
    write_classes(element, tokens);
}

/// Set attributes in iteration order.
///
/// Fails on the first invalid name; earlier pairs stay applied.
pub fn add_attributes<I, K, V>(element: &mut Element, attributes: I) -> Result<(), DomError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    for (name, value) in attributes {
        let name = name.as_ref();
        validate_attribute(name)?;
        element.set_attr_unchecked(name, value);
    }
    Ok(())
}

/// Remove space-separated attribute names.
pub fn remove_attributes(element: &mut Element, names: &str) {
    for name in names.split_whitespace() {
        element.remove_attr(name);
    }
}

fn current_classes(element: &Element) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for class in element.classes() {
        if !tokens.iter().any(|t| t == class) {
            tokens.push(class.to_string());
        }
    }
    tokens
}

/// Write tokens back; an empty set drops the attribute.
fn write_classes(element: &mut Element, tokens: Vec<String>) {
    if tokens.is_empty() {
        element.remove_attr("class");
    } else {
        element.set_attr_unchecked("class", tokens.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn div() -> Element {
        Element::new("div").unwrap()
    }

    #[test]
    fn sets_and_removes_id() {
        let mut el = div();
        set_id(&mut el, "one");
        set_id(&mut el, "two");
        assert_eq!(el.id(), Some("two"));

        remove_id(&mut el);
        assert_eq!(el.id(), None);
    }

    #[test]
    fn adds_classes_without_duplicates() {
        let mut el = div();
        add_class(&mut el, "card  wide");
        add_class(&mut el, "wide active");

        assert_eq!(el.attr("class"), Some("card wide active"));
    }

    #[test]
    fn removes_classes() {
        let mut el = div();
        add_class(&mut el, "a b c");
        remove_class(&mut el, "a c missing");
        assert_eq!(el.attr("class"), Some("b"));

        remove_class(&mut el, "b");
        assert!(!el.has_attr("class"));
    }

    #[test]
    fn toggles_each_token_independently() {
        let mut el = div();
        add_class(&mut el, "open dark");
        toggle_class(&mut el, "open hidden");

        assert!(!el.has_class("open"));
        assert!(el.has_class("hidden"));
        assert!(el.has_class("dark"));

        toggle_class(&mut el, "hidden hidden");
        assert!(!el.has_class("hidden"));
    }

    #[test]
    fn adds_attributes_in_order() {
        let mut el = div();
        add_attributes(&mut el, [("role", "list"), ("aria-label", "Tools")]).unwrap();

        let attrs: Vec<_> = el.attributes().collect();
        assert_eq!(attrs, vec![("role", "list"), ("aria-label", "Tools")]);
    }

    #[test]
    fn add_attributes_rejects_bad_names() {
        let mut el = div();
        let err = add_attributes(&mut el, [("ok", "1"), ("no=pe", "2")]).unwrap_err();

        assert_eq!(err, DomError::InvalidAttribute("no=pe".to_string()));
        assert_eq!(el.attr("ok"), Some("1"));
    }

    #[test]
    fn removes_attribute_set() {
        let mut el = div();
        add_attributes(&mut el, [("a", "1"), ("b", "2"), ("c", "3")]).unwrap();
        remove_attributes(&mut el, "a c");

        let attrs: Vec<_> = el.attributes().collect();
        assert_eq!(attrs, vec![("b", "2")]);
    }
}
