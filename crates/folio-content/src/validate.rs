//! Whole-document validation into typed sections.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::{ExternalLink, IconSet, ListEntry, RawDocument, RawSection};

/// A validated content document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Sections in page order (never empty)
    pub sections: Vec<Section>,

    /// Icon sets, if the document declares them
    pub icons: Option<IconSet>,

    /// External links in document order
    pub ext: Option<IndexMap<String, ExternalLink>>,
}

/// A validated section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Unique slug
    pub slug: String,

    /// Display title
    pub title: String,

    /// Kind-specific body
    pub kind: SectionKind,
}

impl Section {
    /// Id of the section's container element.
    pub fn container_id(&self) -> String {
        format!("{}-section", self.slug)
    }

    /// Same-page anchor pointing at the section.
    pub fn anchor(&self) -> String {
        format!("#{}", self.container_id())
    }
}

/// The closed set of section kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionKind {
    /// A paragraph of trusted markup (`pg`)
    Paragraph { body: String },

    /// A list of entries (`ls`)
    List { entries: Vec<ListEntry> },

    /// A downloadable resume with inline preview (`rs`)
    Resume { file: String, caption: Option<String> },
}

impl SectionKind {
    /// Short name used in class names and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::List { .. } => "list",
            Self::Resume { .. } => "resume",
        }
    }
}

/// The type tag of a section on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindTag {
    Paragraph,
    List,
    Resume,
}

impl KindTag {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "pg" | "paragraph" => Some(Self::Paragraph),
            "ls" | "list" => Some(Self::List),
            "rs" | "resume" => Some(Self::Resume),
            _ => None,
        }
    }
}

/// A single problem found in a content document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    #[error("document has no sections")]
    NoSections,

    #[error("section {index}: missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("section {index}: unknown type {value:?}")]
    UnknownType { index: usize, value: String },

    #[error("section {index}: slug {slug:?} must not contain whitespace")]
    InvalidSlug { index: usize, slug: String },

    #[error("section {index}: slug {slug:?} already used by section {first}")]
    DuplicateSlug {
        index: usize,
        slug: String,
        first: usize,
    },

    #[error("section {index}: `{field}` must be {expected}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("section {index}: body must be {expected}")]
    InvalidBody {
        index: usize,
        expected: &'static str,
    },
}

/// The document was rejected. Holds every problem found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", format_problems(.problems))]
pub struct ValidationError {
    pub problems: Vec<Problem>,
}

fn format_problems(problems: &[Problem]) -> String {
    let mut out = format!(
        "content document is invalid ({} problem{})",
        problems.len(),
        if problems.len() == 1 { "" } else { "s" }
    );
    for problem in problems {
        out.push_str("; ");
        out.push_str(&problem.to_string());
    }
    out
}

/// Validate a raw document.
///
/// All problems are collected; any problem rejects the whole document.
pub fn validate(raw: RawDocument) -> Result<Document, ValidationError> {
    let mut problems = Vec::new();
    let raw_sections = raw.sections.unwrap_or_default();

    if raw_sections.is_empty() {
        problems.push(Problem::NoSections);
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut sections = Vec::with_capacity(raw_sections.len());

    for (index, raw_section) in raw_sections.into_iter().enumerate() {
        if let Some(slug) = as_text(&raw_section.section) {
            if let Some(&first) = seen.get(slug) {
                problems.push(Problem::DuplicateSlug {
                    index,
                    slug: slug.to_string(),
                    first,
                });
            } else {
                seen.insert(slug.to_string(), index);
            }
        }

        if let Some(section) = validate_section(index, raw_section, &mut problems) {
            sections.push(section);
        }
    }

    if !problems.is_empty() {
        return Err(ValidationError { problems });
    }

    Ok(Document {
        sections,
        icons: raw.icons,
        ext: raw.ext,
    })
}

fn validate_section(index: usize, raw: RawSection, problems: &mut Vec<Problem>) -> Option<Section> {
    let before = problems.len();

    let slug = text_field(index, "section", &raw.section, problems).map(str::to_string);
    if let Some(s) = &slug {
        if s.chars().any(char::is_whitespace) {
            problems.push(Problem::InvalidSlug {
                index,
                slug: s.clone(),
            });
        }
    }

    let title = text_field(index, "title", &raw.title, problems).map(str::to_string);

    let tag = match text_field(index, "type", &raw.kind, problems) {
        None => None,
        Some(value) => {
            let tag = KindTag::parse(value);
            if tag.is_none() {
                problems.push(Problem::UnknownType {
                    index,
                    value: value.to_string(),
                });
            }
            tag
        }
    };

    let kind = tag.and_then(|tag| section_kind(index, tag, &raw, problems));

    if problems.len() > before {
        return None;
    }

    Some(Section {
        slug: slug?,
        title: title?,
        kind: kind?,
    })
}

fn section_kind(
    index: usize,
    tag: KindTag,
    raw: &RawSection,
    problems: &mut Vec<Problem>,
) -> Option<SectionKind> {
    match tag {
        KindTag::Paragraph => match &raw.body {
            None | Some(Value::Null) => {
                problems.push(Problem::MissingField {
                    index,
                    field: "body",
                });
                None
            }
            Some(Value::String(body)) => Some(SectionKind::Paragraph { body: body.clone() }),
            Some(_) => {
                problems.push(Problem::InvalidBody {
                    index,
                    expected: "a string",
                });
                None
            }
        },
        KindTag::List => match &raw.body {
            None | Some(Value::Null) => {
                problems.push(Problem::MissingField {
                    index,
                    field: "body",
                });
                None
            }
            Some(body @ Value::Array(_)) => {
                match serde_json::from_value::<Vec<ListEntry>>(body.clone()) {
                    Ok(entries) => Some(SectionKind::List { entries }),
                    Err(_) => {
                        problems.push(Problem::InvalidBody {
                            index,
                            expected: "an array of list entries",
                        });
                        None
                    }
                }
            }
            Some(_) => {
                problems.push(Problem::InvalidBody {
                    index,
                    expected: "an array of list entries",
                });
                None
            }
        },
        KindTag::Resume => {
            let caption = match &raw.body {
                None | Some(Value::Null) => None,
                Some(Value::String(caption)) => Some(caption.clone()),
                Some(_) => {
                    problems.push(Problem::InvalidBody {
                        index,
                        expected: "a string caption",
                    });
                    return None;
                }
            };

            text_field(index, "file", &raw.file, problems).map(|file| SectionKind::Resume {
                file: file.to_string(),
                caption,
            })
        }
    }
}

/// Trimmed, non-empty string content of a field, if it holds any.
fn as_text(value: &Option<Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) => Some(s.trim()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// A required string field. Records a problem when it is absent, blank or
/// not a string.
fn text_field<'a>(
    index: usize,
    field: &'static str,
    value: &'a Option<Value>,
    problems: &mut Vec<Problem>,
) -> Option<&'a str> {
    match value {
        None | Some(Value::Null) | Some(Value::String(_)) => {
            let text = as_text(value);
            if text.is_none() {
                problems.push(Problem::MissingField { index, field });
            }
            text
        }
        Some(_) => {
            problems.push(Problem::InvalidField {
                index,
                field,
                expected: "a string",
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Document, ValidationError> {
        validate(RawDocument::from_json(source).unwrap())
    }

    #[test]
    fn accepts_all_section_kinds() {
        let doc = parse(
            r#"{ "sections": [
                { "section": "about", "title": "About", "type": "pg", "body": "Hello" },
                { "section": "work", "title": "Work", "type": "ls",
                  "body": [ { "header": "Acme", "main": "<p>Built things</p>" }, {} ] },
                { "section": "cv", "title": "Resume", "type": "rs", "file": "cv.pdf" }
            ] }"#,
        )
        .unwrap();

        assert_eq!(doc.sections.len(), 3);
        assert_eq!(
            doc.sections[0].kind,
            SectionKind::Paragraph {
                body: "Hello".to_string()
            }
        );
        let SectionKind::List { entries } = &doc.sections[1].kind else {
            panic!("expected list");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].header.as_deref(), Some("Acme"));
        assert_eq!(entries[1], ListEntry::default());
        assert_eq!(
            doc.sections[2].kind,
            SectionKind::Resume {
                file: "cv.pdf".to_string(),
                caption: None
            }
        );
        assert_eq!(doc.sections[0].anchor(), "#about-section");
    }

    #[test]
    fn rejects_empty_sections() {
        let err = parse(r#"{ "sections": [] }"#).unwrap_err();
        assert_eq!(err.problems, vec![Problem::NoSections]);

        let err = parse("{}").unwrap_err();
        assert_eq!(err.problems, vec![Problem::NoSections]);
    }

    #[test]
    fn rejects_missing_title() {
        let err = parse(r#"{ "sections": [ { "section": "a", "type": "pg", "body": "x" } ] }"#)
            .unwrap_err();

        assert_eq!(
            err.problems,
            vec![Problem::MissingField {
                index: 0,
                field: "title"
            }]
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let err = parse(
            r#"{ "sections": [ { "section": "a", "title": "A", "type": "video", "body": "x" } ] }"#,
        )
        .unwrap_err();

        assert_eq!(
            err.problems,
            vec![Problem::UnknownType {
                index: 0,
                value: "video".to_string()
            }]
        );
    }

    #[test]
    fn collects_every_problem() {
        let err = parse(
            r#"{ "sections": [
                { "title": "No slug", "type": "pg", "body": "x" },
                { "section": "b", "type": "ls", "body": "not a list" },
                { "section": "c", "title": "C", "type": "rs" },
                { "section": "c", "title": "Again", "type": "pg", "body": "y" }
            ] }"#,
        )
        .unwrap_err();

        assert_eq!(
            err.problems,
            vec![
                Problem::MissingField {
                    index: 0,
                    field: "section"
                },
                Problem::MissingField {
                    index: 1,
                    field: "title"
                },
                Problem::InvalidBody {
                    index: 1,
                    expected: "an array of list entries"
                },
                Problem::MissingField {
                    index: 2,
                    field: "file"
                },
                Problem::DuplicateSlug {
                    index: 3,
                    slug: "c".to_string(),
                    first: 2
                },
            ]
        );
        assert!(err.to_string().contains("5 problems"));
    }

    #[test]
    fn collects_wrong_field_types_with_other_problems() {
        let err = parse(
            r#"{ "sections": [
                { "section": "a", "title": 3, "type": "video", "body": "x" },
                { "section": ["b"], "title": "B", "type": "rs", "file": false }
            ] }"#,
        )
        .unwrap_err();

        assert_eq!(
            err.problems,
            vec![
                Problem::InvalidField {
                    index: 0,
                    field: "title",
                    expected: "a string"
                },
                Problem::UnknownType {
                    index: 0,
                    value: "video".to_string()
                },
                Problem::InvalidField {
                    index: 1,
                    field: "section",
                    expected: "a string"
                },
                Problem::InvalidField {
                    index: 1,
                    field: "file",
                    expected: "a string"
                },
            ]
        );
        assert_eq!(
            err.to_string(),
            "content document is invalid (4 problems); \
             section 0: `title` must be a string; \
             section 0: unknown type \"video\"; \
             section 1: `section` must be a string; \
             section 1: `file` must be a string"
        );
    }

    #[test]
    fn single_problem_message_is_singular() {
        let err = parse("{}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "content document is invalid (1 problem); document has no sections"
        );
    }

    #[test]
    fn rejects_whitespace_in_slug() {
        let err = parse(
            r#"{ "sections": [ { "section": "my about", "title": "A", "type": "pg", "body": "x" } ] }"#,
        )
        .unwrap_err();

        assert!(matches!(err.problems[0], Problem::InvalidSlug { .. }));
    }

    #[test]
    fn keeps_icons_and_links() {
        let doc = parse(
            r#"{ "sections": [ { "section": "a", "title": "A", "type": "pg", "body": "x" } ],
                 "icons": { "languages": ["l1"], "tools": ["t1", "t2"] },
                 "ext": { "gh": { "icon": "fa fa-github", "link": "https://github.com" } } }"#,
        )
        .unwrap();

        assert_eq!(doc.icons.unwrap().tools.len(), 2);
        assert_eq!(doc.ext.unwrap()["gh"].link, "https://github.com");
    }
}
