//! Content document model, validation and loading.
//!
//! A content document is a JSON file listing the sections of a single-page
//! site, plus optional icon sets and external links. Loading fetches the
//! document within a timeout, parses it, and validates it as a whole.

pub mod document;
pub mod fetch;
pub mod validate;

pub use document::{ExternalLink, IconSet, ListEntry, RawDocument, RawSection};
pub use fetch::{load, ContentError, ContentFetcher, ContentSource, FetchError};
pub use validate::{validate, Document, Problem, Section, SectionKind, ValidationError};
