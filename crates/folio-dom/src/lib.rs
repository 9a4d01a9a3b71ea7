//! Declarative element tree builder.
//!
//! This crate turns a tag name plus an options description into an owned
//! element tree, mutates elements in place (ids, classes, attributes), and
//! groups independently built nodes into fragments before a single attach.

pub mod build;
pub mod combinators;
pub mod mutate;
pub mod node;
pub mod options;

pub use build::{build, text_element, DomError};
pub use combinators::{chain, multibuild, pack};
pub use node::{Element, Fragment, Node};
pub use options::{OptionValue, Options};
