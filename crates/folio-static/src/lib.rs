//! Content renderer and static site builder for folio.
//!
//! Renders a validated content document into a fixed page skeleton, tracks
//! the light/dark theme preference, and writes the finished site to disk.

pub mod assets;
pub mod builder;
pub mod host;
pub mod renderer;
pub mod sections;
pub mod templates;
pub mod theme;

pub use assets::AssetPipeline;
pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use host::{ContainerCache, HostPage, Slot};
pub use renderer::{
    render_document, render_document_with, RenderConfig, RenderContext, RenderError, RenderReport,
    Renderer,
};
pub use templates::{PageContext, TemplateEngine};
pub use theme::{FileStore, MemoryStore, PreferenceStore, Theme, ThemeController, ThemeError};
