//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use folio_content::ContentSource;
use folio_dom::DomError;

use crate::assets::AssetPipeline;
use crate::host::HostPage;
use crate::renderer::{RenderConfig, RenderError, Renderer};
use crate::templates::{PageContext, TemplateEngine};
use crate::theme::Theme;

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Where the content document is loaded from
    pub content: ContentSource,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Extra stylesheets, copied into `assets/`
    pub styles: Vec<PathBuf>,

    /// Directory of files referenced by resume sections, copied as-is
    pub resume_dir: Option<PathBuf>,

    /// Renderer settings
    pub render: RenderConfig,

    /// Theme written into the page before the runtime script runs
    pub theme: Theme,

    /// Width below which the navigation collapses
    pub breakpoint_px: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: ContentSource::File(PathBuf::from("content.json")),
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            title: "Portfolio".to_string(),
            styles: vec![],
            resume_dir: None,
            render: RenderConfig::default(),
            theme: Theme::default(),
            breakpoint_px: 768,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of sections rendered
    pub sections: usize,

    /// Render steps that failed without aborting the build
    pub failed: Vec<String>,

    /// Number of files copied from styles and the resume directory
    pub copied: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to build page skeleton: {0}")]
    SkeletonError(#[from] DomError),

    #[error("Failed to render content: {0}")]
    RenderError(#[from] RenderError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let skeleton = HostPage::standard(&self.config.title)?;
        let renderer = Renderer::new(
            self.config.render.clone(),
            self.config.content.clone(),
            skeleton,
        )?;
        let report = renderer.initialize().await?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let mut copied = self.copy_styles()?;
        copied += self.copy_resume_files()?;

        let html = self.render_index(renderer.page_html().await)?;
        fs::write(self.config.output_dir.join("index.html"), html)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        self.generate_assets()?;

        let duration = start.elapsed();

        Ok(BuildResult {
            sections: report.sections,
            failed: report.failed,
            copied,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Wrap the rendered body in the page shell.
    fn render_index(&self, body: String) -> Result<String, BuildError> {
        let styles = self
            .config
            .styles
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| format!("{}assets/{}", self.config.base_url, name.to_string_lossy()))
            .collect();

        let page = PageContext {
            title: self.config.title.clone(),
            body,
            theme: self.config.theme,
            base_url: self.config.base_url.clone(),
            styles,
            breakpoint_px: self.config.breakpoint_px,
            scripts: vec![],
        };

        self.templates
            .render_page(&page)
            .map_err(|e| BuildError::TemplateError(e.to_string()))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css(self.config.breakpoint_px);
        let css = if self.config.minify {
            match AssetPipeline::minify_css(&css) {
                Ok(minified) => minified,
                Err(e) => {
                    tracing::warn!("Keeping unminified CSS: {}", e);
                    css
                }
            }
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("main.js"), AssetPipeline::generate_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Copy configured stylesheets into `assets/`.
    fn copy_styles(&self) -> Result<usize, BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        let mut copied = 0;

        for source_path in &self.config.styles {
            if !source_path.is_file() {
                tracing::warn!("Stylesheet not found: {}", source_path.display());
                continue;
            }

            let filename = source_path
                .file_name()
                .map(|f| f.to_os_string())
                .unwrap_or_else(|| "style.css".into());
            let content = fs::read_to_string(source_path).map_err(|e| BuildError::ReadError {
                path: source_path.display().to_string(),
                message: e.to_string(),
            })?;

            fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;
            fs::write(assets_dir.join(filename), content)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;

            tracing::info!("Copied stylesheet from {}", source_path.display());
            copied += 1;
        }

        Ok(copied)
    }

    /// Copy the resume directory into the output under its own name.
    fn copy_resume_files(&self) -> Result<usize, BuildError> {
        let Some(resume_dir) = &self.config.resume_dir else {
            return Ok(0);
        };

        if !resume_dir.is_dir() {
            tracing::warn!("Resume directory not found: {}", resume_dir.display());
            return Ok(0);
        }

        let target_root = match resume_dir.file_name() {
            Some(name) => self.config.output_dir.join(name),
            None => self.config.output_dir.clone(),
        };

        let mut copied = 0;
        for entry in WalkDir::new(resume_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(resume_dir).unwrap_or(path);
            let target = target_root.join(relative);
            copy_file(path, &target)?;
            copied += 1;
        }

        tracing::info!("Copied {} resume files from {}", copied, resume_dir.display());
        Ok(copied)
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<(), BuildError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::copy(from, to).map_err(|e| BuildError::WriteError(format!("{}: {}", to.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::{ContentError, FetchError};
    use tempfile::tempdir;

    const CONTENT: &str = r#"{
        "sections": [
            { "section": "about", "title": "About", "type": "pg", "body": "Hello <em>there</em>" },
            { "section": "cv", "title": "Resume", "type": "rs", "file": "files/cv.pdf" }
        ],
        "icons": { "languages": ["devicon-rust-plain"], "tools": [] },
        "ext": { "github": { "icon": "fa fa-github", "link": "https://github.com/me" } }
    }"#;

    fn config_in(root: &Path) -> BuildConfig {
        let content = root.join("content.json");
        fs::write(&content, CONTENT).unwrap();

        BuildConfig {
            content: ContentSource::File(content),
            output_dir: root.join("dist"),
            title: "Jane Doe".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn builds_site() {
        let temp = tempdir().unwrap();
        let config = config_in(temp.path());
        let out = config.output_dir.clone();

        let result = SiteBuilder::new(config).build().await.unwrap();

        assert_eq!(result.sections, 2);
        assert!(result.failed.is_empty());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("<title>Jane Doe</title>"));
        assert!(html.contains(r#"id="about-section""#));
        assert!(html.contains("Hello <em>there</em>"));
        assert!(html.contains(r##"href="#cv-section""##));
        assert!(html.contains(r#"data-theme="light""#));
    }

    #[tokio::test]
    async fn copies_styles_and_resume_files() {
        let temp = tempdir().unwrap();
        let mut config = config_in(temp.path());

        let style = temp.path().join("custom.css");
        fs::write(&style, "body { color: red; }").unwrap();
        let files = temp.path().join("files");
        fs::create_dir_all(files.join("old")).unwrap();
        fs::write(files.join("cv.pdf"), b"%PDF").unwrap();
        fs::write(files.join("old").join("cv-2020.pdf"), b"%PDF").unwrap();

        config.styles = vec![style, temp.path().join("missing.css")];
        config.resume_dir = Some(files);
        config.minify = false;
        let out = config.output_dir.clone();

        let result = SiteBuilder::new(config).build().await.unwrap();

        assert_eq!(result.copied, 3);
        assert!(out.join("assets/custom.css").exists());
        assert!(out.join("files/cv.pdf").exists());
        assert!(out.join("files/old/cv-2020.pdf").exists());

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains(r#"href="/assets/custom.css""#));
    }

    #[tokio::test]
    async fn missing_content_fails_without_output() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let config = BuildConfig {
            content: ContentSource::File(temp.path().join("nope.json")),
            output_dir: out.clone(),
            ..Default::default()
        };

        let err = SiteBuilder::new(config).build().await.unwrap_err();

        assert!(matches!(
            err,
            BuildError::RenderError(RenderError::Content(ContentError::Fetch(FetchError::Io { .. })))
        ));
        assert!(!out.join("index.html").exists());
    }

    #[tokio::test]
    async fn writes_configured_theme() {
        let temp = tempdir().unwrap();
        let mut config = config_in(temp.path());
        config.theme = Theme::Dark;
        config.breakpoint_px = 900;
        let out = config.output_dir.clone();

        SiteBuilder::new(config).build().await.unwrap();

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains(r#"data-theme="dark""#));
        let css = fs::read_to_string(out.join("assets/main.css")).unwrap();
        assert!(css.contains("900px"));
    }
}
