//! Project configuration (folio.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use folio_content::ContentSource;
use folio_server::DevServerConfig;
use folio_static::{BuildConfig, FileStore, RenderConfig, Theme, ThemeController};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub site: SiteConfig,
    pub render: RenderSettings,
    pub theme: ThemeSettings,
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    /// Content document path or URL
    pub content: String,
    pub output: String,
    pub base_url: String,
    /// Paths to extra CSS stylesheets
    pub styles: Vec<String>,
    pub resume_dir: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub fetch_timeout_secs: u64,
    pub breakpoint_px: u32,
    pub resume_preview: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeSettings {
    /// Preferences file holding the saved theme
    pub store: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildSettings {
    pub minify: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            content: "content.json".to_string(),
            output: "dist".to_string(),
            base_url: "/".to_string(),
            styles: vec![],
            resume_dir: None,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            breakpoint_px: 768,
            resume_preview: true,
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            store: ".folio/preferences.json".to_string(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self { minify: true }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if config.render.fetch_timeout_secs == 0 {
        bail!(
            "Invalid {}: render.fetch_timeout_secs must be at least 1",
            path.display()
        );
    }

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

impl ConfigFile {
    pub fn content_source(&self) -> ContentSource {
        ContentSource::parse(&self.site.content)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            fetch_timeout: Duration::from_secs(self.render.fetch_timeout_secs),
            resume_preview: self.render.resume_preview,
        }
    }

    pub fn theme_store(&self) -> FileStore {
        FileStore::new(&self.theme.store)
    }

    /// Saved theme, or light when none is saved.
    pub fn saved_theme(&self) -> Result<Theme> {
        let controller = ThemeController::new(self.theme_store(), None)
            .context("Failed to read theme preference")?;
        Ok(controller.current())
    }

    pub fn build_config(&self, output: Option<PathBuf>, minify: Option<bool>) -> Result<BuildConfig> {
        Ok(BuildConfig {
            content: self.content_source(),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.site.output)),
            minify: minify.unwrap_or(self.build.minify),
            base_url: self.site.base_url.clone(),
            title: self.site.title.clone(),
            styles: self.site.styles.iter().map(PathBuf::from).collect(),
            resume_dir: self.site.resume_dir.as_ref().map(PathBuf::from),
            render: self.render_config(),
            theme: self.saved_theme()?,
            breakpoint_px: self.render.breakpoint_px,
        })
    }

    pub fn dev_config(&self, port: u16, open: bool) -> DevServerConfig {
        DevServerConfig {
            content: self.content_source(),
            title: self.site.title.clone(),
            styles: self.site.styles.iter().map(PathBuf::from).collect(),
            resume_dir: self.site.resume_dir.as_ref().map(PathBuf::from),
            theme_store: Some(PathBuf::from(&self.theme.store)),
            render: self.render_config(),
            breakpoint_px: self.render.breakpoint_px,
            port,
            open,
            ..Default::default()
        }
    }
}
