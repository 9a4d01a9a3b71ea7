//! Initialize a folio project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    let written = write_defaults(config_path, Path::new("content.json"), yes)?;
    if written == 0 {
        tracing::warn!("Project already initialized. Use --yes to overwrite.");
        return Ok(());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

/// Write the default config and sample content, skipping existing files
/// unless `overwrite` is set. Returns how many files were written.
fn write_defaults(config_path: &Path, content_path: &Path, overwrite: bool) -> Result<usize> {
    let mut written = 0;

    for (path, body) in [(config_path, DEFAULT_CONFIG), (content_path, DEFAULT_CONTENT)] {
        if path.exists() && !overwrite {
            tracing::debug!("Keeping existing {}", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
        written += 1;
    }

    Ok(written)
}

const DEFAULT_CONFIG: &str = r#"# folio configuration

[site]
# Site title
title = "Jane Doe"

# Content document: a local path or an http(s) URL
content = "content.json"

# Output directory for built site
output = "dist"

# Base URL (for deployment)
base_url = "/"

# Extra stylesheets
styles = []

# Directory with files linked from resume sections
# resume_dir = "files"

[render]
fetch_timeout_secs = 10
breakpoint_px = 768
resume_preview = true

[theme]
# Where `folio theme` saves the chosen theme
store = ".folio/preferences.json"

[build]
# Enable minification
minify = true
"#;

const DEFAULT_CONTENT: &str = r#"{
  "sections": [
    {
      "section": "about",
      "title": "About",
      "type": "pg",
      "body": "Hi, I'm Jane. I build <strong>fast</strong> and reliable software."
    },
    {
      "section": "experience",
      "title": "Experience",
      "type": "ls",
      "body": [
        {
          "header": "Acme Corp",
          "subheader": "Senior Engineer",
          "subsubheader": "2021 - present",
          "main": "<p>Led the storage team.</p>"
        },
        {
          "header": "Initech",
          "subheader": "Engineer",
          "subsubheader": "2017 - 2021"
        }
      ]
    }
  ],
  "icons": {
    "languages": ["devicon-rust-plain", "devicon-python-plain"],
    "tools": ["devicon-git-plain", "devicon-docker-plain"]
  },
  "ext": {
    "GitHub": { "icon": "fa fa-github", "link": "https://github.com/" },
    "Email": { "icon": "fa fa-envelope", "link": "mailto:jane@example.com" }
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::{validate, RawDocument};
    use tempfile::tempdir;

    #[test]
    fn writes_valid_defaults() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("folio.toml");
        let content = temp.path().join("content.json");

        assert_eq!(write_defaults(&config, &content, false).unwrap(), 2);

        let parsed = crate::config::load_config(&config).unwrap();
        assert_eq!(parsed.site.title, "Jane Doe");

        let raw = RawDocument::from_json(&fs::read_to_string(&content).unwrap()).unwrap();
        let doc = validate(raw).unwrap();
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn keeps_existing_files_unless_overwriting() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("folio.toml");
        let content = temp.path().join("content.json");
        fs::write(&content, "{}").unwrap();

        assert_eq!(write_defaults(&config, &content, false).unwrap(), 1);
        assert_eq!(fs::read_to_string(&content).unwrap(), "{}");

        assert_eq!(write_defaults(&config, &content, true).unwrap(), 2);
        assert!(fs::read_to_string(&content).unwrap().contains("sections"));
    }
}
