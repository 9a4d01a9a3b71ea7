//! Generated stylesheet and runtime script.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file, collapsing the sidebar below `breakpoint_px`.
    pub fn generate_css(breakpoint_px: u32) -> String {
        DEFAULT_CSS.replace("__BREAKPOINT__", &breakpoint_px.to_string())
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* folio */

:root,
[data-theme="light"] {
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f4f5f7;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #0969da;
  --primary-foreground: #ffffff;
  --sidebar-width: 240px;
  --radius: 0.375rem;
}

[data-theme="dark"] {
  --background: #0d1117;
  --foreground: #e6edf3;
  --muted: #161b22;
  --muted-foreground: #9198a1;
  --border: #30363d;
  --primary: #4493f8;
  --primary-foreground: #0d1117;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

html {
  scroll-behavior: smooth;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
  transition: background 0.2s, color 0.2s;
}

.hidden {
  display: none !important;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr 220px;
  grid-template-rows: auto 1fr auto;
  grid-template-areas:
    "header header header"
    "sidebar main skills"
    "footer footer footer";
  min-height: 100vh;
}

/* Header */
.site-header {
  grid-area: header;
  display: flex;
  align-items: center;
  gap: 1rem;
  padding: 1rem 1.5rem;
  border-bottom: 1px solid var(--border);
}

.site-title {
  flex: 1;
  font-size: 1.25rem;
}

.theme-toggle,
.menu-btn,
.resume-toggle {
  padding: 0.375rem 0.75rem;
  background: var(--muted);
  color: var(--foreground);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  cursor: pointer;
}

.theme-toggle::after {
  content: "Dark";
}

[data-theme="dark"] .theme-toggle::after {
  content: "Light";
}

.menu-btn {
  display: none;
}

/* Sidebar */
.sidebar {
  grid-area: sidebar;
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-list {
  list-style: none;
}

.nav-item {
  margin-bottom: 0.25rem;
}

.nav-link {
  display: block;
  padding: 0.5rem 0.75rem;
  color: var(--muted-foreground);
  text-decoration: none;
  border-radius: var(--radius);
}

.nav-link:hover,
.nav-item.active > .nav-link {
  background: var(--primary);
  color: var(--primary-foreground);
}

/* Sections */
.main {
  grid-area: main;
  padding: 2rem;
  max-width: 860px;
}

.section {
  margin-bottom: 3rem;
  scroll-margin-top: 1rem;
}

.section-title {
  font-size: 1.5rem;
  margin-bottom: 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.section-body {
  margin-bottom: 1rem;
}

.section-list {
  list-style: none;
}

.list-entry {
  margin-bottom: 1.5rem;
}

.entry-header {
  font-size: 1.125rem;
}

.entry-subheader {
  font-size: 1rem;
  color: var(--muted-foreground);
}

.entry-subsubheader {
  font-size: 0.875rem;
  font-weight: 400;
  color: var(--muted-foreground);
}

.entry-main {
  margin-top: 0.5rem;
}

.main a {
  color: var(--primary);
}

.resume-controls {
  display: flex;
  align-items: center;
  gap: 1rem;
  margin-bottom: 1rem;
}

.resume-preview {
  width: 100%;
  height: 80vh;
  border: 1px solid var(--border);
  border-radius: var(--radius);
}

/* Icons and links */
.skills {
  grid-area: skills;
  padding: 2rem 1rem;
}

.skills h2 {
  font-size: 0.875rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted-foreground);
  margin-bottom: 0.75rem;
}

.icon-list {
  display: flex;
  flex-wrap: wrap;
  gap: 0.75rem;
  list-style: none;
  margin-bottom: 1.5rem;
  font-size: 2rem;
}

.site-footer {
  grid-area: footer;
  border-top: 1px solid var(--border);
  padding: 1rem 1.5rem;
}

.ext-links {
  display: flex;
  justify-content: center;
  gap: 1.25rem;
  font-size: 1.5rem;
}

.ext-link {
  color: var(--muted-foreground);
}

.ext-link:hover {
  color: var(--primary);
}

/* Responsive */
@media (max-width: __BREAKPOINT__px) {
  .layout {
    grid-template-columns: 1fr;
    grid-template-areas:
      "header"
      "main"
      "skills"
      "footer";
  }

  .menu-btn {
    display: block;
  }

  .sidebar {
    position: fixed;
    left: -100%;
    z-index: 50;
    width: var(--sidebar-width);
    transition: left 0.3s;
  }

  .sidebar.open {
    left: 0;
  }
}
"#;

const DEFAULT_JS: &str = r#"// folio runtime
(function() {
  'use strict';

  const STORAGE_KEY = 'theme';
  const root = document.documentElement;
  const media = window.matchMedia('(prefers-color-scheme: dark)');

  function saved() {
    try {
      const value = localStorage.getItem(STORAGE_KEY);
      return value === 'light' || value === 'dark' ? value : null;
    } catch (err) {
      return null;
    }
  }

  function system() {
    return media.matches ? 'dark' : 'light';
  }

  function apply(theme) {
    root.setAttribute('data-theme', theme);
  }

  // Saved choice, then system preference, then light
  apply(saved() || system());

  const themeBtn = document.getElementById('theme-toggle');
  if (themeBtn) {
    themeBtn.addEventListener('click', () => {
      const next = root.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
      try {
        localStorage.setItem(STORAGE_KEY, next);
      } catch (err) {}
      apply(next);
    });
  }

  media.addEventListener('change', (event) => {
    if (!saved()) {
      apply(event.matches ? 'dark' : 'light');
    }
  });

  // Collapsible navigation below the breakpoint
  const breakpoint = parseInt(document.body.dataset.breakpoint || '768', 10);
  const menuBtn = document.querySelector('.menu-btn');
  const sidebar = document.getElementById('sidebar');
  const narrow = window.matchMedia('(max-width: ' + breakpoint + 'px)');

  function closeMenu() {
    if (sidebar) sidebar.classList.remove('open');
    if (menuBtn) menuBtn.setAttribute('aria-expanded', 'false');
  }

  if (menuBtn && sidebar) {
    menuBtn.addEventListener('click', () => {
      const open = sidebar.classList.toggle('open');
      menuBtn.setAttribute('aria-expanded', open ? 'true' : 'false');
    });
    narrow.addEventListener('change', (event) => {
      if (!event.matches) closeMenu();
    });
  }

  // Smooth scroll to sections and mark the active nav item
  document.querySelectorAll('.nav-link').forEach(link => {
    link.addEventListener('click', (event) => {
      const target = document.querySelector(link.getAttribute('href'));
      if (!target) return;
      event.preventDefault();
      target.scrollIntoView({ behavior: 'smooth', block: 'start' });
      history.replaceState(null, '', link.getAttribute('href'));
      document.querySelectorAll('.nav-item.active').forEach(item => item.classList.remove('active'));
      link.parentElement.classList.add('active');
      if (narrow.matches) closeMenu();
    });
  });

  // Resume preview toggles
  document.querySelectorAll('.resume-toggle').forEach(btn => {
    const preview = document.getElementById(btn.getAttribute('aria-controls'));
    if (!preview) return;
    btn.addEventListener('click', () => {
      const hidden = preview.classList.toggle('hidden');
      btn.setAttribute('aria-expanded', hidden ? 'false' : 'true');
      btn.textContent = hidden ? 'Show preview' : 'Hide preview';
    });
  });
})();
"#;
