//! Content renderer: fetch, validate, and populate the host page.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use folio_content::{load, ContentError, ContentFetcher, Document, Section};
use folio_dom::{pack, DomError, Element};

use crate::host::{ContainerCache, HostPage, Slot};
use crate::sections;

/// Renderer settings, fixed at construction.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Upper bound on the content fetch
    pub fetch_timeout: Duration,

    /// Include the inline preview for resume sections
    pub resume_preview: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            resume_preview: true,
        }
    }
}

/// Errors that abort a render pass.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("A render pass is already in progress")]
    InFlight,

    #[error("Required container #{0} not found in host page")]
    MissingContainer(&'static str),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Summary of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    /// Section containers rendered
    pub sections: usize,
    /// Navigation entries rendered
    pub nav_entries: usize,
    /// Icon items rendered
    pub icons: usize,
    /// External links rendered
    pub links: usize,
    /// Steps or sections that failed, with the reason
    pub failed: Vec<String>,
}

/// Everything a render step needs, passed explicitly.
#[derive(Debug)]
pub struct RenderContext<'a> {
    page: HostPage,
    cache: ContainerCache,
    config: &'a RenderConfig,
}

impl<'a> RenderContext<'a> {
    /// Prepare a working copy of the page: check required containers and
    /// empty every owned container.
    pub fn new(page: HostPage, config: &'a RenderConfig) -> Result<Self, RenderError> {
        let cache = ContainerCache::scan(&page);
        if let Some(slot) = cache.missing_required() {
            return Err(RenderError::MissingContainer(slot.id()));
        }

        let mut ctx = Self {
            page,
            cache,
            config,
        };
        ctx.clear_owned();
        Ok(ctx)
    }

    /// Renderer settings.
    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// The working page.
    pub fn page(&self) -> &HostPage {
        &self.page
    }

    /// Whether the page has a container for this slot.
    pub fn has(&self, slot: Slot) -> bool {
        self.cache.contains(slot)
    }

    /// Cached container for a slot.
    pub fn container_mut(&mut self, slot: Slot) -> Option<&mut Element> {
        let path = self.cache.path(slot)?;
        self.page.root_mut().at_path_mut(path)
    }

    /// Re-query every container.
    pub fn rebuild_cache(&mut self) {
        self.cache.invalidate();
        self.cache = ContainerCache::scan(&self.page);
    }

    fn clear_owned(&mut self) {
        for slot in Slot::ALL {
            // Clearing one container can remove another nested inside it.
            self.rebuild_cache();
            if let Some(container) = self.container_mut(slot) {
                container.clear();
            }
        }
        self.rebuild_cache();
    }

    /// Finish the pass and hand back the page and its cache.
    pub fn into_parts(self) -> (HostPage, ContainerCache) {
        (self.page, self.cache)
    }
}

/// Render a validated document into the context's page.
///
/// Navigation, each section, icons and external links are independent:
/// a failure is logged, recorded in the report, and the pass continues.
pub fn render_document(ctx: &mut RenderContext<'_>, doc: &Document) -> RenderReport {
    render_document_with(ctx, doc, sections::section_container)
}

/// Like [`render_document`], with the section container builder supplied
/// by the caller.
pub fn render_document_with<B>(
    ctx: &mut RenderContext<'_>,
    doc: &Document,
    mut build_section: B,
) -> RenderReport
where
    B: FnMut(&Section, bool) -> Result<Element, DomError>,
{
    let mut report = RenderReport::default();

    match render_navigation(ctx, doc) {
        Ok(count) => report.nav_entries = count,
        Err(e) => {
            tracing::warn!("Failed to build navigation: {}", e);
            report.failed.push(format!("navigation: {}", e));
        }
    }

    let resume_preview = ctx.config.resume_preview;
    for section in &doc.sections {
        match build_section(section, resume_preview) {
            Ok(container) => {
                if let Some(content) = ctx.container_mut(Slot::Content) {
                    content.append(container);
                    report.sections += 1;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to build section {}: {}", section.slug, e);
                report
                    .failed
                    .push(format!("section {}: {}", section.slug, e));
            }
        }
    }

    match render_icons(ctx, doc) {
        Ok(count) => report.icons = count,
        Err(e) => {
            tracing::warn!("Failed to build icon lists: {}", e);
            report.failed.push(format!("icons: {}", e));
        }
    }

    match render_links(ctx, doc) {
        Ok(count) => report.links = count,
        Err(e) => {
            tracing::warn!("Failed to build external links: {}", e);
            report.failed.push(format!("links: {}", e));
        }
    }

    ctx.rebuild_cache();
    report
}

fn render_navigation(ctx: &mut RenderContext<'_>, doc: &Document) -> Result<usize, DomError> {
    let entries = doc
        .sections
        .iter()
        .map(sections::nav_entry)
        .collect::<Result<Vec<_>, _>>()?;
    let count = entries.len();

    if let Some(nav) = ctx.container_mut(Slot::NavList) {
        nav.append_fragment(pack(entries));
    }

    Ok(count)
}

fn render_icons(ctx: &mut RenderContext<'_>, doc: &Document) -> Result<usize, DomError> {
    let Some(icons) = &doc.icons else {
        return Ok(0);
    };

    let mut count = 0;
    for (slot, tokens) in [(Slot::Languages, &icons.languages), (Slot::Tools, &icons.tools)] {
        let Some(list) = ctx.container_mut(slot) else {
            tracing::debug!("No #{} container, skipping icons", slot.id());
            continue;
        };
        let items = sections::icon_items(tokens)?;
        count += items.len();
        list.append_fragment(items);
    }

    Ok(count)
}

fn render_links(ctx: &mut RenderContext<'_>, doc: &Document) -> Result<usize, DomError> {
    let Some(ext) = &doc.ext else {
        return Ok(0);
    };

    let Some(bar) = ctx.container_mut(Slot::ExtLinks) else {
        tracing::debug!("No #{} container, skipping external links", Slot::ExtLinks.id());
        return Ok(0);
    };

    let links = sections::external_links(ext)?;
    let count = links.len();
    bar.append_fragment(links);

    Ok(count)
}

/// Marks a render pass in progress; released on drop.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, RenderError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RenderError::InFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Rendered state visible to readers.
#[derive(Debug, Clone)]
struct RenderState {
    page: HostPage,
    cache: ContainerCache,
    document: Option<Document>,
    report: Option<RenderReport>,
}

/// Loads content and renders it into a host page, one pass at a time.
pub struct Renderer<F> {
    config: RenderConfig,
    fetcher: F,
    skeleton: HostPage,
    state: RwLock<RenderState>,
    in_flight: AtomicBool,
}

impl<F: ContentFetcher> Renderer<F> {
    /// Create a renderer for a host page.
    ///
    /// Fails if the page lacks a required container.
    pub fn new(config: RenderConfig, fetcher: F, skeleton: HostPage) -> Result<Self, RenderError> {
        let cache = ContainerCache::scan(&skeleton);
        if let Some(slot) = cache.missing_required() {
            return Err(RenderError::MissingContainer(slot.id()));
        }

        Ok(Self {
            config,
            fetcher,
            state: RwLock::new(RenderState {
                page: skeleton.clone(),
                cache,
                document: None,
                report: None,
            }),
            skeleton,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Run the first render pass.
    pub async fn initialize(&self) -> Result<RenderReport, RenderError> {
        let guard = FlightGuard::acquire(&self.in_flight)?;
        tracing::debug!("Initializing renderer");
        self.render_pass(guard).await
    }

    /// Drop the current document and rebuild every container from scratch.
    pub async fn refresh(&self) -> Result<RenderReport, RenderError> {
        let guard = FlightGuard::acquire(&self.in_flight)?;
        tracing::debug!("Refreshing rendered content");
        self.state.write().await.document = None;
        self.render_pass(guard).await
    }

    /// Whether a pass is running.
    pub fn is_rendering(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Renderer settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    async fn render_pass(&self, _guard: FlightGuard<'_>) -> Result<RenderReport, RenderError> {
        let document = match load(&self.fetcher, self.config.fetch_timeout).await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to load content: {}", e);
                return Err(e.into());
            }
        };

        let mut ctx = RenderContext::new(self.skeleton.clone(), &self.config)?;
        let report = render_document(&mut ctx, &document);
        let (page, cache) = ctx.into_parts();

        tracing::info!(
            "Rendered {} sections, {} nav entries, {} icons, {} links",
            report.sections,
            report.nav_entries,
            report.icons,
            report.links
        );

        *self.state.write().await = RenderState {
            page,
            cache,
            document: Some(document),
            report: Some(report.clone()),
        };

        Ok(report)
    }

    /// Snapshot of the current page.
    pub async fn page(&self) -> HostPage {
        self.state.read().await.page.clone()
    }

    /// Current page serialized to HTML.
    pub async fn page_html(&self) -> String {
        self.state.read().await.page.to_html()
    }

    /// Current HTML of one container, through the cache.
    pub async fn container_html(&self, slot: Slot) -> Option<String> {
        let state = self.state.read().await;
        let path = state.cache.path(slot)?;
        state.page.root().at_path(path).map(Element::to_html)
    }

    /// The document of the last successful pass.
    pub async fn document(&self) -> Option<Document> {
        self.state.read().await.document.clone()
    }

    /// Report of the last successful pass.
    pub async fn last_report(&self) -> Option<RenderReport> {
        self.state.read().await.report.clone()
    }
}
