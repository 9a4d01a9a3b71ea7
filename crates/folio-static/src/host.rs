//! Host page skeleton and cached container lookups.

use std::collections::HashMap;

use folio_dom::{build, chain, text_element, DomError, Element, Options};

/// A container the renderer writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Navigation list (required)
    NavList,
    /// Main content region (required)
    Content,
    /// Language icon list
    Languages,
    /// Tool icon list
    Tools,
    /// External link bar
    ExtLinks,
}

impl Slot {
    /// Every slot, in render order.
    pub const ALL: [Slot; 5] = [
        Slot::NavList,
        Slot::Content,
        Slot::Languages,
        Slot::Tools,
        Slot::ExtLinks,
    ];

    /// The element id the slot is found under.
    pub fn id(self) -> &'static str {
        match self {
            Slot::NavList => "nav-list",
            Slot::Content => "content",
            Slot::Languages => "languages",
            Slot::Tools => "tools",
            Slot::ExtLinks => "ext-links",
        }
    }

    /// Whether rendering cannot proceed without this container.
    pub fn is_required(self) -> bool {
        matches!(self, Slot::NavList | Slot::Content)
    }
}

/// The page skeleton the renderer populates.
#[derive(Debug, Clone, PartialEq)]
pub struct HostPage {
    root: Element,
}

impl HostPage {
    /// Wrap an existing element tree.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The default single-page layout with every container present.
    pub fn standard(site_title: &str) -> Result<Self, DomError> {
        let menu = build(
            "button",
            Options::new()
                .class("menu-btn")
                .attr("type", "button")
                .attr("aria-controls", "sidebar")
                .attr("aria-expanded", "false")
                .text("Menu"),
        )?;
        let title = build("h1", Options::new().class("site-title").text(site_title))?;
        let toggle = build(
            "button",
            Options::new()
                .id("theme-toggle")
                .class("theme-toggle")
                .attr("type", "button")
                .attr("aria-label", "Toggle color theme"),
        )?;
        let header = build(
            "header",
            Options::new()
                .class("site-header")
                .children([menu, title, toggle]),
        )?;

        let nav = chain![
            build("nav", Options::new().id("sidebar").class("sidebar"))?,
            build("ul", Options::new().id(Slot::NavList.id()).class("nav-list"))?
        ];

        let main = build("main", Options::new().id(Slot::Content.id()).class("main"))?;

        let skills = build(
            "aside",
            Options::new().class("skills").children([
                text_element("h2", "Languages")?,
                build("ul", Options::new().id(Slot::Languages.id()).class("icon-list"))?,
                text_element("h2", "Tools")?,
                build("ul", Options::new().id(Slot::Tools.id()).class("icon-list"))?,
            ]),
        )?;

        let footer = chain![
            build("footer", Options::new().class("site-footer"))?,
            build("div", Options::new().id(Slot::ExtLinks.id()).class("ext-links"))?
        ];

        let mut root = build("div", Options::new().class("layout"))?;
        root.append(header);
        root.append_fragment(nav);
        root.append(main);
        root.append(skills);
        root.append_fragment(footer);

        Ok(Self { root })
    }

    /// Root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable root element.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Look up a container by slot without the cache.
    pub fn container(&self, slot: Slot) -> Option<&Element> {
        self.root.find_by_id(slot.id())
    }

    /// Serialize the page body.
    pub fn to_html(&self) -> String {
        self.root.to_html()
    }
}

/// Cached child-index paths to the page's containers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerCache {
    paths: HashMap<Slot, Vec<usize>>,
}

impl ContainerCache {
    /// Query every slot in the page.
    pub fn scan(page: &HostPage) -> Self {
        let paths = Slot::ALL
            .iter()
            .filter_map(|&slot| page.root.path_to_id(slot.id()).map(|p| (slot, p)))
            .collect();
        Self { paths }
    }

    /// Cached path for a slot.
    pub fn path(&self, slot: Slot) -> Option<&[usize]> {
        self.paths.get(&slot).map(Vec::as_slice)
    }

    /// Whether a slot was found.
    pub fn contains(&self, slot: Slot) -> bool {
        self.paths.contains_key(&slot)
    }

    /// First required slot missing from the page.
    pub fn missing_required(&self) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.is_required() && !self.contains(*slot))
    }

    /// Drop every cached path.
    pub fn invalidate(&mut self) {
        self.paths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_page_has_every_container() {
        let page = HostPage::standard("My Site").unwrap();
        let cache = ContainerCache::scan(&page);

        for slot in Slot::ALL {
            assert!(cache.contains(slot), "missing {:?}", slot);
            let el = page.root().at_path(cache.path(slot).unwrap()).unwrap();
            assert_eq!(el.id(), Some(slot.id()));
        }
        assert_eq!(cache.missing_required(), None);
    }

    #[test]
    fn nav_list_is_nested_in_sidebar() {
        let page = HostPage::standard("Site").unwrap();
        let sidebar = page.root().find_by_id("sidebar").unwrap();

        assert_eq!(sidebar.tag(), "nav");
        assert_eq!(
            sidebar.child_elements().next().and_then(Element::id),
            Some("nav-list")
        );
    }

    #[test]
    fn reports_missing_required_container() {
        let root = build("div", Options::new().child(
            build("main", Options::new().id("content")).unwrap(),
        ))
        .unwrap();
        let cache = ContainerCache::scan(&HostPage::new(root));

        assert_eq!(cache.missing_required(), Some(Slot::NavList));
        assert!(!cache.contains(Slot::Tools));
    }

    #[test]
    fn escapes_site_title() {
        let page = HostPage::standard("Tom & Jerry").unwrap();
        assert!(page.to_html().contains("Tom &amp; Jerry"));
    }
}
