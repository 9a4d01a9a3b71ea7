//! Element builders for navigation, sections, icons and external links.

use indexmap::IndexMap;

use folio_content::{ExternalLink, ListEntry, Section, SectionKind};
use folio_dom::{build, mutate, multibuild, pack, DomError, Element, Fragment, Options};

/// Navigation entry: `<li class="nav-item"><a href="#slug-section">Title</a></li>`.
pub fn nav_entry(section: &Section) -> Result<Element, DomError> {
    let link = build(
        "a",
        Options::new()
            .attr("href", section.anchor())
            .class("nav-link")
            .text(section.title.as_str()),
    )?;
    build("li", Options::new().class("nav-item").child(link))
}

/// Container for one section, dispatched on its kind.
pub fn section_container(section: &Section, resume_preview: bool) -> Result<Element, DomError> {
    let mut container = build(
        "div",
        Options::new()
            .id(section.container_id())
            .class(format!("section section-{}", section.kind.name())),
    )?;
    container.append(build(
        "h2",
        Options::new().class("section-title").text(section.title.as_str()),
    )?);

    match &section.kind {
        SectionKind::Paragraph { body } => container.append(paragraph(body)?),
        SectionKind::List { entries } => container.append(list(entries)?),
        SectionKind::Resume { file, caption } => container.append_fragment(resume(
            &section.slug,
            file,
            caption.as_deref(),
            resume_preview,
        )?),
    }

    Ok(container)
}

/// Paragraph body. The markup is trusted and written verbatim.
fn paragraph(body: &str) -> Result<Element, DomError> {
    build("p", Options::new().class("section-body").inner(body))
}

/// List of entries, each with optional header levels and a markup body.
fn list(entries: &[ListEntry]) -> Result<Element, DomError> {
    let mut ul = build("ul", Options::new().class("section-list"))?;

    for entry in entries {
        let mut li = build("li", Options::new().class("list-entry"))?;

        let headers = [
            ("h3", "entry-header", &entry.header),
            ("h4", "entry-subheader", &entry.subheader),
            ("h5", "entry-subsubheader", &entry.subsubheader),
        ];
        for (tag, class, text) in headers {
            if let Some(text) = text {
                li.append(build(tag, Options::new().class(class).text(text.as_str()))?);
            }
        }

        if let Some(main) = &entry.main {
            li.append(build(
                "div",
                Options::new().class("entry-main").inner(main.as_str()),
            )?);
        }

        ul.append(li);
    }

    Ok(ul)
}

/// Download link, preview toggle and (optionally) the hidden inline preview.
fn resume(
    slug: &str,
    file: &str,
    caption: Option<&str>,
    with_preview: bool,
) -> Result<Fragment, DomError> {
    let download = build(
        "a",
        Options::new()
            .class("resume-download")
            .attr("href", file)
            .attr("download", "")
            .text(caption.unwrap_or("Download")),
    )?;

    if !with_preview {
        return Ok(pack![download]);
    }

    let preview_id = format!("{}-preview", slug);

    let toggle = build(
        "button",
        Options::new()
            .class("resume-toggle")
            .attr("type", "button")
            .attr("aria-controls", preview_id.as_str())
            .attr("aria-expanded", "false")
            .text("Show preview"),
    )?;

    let mut preview = build(
        "iframe",
        Options::new()
            .id(preview_id.as_str())
            .attr("src", file)
            .attr("title", "Resume preview")
            .attr("loading", "lazy"),
    )?;
    mutate::add_class(&mut preview, "resume-preview hidden");

    let controls = build(
        "div",
        Options::new().class("resume-controls").children([download, toggle]),
    )?;

    Ok(pack![controls, preview])
}

/// One `<li class="icon"><i class="token"></i></li>` per icon token.
pub fn icon_items(tokens: &[String]) -> Result<Fragment, DomError> {
    let mut items = multibuild("li", tokens.len(), Options::new().class("icon"))?;

    for (node, token) in items.nodes_mut().iter_mut().zip(tokens) {
        if let Some(li) = node.as_element_mut() {
            li.append(build("i", Options::new().class(token.as_str()))?);
            mutate::add_attributes(li, [("title", icon_label(token))])?;
        }
    }

    Ok(items)
}

/// One external link per entry, in document order.
pub fn external_links(links: &IndexMap<String, ExternalLink>) -> Result<Fragment, DomError> {
    let mut anchors = Vec::with_capacity(links.len());

    for (name, link) in links {
        let icon = build("i", Options::new().class(link.icon.as_str()))?;
        anchors.push(build(
            "a",
            Options::new()
                .class("ext-link")
                .attr("href", link.link.as_str())
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .attr("title", name.as_str())
                .attr("aria-label", name.as_str())
                .child(icon),
        )?);
    }

    Ok(pack(anchors))
}

/// Human label for an icon token like `devicon-rust-plain`.
fn icon_label(token: &str) -> String {
    let last = token.split_whitespace().last().unwrap_or(token);
    let trimmed = last.trim_start_matches("devicon-").trim_start_matches("fa-");
    let name = trimmed
        .split('-')
        .find(|part| !part.is_empty())
        .unwrap_or(trimmed);
    text_label(name)
}

fn text_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(slug: &str, title: &str, kind: SectionKind) -> Section {
        Section {
            slug: slug.to_string(),
            title: title.to_string(),
            kind,
        }
    }

    #[test]
    fn builds_nav_entry() {
        let s = section("about", "About", SectionKind::Paragraph { body: "x".into() });
        let li = nav_entry(&s).unwrap();

        assert_eq!(
            li.to_html(),
            r##"<li class="nav-item"><a href="#about-section" class="nav-link">About</a></li>"##
        );
    }

    #[test]
    fn builds_paragraph_section() {
        let s = section("about", "About", SectionKind::Paragraph { body: "Hello <b>there</b>".into() });
        let div = section_container(&s, true).unwrap();

        assert_eq!(div.id(), Some("about-section"));
        assert!(div.has_class("section-paragraph"));
        let parts: Vec<_> = div.child_elements().collect();
        assert_eq!(parts[0].text_content(), "About");
        assert_eq!(parts[1].to_html(), r#"<p class="section-body">Hello <b>there</b></p>"#);
    }

    #[test]
    fn builds_list_section_with_optional_parts() {
        let s = section(
            "work",
            "Work",
            SectionKind::List {
                entries: vec![
                    ListEntry {
                        header: Some("Acme".into()),
                        subsubheader: Some("2020".into()),
                        main: Some("<p>Shipped</p>".into()),
                        ..Default::default()
                    },
                    ListEntry::default(),
                ],
            },
        );
        let div = section_container(&s, true).unwrap();
        let ul = div.child_elements().nth(1).unwrap();

        assert_eq!(ul.tag(), "ul");
        assert_eq!(ul.children().len(), 2);
        assert_eq!(
            ul.children()[0].to_html(),
            concat!(
                r#"<li class="list-entry"><h3 class="entry-header">Acme</h3>"#,
                r#"<h5 class="entry-subsubheader">2020</h5>"#,
                r#"<div class="entry-main"><p>Shipped</p></div></li>"#
            )
        );
        assert_eq!(ul.children()[1].to_html(), r#"<li class="list-entry"></li>"#);
    }

    #[test]
    fn builds_resume_section() {
        let s = section(
            "cv",
            "Resume",
            SectionKind::Resume {
                file: "files/cv.pdf".into(),
                caption: Some("Get my CV".into()),
            },
        );
        let div = section_container(&s, true).unwrap();

        let download = div.find(&|e| e.has_class("resume-download")).unwrap();
        assert_eq!(download.attr("href"), Some("files/cv.pdf"));
        assert!(download.has_attr("download"));
        assert_eq!(download.text_content(), "Get my CV");

        let toggle = div.find(&|e| e.has_class("resume-toggle")).unwrap();
        assert_eq!(toggle.attr("aria-controls"), Some("cv-preview"));

        let preview = div.find_by_id("cv-preview").unwrap();
        assert_eq!(preview.tag(), "iframe");
        assert!(preview.has_class("hidden"));
    }

    #[test]
    fn resume_without_preview_has_only_download() {
        let s = section(
            "cv",
            "Resume",
            SectionKind::Resume {
                file: "cv.pdf".into(),
                caption: None,
            },
        );
        let div = section_container(&s, false).unwrap();

        assert!(div.find_by_id("cv-preview").is_none());
        let download = div.find(&|e| e.has_class("resume-download")).unwrap();
        assert_eq!(download.text_content(), "Download");
    }

    #[test]
    fn builds_icon_items() {
        let items = icon_items(&["devicon-rust-plain".into(), "fa fa-docker".into()]).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(
            items.nodes()[0].to_html(),
            r#"<li class="icon" title="Rust"><i class="devicon-rust-plain"></i></li>"#
        );
        assert_eq!(
            items.nodes()[1].as_element().unwrap().attr("title"),
            Some("Docker")
        );
    }

    #[test]
    fn builds_external_links_in_order() {
        let mut links = IndexMap::new();
        links.insert(
            "github".to_string(),
            ExternalLink {
                icon: "fa fa-github".into(),
                link: "https://github.com/me".into(),
            },
        );
        links.insert(
            "mail".to_string(),
            ExternalLink {
                icon: "fa fa-envelope".into(),
                link: "mailto:me@example.com".into(),
            },
        );

        let fragment = external_links(&links).unwrap();
        let hrefs: Vec<_> = fragment
            .nodes()
            .iter()
            .filter_map(|n| n.as_element())
            .filter_map(|a| a.attr("href"))
            .collect();

        assert_eq!(hrefs, vec!["https://github.com/me", "mailto:me@example.com"]);
    }
}
