use crate::analyzers::i18n::charset_from_content_type;
use crate::models::{
    Heading, Hreflang, Iframe, Image, Link, PageData, Script, StyledElement, Stylesheet,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Response metadata handed to the parser alongside the HTML
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub response_time_ms: Option<u64>,
    pub headers: BTreeMap<String, String>,
    pub html: String,
}

// Cached selectors to avoid repeated parsing and eliminate unwrap() calls
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("meta selector should be valid"));
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector should be valid")
});
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("script selector should be valid"));
static STYLESHEET_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel~='stylesheet']").expect("stylesheet selector should be valid")
});
static IFRAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("iframe").expect("iframe selector should be valid"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("p selector should be valid"));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));
static HREFLANG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel='alternate'][hreflang]").expect("hreflang selector should be valid")
});
static ITEMSCOPE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemscope]").expect("itemscope selector should be valid"));
static RDFA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[typeof]").expect("typeof selector should be valid"));
static STYLED_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body [style]").expect("style attribute selector should be valid"));
static STYLE_BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("style").expect("style selector should be valid"));
static AD_SLOT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ins, amp-ad").expect("ad slot selector should be valid"));

const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Turns raw HTML plus response metadata into a [`PageData`] snapshot
pub fn parse_page(raw: RawPage) -> PageData {
    let document = Html::parse_document(&raw.html);
    let base_url = Url::parse(if raw.final_url.is_empty() {
        &raw.url
    } else {
        &raw.final_url
    })
    .ok();

    let headers: BTreeMap<String, String> = raw
        .headers
        .into_iter()
        .map(|(name, value)| (name.to_lowercase(), value))
        .collect();

    // Only in-document declarations; the Content-Type header stays in `headers`
    let (meta_tags, charset) = extract_meta(&document);

    let text_content = extract_text(&document);
    let word_count = text_content.split_whitespace().count();
    let (scripts, json_ld) = extract_scripts(&document, base_url.as_ref());

    PageData {
        final_url: if raw.final_url.is_empty() {
            raw.url.clone()
        } else {
            raw.final_url
        },
        url: raw.url,
        status_code: raw.status_code,
        response_time_ms: raw.response_time_ms,
        title: extract_title(&document),
        meta_tags,
        headings: extract_headings(&document),
        images: extract_images(&document, base_url.as_ref()),
        links: extract_links(&document, base_url.as_ref()),
        scripts,
        stylesheets: extract_stylesheets(&document, base_url.as_ref()),
        iframes: extract_iframes(&document, base_url.as_ref()),
        paragraphs: document
            .select(&PARAGRAPH_SELECTOR)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect(),
        word_count,
        text_content,
        lang: document
            .root_element()
            .value()
            .attr("lang")
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty()),
        charset,
        hreflang: document
            .select(&HREFLANG_SELECTOR)
            .filter_map(|el| {
                let lang = el.value().attr("hreflang")?;
                let href = el.value().attr("href").unwrap_or_default();
                Some(Hreflang {
                    lang: lang.trim().to_string(),
                    href: resolve(base_url.as_ref(), href),
                })
            })
            .collect(),
        json_ld,
        microdata_types: document
            .select(&ITEMSCOPE_SELECTOR)
            .map(|el| el.value().attr("itemtype").unwrap_or_default().trim().to_string())
            .collect(),
        rdfa_count: document.select(&RDFA_SELECTOR).count(),
        styled_elements: document
            .select(&STYLED_SELECTOR)
            .filter_map(|el| {
                let style = el.value().attr("style")?;
                Some(StyledElement {
                    tag: el.value().name().to_string(),
                    style: style.to_string(),
                })
            })
            .collect(),
        style_blocks: document
            .select(&STYLE_BLOCK_SELECTOR)
            .map(|el| el.text().collect::<String>())
            .collect(),
        ad_slots: document.select(&AD_SLOT_SELECTOR).count(),
        headers,
        html: raw.html,
        robots_txt: None,
        sitemap_xml: None,
        linked_resource_statuses: None,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(|value| value.trim().to_string())
}

/// Absolute form of `href` against the page URL, or `href` unchanged
fn resolve(base_url: Option<&Url>, href: &str) -> String {
    base_url
        .and_then(|base| base.join(href.trim()).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| href.trim().to_string())
}

/// Checks if a URL is internal by comparing host and port with the page URL
fn is_internal(base_url: Option<&Url>, target: &Url) -> bool {
    base_url.is_some_and(|base| {
        target.host_str() == base.host_str() && target.port_or_known_default() == base.port_or_known_default()
    })
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|title| !title.is_empty())
}

/// Meta tags keyed by `name` or `property`, plus a `<meta charset>` declaration.
/// The first occurrence of a key wins.
fn extract_meta(document: &Html) -> (BTreeMap<String, String>, Option<String>) {
    let mut tags = BTreeMap::new();
    let mut charset = None;

    for element in document.select(&META_SELECTOR) {
        let meta = element.value();

        if charset.is_none() {
            charset = meta
                .attr("charset")
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .or_else(|| {
                    meta.attr("http-equiv")
                        .filter(|equiv| equiv.eq_ignore_ascii_case("content-type"))
                        .and_then(|_| meta.attr("content"))
                        .and_then(charset_from_content_type)
                });
        }

        let key = meta.attr("name").or_else(|| meta.attr("property"));
        if let (Some(key), Some(content)) = (key, meta.attr("content")) {
            tags.entry(key.trim().to_lowercase())
                .or_insert_with(|| content.trim().to_string());
        }
    }

    (tags, charset)
}

fn extract_headings(document: &Html) -> Vec<Heading> {
    document
        .select(&HEADING_SELECTOR)
        .filter_map(|el| {
            let level = el.value().name().strip_prefix('h')?.parse().ok()?;
            Some(Heading {
                level,
                text: element_text(el),
            })
        })
        .collect()
}

fn extract_images(document: &Html, base_url: Option<&Url>) -> Vec<Image> {
    document
        .select(&IMG_SELECTOR)
        .map(|el| Image {
            src: el
                .value()
                .attr("src")
                .or_else(|| el.value().attr("data-src"))
                .map(|src| resolve(base_url, src))
                .unwrap_or_default(),
            alt: el.value().attr("alt").map(|alt| alt.trim().to_string()),
            width: attr(&el, "width"),
            height: attr(&el, "height"),
            loading: attr(&el, "loading"),
        })
        .collect()
}

fn extract_links(document: &Html, base_url: Option<&Url>) -> Vec<Link> {
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let resolved = base_url.and_then(|base| base.join(href).ok());
        if let Some(url) = &resolved
            && url.scheme() != "http"
            && url.scheme() != "https"
        {
            // mailto:, tel:, javascript: and friends are not page links
            continue;
        }

        let anchor_text = {
            let text = element_text(element);
            if text.is_empty() {
                // Image links take their text from the image's alt
                element
                    .select(&IMG_SELECTOR)
                    .find_map(|img| img.value().attr("alt"))
                    .map(|alt| alt.trim().to_string())
                    .unwrap_or_default()
            } else {
                text
            }
        };

        links.push(Link {
            href: resolved
                .as_ref()
                .map(|url| url.to_string())
                .unwrap_or_else(|| href.to_string()),
            anchor_text,
            rel: attr(&element, "rel"),
            is_internal: resolved
                .as_ref()
                .is_some_and(|url| is_internal(base_url, url)),
            target: attr(&element, "target"),
        });
    }

    links
}

/// Script tags, with JSON-LD blocks split out
fn extract_scripts(document: &Html, base_url: Option<&Url>) -> (Vec<Script>, Vec<String>) {
    let mut scripts = Vec::new();
    let mut json_ld = Vec::new();

    for element in document.select(&SCRIPT_SELECTOR) {
        let script = element.value();
        let script_type = script.attr("type").unwrap_or_default().trim().to_lowercase();

        if script_type == "application/ld+json" {
            json_ld.push(element.text().collect::<String>());
            continue;
        }

        let src = script.attr("src").map(|src| resolve(base_url, src));
        let is_async_defer = script.attr("async").is_some()
            || script.attr("defer").is_some()
            || script_type == "module";
        let in_head = element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| ancestor.value().name() == "head");

        scripts.push(Script {
            is_blocking: src.is_some() && in_head && !is_async_defer,
            inline_length: if src.is_none() {
                element.text().map(str::len).sum()
            } else {
                0
            },
            src,
            is_async_defer,
            in_head,
        });
    }

    (scripts, json_ld)
}

fn extract_stylesheets(document: &Html, base_url: Option<&Url>) -> Vec<Stylesheet> {
    document
        .select(&STYLESHEET_SELECTOR)
        .map(|el| Stylesheet {
            href: el
                .value()
                .attr("href")
                .map(|href| resolve(base_url, href))
                .unwrap_or_default(),
            media: attr(&el, "media"),
        })
        .collect()
}

fn extract_iframes(document: &Html, base_url: Option<&Url>) -> Vec<Iframe> {
    document
        .select(&IFRAME_SELECTOR)
        .map(|el| Iframe {
            src: el
                .value()
                .attr("src")
                .map(|src| resolve(base_url, src))
                .unwrap_or_default(),
            width: attr(&el, "width"),
            height: attr(&el, "height"),
        })
        .collect()
}

/// Visible body text: every text node outside script, style and similar
fn extract_text(document: &Html) -> String {
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| NON_TEXT_ELEMENTS.contains(&el.value().name()));
        if !hidden {
            parts.extend(text.split_whitespace());
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> PageData {
        parse_page(RawPage {
            url: "https://example.com/blog/post".to_string(),
            status_code: 200,
            html: html.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_parse_head_metadata() {
        let page = parse(
            r#"<html lang="en-GB"><head>
                <meta charset="utf-8">
                <title>  Rust   SEO Guide </title>
                <meta name="Description" content="A guide.">
                <meta property="og:title" content="OG title">
                <link rel="alternate" hreflang="x-default" href="/">
            </head><body></body></html>"#,
        );

        assert_eq!(page.title.as_deref(), Some("Rust SEO Guide"));
        assert_eq!(page.meta("description"), Some("A guide."));
        assert_eq!(page.meta("og:title"), Some("OG title"));
        assert_eq!(page.lang.as_deref(), Some("en-GB"));
        assert_eq!(page.charset.as_deref(), Some("utf-8"));
        assert_eq!(page.hreflang[0].href, "https://example.com/");
        assert_eq!(page.final_url, "https://example.com/blog/post");
    }

    #[test]
    fn test_parse_links_and_images() {
        let page = parse(
            r##"<body>
                <a href="/about">About us</a>
                <a href="https://other.org/x" target="_blank">Other</a>
                <a href="mailto:me@example.com">Mail</a>
                <a href="#top">Top</a>
                <a href="/home"><img src="/logo.png" alt="Home"></a>
                <img src="pic.jpg" width="10" height="10" loading="lazy">
            </body>"##,
        );

        assert_eq!(page.links.len(), 3);
        assert_eq!(page.links[0].href, "https://example.com/about");
        assert!(page.links[0].is_internal);
        assert!(!page.links[1].is_internal);
        assert_eq!(page.links[1].target.as_deref(), Some("_blank"));
        assert_eq!(page.links[2].anchor_text, "Home");

        assert_eq!(page.images.len(), 2);
        assert_eq!(page.images[1].src, "https://example.com/blog/pic.jpg");
        assert!(page.images[1].alt.is_none());
        assert!(page.images[1].has_dimensions());
    }

    #[test]
    fn test_parse_scripts_and_text() {
        let page = parse(
            r#"<html><head>
                <script src="/app.js"></script>
                <script src="/lazy.js" defer></script>
                <script type="application/ld+json">{"@type": "Person", "name": "Ann"}</script>
                <style>@media (max-width: 600px) { p { font-size: 14px } }</style>
            </head><body>
                <h1>Hello</h1><h3>World</h3>
                <p>First   paragraph here.</p>
                <script>var hidden = "not text";</script>
                <p>Second.</p>
            </body></html>"#,
        );

        assert_eq!(page.scripts.len(), 3);
        assert!(page.scripts[0].is_blocking);
        assert!(!page.scripts[1].is_blocking);
        assert!(page.scripts[2].src.is_none());
        assert!(page.scripts[2].inline_length > 0);
        assert_eq!(page.json_ld.len(), 1);
        assert_eq!(page.style_blocks.len(), 1);

        let levels: Vec<u8> = page.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 3]);
        assert_eq!(page.paragraphs, vec!["First paragraph here.", "Second."]);
        assert_eq!(page.text_content, "Hello World First paragraph here. Second.");
        assert_eq!(page.word_count, 6);
    }
}
