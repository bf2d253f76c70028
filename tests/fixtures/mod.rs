use seo_audit::models::{Heading, Hreflang, Image, Link, PageData};
use std::collections::BTreeMap;

const FILLER: &[&str] = &[
    "teams", "build", "small", "tools", "that", "load", "fast", "and", "stay", "up",
];

pub const GOOD_TITLE: &str = "Rust Web Performance Guide: Faster Pages with Async Rust";
pub const GOOD_DESCRIPTION: &str = "Learn how to build fast web pages with async Rust. Discover practical techniques for caching, compression and concurrency, and get started today.";

/// Plain prose of exactly `words` words in ten-word sentences. When a keyword
/// is given it replaces every `every`-th word.
#[allow(dead_code)]
pub fn prose(words: usize, keyword: Option<&str>, every: usize) -> String {
    let mut out = Vec::with_capacity(words);
    for i in 0..words {
        let word = match keyword {
            Some(keyword) if every > 0 && i % every == 0 => keyword,
            _ => FILLER[i % FILLER.len()],
        };
        if i % 10 == 9 || i + 1 == words {
            out.push(format!("{}.", word));
        } else {
            out.push(word.to_string());
        }
    }
    out.join(" ")
}

#[allow(dead_code)]
pub fn page(url: &str) -> PageData {
    PageData {
        url: url.to_string(),
        final_url: url.to_string(),
        status_code: 200,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn heading(level: u8, text: &str) -> Heading {
    Heading {
        level,
        text: text.to_string(),
    }
}

#[allow(dead_code)]
pub fn image(src: &str, alt: Option<&str>) -> Image {
    Image {
        src: src.to_string(),
        alt: alt.map(str::to_string),
        width: Some("640".to_string()),
        height: Some("360".to_string()),
        loading: None,
    }
}

#[allow(dead_code)]
pub fn link(href: &str, anchor_text: &str, is_internal: bool) -> Link {
    Link {
        href: href.to_string(),
        anchor_text: anchor_text.to_string(),
        rel: None,
        is_internal,
        target: None,
    }
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// A page that satisfies every core rule for the keyword "rust"
#[allow(dead_code)]
pub fn good_page() -> PageData {
    let text = prose(650, Some("rust"), 50);
    let paragraphs = vec![
        "Rust makes it practical to build fast web services.".to_string(),
        prose(200, None, 0),
        prose(200, None, 0),
        prose(200, None, 0),
    ];

    let headers = [
        ("content-type", "text/html; charset=utf-8"),
        ("strict-transport-security", "max-age=63072000"),
        ("content-security-policy", "default-src 'self'"),
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "DENY"),
        ("x-xss-protection", "1; mode=block"),
        ("referrer-policy", "strict-origin-when-cross-origin"),
        ("permissions-policy", "geolocation=()"),
    ];

    PageData {
        response_time_ms: Some(200),
        html: format!("<html><body>{}</body></html>", text),
        headers: string_map(&headers),
        title: Some(GOOD_TITLE.to_string()),
        meta_tags: string_map(&[
            ("description", GOOD_DESCRIPTION),
            ("viewport", "width=device-width, initial-scale=1"),
            ("og:title", "Rust Web Performance Guide"),
            ("og:description", "Build faster pages with async Rust."),
            ("og:image", "https://example.com/cover.png"),
            ("og:url", "https://example.com/rust-guide"),
            ("og:type", "article"),
            ("twitter:card", "summary_large_image"),
            ("twitter:title", "Rust Web Performance Guide"),
            ("twitter:description", "Build faster pages with async Rust."),
            ("twitter:image", "https://example.com/cover.png"),
        ]),
        headings: vec![
            heading(1, "Rust Web Performance Guide"),
            heading(2, "Why speed matters"),
            heading(3, "Measuring"),
            heading(2, "Caching"),
        ],
        images: vec![
            image("https://example.com/images/request-flow.png", Some("Request flow diagram")),
            image("https://example.com/images/cache-hits.png", Some("Cache hit rate chart")),
        ],
        links: vec![
            link("https://example.com/caching", "Caching chapter", true),
            link("https://example.com/compression", "Compression chapter", true),
            link("https://example.com/benchmarks", "Our benchmarks", true),
            link("https://www.rust-lang.org/", "The Rust website", false),
        ],
        paragraphs,
        word_count: 650,
        text_content: text,
        lang: Some("en".to_string()),
        charset: Some("utf-8".to_string()),
        hreflang: vec![
            Hreflang {
                lang: "en".to_string(),
                href: "https://example.com/rust-guide".to_string(),
            },
            Hreflang {
                lang: "x-default".to_string(),
                href: "https://example.com/rust-guide".to_string(),
            },
        ],
        json_ld: vec![
            r#"{"@context": "https://schema.org", "@type": "Article", "headline": "Rust Web Performance Guide", "author": {"@type": "Person", "name": "Ann"}, "datePublished": "2024-01-01", "image": "https://example.com/cover.png"}"#
                .to_string(),
        ],
        style_blocks: vec!["@media (max-width: 600px) { body { font-size: 16px } }".to_string()],
        ..page("https://example.com/rust-guide")
    }
}
