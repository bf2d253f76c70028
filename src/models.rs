use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Immutable snapshot of one fetched page. Every analyzer reads the same value.
///
/// All fields default when absent so partially-populated snapshots (for example
/// one captured without any `meta_tags`) still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageData {
    pub url: String,
    pub final_url: String,
    pub status_code: u16,
    pub response_time_ms: Option<u64>,
    pub html: String,
    /// Response headers, keys lower-cased
    pub headers: BTreeMap<String, String>,
    pub title: Option<String>,
    /// `<meta name=..>` and `<meta property=..>` content, keys lower-cased
    pub meta_tags: BTreeMap<String, String>,
    pub headings: Vec<Heading>,
    pub images: Vec<Image>,
    pub links: Vec<Link>,
    pub scripts: Vec<Script>,
    pub stylesheets: Vec<Stylesheet>,
    pub iframes: Vec<Iframe>,
    pub paragraphs: Vec<String>,
    pub word_count: usize,
    pub text_content: String,
    pub lang: Option<String>,
    pub charset: Option<String>,
    pub hreflang: Vec<Hreflang>,
    /// Raw bodies of `application/ld+json` blocks
    pub json_ld: Vec<String>,
    /// One entry per `itemscope` element, holding its `itemtype` (may be empty)
    pub microdata_types: Vec<String>,
    pub rdfa_count: usize,
    pub styled_elements: Vec<StyledElement>,
    pub style_blocks: Vec<String>,
    pub ad_slots: usize,
    // Probe augmentations: `None` means not probed.
    pub robots_txt: Option<RemoteFile>,
    pub sitemap_xml: Option<RemoteFile>,
    pub linked_resource_statuses: Option<Vec<LinkStatus>>,
}

impl PageData {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Case-insensitive meta tag lookup, ignoring blank values
    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta_tags
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// The URL after redirects, falling back to the requested one
    pub fn effective_url(&self) -> &str {
        if self.final_url.is_empty() {
            &self.url
        } else {
            &self.final_url
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub src: String,
    pub alt: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub loading: Option<String>,
}

impl Image {
    pub fn has_dimensions(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub anchor_text: String,
    pub rel: Option<String>,
    pub is_internal: bool,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub src: Option<String>,
    pub is_blocking: bool,
    pub is_async_defer: bool,
    pub in_head: bool,
    pub inline_length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stylesheet {
    pub href: String,
    pub media: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Iframe {
    pub src: String,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hreflang {
    pub lang: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledElement {
    pub tag: String,
    pub style: String,
}

/// A file fetched next to the page (robots.txt, sitemap.xml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteFile {
    pub url: String,
    /// `None` when the request itself failed
    pub status_code: Option<u16>,
    pub body: String,
}

impl RemoteFile {
    pub fn is_present(&self) -> bool {
        self.status_code == Some(200)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub url: String,
    pub outcome: ProbeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Status(u16),
    Timeout,
    Unreachable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SEO categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Title,
    MetaDescription,
    UrlStructure,
    Headings,
    Content,
    Images,
    Links,
    Performance,
    Keyword,
    Social,
    Mobile,
    Schema,
    LinkHealth,
    Security,
    Sitemap,
    Readability,
    I18n,
    Vitals,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Title,
        Category::MetaDescription,
        Category::UrlStructure,
        Category::Headings,
        Category::Content,
        Category::Images,
        Category::Links,
        Category::Performance,
        Category::Keyword,
        Category::Social,
        Category::Mobile,
        Category::Schema,
        Category::LinkHealth,
        Category::Security,
        Category::Sitemap,
        Category::Readability,
        Category::I18n,
        Category::Vitals,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Title => "title",
            Category::MetaDescription => "meta_description",
            Category::UrlStructure => "url_structure",
            Category::Headings => "headings",
            Category::Content => "content",
            Category::Images => "images",
            Category::Links => "links",
            Category::Performance => "performance",
            Category::Keyword => "keyword",
            Category::Social => "social",
            Category::Mobile => "mobile",
            Category::Schema => "schema",
            Category::LinkHealth => "link_health",
            Category::Security => "security",
            Category::Sitemap => "sitemap",
            Category::Readability => "readability",
            Category::I18n => "i18n",
            Category::Vitals => "vitals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Title => "Title",
            Category::MetaDescription => "Meta Description",
            Category::UrlStructure => "URL Structure",
            Category::Headings => "Headings",
            Category::Content => "Content",
            Category::Images => "Images",
            Category::Links => "Links",
            Category::Performance => "Performance",
            Category::Keyword => "Keyword",
            Category::Social => "Social",
            Category::Mobile => "Mobile",
            Category::Schema => "Schema",
            Category::LinkHealth => "Link Health",
            Category::Security => "Security",
            Category::Sitemap => "Sitemap",
            Category::Readability => "Readability",
            Category::I18n => "Internationalization",
            Category::Vitals => "Core Web Vitals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub category: Category,
    /// Stable identifier, unique within the category
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub score: u8,
    pub issues: Vec<Issue>,
    /// Analyzer-specific detail for rendering. Never read by the scorer.
    pub facts: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub recommendation: String,
    pub derived_from: Issue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityIssues {
    pub high: Vec<Issue>,
    pub medium: Vec<Issue>,
    pub low: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
    pub total_issues: usize,
    pub categories_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallResult {
    pub url: String,
    pub overall_score: u8,
    pub grade: Grade,
    pub category_scores: BTreeMap<Category, u8>,
    pub priority_issues: PriorityIssues,
    pub recommendations: Vec<Recommendation>,
    pub summary: Summary,
    /// Per-category detail, in category order
    pub categories: Vec<CategoryResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    YourSite,
    Competitor,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub yours: u8,
    pub theirs: u8,
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub your_site: OverallResult,
    pub competitor: OverallResult,
    pub winner: Winner,
    pub categories: BTreeMap<Category, CategoryDelta>,
}
