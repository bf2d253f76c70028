use crate::models::{Category, Issue, Recommendation};

/// Advice for an issue, keyed by category and issue code
pub fn advice_for(category: Category, code: &str) -> &'static str {
    use Category::*;

    match (category, code) {
        (_, "analyzer_failed") => {
            "Re-run the audit; this category could not be evaluated for the page"
        }

        (Title, "missing") => "Add a unique, descriptive <title> tag of 50-60 characters",
        (Title, "too_short") => "Expand the title to 50-60 characters with your primary keyword",
        (Title, "too_long") => "Shorten the title to 60 characters or fewer so it is not truncated",
        (Title, "below_optimal") => "Lengthen the title slightly toward 50-60 characters",
        (Title, "boilerplate") => "Replace the generic title with one that describes this page",

        (MetaDescription, "missing") => {
            "Write a compelling meta description of 120-160 characters"
        }
        (MetaDescription, "too_short") => "Expand the meta description to 120-160 characters",
        (MetaDescription, "too_long") => "Trim the meta description to 160 characters or fewer",
        (MetaDescription, "no_call_to_action") => {
            "Add a call to action (learn, discover, get started) to the meta description"
        }
        (MetaDescription, "truncated") => "Finish the meta description with a complete sentence",

        (UrlStructure, "invalid") => "Fix the page URL so it is a valid absolute URL",
        (UrlStructure, "not_https") => "Serve the page over HTTPS and redirect HTTP to it",
        (UrlStructure, "double_extension") => "Remove the duplicated file extension from the URL",
        (UrlStructure, "too_long") => "Shorten the URL to under 100 characters",
        (UrlStructure, "underscores") => "Use hyphens instead of underscores in URLs",
        (UrlStructure, "uppercase") => "Use lowercase characters in URLs",
        (UrlStructure, "special_characters") => "Remove special characters from the URL path",
        (UrlStructure, "query_heavy") => "Move content-defining parameters into the URL path",
        (UrlStructure, "dated_path") => "Consider dropping dates from URLs of evergreen content",

        (Headings, "missing_h1") => "Add exactly one H1 that states the page topic",
        (Headings, "multiple_h1") => "Keep a single H1 and demote the others to H2",
        (Headings, "missing_h2") => "Break the content into sections with H2 subheadings",
        (Headings, "long_h1") => "Shorten the H1 to under 70 characters",
        (Headings, "skipped_level") => "Nest headings in order without skipping levels",

        (Content, "very_thin") => "Expand the page to at least 300 words of useful content",
        (Content, "thin") => "Add depth: pages with 600+ words tend to rank better",
        (Content, "keyword_density_high") => {
            "Reduce keyword repetition and use natural variations"
        }
        (Content, "keyword_density_low") => "Mention the target keyword a few more times",
        (Content, "few_paragraphs") => "Split the text into short, scannable paragraphs",

        (Images, "no_images") => "Add relevant images with descriptive alt text",
        (Images, "missing_alt_majority" | "missing_alt" | "missing_alt_minor") => {
            "Add descriptive alt text to every meaningful image"
        }
        (Images, "missing_dimensions") => {
            "Set width and height on images to prevent layout shifts"
        }
        (Images, "generic_filenames") => "Rename image files to describe their content",

        (Links, "no_internal") => "Link to related pages on your own site",
        (Links, "few_internal") => "Add more internal links to related content",
        (Links, "no_external") => "Cite authoritative external sources where relevant",
        (Links, "empty_anchor") => "Give every link visible, descriptive anchor text",
        (Links, "suspicious_href") => "Fix malformed link targets",
        (Links, "generic_anchor") => "Replace \"click here\" style anchors with descriptive text",
        (Links, "unsafe_new_tab") => "Add rel=\"noopener\" to links that open in a new tab",

        (Performance, "very_slow" | "slow") => {
            "Improve server response time with caching or a CDN"
        }
        (Performance, "render_blocking") => "Add async or defer to scripts in <head>",
        (Performance, "many_scripts") => "Bundle or remove unnecessary external scripts",
        (Performance, "many_stylesheets") => "Combine stylesheets to reduce requests",
        (Performance, "large_html") => "Reduce HTML size by removing inline bloat",

        (Keyword, "density_low") => "Use the target keyword more naturally throughout the text",
        (Keyword, "density_high") => "Reduce keyword stuffing; write for readers first",
        (Keyword, "not_in_title") => "Include the target keyword in the title",
        (Keyword, "not_in_h1") => "Include the target keyword in the H1",
        (Keyword, "not_in_meta") => "Include the target keyword in the meta description",
        (Keyword, "not_in_first_paragraph") => "Mention the target keyword in the first paragraph",

        (Social, "missing_open_graph") => "Add og:title, og:description and og:image tags",
        (Social, "incomplete_open_graph") => "Complete the Open Graph title and description",
        (Social, "missing_twitter_card") => "Add twitter:card and related Twitter Card tags",
        (Social, "missing_preview_image") => "Add an og:image of at least 1200x630 pixels",

        (Mobile, "missing_viewport") => {
            "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        }
        (Mobile, "invalid_viewport") => "Set the viewport width to device-width",
        (Mobile, "small_text") => "Use a base font size of at least 14px",
        (Mobile, "small_tap_targets") => "Make buttons and links at least 44x44 pixels",
        (Mobile, "no_media_queries") => "Add responsive CSS media queries",

        (Schema, "none") => "Add JSON-LD structured data describing the page",
        (Schema, "invalid_json_ld") => "Fix the JSON syntax of the structured data block",
        (Schema, "missing_field") => "Fill in the required properties for the schema type",

        (LinkHealth, "server_error" | "client_error" | "unexpected_status") => {
            "Fix or remove the broken link"
        }
        (LinkHealth, "timeout" | "unreachable") => {
            "Check that the linked resource is online, or remove the link"
        }
        (LinkHealth, "redirect") => "Update the link to point at its final destination",

        (Security, "not_https") => "Install a TLS certificate and serve the site over HTTPS",
        (Security, "mixed_content") => "Load all resources over HTTPS",
        (Security, "missing_header") => "Send the missing security header from your server",

        (Sitemap, "blocked_by_robots") => "Allow this page in robots.txt if it should rank",
        (Sitemap, "robots_missing") => "Create a robots.txt file at the site root",
        (Sitemap, "sitemap_missing") => "Publish an XML sitemap and submit it to search engines",
        (Sitemap, "no_sitemap_directive") => "Reference the sitemap with a Sitemap: line in robots.txt",
        (Sitemap, "empty_sitemap") => "List your indexable pages in the sitemap",

        (Readability, "insufficient_text") => "Add more body text so readers get real value",
        (Readability, "difficult" | "moderate" | "fairly_difficult") => {
            "Simplify the writing: shorter sentences and plainer words"
        }
        (Readability, "long_sentences") => "Break long sentences into shorter ones",

        (I18n, "missing_lang") => "Add a lang attribute to the <html> element",
        (I18n, "missing_charset") => "Declare <meta charset=\"utf-8\"> early in <head>",
        (I18n, "non_utf8_charset") => "Switch the page encoding to UTF-8",
        (I18n, "missing_hreflang") => "Add hreflang alternates for each regional version",
        (I18n, "missing_x_default") => "Add an hreflang=\"x-default\" fallback",

        (Vitals, "lcp_poor" | "lcp_needs_improvement") => {
            "Speed up the largest paint: fewer blocking resources, sized hero images"
        }
        (Vitals, "cls_poor" | "cls_needs_improvement") => {
            "Reserve space for images, embeds and ads to avoid layout shifts"
        }
        (Vitals, "inp_poor" | "inp_needs_improvement") => {
            "Cut third-party and large inline scripts to improve interactivity"
        }

        _ => "Review this issue and address it",
    }
}

/// One recommendation per issue: high first, then medium, then low. The sort
/// is stable, so emission order survives within a severity.
pub fn rank<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Vec<Recommendation> {
    let mut ranked: Vec<&Issue> = issues.into_iter().collect();
    ranked.sort_by_key(|issue| issue.severity);

    ranked
        .into_iter()
        .map(|issue| Recommendation {
            category: issue.category,
            recommendation: advice_for(issue.category, &issue.code).to_string(),
            derived_from: issue.clone(),
        })
        .collect()
}
