//! HTML extraction passes for invite links
//!
//! Search engine markup is not stable, so search result pages are scanned
//! several independent ways and every pass feeds the same set:
//! - Text of result containers
//! - Every hyperlink, with redirect wrappers unwrapped, plus its text
//! - The full page text
//! - Snippet-like elements

use crate::invite::{extract_invite_links, InviteLink};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Base used to resolve relative search engine redirect hrefs
const REDIRECT_BASE: &str = "https://www.google.com/";

/// Query parameters that carry the real target of a redirect wrapper
const REDIRECT_PARAMS: &[&str] = &["q", "url"];

/// Extracts invite links from a search engine results page
///
/// # Arguments
///
/// * `html` - The results page HTML
///
/// # Returns
///
/// The union of invite links found by all extraction passes
pub fn extract_from_search_results(html: &str) -> HashSet<InviteLink> {
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    // Pass 1: result containers
    if let Ok(container_selector) = Selector::parse("div[class], a[class]") {
        for element in document.select(&container_selector) {
            if !is_result_container(&element) {
                continue;
            }

            links.extend(text_invites(&element));

            if let Some(href) = element.value().attr("href") {
                links.extend(extract_invite_links(&resolve_redirect(href)));
            }
        }
    }

    // Pass 2: every hyperlink and its text
    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                links.extend(extract_invite_links(&resolve_redirect(href)));
            }
            links.extend(text_invites(&element));
        }
    }

    // Pass 3: full page text
    links.extend(text_invites(&document.root_element()));

    // Pass 4: snippets
    if let Ok(snippet_selector) = Selector::parse("span[class], div[class]") {
        for element in document.select(&snippet_selector) {
            if is_snippet(&element) {
                links.extend(text_invites(&element));
            }
        }
    }

    links
}

/// Extracts invite links from an arbitrary web page
///
/// Scans the page text, every hyperlink resolved against `base_url`, and the
/// `content` attribute of every `meta` tag.
///
/// # Arguments
///
/// * `html` - The page HTML
/// * `base_url` - The page URL, for resolving relative links
pub fn extract_from_page(html: &str, base_url: &Url) -> HashSet<InviteLink> {
    let document = Html::parse_document(html);
    let mut links = text_invites(&document.root_element());

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                let resolved = resolve_link(href, base_url).unwrap_or_else(|| href.to_string());
                links.extend(extract_invite_links(&resolved));
            }
        }
    }

    if let Ok(meta_selector) = Selector::parse("meta[content]") {
        for element in document.select(&meta_selector) {
            if let Some(content) = element.value().attr("content") {
                links.extend(extract_invite_links(content));
            }
        }
    }

    links
}

/// Unwraps a search engine redirect href to its real target
///
/// Hrefs like `/url?q=https://discord.gg/abc&sa=U` yield
/// `https://discord.gg/abc` (percent-decoded). Anything else is returned
/// unchanged.
///
/// # Example
///
/// ```
/// use invite_scout::fetch::resolve_redirect;
///
/// let target = resolve_redirect("/url?q=https%3A%2F%2Fdiscord.gg%2Fabc&sa=U");
/// assert_eq!(target, "https://discord.gg/abc");
/// ```
pub fn resolve_redirect(href: &str) -> String {
    if !href.contains("/url?") {
        return href.to_string();
    }

    let parsed = Url::parse(REDIRECT_BASE).and_then(|base| base.join(href));
    let Ok(parsed) = parsed else {
        return href.to_string();
    };

    parsed
        .query_pairs()
        .find(|(key, _)| REDIRECT_PARAMS.iter().any(|param| key == param))
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| href.to_string())
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None for `javascript:`, `mailto:`, `tel:` and `data:` links,
/// fragment-only links, and anything that does not resolve to http(s).
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}

/// Result containers are `g` blocks or anything classed as a result
fn is_result_container(element: &ElementRef<'_>) -> bool {
    let name = element.value().name();
    if name != "div" && name != "a" {
        return false;
    }

    element
        .value()
        .classes()
        .any(|class| class == "g" || class.to_ascii_lowercase().contains("result"))
}

/// Snippets are classed `st` or anything mentioning "snippet"
fn is_snippet(element: &ElementRef<'_>) -> bool {
    element
        .value()
        .classes()
        .any(|class| class == "st" || class.to_ascii_lowercase().contains("snippet"))
}

/// Invite links in an element's text
///
/// Engines highlight matched terms, splitting `<em>discord.gg/</em>AbC` over
/// two text nodes, so the nodes are scanned concatenated. They are scanned
/// space-joined as well so a code followed directly by another element's
/// text is still found.
fn text_invites(element: &ElementRef<'_>) -> HashSet<InviteLink> {
    let nodes: Vec<&str> = element.text().collect();
    let mut links = extract_invite_links(&nodes.concat());
    links.extend(extract_invite_links(&nodes.join(" ")));
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_strings(links: &HashSet<InviteLink>) -> Vec<String> {
        let mut out: Vec<String> = links.iter().map(|l| l.to_string()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_resolve_redirect_unwraps_q_param() {
        assert_eq!(
            resolve_redirect("/url?q=https://discord.gg/abc&sa=U&ved=xyz"),
            "https://discord.gg/abc"
        );
    }

    #[test]
    fn test_resolve_redirect_decodes() {
        assert_eq!(
            resolve_redirect("https://www.google.com/url?url=https%3A%2F%2Fdiscord.com%2Finvite%2FXy"),
            "https://discord.com/invite/Xy"
        );
    }

    #[test]
    fn test_resolve_redirect_passthrough() {
        assert_eq!(
            resolve_redirect("https://medium.com/post"),
            "https://medium.com/post"
        );
        assert_eq!(resolve_redirect("/url?sa=U"), "/url?sa=U");
    }

    #[test]
    fn test_search_results_from_redirect_href() {
        let html = r#"<html><body>
            <a href="/url?q=https%3A%2F%2Fdiscord.gg%2FRedirected&sa=U">Result</a>
        </body></html>"#;
        let links = extract_from_search_results(html);
        assert_eq!(as_strings(&links), vec!["https://discord.gg/Redirected"]);
    }

    #[test]
    fn test_search_results_from_containers_and_snippets() {
        let html = r#"<html><body>
            <div class="g"><h3>Server</h3><div class="VwiC3b">Join discord.gg/FromResult today</div></div>
            <span class="st">or discord.com/invite/FromSnippet</span>
            <div class="result-body">DISCORD.GG/FromClassed</div>
        </body></html>"#;
        let links = extract_from_search_results(html);
        assert_eq!(
            as_strings(&links),
            vec![
                "https://discord.gg/FromClassed",
                "https://discord.gg/FromResult",
                "https://discord.gg/FromSnippet",
            ]
        );
    }

    #[test]
    fn test_search_results_adjacent_text_nodes() {
        let html = r#"<html><body><p><b>discord.gg/abc</b><i>Join</i></p></body></html>"#;
        let links = extract_from_search_results(html);
        assert!(links.contains(&InviteLink::parse("https://discord.gg/abc").unwrap()));
    }

    #[test]
    fn test_search_results_highlighted_prefix() {
        let html = r#"<html><body>
            <div class="g"><a href="https://x.com/someone/status/42"><h3>Post</h3></a>
            <span>Join us at <em>discord.gg/</em>AbC123 today</span></div>
        </body></html>"#;
        let links = extract_from_search_results(html);
        assert_eq!(as_strings(&links), vec!["https://discord.gg/AbC123"]);
    }

    #[test]
    fn test_search_results_outside_known_containers() {
        let html = r#"<html><body>
            <div class="tF2Cxc"><span class="lEBKkf">chat at <b>discord.gg/</b>Unclassed</span></div>
        </body></html>"#;
        let links = extract_from_search_results(html);
        assert_eq!(as_strings(&links), vec!["https://discord.gg/Unclassed"]);
    }

    #[test]
    fn test_search_results_empty_page() {
        let links = extract_from_search_results("<html><body>No results</body></html>");
        assert!(links.is_empty());
    }

    #[test]
    fn test_page_extraction_sources() {
        let base = Url::parse("https://blog.example.com/posts/1").unwrap();
        let html = r#"<html>
            <head><meta property="og:description" content="Community: discord.gg/FromMeta"></head>
            <body>
                <p>Text mentions https://discord.gg/FromText</p>
                <a href="https://discord.com/invite/FromHref">join</a>
                <a href="mailto:someone@example.com">mail</a>
            </body></html>"#;

        let links = extract_from_page(html, &base);
        assert_eq!(
            as_strings(&links),
            vec![
                "https://discord.gg/FromHref",
                "https://discord.gg/FromMeta",
                "https://discord.gg/FromText",
            ]
        );
    }

    #[test]
    fn test_resolve_link_relative() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(
            resolve_link("/other", &base),
            Some("https://example.com/other".to_string())
        );
        assert_eq!(resolve_link("javascript:void(0)", &base), None);
        assert_eq!(resolve_link("#top", &base), None);
    }
}
