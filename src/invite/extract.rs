//! Regex-based invite link extraction
//!
//! Every pattern hit is normalized through [`InviteLink::parse`] before it
//! is inserted, so overlapping hits on the same reference (scheme and bare
//! form, long and short host) collapse into a single canonical entry.

use crate::invite::InviteLink;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Invite patterns, applied in order
///
/// Token charset is alphanumerics and hyphens with no length constraint.
/// Trailing punctuation never matches because the class excludes it.
const INVITE_PATTERNS: &[&str] = &[
    r"(?i)https?://discord\.gg/[a-z0-9-]+",
    r"(?i)https?://discord\.com/invite/[a-z0-9-]+",
    r"(?i)discord\.gg/[a-z0-9-]+",
    r"(?i)discord\.com/invite/[a-z0-9-]+",
];

static COMPILED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    INVITE_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

/// Extracts every invite link contained in a block of text
///
/// Works on page text, raw HTML, URLs and attribute values alike. Pure
/// function: running it twice on the same input yields the same set.
///
/// # Arguments
///
/// * `text` - The text to scan
///
/// # Returns
///
/// The set of canonical invite links found
///
/// # Examples
///
/// ```
/// use invite_scout::invite::extract_invite_links;
///
/// let links = extract_invite_links("join us at DISCORD.GG/AbC or discord.com/invite/AbC");
/// assert_eq!(links.len(), 1);
/// assert!(links.iter().any(|l| l.as_str() == "https://discord.gg/AbC"));
/// ```
pub fn extract_invite_links(text: &str) -> HashSet<InviteLink> {
    let mut links = HashSet::new();

    for pattern in COMPILED_PATTERNS.iter() {
        for hit in pattern.find_iter(text) {
            if let Some(link) = InviteLink::parse(hit.as_str()) {
                links.insert(link);
            }
        }
    }

    links
}
