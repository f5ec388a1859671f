use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every canonical invite link
pub const CANONICAL_PREFIX: &str = "https://discord.gg/";

/// Host and path segment of the long invite form, lowercase
const LONG_FORM: &str = "discord.com/invite/";

/// Host segment of the short invite form, lowercase
const SHORT_FORM: &str = "discord.gg/";

/// A normalized invite link
///
/// Canonical links have the form `https://discord.gg/<code>`. Ordering and
/// equality are those of the underlying string, so the invite code stays
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteLink(String);

impl InviteLink {
    /// Normalizes a raw invite reference into its canonical form
    ///
    /// # Normalization Steps
    ///
    /// 1. Strip an `http://` or `https://` scheme (any case)
    /// 2. Lowercase the host part, leaving the invite code untouched
    /// 3. Rewrite `discord.com/invite/` to `discord.gg/`
    /// 4. Prefix `https://`
    /// 5. Reject anything that is not `discord.gg/` followed by a code
    ///
    /// # Examples
    ///
    /// ```
    /// use invite_scout::invite::InviteLink;
    ///
    /// let link = InviteLink::parse("DISCORD.COM/invite/AbC-12").unwrap();
    /// assert_eq!(link.as_str(), "https://discord.gg/AbC-12");
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let without_scheme = strip_scheme(raw);

        let lowered = without_scheme.to_ascii_lowercase();
        let code = if lowered.starts_with(LONG_FORM) {
            &without_scheme[LONG_FORM.len()..]
        } else if lowered.starts_with(SHORT_FORM) {
            &without_scheme[SHORT_FORM.len()..]
        } else {
            return None;
        };

        let canonical = format!("{}{}", CANONICAL_PREFIX, code);
        if !canonical.contains(SHORT_FORM) || !is_valid_code(code) {
            return None;
        }

        Some(Self(canonical))
    }

    /// Builds a link from a line of the persisted link file
    ///
    /// Recognized invite references are canonicalized. Other `http` lines are
    /// kept verbatim so a rewrite of the file never drops entries written by
    /// someone else.
    pub fn from_persisted(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || !line.starts_with("http") {
            return None;
        }

        Some(Self::parse(line).unwrap_or_else(|| Self(line.to_string())))
    }

    /// Returns the link as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the invite code, or None if this is a foreign persisted line
    pub fn code(&self) -> Option<&str> {
        self.0.strip_prefix(CANONICAL_PREFIX)
    }

    /// Returns true if the link is in canonical `https://discord.gg/` form
    pub fn is_canonical(&self) -> bool {
        self.code().is_some_and(is_valid_code)
    }
}

impl fmt::Display for InviteLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InviteLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strips a leading http(s) scheme regardless of letter case
fn strip_scheme(raw: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if raw.len() >= scheme.len() && raw[..scheme.len()].eq_ignore_ascii_case(scheme) {
            return &raw[scheme.len()..];
        }
    }
    raw
}

/// Invite codes are alphanumerics and hyphens, at least one character
fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
