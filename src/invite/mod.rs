//! Invite link handling for Invite-Scout
//!
//! This module provides the canonical `InviteLink` type and the regex-based
//! extractor that finds invite references inside arbitrary text, HTML, URLs
//! and attribute values.

mod extract;
mod link;

// Re-export main types and functions
pub use extract::extract_invite_links;
pub use link::{InviteLink, CANONICAL_PREFIX};
