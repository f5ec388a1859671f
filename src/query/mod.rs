//! Query generation for discovery runs
//!
//! A run is driven by a fixed, ordered list of queries built from the
//! configured phrases and sites. The order never changes between runs with
//! the same configuration, so a run can be reproduced or resumed by index.

mod generator;

pub use generator::QueryGenerator;

use std::fmt;

/// Which fetch strategy a query is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCategory {
    /// Search scoped to the configured search site (e.g. `site:x.com`)
    SearchSite,

    /// Search fanned out across the configured article-hosting domains
    ArticleSite,
}

impl QueryCategory {
    /// Short label used in progress output
    pub fn label(&self) -> &'static str {
        match self {
            Self::SearchSite => "search-site",
            Self::ArticleSite => "articles",
        }
    }
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An immutable (category, query string) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    category: QueryCategory,
    text: String,
}

impl Query {
    /// Creates a new query
    pub fn new(category: QueryCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }

    /// Returns the query category
    pub fn category(&self) -> QueryCategory {
        self.category
    }

    /// Returns the query string
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.text)
    }
}
