use crate::config::QueryConfig;
use crate::query::{Query, QueryCategory};

/// Produces the ordered query sequence for a run
///
/// # Ordering
///
/// 1. A search-site query for every base phrase
/// 2. An article query for every base phrase
/// 3. For every combined phrase, its search-site query followed by its
///    article query
///
/// Article queries are left out entirely when no article sites are
/// configured, since they would have nothing to fan out to.
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    search_site: String,
    base_phrases: Vec<String>,
    combined_phrases: Vec<String>,
    with_articles: bool,
}

impl QueryGenerator {
    /// Creates a generator for the given site and phrase configuration
    pub fn new(search_site: &str, config: &QueryConfig) -> Self {
        Self {
            search_site: search_site.to_string(),
            base_phrases: config.base_phrases.clone(),
            combined_phrases: config.combined_phrases.clone(),
            with_articles: !config.article_sites.is_empty(),
        }
    }

    /// Lazily yields the queries in generation order
    pub fn iter(&self) -> impl Iterator<Item = Query> + '_ {
        let base_site = self.base_phrases.iter().map(move |p| self.site_query(p));
        let base_articles = self
            .base_phrases
            .iter()
            .filter(move |_| self.with_articles)
            .map(move |p| self.article_query(p));
        let combined = self.combined_phrases.iter().flat_map(move |p| {
            let article = self.with_articles.then(|| self.article_query(p));
            std::iter::once(self.site_query(p)).chain(article)
        });

        base_site.chain(base_articles).chain(combined)
    }

    /// Returns the number of queries the generator yields
    pub fn len(&self) -> usize {
        let per_phrase = if self.with_articles { 2 } else { 1 };
        (self.base_phrases.len() + self.combined_phrases.len()) * per_phrase
    }

    /// Returns true if no queries would be generated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn site_query(&self, phrase: &str) -> Query {
        Query::new(
            QueryCategory::SearchSite,
            format!("site:{} {}", self.search_site, phrase),
        )
    }

    fn article_query(&self, phrase: &str) -> Query {
        Query::new(QueryCategory::ArticleSite, phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &[&str], combined: &[&str], sites: &[&str]) -> QueryConfig {
        QueryConfig {
            base_phrases: base.iter().map(|s| s.to_string()).collect(),
            combined_phrases: combined.iter().map(|s| s.to_string()).collect(),
            article_sites: sites.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_generation_order() {
        let generator = QueryGenerator::new("x.com", &config(&["a", "b"], &["c"], &["medium.com"]));
        let queries: Vec<Query> = generator.iter().collect();

        assert_eq!(
            queries,
            vec![
                Query::new(QueryCategory::SearchSite, "site:x.com a"),
                Query::new(QueryCategory::SearchSite, "site:x.com b"),
                Query::new(QueryCategory::ArticleSite, "a"),
                Query::new(QueryCategory::ArticleSite, "b"),
                Query::new(QueryCategory::SearchSite, "site:x.com c"),
                Query::new(QueryCategory::ArticleSite, "c"),
            ]
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let cfg = QueryConfig::default();
        let first: Vec<Query> = QueryGenerator::new("x.com", &cfg).iter().collect();
        let second: Vec<Query> = QueryGenerator::new("x.com", &cfg).iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_query_count() {
        let generator = QueryGenerator::new("x.com", &QueryConfig::default());
        assert_eq!(generator.len(), 40);
        assert_eq!(generator.iter().count(), 40);
    }

    #[test]
    fn test_no_article_sites_skips_article_queries() {
        let generator = QueryGenerator::new("x.com", &config(&["a", "b"], &["c"], &[]));
        let queries: Vec<Query> = generator.iter().collect();

        assert_eq!(generator.len(), 3);
        assert_eq!(queries.len(), 3);
        assert!(queries
            .iter()
            .all(|q| q.category() == QueryCategory::SearchSite));
    }

    #[test]
    fn test_lazy_take() {
        let generator = QueryGenerator::new("x.com", &QueryConfig::default());
        let first_two: Vec<Query> = generator.iter().take(2).collect();
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[0].text(), r#"site:x.com "discord.gg/" crypto"#);
    }

    #[test]
    fn test_empty_generator() {
        let generator = QueryGenerator::new("x.com", &config(&[], &[], &["medium.com"]));
        assert!(generator.is_empty());
        assert_eq!(generator.iter().count(), 0);
    }
}
