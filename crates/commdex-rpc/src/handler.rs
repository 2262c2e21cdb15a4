//! Search handler: the RPC-facing operations over an opened index

use std::sync::atomic::{AtomicBool, Ordering};

use commdex_core::{
    SearchCapability, SearchQuery, SearchResultItem, SearchResultSet, SearchType, ServiceInfo,
    MAX_SEARCH_RESULTS,
};
use commdex_index::CommunicationSearcher;

use crate::error::ServiceResult;

/// Tool name recorded in response metadata
pub const TOOL_NAME: &str = "commdex tantivy search";

const SERVICE_NAME: &str = "commdex search";

pub struct SearchHandler<S: CommunicationSearcher> {
    searcher: S,
    language: String,
    info: ServiceInfo,
    closed: AtomicBool,
}

impl<S: CommunicationSearcher> SearchHandler<S> {
    /// Wrap an opened searcher. `language` is the single language served.
    pub fn new(searcher: S, language: impl Into<String>) -> Self {
        Self {
            searcher,
            language: language.into(),
            info: ServiceInfo::new(SERVICE_NAME, env!("CARGO_PKG_VERSION")),
            closed: AtomicBool::new(false),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info = self.info.with_description(description);
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Run a query. A blank query returns an empty result set without
    /// touching the index.
    pub fn search(&self, query: SearchQuery) -> ServiceResult<SearchResultSet> {
        let lang = query.lang.clone().unwrap_or_else(|| self.language.clone());
        let mut results = SearchResultSet::for_query(query, TOOL_NAME).with_lang(lang);

        let span = tracing::info_span!("search", id = %results.uuid);
        let _enter = span.enter();

        if results.search_query.is_blank() {
            tracing::info!("Short circuiting an empty query");
            return Ok(results);
        }

        let raw = results.search_query.raw_query.as_str();
        tracing::debug!("Searching for {:?}", raw);
        let hits = self.searcher.search(raw, MAX_SEARCH_RESULTS)?;

        results.search_result_items = hits
            .into_iter()
            .map(|hit| SearchResultItem {
                communication_id: hit.communication_id,
                sentence_id: hit.sentence_id,
                score: hit.score,
            })
            .collect();

        tracing::info!("Returning {} results", results.len());
        Ok(results)
    }

    pub fn about(&self) -> ServiceInfo {
        self.info.clone()
    }

    pub fn alive(&self) -> bool {
        true
    }

    pub fn capabilities(&self) -> Vec<SearchCapability> {
        vec![
            SearchCapability::new(&self.language, SearchType::Communications),
            SearchCapability::new(&self.language, SearchType::Sentences),
        ]
    }

    /// No corpora are distinguished within one index
    pub fn corpora(&self) -> Vec<String> {
        Vec::new()
    }

    /// Release the index; later calls are no-ops.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.searcher.close() {
            tracing::warn!("Failed to close index reader: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use commdex_index::{IndexError, IndexResult, SearchHit};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    /// Searcher with canned hits; "AND" at the end of a query is a parse error
    #[derive(Default)]
    pub(crate) struct MockSearcher {
        pub searches: Arc<AtomicUsize>,
        pub closes: Arc<AtomicUsize>,
    }

    impl CommunicationSearcher for MockSearcher {
        fn search(&self, raw_query: &str, limit: usize) -> IndexResult<Vec<SearchHit>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            if raw_query.trim_end().ends_with("AND") {
                return Err(IndexError::QueryParse {
                    query: raw_query.to_string(),
                    reason: "expected a term after AND".to_string(),
                });
            }
            let hits = vec![
                SearchHit {
                    communication_id: "doc-1".to_string(),
                    sentence_id: Some("s-1".to_string()),
                    score: 2.5,
                },
                SearchHit {
                    communication_id: "doc-2".to_string(),
                    sentence_id: None,
                    score: 1.0,
                },
            ];
            Ok(hits.into_iter().take(limit).collect())
        }

        fn close(&self) -> IndexResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_blank_query_skips_engine() {
        let searcher = MockSearcher::default();
        let searches = searcher.searches.clone();
        let handler = SearchHandler::new(searcher, "eng");

        for raw in ["", "   ", "\t\n"] {
            let results = handler.search(SearchQuery::new(raw)).unwrap();
            assert!(results.is_empty());
            assert_eq!(results.search_query.raw_query, raw);
            assert!(!results.uuid.to_string().is_empty());
        }
        assert_eq!(searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_search_maps_hits() {
        let handler = SearchHandler::new(MockSearcher::default(), "eng");
        let query = SearchQuery::new("flood");

        let results = handler.search(query.clone()).unwrap();

        assert_eq!(results.search_query, query);
        assert_eq!(results.len(), 2);
        assert_eq!(results.search_result_items[0].communication_id, "doc-1");
        assert_eq!(results.search_result_items[0].sentence_id.as_deref(), Some("s-1"));
        assert_eq!(results.search_result_items[0].score, 2.5);
        assert_eq!(results.lang.as_deref(), Some("eng"));
        assert_eq!(results.metadata.tool, TOOL_NAME);
    }

    #[test]
    fn test_response_ids_are_unique() {
        let handler = SearchHandler::new(MockSearcher::default(), "eng");
        let a = handler.search(SearchQuery::new("flood")).unwrap();
        let b = handler.search(SearchQuery::new("flood")).unwrap();
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn test_parse_error_keeps_handler_usable() {
        let handler = SearchHandler::new(MockSearcher::default(), "eng");

        let err = handler.search(SearchQuery::new("term1 AND")).unwrap_err();
        assert!(matches!(err, ServiceError::QueryParse { ref query, .. } if query == "term1 AND"));

        assert!(handler.alive());
        assert_eq!(handler.search(SearchQuery::new("term1")).unwrap().len(), 2);
    }

    #[test]
    fn test_query_language_wins() {
        let handler = SearchHandler::new(MockSearcher::default(), "eng");
        let results = handler.search(SearchQuery::new("x").with_lang("spa")).unwrap();
        assert_eq!(results.lang.as_deref(), Some("spa"));
    }

    #[test]
    fn test_capabilities_and_corpora() {
        let handler = SearchHandler::new(MockSearcher::default(), "eng");
        let caps = handler.capabilities();
        assert_eq!(caps.len(), 2);
        assert!(caps.contains(&SearchCapability::new("eng", SearchType::Communications)));
        assert!(caps.contains(&SearchCapability::new("eng", SearchType::Sentences)));
        assert!(handler.corpora().is_empty());
    }

    #[test]
    fn test_about() {
        let handler = SearchHandler::new(MockSearcher::default(), "eng").with_description("index at /tmp/x");
        let info = handler.about();
        assert_eq!(info.name, "commdex search");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.description.as_deref(), Some("index at /tmp/x"));
    }

    #[test]
    fn test_close_once() {
        let searcher = MockSearcher::default();
        let closes = searcher.closes.clone();
        let handler = SearchHandler::new(searcher, "eng");

        handler.close();
        handler.close();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
