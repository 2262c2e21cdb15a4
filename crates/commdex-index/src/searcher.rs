//! Read-only search over a built index using Tantivy

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument};

use crate::error::{IndexError, IndexResult};
use crate::schema::{register_tokenizers, IndexFields};
use crate::traits::{CommunicationSearcher, SearchHit};

struct OpenIndex {
    reader: IndexReader,
    parser: QueryParser,
    fields: IndexFields,
}

/// Searcher over an index opened once, read-only, and shared by all callers
pub struct TantivyCommunicationSearcher {
    location: PathBuf,
    state: RwLock<Option<OpenIndex>>,
}

impl TantivyCommunicationSearcher {
    pub fn open(location: &Path) -> IndexResult<Self> {
        let dir = MmapDirectory::open(location).map_err(|e| IndexError::open(location, e))?;
        let index = Index::open(dir).map_err(|e| IndexError::open(location, e))?;
        register_tokenizers(&index);

        let fields = IndexFields::from_schema(&index.schema())?;

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| IndexError::open(location, e))?;

        let parser = QueryParser::for_index(&index, vec![fields.text]);

        let searcher = Self {
            location: location.to_path_buf(),
            state: RwLock::new(Some(OpenIndex {
                reader,
                parser,
                fields,
            })),
        };
        tracing::info!(
            "Opened index at {:?} ({} documents)",
            location,
            searcher.num_docs()?
        );
        Ok(searcher)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn num_docs(&self) -> IndexResult<u64> {
        let state = self
            .state
            .read()
            .map_err(|e| IndexError::Read(format!("Lock error: {}", e)))?;
        let open = state
            .as_ref()
            .ok_or_else(|| IndexError::Unavailable("index has been closed".to_string()))?;
        Ok(open.reader.searcher().num_docs())
    }
}

impl CommunicationSearcher for TantivyCommunicationSearcher {
    fn search(&self, raw_query: &str, limit: usize) -> IndexResult<Vec<SearchHit>> {
        let state = self
            .state
            .read()
            .map_err(|e| IndexError::Read(format!("Lock error: {}", e)))?;
        let open = state
            .as_ref()
            .ok_or_else(|| IndexError::Unavailable("index has been closed".to_string()))?;

        let query = open
            .parser
            .parse_query(raw_query)
            .map_err(|e| IndexError::QueryParse {
                query: raw_query.to_string(),
                reason: e.to_string(),
            })?;

        if limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = open.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| IndexError::Read(e.to_string()))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| IndexError::Read(e.to_string()))?;

            let Some(communication_id) = doc
                .get_first(open.fields.communication_id)
                .and_then(|v| v.as_str())
            else {
                tracing::warn!("Indexed record {:?} has no communication id", doc_address);
                continue;
            };

            let sentence_id = doc
                .get_first(open.fields.sentence_id)
                .and_then(|v| v.as_str())
                .map(str::to_string);

            hits.push(SearchHit {
                communication_id: communication_id.to_string(),
                sentence_id,
                score,
            });
        }

        Ok(hits)
    }

    fn close(&self) -> IndexResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| IndexError::Read(format!("Lock error: {}", e)))?;
        if state.take().is_some() {
            tracing::info!("Closed index at {:?}", self.location);
        }
        Ok(())
    }
}
