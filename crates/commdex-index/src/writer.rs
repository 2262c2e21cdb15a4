//! Index write session using Tantivy

use std::path::{Path, PathBuf};

use commdex_core::{Communication, TokenizerMode};
use tantivy::directory::MmapDirectory;
use tantivy::{Index, IndexWriter, TantivyDocument};

use crate::error::{IndexError, IndexResult};
use crate::record::{extract_records, IndexedRecord};
use crate::schema::{build_schema, register_tokenizers, IndexFields};
use crate::traits::CommunicationIndexer;

/// Writer heap budget (50MB)
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Builds an index at a directory, replacing any documents already there
pub struct TantivyCommunicationIndexer {
    location: PathBuf,
    mode: TokenizerMode,
    fields: IndexFields,
    writer: Option<IndexWriter>,
    records_written: u64,
}

impl TantivyCommunicationIndexer {
    pub fn open(location: &Path, mode: TokenizerMode) -> IndexResult<Self> {
        std::fs::create_dir_all(location)?;

        let dir = MmapDirectory::open(location).map_err(|e| IndexError::open(location, e))?;
        let schema = build_schema(mode);
        let index = Index::open_or_create(dir, schema.clone()).map_err(|e| {
            IndexError::open(
                location,
                format!("{} (was the index built with a different tokenizer mode?)", e),
            )
        })?;
        register_tokenizers(&index);

        let fields = IndexFields::from_schema(&schema)?;

        let writer: IndexWriter = index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| IndexError::open(location, e))?;
        writer
            .delete_all_documents()
            .map_err(|e| IndexError::Write(e.to_string()))?;

        tracing::info!("Opened index for writing at {:?} ({:?} tokenizer)", location, mode);

        Ok(Self {
            location: location.to_path_buf(),
            mode,
            fields,
            writer: Some(writer),
            records_written: 0,
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    fn create_document(&self, record: &IndexedRecord) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        doc.add_text(self.fields.communication_id, &record.communication_id);
        if let Some(sentence_id) = &record.sentence_id {
            doc.add_text(self.fields.sentence_id, sentence_id);
        }
        doc.add_text(self.fields.unit, record.unit.as_str());
        doc.add_text(self.fields.text, &record.content);
        doc
    }
}

impl CommunicationIndexer for TantivyCommunicationIndexer {
    fn add(&mut self, communication: &Communication) -> IndexResult<usize> {
        let records = extract_records(communication, self.mode);
        if records.is_empty() {
            return Ok(0);
        }

        let docs: Vec<TantivyDocument> = records.iter().map(|r| self.create_document(r)).collect();
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| IndexError::Unavailable("index writer already closed".to_string()))?;

        for doc in docs {
            writer
                .add_document(doc)
                .map_err(|e| IndexError::Write(e.to_string()))?;
        }

        self.records_written += records.len() as u64;
        Ok(records.len())
    }

    fn close(&mut self) -> IndexResult<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        writer
            .commit()
            .map_err(|e| IndexError::Write(e.to_string()))?;
        writer
            .wait_merging_threads()
            .map_err(|e| IndexError::Write(e.to_string()))?;

        tracing::info!(
            "Committed {} records to index at {:?}",
            self.records_written,
            self.location
        );
        Ok(())
    }
}
