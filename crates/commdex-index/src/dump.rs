//! Plain-text dump of an index
//!
//! One line per record: `<comm id> (<sentence id>) : <term> <term> ...`

use std::io::Write;
use std::path::Path;

use tantivy::collector::DocSetCollector;
use tantivy::directory::MmapDirectory;
use tantivy::query::AllQuery;
use tantivy::schema::Value;
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, TantivyDocument};

use crate::error::{IndexError, IndexResult};
use crate::schema::{register_tokenizers, IndexFields};

/// Write every record in the index at `location` to `out`.
///
/// Returns the number of records written.
pub fn dump_index<W: Write>(location: &Path, out: &mut W) -> IndexResult<usize> {
    if !location.is_dir() {
        return Err(IndexError::open(location, "index directory does not exist"));
    }

    let dir = MmapDirectory::open(location).map_err(|e| IndexError::open(location, e))?;
    let index = Index::open(dir).map_err(|e| IndexError::open(location, e))?;
    register_tokenizers(&index);

    let fields = IndexFields::from_schema(&index.schema())?;
    let mut analyzer = index
        .tokenizer_for_field(fields.text)
        .map_err(|e| IndexError::Read(e.to_string()))?;

    let reader = index
        .reader()
        .map_err(|e| IndexError::Read(e.to_string()))?;
    let searcher = reader.searcher();

    let mut addresses: Vec<_> = searcher
        .search(&AllQuery, &DocSetCollector)
        .map_err(|e| IndexError::Read(e.to_string()))?
        .into_iter()
        .collect();
    addresses.sort();

    for address in &addresses {
        let doc: TantivyDocument = searcher
            .doc(*address)
            .map_err(|e| IndexError::Read(e.to_string()))?;

        let stored = |field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let comm_id = stored(fields.communication_id);
        let sentence_id = stored(fields.sentence_id);
        let text = stored(fields.text);

        let mut terms = Vec::new();
        let mut stream = analyzer.token_stream(&text);
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }

        if terms.is_empty() {
            writeln!(out, "{} ({}) : NO_TERMS", comm_id, sentence_id)?;
        } else {
            writeln!(out, "{} ({}) : {}", comm_id, sentence_id, terms.join(" "))?;
        }
    }

    Ok(addresses.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CommunicationIndexer;
    use crate::writer::TantivyCommunicationIndexer;
    use commdex_core::{Communication, Section, Sentence, TokenizerMode};

    #[test]
    fn test_dump_lists_records() {
        let dir = tempfile::tempdir().unwrap();
        let comm = Communication::new("doc-7").with_text("Storm Warning").with_section(
            Section::new("sec").with_sentence(
                Sentence::new("s-1")
                    .with_span(0, 13)
                    .with_tokens(["Storm", "Warning"]),
            ),
        );
        let mut indexer =
            TantivyCommunicationIndexer::open(dir.path(), TokenizerMode::PreTokenized).unwrap();
        indexer.add(&comm).unwrap();
        indexer.close().unwrap();

        let mut out = Vec::new();
        let count = dump_index(dir.path(), &mut out).unwrap();
        assert_eq!(count, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "doc-7 (s-1) : storm warning\n");
    }

    #[test]
    fn test_dump_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let result = dump_index(&dir.path().join("absent"), &mut out);
        assert!(matches!(result, Err(IndexError::Open { .. })));
    }
}
