//! Mapping communications to index records

use commdex_core::{Communication, SearchType, TokenizerMode};

/// The unit stored in the index: one per sentence, or one per communication
/// that has text but no sentence structure.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord {
    pub communication_id: String,
    pub sentence_id: Option<String>,
    pub unit: SearchType,
    pub content: String,
}

/// Extract the searchable records of a communication.
///
/// An empty result means the communication lacks the structure `mode`
/// needs and should be skipped.
pub fn extract_records(communication: &Communication, mode: TokenizerMode) -> Vec<IndexedRecord> {
    match mode {
        TokenizerMode::Native => native_records(communication),
        TokenizerMode::PreTokenized => pretokenized_records(communication),
    }
}

fn native_records(communication: &Communication) -> Vec<IndexedRecord> {
    let Some(text) = communication.text.as_deref() else {
        return Vec::new();
    };

    if !communication.has_structure() {
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![IndexedRecord {
            communication_id: communication.id.clone(),
            sentence_id: None,
            unit: SearchType::Communications,
            content: text.to_string(),
        }];
    }

    let mut records = Vec::new();
    for sentence in communication.sentences() {
        match sentence.text_in(text) {
            Some(content) if !content.trim().is_empty() => records.push(IndexedRecord {
                communication_id: communication.id.clone(),
                sentence_id: Some(sentence.uuid.clone()),
                unit: SearchType::Sentences,
                content: content.to_string(),
            }),
            Some(_) => {}
            None => tracing::debug!(
                "Skipping sentence {} of {}: missing or invalid text span",
                sentence.uuid,
                communication.id
            ),
        }
    }
    records
}

fn pretokenized_records(communication: &Communication) -> Vec<IndexedRecord> {
    communication
        .sentences()
        .filter_map(|sentence| {
            let content = sentence.joined_tokens()?;
            Some(IndexedRecord {
                communication_id: communication.id.clone(),
                sentence_id: Some(sentence.uuid.clone()),
                unit: SearchType::Sentences,
                content,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use commdex_core::{Section, Sentence};

    fn two_sentence_comm() -> Communication {
        Communication::new("doc-1")
            .with_text("The fire spread. Crews responded.")
            .with_section(
                Section::new("sec-1")
                    .with_sentence(
                        Sentence::new("s-1")
                            .with_span(0, 16)
                            .with_tokens(["The", "fire", "spread", "."]),
                    )
                    .with_sentence(Sentence::new("s-2").with_span(17, 33)),
            )
    }

    #[test]
    fn test_native_one_record_per_sentence() {
        let records = extract_records(&two_sentence_comm(), TokenizerMode::Native);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "The fire spread.");
        assert_eq!(records[0].sentence_id.as_deref(), Some("s-1"));
        assert_eq!(records[1].content, "Crews responded.");
        assert!(records.iter().all(|r| r.unit == SearchType::Sentences));
    }

    #[test]
    fn test_native_skips_invalid_span() {
        let comm = Communication::new("doc-2").with_text("short").with_section(
            Section::new("sec")
                .with_sentence(Sentence::new("ok").with_span(0, 5))
                .with_sentence(Sentence::new("bad").with_span(2, 50))
                .with_sentence(Sentence::new("none")),
        );
        let records = extract_records(&comm, TokenizerMode::Native);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sentence_id.as_deref(), Some("ok"));
    }

    #[test]
    fn test_native_unstructured_is_one_communication_record() {
        let comm = Communication::new("bare").with_text("whole text");
        let records = extract_records(&comm, TokenizerMode::Native);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].unit, SearchType::Communications);
        assert_eq!(records[0].sentence_id, None);
    }

    #[test]
    fn test_native_without_text_is_skipped() {
        let comm = Communication::new("empty")
            .with_section(Section::new("sec").with_sentence(Sentence::new("s").with_span(0, 3)));
        assert!(extract_records(&comm, TokenizerMode::Native).is_empty());
    }

    #[test]
    fn test_pretokenized_uses_tokens_only() {
        let records = extract_records(&two_sentence_comm(), TokenizerMode::PreTokenized);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "The fire spread .");
        assert_eq!(records[0].sentence_id.as_deref(), Some("s-1"));

        let bare = Communication::new("bare").with_text("no tokens here");
        assert!(extract_records(&bare, TokenizerMode::PreTokenized).is_empty());
    }
}
