//! Communication (document) types

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, ending)` into a communication's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub ending: usize,
}

impl TextSpan {
    pub fn new(start: usize, ending: usize) -> Self {
        Self { start, ending }
    }

    /// Slice `text` by this span.
    ///
    /// Returns `None` when the span is inverted, runs past the end of the
    /// text, or does not fall on UTF-8 character boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.start > self.ending {
            return None;
        }
        text.get(self.start..self.ending)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.ending
    }
}

/// A single token of a pre-tokenized sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Position of the token within its sentence
    pub index: u32,

    /// Surface form
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_span: Option<TextSpan>,
}

impl Token {
    pub fn new(index: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            text_span: None,
        }
    }
}

/// A sentence within a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    /// Unique identifier of the sentence
    pub uuid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_span: Option<TextSpan>,

    /// Tokenization supplied by an upstream analytic, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,
}

impl Sentence {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            text_span: None,
            tokens: None,
        }
    }

    pub fn with_span(mut self, start: usize, ending: usize) -> Self {
        self.text_span = Some(TextSpan::new(start, ending));
        self
    }

    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = Some(
            tokens
                .into_iter()
                .enumerate()
                .map(|(i, t)| Token::new(i as u32, t))
                .collect(),
        );
        self
    }

    /// Text covered by this sentence, if its span is valid for `text`
    pub fn text_in<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.text_span.as_ref().and_then(|span| span.slice(text))
    }

    /// Tokens joined by single spaces, `None` when untokenized or empty
    pub fn joined_tokens(&self) -> Option<String> {
        let tokens = self.tokens.as_ref()?;
        if tokens.is_empty() {
            return None;
        }
        Some(
            tokens
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// A section: an ordered list of sentences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub uuid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_span: Option<TextSpan>,

    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl Section {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            kind: None,
            text_span: None,
            sentences: Vec::new(),
        }
    }

    pub fn with_sentence(mut self, sentence: Sentence) -> Self {
        self.sentences.push(sentence);
        self
    }
}

/// A communication: the unit of ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    /// Stable identifier, unique within a corpus
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Full text backing every span in the communication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Communication {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            kind: None,
            text: None,
            sections: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// All sentences in document order
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sections.iter().flat_map(|s| s.sentences.iter())
    }

    pub fn has_structure(&self) -> bool {
        self.sections.iter().any(|s| !s.sentences.is_empty())
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice() {
        let text = "Hello world.";
        assert_eq!(TextSpan::new(0, 5).slice(text), Some("Hello"));
        assert_eq!(TextSpan::new(6, 12).slice(text), Some("world."));
        assert_eq!(TextSpan::new(6, 13).slice(text), None);
        assert_eq!(TextSpan::new(5, 2).slice(text), None);
    }

    #[test]
    fn test_span_rejects_split_char() {
        let text = "héllo";
        // 'é' occupies bytes 1..3
        assert_eq!(TextSpan::new(0, 2).slice(text), None);
        assert_eq!(TextSpan::new(0, 3).slice(text), Some("hé"));
    }

    #[test]
    fn test_communication_json() {
        let json = r#"{
            "id": "doc-1",
            "text": "One. Two.",
            "sections": [{
                "uuid": "sec-1",
                "sentences": [
                    {"uuid": "s-1", "textSpan": {"start": 0, "ending": 4}},
                    {"uuid": "s-2", "textSpan": {"start": 5, "ending": 9},
                     "tokens": [{"index": 0, "text": "Two"}, {"index": 1, "text": "."}]}
                ]
            }]
        }"#;
        let comm = Communication::from_json(json.as_bytes()).unwrap();
        assert_eq!(comm.id, "doc-1");
        assert!(comm.has_structure());

        let sentences: Vec<_> = comm.sentences().collect();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text_in(comm.text.as_deref().unwrap()), Some("One."));
        assert_eq!(sentences[1].joined_tokens().as_deref(), Some("Two ."));
        assert_eq!(sentences[0].joined_tokens(), None);
    }

    #[test]
    fn test_communication_without_sections() {
        let comm = Communication::from_json(br#"{"id": "bare", "text": "just text"}"#).unwrap();
        assert!(!comm.has_structure());
        assert_eq!(comm.sentences().count(), 0);
    }
}
