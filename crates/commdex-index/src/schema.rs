//! Index schema and analyzers

use commdex_core::TokenizerMode;
use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, TextAnalyzer, WhitespaceTokenizer};
use tantivy::Index;

use crate::error::{IndexError, IndexResult};

pub const COMM_ID_FIELD: &str = "comm_id";
pub const SENTENCE_ID_FIELD: &str = "sentence_id";
pub const UNIT_FIELD: &str = "unit";
pub const TEXT_FIELD: &str = "text";

/// Engine-native analyzer (tantivy's built-in)
pub const NATIVE_TOKENIZER: &str = "default";

/// Splits on whitespace only, so supplied tokens survive intact
pub const PRETOKENIZED_TOKENIZER: &str = "commdex_pretokenized";

pub fn tokenizer_name(mode: TokenizerMode) -> &'static str {
    match mode {
        TokenizerMode::Native => NATIVE_TOKENIZER,
        TokenizerMode::PreTokenized => PRETOKENIZED_TOKENIZER,
    }
}

pub fn build_schema(mode: TokenizerMode) -> Schema {
    let mut schema_builder = Schema::builder();

    schema_builder.add_text_field(COMM_ID_FIELD, STRING | STORED);
    schema_builder.add_text_field(SENTENCE_ID_FIELD, STRING | STORED);
    schema_builder.add_text_field(UNIT_FIELD, STRING | STORED);

    let indexing = TextFieldIndexing::default()
        .set_tokenizer(tokenizer_name(mode))
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let text_options = TextOptions::default()
        .set_indexing_options(indexing)
        .set_stored();
    schema_builder.add_text_field(TEXT_FIELD, text_options);

    schema_builder.build()
}

/// Register the analyzers every commdex index may refer to
pub fn register_tokenizers(index: &Index) {
    let pretokenized = TextAnalyzer::builder(WhitespaceTokenizer::default())
        .filter(LowerCaser)
        .build();
    index
        .tokenizers()
        .register(PRETOKENIZED_TOKENIZER, pretokenized);
}

/// Field handles resolved against a schema
#[derive(Debug, Clone, Copy)]
pub struct IndexFields {
    pub communication_id: Field,
    pub sentence_id: Field,
    pub unit: Field,
    pub text: Field,
}

impl IndexFields {
    pub fn from_schema(schema: &Schema) -> IndexResult<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|e| IndexError::Read(format!("missing field '{}': {}", name, e)))
        };
        Ok(Self {
            communication_id: field(COMM_ID_FIELD)?,
            sentence_id: field(SENTENCE_ID_FIELD)?,
            unit: field(UNIT_FIELD)?,
            text: field(TEXT_FIELD)?,
        })
    }
}
