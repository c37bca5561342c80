#![forbid(unsafe_code)]

//! JSON Lines output: one JSON object per transcribed word

use crate::types::{TestReport, UnmappableSymbols};
use serde::Serialize;

/// One transcribed word
#[derive(Debug, Serialize)]
pub struct TranscriptionRecord<'a> {
    pub orth: &'a str,
    pub transcriptions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmappable: Option<&'a UnmappableSymbols>,
}

/// Serializes transcription records and validation reports as JSONL
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// One line for a transcribed word
    pub fn transcription(record: &TranscriptionRecord<'_>) -> String {
        serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line for a whole validation report
    pub fn report(report: &TestReport) -> String {
        serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
    }
}
