#![forbid(unsafe_code)]

//! Phoneme inventory with delimiter-aware transcription splitting
//!
//! A [`PhonemeSet`] holds the declared phoneme symbols together with the
//! delimiters used when serializing transcriptions. Splitting a transcription
//! back into phoneme tokens uses the compiled delimiter pattern, or falls
//! back to longest-match tokenization when the phoneme delimiter is empty.

use crate::error::{G2pError, GrammarError};
use crate::phonemes::splitter::split_into_phonemes;
use regex::Regex;
use std::path::Path;

/// An ordered set of phoneme symbols plus the delimiters of the rule set that
/// declared it
#[derive(Debug, Clone)]
pub struct PhonemeSet {
    symbols: Vec<String>,
    phoneme_delimiter: String,
    delimiter_re: Option<Regex>,
    syllable_delimiter: String,
    includes_phoneme_delimiter: bool,
}

impl Default for PhonemeSet {
    fn default() -> Self {
        PhonemeSet {
            symbols: Vec::new(),
            phoneme_delimiter: " ".to_string(),
            delimiter_re: Some(space_delimiter_re()),
            syllable_delimiter: String::new(),
            includes_phoneme_delimiter: true,
        }
    }
}

fn space_delimiter_re() -> Regex {
    // A single ASCII space delimiter tolerates runs of spaces.
    Regex::new(" +").expect("valid pattern")
}

fn compile_delimiter(delimiter: &str) -> Option<Regex> {
    if delimiter.is_empty() {
        return None;
    }
    if delimiter == " " {
        return Some(space_delimiter_re());
    }
    Some(Regex::new(&regex::escape(delimiter)).expect("escaped pattern is valid"))
}

impl PhonemeSet {
    /// Creates a phoneme set from symbols and delimiters.
    ///
    /// Duplicate symbols are rejected. `syllable_delimiter` may be empty when
    /// no syllabifier is defined.
    pub fn new(
        symbols: Vec<String>,
        phoneme_delimiter: &str,
        syllable_delimiter: &str,
        includes_phoneme_delimiter: bool,
    ) -> Result<Self, GrammarError> {
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].contains(symbol) {
                return Err(GrammarError::DuplicatePhoneme {
                    symbol: symbol.clone(),
                });
            }
        }
        Ok(PhonemeSet {
            delimiter_re: compile_delimiter(phoneme_delimiter),
            symbols,
            phoneme_delimiter: phoneme_delimiter.to_string(),
            syllable_delimiter: syllable_delimiter.to_string(),
            includes_phoneme_delimiter,
        })
    }

    /// Loads a sidecar phoneme-set file: one symbol per line, `//` comments.
    ///
    /// Used to override a grammar's inline `PHONEME_SET`.
    pub fn from_path(
        path: impl AsRef<Path>,
        phoneme_delimiter: &str,
        syllable_delimiter: &str,
        includes_phoneme_delimiter: bool,
    ) -> Result<Self, G2pError> {
        let content = std::fs::read_to_string(path)?;
        let symbols = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with("//"))
            .map(str::to_string)
            .collect();
        Ok(Self::new(
            symbols,
            phoneme_delimiter,
            syllable_delimiter,
            includes_phoneme_delimiter,
        )?)
    }

    /// The declared symbols, in declaration order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// True if an inventory was declared
    pub fn has_symbols(&self) -> bool {
        !self.symbols.is_empty()
    }

    pub fn phoneme_delimiter(&self) -> &str {
        &self.phoneme_delimiter
    }

    pub fn syllable_delimiter(&self) -> &str {
        &self.syllable_delimiter
    }

    /// True if the given symbol belongs to the inventory
    pub fn valid_phoneme(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Splits a serialized transcription into phoneme tokens.
    ///
    /// With a non-empty phoneme delimiter the transcription is split on the
    /// compiled delimiter pattern; with an empty delimiter, longest-match
    /// tokenization against the inventory is used and unknown symbols are an
    /// error. Empty input yields an empty list.
    pub fn split_transcription(&self, transcription: &str) -> Result<Vec<String>, G2pError> {
        if transcription.is_empty() {
            return Ok(Vec::new());
        }
        let Some(delimiter_re) = &self.delimiter_re else {
            let (phonemes, unknown) = split_into_phonemes(&self.symbols, transcription);
            if !unknown.is_empty() {
                return Err(G2pError::UnknownPhonemes {
                    transcription: transcription.to_string(),
                    symbols: unknown,
                });
            }
            return Ok(phonemes);
        };
        let tokens: Vec<String> = delimiter_re
            .split(transcription)
            .map(str::to_string)
            .collect();
        if self.includes_phoneme_delimiter || self.syllable_delimiter.is_empty() {
            return Ok(tokens);
        }
        // Syllable boundaries not flanked by phoneme delimiters come out glued
        // to their neighbours; split them off as tokens of their own.
        let mut res = Vec::with_capacity(tokens.len());
        for token in tokens {
            if token == self.syllable_delimiter || !token.contains(&self.syllable_delimiter) {
                res.push(token);
                continue;
            }
            let mut rest = token.as_str();
            while let Some(at) = rest.find(&self.syllable_delimiter) {
                if at > 0 {
                    res.push(rest[..at].to_string());
                }
                res.push(self.syllable_delimiter.clone());
                rest = &rest[at + self.syllable_delimiter.len()..];
            }
            if !rest.is_empty() {
                res.push(rest.to_string());
            }
        }
        Ok(res)
    }

    /// Splits `input` and returns the symbols that are not in the inventory
    pub fn invalid_symbols(&self, input: &str) -> Result<Vec<String>, G2pError> {
        let mut invalid = Vec::new();
        for symbol in self.split_transcription(input)? {
            if !self.valid_phoneme(&symbol) && !invalid.contains(&symbol) {
                invalid.push(symbol);
            }
        }
        Ok(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(ss: &[&str]) -> Vec<String> {
        ss.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let result = PhonemeSet::new(symbols(&["a", "b", "a"]), " ", "", true);
        assert!(matches!(
            result,
            Err(GrammarError::DuplicatePhoneme { symbol }) if symbol == "a"
        ));
    }

    #[test]
    fn test_split_on_space_delimiter() {
        let set = PhonemeSet::new(symbols(&["a", "b", "tS"]), " ", "", true).unwrap();
        let tokens = set.split_transcription("a  tS b").unwrap();
        assert_eq!(tokens, vec!["a", "tS", "b"]);
    }

    #[test]
    fn test_split_on_custom_delimiter() {
        let set = PhonemeSet::new(symbols(&["a", "b"]), ".", "", true).unwrap();
        let tokens = set.split_transcription("a.b.a").unwrap();
        assert_eq!(tokens, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_split_empty_input() {
        let set = PhonemeSet::new(symbols(&["a"]), " ", "", true).unwrap();
        assert!(set.split_transcription("").unwrap().is_empty());
    }

    #[test]
    fn test_split_without_delimiter_uses_longest_match() {
        let set = PhonemeSet::new(symbols(&["t", "S", "tS", "a"]), "", "", true).unwrap();
        let tokens = set.split_transcription("tSa").unwrap();
        assert_eq!(tokens, vec!["tS", "a"]);
    }

    #[test]
    fn test_split_without_delimiter_unknown_symbol_is_error() {
        let set = PhonemeSet::new(symbols(&["a"]), "", "", true).unwrap();
        let result = set.split_transcription("axa");
        assert!(matches!(
            result,
            Err(G2pError::UnknownPhonemes { symbols, .. }) if symbols == vec!["x".to_string()]
        ));
    }

    #[test]
    fn test_split_detaches_bare_syllable_delimiter() {
        let set = PhonemeSet::new(symbols(&["a", "b", "."]), " ", ".", false).unwrap();
        let tokens = set.split_transcription("a.b a").unwrap();
        assert_eq!(tokens, vec!["a", ".", "b", "a"]);
    }

    #[test]
    fn test_invalid_symbols() {
        let set = PhonemeSet::new(symbols(&["a", "b"]), " ", "", true).unwrap();
        let invalid = set.invalid_symbols("a x b y x").unwrap();
        assert_eq!(invalid, vec!["x", "y"]);
    }

    #[test]
    fn test_valid_phoneme() {
        let set = PhonemeSet::new(symbols(&["a", "b"]), " ", "", true).unwrap();
        assert!(set.valid_phoneme("a"));
        assert!(!set.valid_phoneme("x"));
    }
}
