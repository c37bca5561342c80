//! Error types for graphon
//!
//! Grammar files fail fast at load time: the first problem encountered is
//! returned as a [`GrammarError`] with enough context to point at the
//! offending line. Applying a loaded rule set never fails; unmappable input
//! is reported as a diagnostic value instead (see
//! [`crate::types::UnmappableSymbols`]).

/// Load-time errors for grammar, syllabifier, and phoneme-set files
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// A line that matched no known line kind, or matched one with bad shape
    #[error("invalid {kind} definition on line {line}: {text}")]
    InvalidLine {
        kind: &'static str,
        line: usize,
        text: String,
    },

    /// A user-supplied pattern that the regex engine rejected
    #[error("invalid regular expression /{pattern}/ on line {line}: {source}")]
    InvalidRegex {
        pattern: String,
        line: usize,
        #[source]
        source: Box<regex::Error>,
    },

    /// A `{NAME}` or bare uppercase context token with no matching VAR
    #[error("undefined variable {name} in /{context}/")]
    UndefinedVariable { name: String, context: String },

    /// Declared variables that no rule, filter, or prefilter references
    #[error("unused variable(s) {names} in {path}")]
    UnusedVariables { names: String, path: String },

    /// Two rules with the same input and contexts
    #[error("duplicate rules in {path}: {first} (line {first_line}) vs. {second} (line {second_line})")]
    DuplicateRule {
        path: String,
        first: String,
        first_line: usize,
        second: String,
        second_line: usize,
    },

    /// CHARACTER_SET is required and must be non-empty
    #[error("no character set defined in {path}")]
    MissingCharacterSet { path: String },

    /// ONSETS, SYLLABIC, STRESS, and DELIMITER are all required once any
    /// SYLLDEF line is present
    #[error("{key} is required for the syllable definition")]
    MissingSyllDefKey { key: &'static str },

    /// A syllabifier needs at least one delimiter to serialize against
    #[error("the phoneme delimiter and the syllable delimiter cannot both be empty")]
    EmptyDelimiters,

    /// Phoneme inventories are sets; repeated symbols are author mistakes
    #[error("duplicate phoneme /{symbol}/ in phoneme set")]
    DuplicatePhoneme { symbol: String },

    /// Standalone syllabifier files require an inventory to split against
    #[error("missing required phoneme set definition in {path}")]
    MissingPhonemeSet { path: String },
}

/// Top-level error type for graphon
#[derive(Debug, thiserror::Error)]
pub enum G2pError {
    /// Grammar error
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A delimiter-free transcription containing symbols outside the inventory
    #[error("found unknown phonemes in transcription /{transcription}/: {}", .symbols.join(", "))]
    UnknownPhonemes {
        transcription: String,
        symbols: Vec<String>,
    },

    /// HTTP fetch error
    #[cfg(feature = "fetch")]
    #[error("fetch error: {0}")]
    Fetch(#[from] Box<ureq::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_line_display() {
        let err = GrammarError::InvalidLine {
            kind: "VAR",
            line: 12,
            text: "VAR BAD".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid VAR definition on line 12: VAR BAD"
        );
    }

    #[test]
    fn test_undefined_variable_display() {
        let err = GrammarError::UndefinedVariable {
            name: "VOWEL".to_string(),
            context: "{VOWEL}+".to_string(),
        };
        assert_eq!(err.to_string(), "undefined variable VOWEL in /{VOWEL}+/");
    }

    #[test]
    fn test_duplicate_rule_display() {
        let err = GrammarError::DuplicateRule {
            path: "sv.g2p".to_string(),
            first: "a -> A /  _ ".to_string(),
            first_line: 4,
            second: "a -> (a, A) /  _ ".to_string(),
            second_line: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("duplicate rules in sv.g2p"));
        assert!(msg.contains("line 4"));
        assert!(msg.contains("line 9"));
    }

    #[test]
    fn test_unknown_phonemes_display() {
        let err = G2pError::UnknownPhonemes {
            transcription: "abc".to_string(),
            symbols: vec!["b".to_string(), "c".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "found unknown phonemes in transcription /abc/: b, c"
        );
    }

    #[test]
    fn test_g2p_error_from_grammar_error() {
        let grammar_err = GrammarError::MissingCharacterSet {
            path: "x.g2p".to_string(),
        };
        let err: G2pError = grammar_err.into();
        assert_eq!(
            err.to_string(),
            "grammar error: no character set defined in x.g2p"
        );
    }

    #[test]
    fn test_g2p_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let _err: G2pError = io_err.into();
    }
}
