#![forbid(unsafe_code)]

//! Rule-based grapheme-to-phoneme conversion with MOP syllabification
//!
//! graphon converts orthographic words into phonemic transcriptions by
//! applying ordered, context-sensitive rewrite rules from a user-authored
//! grammar file, one file per language. A grammar may also carry a syllable
//! definition, in which case transcriptions are divided into syllables with
//! a Maximum Onset Principle algorithm before rendering.
//!
//! # Grammar files
//!
//! A grammar is a plain-text UTF-8 file, one declaration per line. `//`
//! starts a comment. The specific constants take a quoted value, since the
//! empty string and strings with spaces are meaningful values:
//!
//! ```text
//! CHARACTER_SET "abcdefghijklmnopqrstuvwxyzåäö"   // required
//! PHONEME_SET "a au o u p t k rt s tS"
//! PHONEME_DELIMITER " "                           // default " "
//! DEFAULT_PHONEME "_"                             // default "_"
//! DOWNCASE_INPUT true                             // default true
//! ```
//!
//! `VAR` lines declare regex fragments for use in rule contexts (bare
//! uppercase tokens) and filter patterns (`{NAME}` references):
//!
//! ```text
//! VAR VOWEL [aeyuio]
//! VAR VOICELESS [ptksf]
//! ```
//!
//! Rules map a grapheme string to one output, or to a parenthesized list of
//! alternatives, optionally constrained by a context. `#` anchors a context
//! at the word edge, and the empty-set glyph `∅` (U+2205) means silent:
//!
//! ```text
//! a -> A
//! sch -> (x, S) / _ #
//! b -> p / _ VOICELESS
//! h -> ∅ / # _
//! ```
//!
//! `PREFILTER`/`FILTER` lines rewrite the input before, and each
//! transcription after, rule application; `SYLLDEF` lines configure the
//! syllabifier; `TEST` and `SYLLDEF TEST` lines embed example-based tests
//! that [`RuleSet::test`] and [`Syllabifier::test`] execute.
//!
//! # Example
//!
//! ```
//! let grammar = r#"
//! CHARACTER_SET "hit"
//! h -> h
//! i -> i
//! t -> d / i _ #
//! t -> t
//! TEST hit -> h i d
//! "#;
//! let rule_set = graphon::parse_rule_set(grammar, "demo.g2p").unwrap();
//! assert!(!rule_set.test().failed());
//! let outcome = rule_set.apply("hit");
//! assert_eq!(outcome.transcriptions, vec!["h i d"]);
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod output;
pub mod parser;
pub mod phonemes;
pub mod rules;
pub mod syllable;
pub mod types;
pub mod validate;

pub use engine::RuleSet;
pub use error::{G2pError, GrammarError};
pub use phonemes::PhonemeSet;
pub use syllable::{StressPlacement, Syllabifier};
pub use types::{ApplyOutcome, TestReport, UnmappableSymbols};

use std::path::Path;

/// Loads a G2P rule set from a grammar file
pub fn load_rule_set(path: impl AsRef<Path>) -> Result<RuleSet, G2pError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    Ok(parser::grammar::parse(
        &content,
        &path.display().to_string(),
    )?)
}

/// Parses a G2P rule set from grammar text; `name` is used in diagnostics
pub fn parse_rule_set(content: &str, name: &str) -> Result<RuleSet, G2pError> {
    Ok(parser::grammar::parse(content, name)?)
}

/// Loads a G2P rule set over HTTP
#[cfg(feature = "fetch")]
pub fn load_rule_set_from_url(url: &str) -> Result<RuleSet, G2pError> {
    let content = fetch(url)?;
    Ok(parser::grammar::parse(&content, url)?)
}

/// Loads a standalone syllabifier definition file
pub fn load_syllabifier(path: impl AsRef<Path>) -> Result<Syllabifier, G2pError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    parser::sylldef::parse_syllabifier(&content, &path.display().to_string())
}

/// Parses a syllabifier from definition text; `name` is used in diagnostics
pub fn parse_syllabifier(content: &str, name: &str) -> Result<Syllabifier, G2pError> {
    parser::sylldef::parse_syllabifier(content, name)
}

/// Loads a standalone syllabifier definition over HTTP
#[cfg(feature = "fetch")]
pub fn load_syllabifier_from_url(url: &str) -> Result<Syllabifier, G2pError> {
    let content = fetch(url)?;
    parser::sylldef::parse_syllabifier(&content, url)
}

/// Loads a sidecar phoneme-set file (one symbol per line, `//` comments),
/// used to override a grammar's inline `PHONEME_SET`
pub fn load_phoneme_set(
    path: impl AsRef<Path>,
    phoneme_delimiter: &str,
    syllable_delimiter: &str,
    includes_phoneme_delimiter: bool,
) -> Result<PhonemeSet, G2pError> {
    PhonemeSet::from_path(
        path,
        phoneme_delimiter,
        syllable_delimiter,
        includes_phoneme_delimiter,
    )
}

#[cfg(feature = "fetch")]
fn fetch(url: &str) -> Result<String, G2pError> {
    let body = ureq::get(url)
        .call()
        .map_err(|e| G2pError::Fetch(Box::new(e)))?
        .into_string()?;
    Ok(body)
}
