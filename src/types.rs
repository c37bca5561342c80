#![forbid(unsafe_code)]

//! Core domain types for graphon
//!
//! This module defines the value types shared by the rewrite engine, the
//! syllabifier, and the validation suite.

use serde::Serialize;
use std::fmt;

/// One grapheme paired with the phonemes it maps to.
///
/// Before cartesian expansion the phoneme list holds the rule's output
/// alternatives; after expansion it holds the phonemes of the single chosen
/// alternative, split on the phoneme delimiter. Examples (IPA):
/// `x -> k, s`, `sch -> ʃ`, `au -> a‿u`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphemePhonemes {
    /// The orthographic input consumed by the rule fire
    pub grapheme: String,

    /// The phonemes produced for it
    pub phonemes: Vec<String>,
}

/// A transcription candidate: the ordered grapheme-to-phoneme records for one
/// expansion branch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trans {
    pub phonemes: Vec<GraphemePhonemes>,
}

impl Trans {
    /// Flattens the records into a plain phoneme sequence
    pub fn list_phonemes(&self) -> Vec<String> {
        self.phonemes
            .iter()
            .flat_map(|gp| gp.phonemes.iter().cloned())
            .collect()
    }

    /// Joins the phonemes with the given delimiter, skipping empty symbols
    pub fn render(&self, phoneme_delimiter: &str) -> String {
        self.phonemes
            .iter()
            .flat_map(|gp| gp.phonemes.iter())
            .filter(|p| !p.is_empty())
            .cloned()
            .collect::<Vec<String>>()
            .join(phoneme_delimiter)
    }
}

/// An embedded G2P test: `TEST <orth> -> <out>` or `TEST <orth> -> (<a>, <b>)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub input: String,
    pub expected: Vec<String>,
}

/// An embedded syllabification test: `SYLLDEF TEST <in> -> <out>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllTest {
    pub input: String,
    pub expected: String,
}

/// Unmappable input characters encountered during apply.
///
/// The default phoneme was emitted in their place; callers decide whether to
/// surface or suppress the diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappableSymbols {
    pub symbols: Vec<String>,
    pub input: String,
}

impl fmt::Display for UnmappableSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found unmappable symbol(s) in input string: [{}] in {}",
            self.symbols.join(", "),
            self.input
        )
    }
}

/// The result of applying a rule set to one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    /// One transcription per expansion branch, in enumeration order
    pub transcriptions: Vec<String>,

    /// Set when one or more input characters matched no rule
    pub unmappable: Option<UnmappableSymbols>,
}

impl ApplyOutcome {
    /// True if every input character was consumed by some rule
    pub fn fully_mapped(&self) -> bool {
        self.unmappable.is_none()
    }
}

/// Validation findings, bucketed by severity.
///
/// Errors and failed tests make the report fail; warnings never do. The
/// buckets are returned, not thrown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub failed_tests: Vec<String>,
}

impl TestReport {
    /// True if the report contains any errors or failed tests
    pub fn failed(&self) -> bool {
        !self.errors.is_empty() || !self.failed_tests.is_empty()
    }

    /// All errors and failed tests, each prefixed by its type
    pub fn all_errors(&self) -> Vec<String> {
        let mut res = Vec::with_capacity(self.errors.len() + self.failed_tests.len());
        for e in &self.errors {
            res.push(format!("ERROR: {}", e));
        }
        for t in &self.failed_tests {
            res.push(format!("FAILED TEST: {}", t));
        }
        res
    }

    /// All findings, each prefixed by its type
    pub fn all_messages(&self) -> Vec<String> {
        let mut res =
            Vec::with_capacity(self.errors.len() + self.warnings.len() + self.failed_tests.len());
        for e in &self.errors {
            res.push(format!("ERROR: {}", e));
        }
        for w in &self.warnings {
            res.push(format!("WARNING: {}", w));
        }
        for t in &self.failed_tests {
            res.push(format!("FAILED TEST: {}", t));
        }
        res
    }
}
