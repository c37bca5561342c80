#![forbid(unsafe_code)]

//! Regex replacement filters
//!
//! Filters express transcription rewrites that the positional rule system
//! cannot. The same type serves both `PREFILTER` lines (applied to the
//! orthographic input before any rule runs) and `FILTER` lines (applied to
//! each rendered transcription after the rules).

use regex::Regex;
use std::fmt;

/// A compiled regex plus a replacement template, applied as a global
/// substitution
#[derive(Debug, Clone)]
pub struct Filter {
    pub pattern: Regex,
    pub replacement: String,
}

impl Filter {
    pub fn new(pattern: Regex, replacement: impl Into<String>) -> Self {
        Filter {
            pattern,
            replacement: replacement.into(),
        }
    }

    /// Replaces every match of the pattern in `input`
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" -> \"{}\"", self.pattern.as_str(), self.replacement)
    }
}
