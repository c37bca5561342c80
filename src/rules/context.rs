#![forbid(unsafe_code)]

//! Left/right rule contexts
//!
//! A context constrains where a rule may fire: the left context is matched
//! against the prefix consumed so far, the right context against the
//! unconsumed remainder. The compiled pattern carries its anchoring (`…$`
//! for left, `^…` for right); the raw source string is kept for display and
//! for duplicate detection.

use regex::Regex;
use std::fmt;

/// An optional anchored regex constraint on one side of a rule
#[derive(Debug, Clone, Default)]
pub struct Context {
    source: String,
    regex: Option<Regex>,
}

impl Context {
    /// An absent context, which matches everything
    pub fn undefined() -> Self {
        Context::default()
    }

    /// A compiled context, keeping the source as written in the grammar
    pub fn new(source: impl Into<String>, regex: Regex) -> Self {
        Context {
            source: source.into(),
            regex: Some(regex),
        }
    }

    /// True if a pattern was given for this side
    pub fn is_defined(&self) -> bool {
        self.regex.is_some()
    }

    /// Tests the context against the given string; absent contexts match
    pub fn matches(&self, s: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(s),
            None => true,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_defined() {
            write!(f, "{}", self.source)
        } else {
            Ok(())
        }
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        if self.is_defined() != other.is_defined() {
            return false;
        }
        if !self.is_defined() {
            return true;
        }
        self.source == other.source
    }
}

impl Eq for Context {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_matches_everything() {
        let ctx = Context::undefined();
        assert!(!ctx.is_defined());
        assert!(ctx.matches(""));
        assert!(ctx.matches("anything"));
    }

    #[test]
    fn test_left_context_suffix_anchor() {
        // '#' in a left context compiles to '^'; the whole pattern is
        // suffix-anchored against the consumed prefix.
        let ctx = Context::new("i", Regex::new("i$").unwrap());
        assert!(ctx.matches("hi"));
        assert!(!ctx.matches("hit"));
    }

    #[test]
    fn test_right_context_prefix_anchor() {
        let ctx = Context::new("VOICED", Regex::new("^[dgjlvbnm]").unwrap());
        assert!(ctx.matches("da"));
        assert!(!ctx.matches("ad"));
    }

    #[test]
    fn test_word_boundary_right_context() {
        let ctx = Context::new("#", Regex::new("^$").unwrap());
        assert!(ctx.matches(""));
        assert!(!ctx.matches("t"));
    }

    #[test]
    fn test_display() {
        let ctx = Context::new("VOICED #", Regex::new("^[dgb]$").unwrap());
        assert_eq!(ctx.to_string(), "VOICED #");
        assert_eq!(Context::undefined().to_string(), "");
    }

    #[test]
    fn test_equality_ignores_compiled_pattern() {
        let a = Context::new("x", Regex::new("^x").unwrap());
        let b = Context::new("x", Regex::new("x$").unwrap());
        let c = Context::new("y", Regex::new("^y").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Context::undefined());
        assert_eq!(Context::undefined(), Context::undefined());
    }
}
