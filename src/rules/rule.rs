#![forbid(unsafe_code)]

//! G2P rewrite rules
//!
//! A rule maps a literal grapheme string to one or more phoneme output
//! alternatives, optionally constrained by left and right contexts. Rules are
//! strictly ordered; the first match at the cursor wins.

use crate::rules::context::Context;
use std::fmt;

/// A single grapheme-to-phoneme rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The orthographic input (one or more code points)
    pub input: String,

    /// Output alternatives; each alternative is a delimiter-joined phoneme
    /// string, and the empty string renders no phonemes
    pub output: Vec<String>,

    /// Constraint on the consumed prefix
    pub left_context: Context,

    /// Constraint on the unconsumed remainder
    pub right_context: Context,

    /// Source line in the grammar file, for diagnostics
    pub line_number: usize,
}

impl Rule {
    /// True if both rules match in exactly the same places, regardless of
    /// output. Two such rules in one grammar are a load error.
    pub fn same_matcher(&self, other: &Rule) -> bool {
        self.input == other.input
            && self.left_context == other.left_context
            && self.right_context == other.right_context
    }

    /// True if the rule has no context constraints
    pub fn is_context_free(&self) -> bool {
        !self.left_context.is_defined() && !self.right_context.is_defined()
    }

    fn output_string(&self) -> String {
        if self.output.len() == 1 {
            self.output[0].clone()
        } else {
            format!("({})", self.output.join(", "))
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} / {} _ {}",
            self.input,
            self.output_string(),
            self.left_context,
            self.right_context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn rule(input: &str, output: &[&str]) -> Rule {
        Rule {
            input: input.to_string(),
            output: output.iter().map(|o| o.to_string()).collect(),
            left_context: Context::undefined(),
            right_context: Context::undefined(),
            line_number: 0,
        }
    }

    #[test]
    fn test_display_single_output() {
        assert_eq!(rule("a", &["A"]).to_string(), "a -> A /  _ ");
    }

    #[test]
    fn test_display_output_alternatives() {
        assert_eq!(rule("x", &["k s", "S"]).to_string(), "x -> (k s, S) /  _ ");
    }

    #[test]
    fn test_display_with_context() {
        let mut r = rule("t", &["d"]);
        r.left_context = Context::new("i", Regex::new("i$").unwrap());
        r.right_context = Context::new("#", Regex::new("^$").unwrap());
        assert_eq!(r.to_string(), "t -> d / i _ #");
    }

    #[test]
    fn test_same_matcher_ignores_output() {
        let a = rule("t", &["t"]);
        let b = rule("t", &["d", "t"]);
        assert!(a.same_matcher(&b));
    }

    #[test]
    fn test_same_matcher_distinguishes_contexts() {
        let a = rule("t", &["t"]);
        let mut b = rule("t", &["t"]);
        b.right_context = Context::new("#", Regex::new("^$").unwrap());
        assert!(!a.same_matcher(&b));
        assert!(a.is_context_free());
        assert!(!b.is_context_free());
    }
}
