#![forbid(unsafe_code)]

//! The rewrite engine
//!
//! [`RuleSet`] is the product of loading a grammar file. It is immutable
//! after load — apart from the rule-application counters, which sit behind a
//! reader/writer lock — so a single instance can be shared freely across
//! threads.
//!
//! Applying a rule set to a word walks the code points left to right. At
//! each position the first rule whose input prefixes the remainder and whose
//! contexts match fires; positions covered by no rule emit the default
//! phoneme and are reported as unmappable. The per-position output
//! alternatives are then expanded into the cartesian product of candidate
//! transcriptions.

use crate::phonemes::PhonemeSet;
use crate::rules::{Filter, Rule};
use crate::syllable::Syllabifier;
use crate::types::{ApplyOutcome, GraphemePhonemes, TestCase, Trans, UnmappableSymbols};
use std::collections::HashMap;
use std::sync::RwLock;

/// A loaded grammar: constants, variables, filters, ordered rules, tests,
/// phoneme inventory, and the optional syllabifier
#[derive(Debug)]
pub struct RuleSet {
    /// The characters the grammar claims to cover
    pub character_set: Vec<String>,

    /// Emitted for input characters no rule consumes
    pub default_phoneme: String,

    /// Joins phonemes in serialized output; may be empty
    pub phoneme_delimiter: String,

    /// Whether input is lowercased before rule application
    pub downcase_input: bool,

    /// Fully expanded variable table
    pub vars: HashMap<String, String>,

    /// Applied to the orthographic input before the rules
    pub prefilters: Vec<Filter>,

    /// The ordered rewrite rules
    pub rules: Vec<Rule>,

    /// Applied to each rendered transcription after the rules
    pub filters: Vec<Filter>,

    /// Embedded `TEST` lines
    pub tests: Vec<TestCase>,

    /// Declared phoneme inventory (possibly empty)
    pub phoneme_set: PhonemeSet,

    /// Present when the grammar carries a SYLLDEF block
    pub syllabifier: Option<Syllabifier>,

    /// The raw grammar text, for diagnostics
    pub content: String,

    /// Emit trace output on stderr
    pub debug: bool,

    rules_applied: RwLock<HashMap<String, usize>>,
}

impl RuleSet {
    pub(crate) fn new() -> Self {
        RuleSet {
            character_set: Vec::new(),
            default_phoneme: "_".to_string(),
            phoneme_delimiter: " ".to_string(),
            downcase_input: true,
            vars: HashMap::new(),
            prefilters: Vec::new(),
            rules: Vec::new(),
            filters: Vec::new(),
            tests: Vec::new(),
            phoneme_set: PhonemeSet::default(),
            syllabifier: None,
            content: String::new(),
            debug: false,
            rules_applied: RwLock::new(HashMap::new()),
        }
    }

    /// Enables trace output for this rule set and its syllabifier
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        if let Some(syllabifier) = &mut self.syllabifier {
            syllabifier.debug = debug;
        }
        self
    }

    /// The syllable delimiter of the grammar's syllabifier, or empty
    pub fn syllable_delimiter(&self) -> &str {
        self.syllabifier
            .as_ref()
            .map(|s| s.def.syllable_delimiter())
            .unwrap_or("")
    }

    /// Applies the rules to a word.
    ///
    /// Always returns the full list of candidate transcriptions (empty only
    /// for empty input); characters no rule could consume are mapped to the
    /// default phoneme and reported in the outcome's diagnostic.
    pub fn apply(&self, word: &str) -> ApplyOutcome {
        if word.is_empty() {
            return ApplyOutcome {
                transcriptions: Vec::new(),
                unmappable: None,
            };
        }
        let mut input = if self.downcase_input {
            word.to_lowercase()
        } else {
            word.to_string()
        };
        for prefilter in &self.prefilters {
            input = prefilter.apply(&input);
        }

        let mut records: Vec<GraphemePhonemes> = Vec::new();
        let mut unmappable: Vec<String> = Vec::new();
        let mut i = 0usize;
        while i < input.len() {
            let remainder = &input[i..];
            let prefix = &input[..i];
            let fired = self.rules.iter().find(|rule| {
                remainder.starts_with(rule.input.as_str())
                    && rule.left_context.matches(prefix)
                    && rule
                        .right_context
                        .matches(&remainder[rule.input.len()..])
            });
            match fired {
                Some(rule) => {
                    self.record_rule_fire(rule);
                    if self.debug {
                        eprintln!("RULE FIRED\t{}\tat {}", rule, i);
                    }
                    records.push(GraphemePhonemes {
                        grapheme: rule.input.clone(),
                        phonemes: rule.output.clone(),
                    });
                    i += rule.input.len();
                }
                None => {
                    let Some(ch) = remainder.chars().next() else {
                        break;
                    };
                    records.push(GraphemePhonemes {
                        grapheme: ch.to_string(),
                        phonemes: vec![self.default_phoneme.clone()],
                    });
                    unmappable.push(ch.to_string());
                    i += ch.len_utf8();
                }
            }
        }

        let transcriptions = self
            .expand(&records)
            .iter()
            .map(|trans| match &self.syllabifier {
                Some(syllabifier) if syllabifier.is_defined() => {
                    syllabifier.syllabify_trans(trans)
                }
                _ => trans.render(&self.phoneme_delimiter),
            })
            .map(|rendered| {
                self.filters
                    .iter()
                    .fold(rendered, |acc, filter| filter.apply(&acc))
            })
            .collect();

        ApplyOutcome {
            transcriptions,
            unmappable: if unmappable.is_empty() {
                None
            } else {
                Some(UnmappableSymbols {
                    symbols: unmappable,
                    input: word.to_string(),
                })
            },
        }
    }

    /// Expands per-position output alternatives into the cartesian product.
    ///
    /// The rightmost position varies fastest, so the first transcription
    /// picks the first alternative everywhere. Each chosen alternative is
    /// split on the phoneme delimiter (empty symbols from the empty-set
    /// glyph drop out here).
    fn expand(&self, records: &[GraphemePhonemes]) -> Vec<Trans> {
        let total = records
            .iter()
            .map(|r| r.phonemes.len().max(1))
            .product::<usize>();
        let mut res: Vec<Trans> = Vec::with_capacity(total);
        res.push(Trans::default());
        for record in records {
            let mut next = Vec::with_capacity(res.len() * record.phonemes.len().max(1));
            for trans in &res {
                for alternative in &record.phonemes {
                    let mut extended = trans.clone();
                    extended.phonemes.push(GraphemePhonemes {
                        grapheme: record.grapheme.clone(),
                        phonemes: self.split_alternative(alternative),
                    });
                    next.push(extended);
                }
            }
            res = next;
        }
        res
    }

    fn split_alternative(&self, alternative: &str) -> Vec<String> {
        if self.phoneme_delimiter.is_empty() {
            alternative.chars().map(|c| c.to_string()).collect()
        } else {
            alternative
                .split(&self.phoneme_delimiter)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        }
    }

    fn record_rule_fire(&self, rule: &Rule) {
        if let Ok(mut counts) = self.rules_applied.write() {
            *counts.entry(rule.to_string()).or_insert(0) += 1;
        }
    }

    /// A snapshot of the per-rule fire counts, keyed by the rule's display
    /// form
    pub fn rules_applied(&self) -> HashMap<String, usize> {
        self.rules_applied
            .read()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    /// Clears the fire counters
    pub fn reset_rules_applied(&self) {
        if let Ok(mut counts) = self.rules_applied.write() {
            counts.clear();
        }
    }
}
