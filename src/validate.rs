#![forbid(unsafe_code)]

//! The validation suite
//!
//! [`RuleSet::test`] checks a loaded grammar against itself and returns all
//! findings in three buckets, never failing:
//!
//! - errors: character-set characters without a context-free rule,
//!   rule-input characters missing from the character set, and phonemes in
//!   rule or test outputs that the inventory does not declare;
//! - warnings: inventory phonemes no rule or test output uses;
//! - failed tests: embedded `TEST` lines whose `apply` result differs from
//!   the expected output list.

use crate::engine::RuleSet;
use crate::types::TestReport;
use std::collections::HashSet;

impl RuleSet {
    /// Runs the complete validation suite
    pub fn test(&self) -> TestReport {
        let mut report = TestReport::default();
        self.check_character_coverage(&mut report);
        if self.phoneme_set.has_symbols() {
            self.check_phoneme_coverage(&mut report);
        }
        self.run_embedded_tests(&mut report);
        report
    }

    /// Character-set coverage, in both directions
    fn check_character_coverage(&self, report: &mut TestReport) {
        let mut input_chars: HashSet<String> = HashSet::new();
        let mut default_inputs: HashSet<&str> = HashSet::new();
        for rule in &self.rules {
            for ch in rule.input.chars() {
                input_chars.insert(ch.to_string());
            }
            if rule.is_context_free() {
                default_inputs.insert(rule.input.as_str());
            }
        }

        let missing_defaults: Vec<&str> = self
            .character_set
            .iter()
            .filter(|ch| !default_inputs.contains(ch.as_str()))
            .map(|ch| ch.as_str())
            .collect();
        if !missing_defaults.is_empty() {
            report.errors.push(format!(
                "no default rule for character(s): {}",
                missing_defaults.join(",")
            ));
        }

        let mut undeclared: Vec<&String> = input_chars
            .iter()
            .filter(|ch| !self.character_set.contains(ch))
            .collect();
        if !undeclared.is_empty() {
            undeclared.sort();
            report.errors.push(format!(
                "rule input character(s) not in character set: {}",
                undeclared
                    .into_iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<&str>>()
                    .join(",")
            ));
        }
    }

    /// Validates rule and test outputs against the phoneme inventory
    fn check_phoneme_coverage(&self, report: &mut TestReport) {
        let mut used: HashSet<String> = HashSet::new();
        for rule in &self.rules {
            for output in &rule.output {
                match self.phoneme_set.split_transcription(output) {
                    Ok(symbols) => {
                        for symbol in symbols {
                            if !symbol.is_empty() && !self.phoneme_set.valid_phoneme(&symbol) {
                                report.errors.push(format!(
                                    "invalid symbol in rule output {}: {}",
                                    rule, symbol
                                ));
                            }
                            used.insert(symbol);
                        }
                    }
                    Err(err) => {
                        report
                            .errors
                            .push(format!("found error in rule output /{}/ : {}", output, err));
                    }
                }
            }
        }
        for test in &self.tests {
            for output in &test.expected {
                match self.phoneme_set.split_transcription(output) {
                    Ok(symbols) => {
                        for symbol in symbols {
                            if !symbol.is_empty() && !self.phoneme_set.valid_phoneme(&symbol) {
                                report.errors.push(format!(
                                    "invalid symbol in test output /{}/: {}",
                                    output, symbol
                                ));
                            }
                            used.insert(symbol);
                        }
                    }
                    Err(err) => {
                        report
                            .errors
                            .push(format!("found error in test output /{}/ : {}", output, err));
                    }
                }
            }
        }
        for symbol in self.phoneme_set.symbols() {
            if !used.contains(symbol) {
                report
                    .warnings
                    .push(format!("symbol /{}/ not used in g2p rule file", symbol));
            }
        }
    }

    /// Runs the embedded `TEST` lines through `apply`
    fn run_embedded_tests(&self, report: &mut TestReport) {
        for test in &self.tests {
            let outcome = self.apply(&test.input);
            if let Some(unmappable) = &outcome.unmappable {
                report.errors.push(unmappable.to_string());
            }
            if outcome.transcriptions != test.expected {
                report.failed_tests.push(format!(
                    "for '{}', expected {:?}, got {:?}",
                    test.input, test.expected, outcome.transcriptions
                ));
            }
        }
    }
}
