#![forbid(unsafe_code)]

//! Human-readable output
//!
//! Transcriptions go to stdout, one word per line with the candidate
//! transcriptions tab-separated. Diagnostics go to stderr, colored when the
//! terminal supports it: errors red, warnings yellow.

use crate::types::TestReport;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes transcriptions to stdout and diagnostics to stderr
pub struct HumanFormatter {
    stderr: StandardStream,
}

impl HumanFormatter {
    pub fn new(color: ColorChoice) -> Self {
        HumanFormatter {
            stderr: StandardStream::stderr(color),
        }
    }

    /// Prints one transcribed word
    pub fn transcription(&self, orth: &str, transcriptions: &[String]) {
        println!("{}\t{}", orth, transcriptions.join("\t"));
    }

    /// Prints a validation report with per-bucket counts
    pub fn report(&mut self, report: &TestReport, path: &str, test_count: usize, quiet: bool) {
        for error in &report.errors {
            self.colored_line(Color::Red, "ERROR", error);
        }
        let _ = writeln!(
            self.stderr,
            "{} ERROR(S) FOR {}",
            report.errors.len(),
            path
        );
        if !quiet {
            for warning in &report.warnings {
                self.colored_line(Color::Yellow, "WARNING", warning);
            }
        }
        let _ = writeln!(
            self.stderr,
            "{} WARNING(S) FOR {}",
            report.warnings.len(),
            path
        );
        if report.failed_tests.is_empty() {
            let _ = writeln!(self.stderr, "ALL {} TESTS PASSED FOR {}", test_count, path);
        } else {
            for failed in &report.failed_tests {
                self.colored_line(Color::Red, "FAILED TEST", failed);
            }
            let _ = writeln!(
                self.stderr,
                "{} OF {} TESTS FAILED FOR {}",
                report.failed_tests.len(),
                test_count,
                path
            );
        }
    }

    /// Prints one labeled summary count
    pub fn summary(&mut self, label: &str, count: usize) {
        let _ = writeln!(self.stderr, "{:<24}: {:>7}", label, count);
    }

    /// Prints a plain note to stderr
    pub fn note(&mut self, message: &str) {
        let _ = writeln!(self.stderr, "{}", message);
    }

    fn colored_line(&mut self, color: Color, label: &str, message: &str) {
        let _ = self
            .stderr
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stderr, "{}", label);
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, ": {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_writes_report_without_panicking() {
        let mut formatter = HumanFormatter::new(ColorChoice::Never);
        let report = TestReport {
            errors: vec!["no default rule for character(s): x".to_string()],
            warnings: vec!["symbol /Z/ not used in g2p rule file".to_string()],
            failed_tests: vec!["for 'a', expected [\"A\"], got [\"B\"]".to_string()],
        };
        formatter.report(&report, "x.g2p", 3, false);
        formatter.report(&report, "x.g2p", 3, true);
        formatter.summary("TOTAL INPUT", 17);
        formatter.note("Reading input from stdin...");
    }
}
