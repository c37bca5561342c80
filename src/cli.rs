//! CLI argument parsing and command implementations

pub mod args;
pub mod syllabify;
pub mod transcribe;

use crate::output::HumanFormatter;
use std::io::BufRead;
use std::path::Path;

/// Exit code when everything succeeded
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code on load failure, validation failure, or failed tests
pub const EXIT_FAILURE: i32 = 1;

/// Resolves the positional WORDS-or-FILES arguments into input lines.
///
/// Arguments naming existing files are read line by line (blank lines and
/// `#`-prefixed lines are skipped); all other arguments are taken as words.
/// With no arguments at all, stdin is read.
pub(crate) fn collect_input_lines(
    inputs: &[String],
    formatter: &mut HumanFormatter,
) -> std::io::Result<Vec<String>> {
    if inputs.is_empty() {
        formatter.note("Reading input from stdin...");
        let mut lines = Vec::new();
        for line in std::io::stdin().lock().lines() {
            push_input_line(line?, &mut lines, formatter);
        }
        return Ok(lines);
    }
    let mut lines = Vec::new();
    for input in inputs {
        if Path::new(input).exists() {
            let content = std::fs::read_to_string(input)?;
            for line in content.lines() {
                push_input_line(line.to_string(), &mut lines, formatter);
            }
        } else {
            lines.push(input.clone());
        }
    }
    Ok(lines)
}

fn push_input_line(line: String, lines: &mut Vec<String>, formatter: &mut HumanFormatter) {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        formatter.note("Skipping empty line");
        return;
    }
    if trimmed.starts_with('#') {
        formatter.note(&format!("Skipping line {}", line));
        return;
    }
    lines.push(line);
}
