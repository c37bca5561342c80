#![forbid(unsafe_code)]

//! The syllabify command
//!
//! Loads a standalone syllabifier definition, runs its embedded tests, then
//! syllabifies the given transcriptions (or files, or stdin).

use crate::cli::args::{OutputFormat, SyllabifyArgs};
use crate::cli::{collect_input_lines, EXIT_FAILURE, EXIT_SUCCESS};
use crate::output::{HumanFormatter, JsonlFormatter};
use serde::Serialize;
use termcolor::ColorChoice;

#[derive(Serialize)]
struct SyllabifiedRecord<'a> {
    input: &'a str,
    syllabified: &'a str,
}

/// Runs the syllabify command, returning the process exit code
pub fn run_syllabify(args: &SyllabifyArgs, color: ColorChoice) -> i32 {
    let mut formatter = HumanFormatter::new(color);

    let syllabifier = match crate::load_syllabifier(&args.syll_file) {
        Ok(s) => s,
        Err(err) => {
            formatter.note(&format!(
                "couldn't load syllabifier file {} : {}",
                args.syll_file, err
            ));
            return EXIT_FAILURE;
        }
    };

    let report = syllabifier.test();
    match args.format {
        OutputFormat::Human => {
            formatter.report(&report, &args.syll_file, syllabifier.tests.len(), args.quiet);
        }
        OutputFormat::Jsonl => println!("{}", JsonlFormatter::report(&report)),
    }
    if report.failed() && !args.force {
        return EXIT_FAILURE;
    }

    let lines = match collect_input_lines(&args.inputs, &mut formatter) {
        Ok(lines) => lines,
        Err(err) => {
            formatter.note(&format!("couldn't read input : {}", err));
            return EXIT_FAILURE;
        }
    };

    let mut total = 0usize;
    let mut errors = 0usize;
    for line in &lines {
        total += 1;
        match syllabifier.from_string(line) {
            Ok(syllabified) => match args.format {
                OutputFormat::Human => println!("{}\t{}", line, syllabified),
                OutputFormat::Jsonl => {
                    let record = SyllabifiedRecord {
                        input: line,
                        syllabified: &syllabified,
                    };
                    println!(
                        "{}",
                        serde_json::to_string(&record).unwrap_or_else(|_| "{}".to_string())
                    );
                }
            },
            Err(err) => {
                errors += 1;
                formatter.note(&format!("couldn't syllabify '{}' : {}", line, err));
            }
        }
    }
    formatter.summary("TOTAL INPUT", total);
    formatter.summary("ERRORS", errors);
    formatter.summary("SYLLABIFIED", total - errors);
    EXIT_SUCCESS
}
