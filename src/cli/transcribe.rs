#![forbid(unsafe_code)]

//! The transcribe command
//!
//! Loads a grammar, runs the validation suite, then transcribes the given
//! words (or word files, or stdin). Validation errors and failed embedded
//! tests halt before transcription unless `--force` is given. `--test`
//! switches to reference-comparison mode over tab-separated input;
//! `--coverage` reports which rules fired.

use crate::cli::args::{OutputFormat, TranscribeArgs};
use crate::cli::{collect_input_lines, EXIT_FAILURE, EXIT_SUCCESS};
use crate::engine::RuleSet;
use crate::output::jsonl::TranscriptionRecord;
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::phonemes::PhonemeSet;
use crate::types::ApplyOutcome;
use rayon::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use termcolor::ColorChoice;

fn boundary_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!~] *").expect("valid pattern"))
}

fn stress_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[%"] *"#).expect("valid pattern"))
}

struct ProcessedLine {
    orth: String,
    outcome: ApplyOutcome,
    references: Vec<String>,
}

/// Runs the transcribe command, returning the process exit code
pub fn run_transcribe(args: &TranscribeArgs, color: ColorChoice) -> i32 {
    let mut formatter = HumanFormatter::new(color);

    let rule_set = match crate::load_rule_set(&args.rule_file) {
        Ok(rs) => rs.with_debug(args.debug),
        Err(err) => {
            formatter.note(&format!(
                "couldn't load rule file {} : {}",
                args.rule_file, err
            ));
            return EXIT_FAILURE;
        }
    };
    let rule_set = match override_phoneme_set(rule_set, args, &mut formatter) {
        Ok(rs) => rs,
        Err(code) => return code,
    };

    let report = rule_set.test();
    match args.format {
        OutputFormat::Human => {
            formatter.report(&report, &args.rule_file, rule_set.tests.len(), args.quiet);
        }
        OutputFormat::Jsonl => println!("{}", JsonlFormatter::report(&report)),
    }
    if args.coverage {
        print_coverage(&rule_set, "TEST RULE", args.quiet, &mut formatter);
        rule_set.reset_rules_applied();
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

    // The rule set is immutable once loaded; transcribe the batch in
    // parallel and print in input order.
    let processed: Vec<ProcessedLine> = lines
        .par_iter()
        .filter_map(|line| process_line(&rule_set, line, args))
        .collect();

    let mut transcribed = 0usize;
    let mut errors = 0usize;
    let mut tested = 0usize;
    let mut tags: BTreeMap<&'static str, usize> = BTreeMap::new();
    if args.test {
        println!("ORTH\tG2P TRANSES\tREF TRANSES\tDIFFTAG");
    }
    for p in &processed {
        if let Some(unmappable) = &p.outcome.unmappable {
            errors += 1;
            formatter.note(&format!("Couldn't transcribe '{}' : {}", p.orth, unmappable));
            if !args.force {
                continue;
            }
        }
        transcribed += 1;
        if args.test {
            tested += 1;
            let tag = compare_to_references(p, args.remove_stress);
            *tags.entry(tag).or_insert(0) += 1;
            println!(
                "{}\t{}\t{}\t{}",
                p.orth,
                p.outcome.transcriptions.join(" # "),
                p.references.join(" # "),
                tag
            );
        } else {
            match args.format {
                OutputFormat::Human => {
                    formatter.transcription(&p.orth, &p.outcome.transcriptions);
                }
                OutputFormat::Jsonl => {
                    let record = TranscriptionRecord {
                        orth: &p.orth,
                        transcriptions: &p.outcome.transcriptions,
                        unmappable: p.outcome.unmappable.as_ref(),
                    };
                    println!("{}", JsonlFormatter::transcription(&record));
                }
            }
        }
    }

    if args.coverage {
        print_coverage(&rule_set, "RULE", args.quiet, &mut formatter);
    }
    formatter.summary("TOTAL INPUT", processed.len());
    formatter.summary("ERRORS", errors);
    formatter.summary("TRANSCRIBED", transcribed);
    if args.test {
        formatter.summary("TESTED", tested);
        for (tag, count) in &tags {
            formatter.summary(&format!(" > TEST {}", tag), *count);
        }
    }
    EXIT_SUCCESS
}

fn override_phoneme_set(
    mut rule_set: RuleSet,
    args: &TranscribeArgs,
    formatter: &mut HumanFormatter,
) -> Result<RuleSet, i32> {
    let Some(path) = &args.symbolset else {
        return Ok(rule_set);
    };
    let include = rule_set
        .syllabifier
        .as_ref()
        .map(|s| s.def.include_phoneme_delimiter())
        .unwrap_or(true);
    let syllable_delimiter = rule_set.syllable_delimiter().to_string();
    match PhonemeSet::from_path(
        path,
        &rule_set.phoneme_delimiter,
        &syllable_delimiter,
        include,
    ) {
        Ok(set) => {
            if let Some(syllabifier) = &mut rule_set.syllabifier {
                syllabifier.phoneme_set = set.clone();
            }
            rule_set.phoneme_set = set;
            Ok(rule_set)
        }
        Err(err) => {
            formatter.note(&format!("couldn't load symbol set : {}", err));
            Err(EXIT_FAILURE)
        }
    }
}

fn process_line(rule_set: &RuleSet, line: &str, args: &TranscribeArgs) -> Option<ProcessedLine> {
    let fields: Vec<&str> = line.split('\t').collect();
    let orth = fields.get(args.column)?.to_string();
    let references = if args.test {
        fields[(args.column + 1).min(fields.len())..]
            .iter()
            .flat_map(|f| f.split(" # "))
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };
    let outcome = rule_set.apply(&orth);
    Some(ProcessedLine {
        orth,
        outcome,
        references,
    })
}

fn clean_for_diff(transcription: &str, remove_stress: bool) -> String {
    let res = boundary_strip_re().replace_all(transcription, "");
    let res = if remove_stress {
        stress_strip_re().replace_all(&res, "").into_owned()
    } else {
        res.into_owned()
    };
    res.trim().to_string()
}

fn compare_to_references(p: &ProcessedLine, remove_stress: bool) -> &'static str {
    let ours: Vec<String> = p
        .outcome
        .transcriptions
        .iter()
        .map(|t| clean_for_diff(t, remove_stress))
        .collect();
    let theirs: Vec<String> = p
        .references
        .iter()
        .map(|t| clean_for_diff(t, remove_stress))
        .collect();
    if ours == theirs {
        "ALL EQ"
    } else if !ours.is_empty() && !theirs.is_empty() && ours[0] == theirs[0] {
        "#1 EQ"
    } else {
        "DIFF"
    }
}

fn print_coverage(rule_set: &RuleSet, label: &str, quiet: bool, formatter: &mut HumanFormatter) {
    let counts = rule_set.rules_applied();
    let mut applied = 0usize;
    let mut not_applied = 0usize;
    for rule in &rule_set.rules {
        match counts.get(&rule.to_string()) {
            Some(n) => {
                if !quiet {
                    formatter.note(&format!(
                        "{} APPLIED\t{}\tat input line {}\t{}",
                        label, rule, rule.line_number, n
                    ));
                }
                applied += 1;
            }
            None => {
                if !quiet {
                    formatter.note(&format!(
                        "{} NOT APPLIED\t{}\tat input line {}",
                        label, rule, rule.line_number
                    ));
                }
                not_applied += 1;
            }
        }
    }
    formatter.summary(&format!("{}S APPLIED", label), applied);
    formatter.summary(&format!("{}S NOT APPLIED", label), not_applied);
}
