#![forbid(unsafe_code)]

//! SYLLDEF block parsing and standalone syllabifier files
//!
//! SYLLDEF lines may appear inside a grammar file or make up a syllabifier
//! file of their own (together with a required PHONEME_SET). As soon as any
//! SYLLDEF line other than TEST appears, the four keys ONSETS, SYLLABIC,
//! STRESS, and DELIMITER are all required.

use crate::error::{G2pError, GrammarError};
use crate::parser::grammar;
use crate::phonemes::PhonemeSet;
use crate::syllable::def::{MopSyllDef, SyllDef};
use crate::syllable::stress::StressPlacement;
use crate::syllable::syllabifier::Syllabifier;
use crate::types::SyllTest;
use regex::Regex;
use std::sync::OnceLock;

pub(crate) fn is_sylldef_line(line: &str) -> bool {
    line.starts_with("SYLLDEF ")
}

pub(crate) fn is_syll_test(line: &str) -> bool {
    line.starts_with("SYLLDEF TEST ")
}

fn syll_test_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^SYLLDEF TEST +(.+) +-> +(.+)$").expect("valid pattern")
    })
}

fn stress_placement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^SYLLDEF +STRESS_PLACEMENT +([A-Za-z]+)$").expect("valid pattern")
    })
}

fn sylldef_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^SYLLDEF +(ONSETS|SYLLABIC|DELIMITER|STRESS) +"(.+)"$"#)
            .expect("valid pattern")
    })
}

fn sylldef_bool_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^SYLLDEF +(INCLUDE_PHONEME_DELIMITER) +(true|false|1|0)$")
            .expect("valid pattern")
    })
}

fn sylldef_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^SYLLDEF +TYPE +([^ ]+)$").expect("valid pattern"))
}

/// Parses a `SYLLDEF TEST <in> -> <out>` line
pub(crate) fn parse_syll_test(line: &str, line_number: usize) -> Result<SyllTest, GrammarError> {
    let invalid = || GrammarError::InvalidLine {
        kind: "SYLLDEF TEST",
        line: line_number,
        text: line.to_string(),
    };
    if line.matches("->").count() != 1 {
        return Err(invalid());
    }
    let caps = syll_test_re().captures(line).ok_or_else(invalid)?;
    Ok(SyllTest {
        input: caps[1].trim().to_string(),
        expected: caps[2].trim().to_string(),
    })
}

/// Builds a syllable definition from the collected SYLLDEF lines (TEST lines
/// excluded)
pub(crate) fn load_syll_def(
    lines: &[(usize, String)],
    phoneme_delimiter: &str,
) -> Result<SyllDef, GrammarError> {
    let mut def = MopSyllDef {
        phoneme_delimiter: phoneme_delimiter.to_string(),
        ..MopSyllDef::default()
    };
    let mut include_set = false;
    for (line_number, line) in lines {
        parse_mop_line(line, *line_number, &mut def, &mut include_set)?;
    }
    if !include_set {
        def.include_phoneme_delimiter = true;
    }
    if def.stress.is_empty() {
        return Err(GrammarError::MissingSyllDefKey { key: "STRESS" });
    }
    if def.onsets.is_empty() {
        return Err(GrammarError::MissingSyllDefKey { key: "ONSETS" });
    }
    if def.syllabic.is_empty() {
        return Err(GrammarError::MissingSyllDefKey { key: "SYLLABIC" });
    }
    if def.syllable_delimiter.is_empty() {
        return Err(GrammarError::MissingSyllDefKey { key: "DELIMITER" });
    }
    if phoneme_delimiter.is_empty() && def.syllable_delimiter.is_empty() {
        return Err(GrammarError::EmptyDelimiters);
    }
    Ok(SyllDef::Mop(def))
}

fn parse_mop_line(
    line: &str,
    line_number: usize,
    def: &mut MopSyllDef,
    include_set: &mut bool,
) -> Result<(), GrammarError> {
    let invalid = || GrammarError::InvalidLine {
        kind: "SYLLDEF",
        line: line_number,
        text: line.to_string(),
    };
    if let Some(caps) = stress_placement_re().captures(line) {
        def.stress_placement = caps[1].parse::<StressPlacement>().map_err(|_| invalid())?;
        return Ok(());
    }
    if let Some(caps) = sylldef_type_re().captures(line) {
        if &caps[1] != "MOP" {
            return Err(invalid());
        }
        return Ok(());
    }
    if let Some(caps) = sylldef_bool_re().captures(line) {
        def.include_phoneme_delimiter = matches!(&caps[2], "true" | "1");
        *include_set = true;
        return Ok(());
    }
    let caps = sylldef_key_re().captures(line).ok_or_else(invalid)?;
    let value = caps[2].trim().replace("\\\"", "\"");
    match &caps[1] {
        "ONSETS" => def.onsets = grammar::split_commas(&value),
        "SYLLABIC" => def.syllabic = grammar::split_spaces(&value),
        "STRESS" => def.stress = grammar::split_spaces(&value),
        "DELIMITER" => def.syllable_delimiter = value,
        _ => return Err(invalid()),
    }
    Ok(())
}

/// Parses a standalone syllabifier file.
///
/// Accepts SYLLDEF lines, SYLLDEF TESTs, PHONEME_DELIMITER, and the required
/// PHONEME_SET; G2P grammar lines are tolerated and ignored so a full
/// grammar file also loads as a syllabifier. Anything else is an error.
pub fn parse_syllabifier(content: &str, path: &str) -> Result<Syllabifier, G2pError> {
    let mut syll_def_lines: Vec<(usize, String)> = Vec::new();
    let mut tests: Vec<SyllTest> = Vec::new();
    let mut phoneme_delimiter = " ".to_string();
    let mut phoneme_set_line: Option<(usize, String)> = None;
    for (n, raw) in content.lines().enumerate() {
        let line_number = n + 1;
        let line = grammar::trim_comment(raw.trim());
        if line.is_empty() || grammar::is_comment(&line) {
            continue;
        }
        if is_syll_test(&line) {
            tests.push(parse_syll_test(&line, line_number)?);
        } else if is_sylldef_line(&line) {
            syll_def_lines.push((line_number, line));
        } else if grammar::is_phoneme_delimiter(&line) {
            phoneme_delimiter = grammar::parse_phoneme_delimiter(&line, line_number)?;
        } else if grammar::is_phoneme_set(&line) {
            phoneme_set_line = Some((line_number, line));
        } else if grammar::is_g2p_line(&line) {
            // grammar content is none of the syllabifier's business
        } else {
            return Err(GrammarError::InvalidLine {
                kind: "syllabifier input",
                line: line_number,
                text: line,
            }
            .into());
        }
    }
    let Some((set_line_number, set_line)) = phoneme_set_line else {
        return Err(GrammarError::MissingPhonemeSet {
            path: path.to_string(),
        }
        .into());
    };

    let def = load_syll_def(&syll_def_lines, &phoneme_delimiter)?;
    let symbols = grammar::parse_phoneme_set_symbols(&set_line, set_line_number)?;
    let phoneme_set = PhonemeSet::new(
        symbols,
        &phoneme_delimiter,
        def.syllable_delimiter(),
        def.include_phoneme_delimiter(),
    )?;
    let mut syllabifier = Syllabifier::new(def, phoneme_set);
    syllabifier.tests = tests;
    Ok(syllabifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(ls: &[&str]) -> Vec<(usize, String)> {
        ls.iter()
            .enumerate()
            .map(|(i, l)| (i + 1, l.to_string()))
            .collect()
    }

    #[test]
    fn test_load_syll_def() {
        let def = load_syll_def(
            &lines(&[
                "SYLLDEF TYPE MOP",
                "SYLLDEF ONSETS \"p, b, t, p r\"",
                "SYLLDEF SYLLABIC \"a e i o u\"",
                "SYLLDEF STRESS \"\\\" %\"",
                "SYLLDEF DELIMITER \".\"",
            ]),
            " ",
        )
        .unwrap();
        let SyllDef::Mop(def) = def;
        assert_eq!(def.onsets, vec!["p", "b", "t", "p r"]);
        assert_eq!(def.syllabic, vec!["a", "e", "i", "o", "u"]);
        assert_eq!(def.stress, vec!["\"", "%"]);
        assert_eq!(def.syllable_delimiter, ".");
        assert!(def.include_phoneme_delimiter);
        assert_eq!(def.stress_placement, StressPlacement::Undefined);
    }

    #[test]
    fn test_load_syll_def_with_placement_and_bool() {
        let def = load_syll_def(
            &lines(&[
                "SYLLDEF ONSETS \"p\"",
                "SYLLDEF SYLLABIC \"a\"",
                "SYLLDEF STRESS \"1\"",
                "SYLLDEF DELIMITER \"$\"",
                "SYLLDEF STRESS_PLACEMENT BeforeSyllabic",
                "SYLLDEF INCLUDE_PHONEME_DELIMITER false",
            ]),
            " ",
        )
        .unwrap();
        assert_eq!(def.stress_placement(), StressPlacement::BeforeSyllabic);
        assert!(!def.include_phoneme_delimiter());
        assert_eq!(def.syllable_delimiter(), "$");
    }

    #[test]
    fn test_load_syll_def_missing_keys() {
        let err = load_syll_def(&lines(&["SYLLDEF ONSETS \"p\""]), " ").unwrap_err();
        assert!(matches!(
            err,
            GrammarError::MissingSyllDefKey { key: "STRESS" }
        ));
    }

    #[test]
    fn test_load_syll_def_rejects_unknown_type() {
        let err = load_syll_def(&lines(&["SYLLDEF TYPE SSP"]), " ").unwrap_err();
        assert!(matches!(err, GrammarError::InvalidLine { .. }));
    }

    #[test]
    fn test_parse_syll_test_line() {
        let test = parse_syll_test("SYLLDEF TEST d u0 S a -> d u0 . S a", 3).unwrap();
        assert_eq!(test.input, "d u0 S a");
        assert_eq!(test.expected, "d u0 . S a");
    }

    #[test]
    fn test_parse_syll_test_rejects_double_arrow() {
        assert!(parse_syll_test("SYLLDEF TEST a -> b -> c", 1).is_err());
    }

    #[test]
    fn test_parse_syllabifier_file() {
        let content = r#"
// a tiny syllabifier
PHONEME_SET "p t k a e ."
SYLLDEF TYPE MOP
SYLLDEF ONSETS "p, t, k"
SYLLDEF SYLLABIC "a e"
SYLLDEF STRESS "1"
SYLLDEF DELIMITER "."
SYLLDEF TEST p a t e -> p a . t e
"#;
        let syllabifier = parse_syllabifier(content, "tiny.syll").unwrap();
        assert!(syllabifier.is_defined());
        assert_eq!(syllabifier.tests.len(), 1);
        assert_eq!(syllabifier.from_string("p a t e").unwrap(), "p a . t e");
        assert!(!syllabifier.test().failed());
    }

    #[test]
    fn test_parse_syllabifier_requires_phoneme_set() {
        let content = "SYLLDEF ONSETS \"p\"\nSYLLDEF SYLLABIC \"a\"\nSYLLDEF STRESS \"1\"\nSYLLDEF DELIMITER \".\"\n";
        let err = parse_syllabifier(content, "x.syll").unwrap_err();
        assert!(matches!(
            err,
            G2pError::Grammar(GrammarError::MissingPhonemeSet { .. })
        ));
    }

    #[test]
    fn test_parse_syllabifier_rejects_unknown_lines() {
        let content = "PHONEME_SET \"a\"\nwhat is this\n";
        assert!(parse_syllabifier(content, "x.syll").is_err());
    }
}
