#![forbid(unsafe_code)]

//! The grammar file loader
//!
//! Parsing is line-oriented. Blank lines and `//` lines are skipped, and a
//! trailing `//…` comment is stripped from any other line (a comment marker
//! needs at least one non-`/` character in front of it, so `//` inside a
//! quoted value survives). Each remaining line is classified in a fixed
//! precedence order: PHONEME_DELIMITER, PHONEME_SET, the constants, VAR,
//! SYLLDEF, PREFILTER, FILTER, TEST, and finally the rule shape
//! `<input> -> <output>( / <left> _ <right>)?`.
//!
//! Rules and filters are compiled after the whole file has been read, once
//! the variable table has been fixpoint-expanded.

use crate::engine::RuleSet;
use crate::error::GrammarError;
use crate::parser::sylldef;
use crate::phonemes::PhonemeSet;
use crate::rules::{Context, Filter, Rule};
use crate::syllable::Syllabifier;
use crate::types::{SyllTest, TestCase};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

fn comment_at_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*[^/]+)//+.*$").expect("valid pattern"))
}

fn multi_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" +").expect("valid pattern"))
}

fn comma_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" *, *").expect("valid pattern"))
}

fn const_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(CHARACTER_SET|DEFAULT_PHONEME|DOWNCASE_INPUT) (?:"(.+)"|([^"]+))$"#)
            .expect("valid pattern")
    })
}

fn is_const_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(CHARACTER_SET|DEFAULT_PHONEME|DOWNCASE_INPUT) ").expect("valid pattern")
    })
}

fn phoneme_delimiter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^PHONEME_DELIMITER +"(.*)"$"#).expect("valid pattern"))
}

fn phoneme_set_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^PHONEME_SET +"(.*)"$"#).expect("valid pattern"))
}

fn var_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^VAR +([^ "]+) +(.+)$"#).expect("valid pattern"))
}

fn quoted_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^"(.*)"$"#).expect("valid pattern"))
}

fn test_simple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^TEST +([^ ]+) +-> +([^,()]+)$").expect("valid pattern"))
}

fn test_variants_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^TEST +([^ ]+) +-> +\((.+,.+)\)$").expect("valid pattern"))
}

fn filter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^FILTER +"(.+)" +-> +"(.*)"$"#).expect("valid pattern"))
}

fn prefilter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^PREFILTER +"(.+)" +-> +"(.*)"$"#).expect("valid pattern"))
}

fn rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^ ]+) +-> +([^/]+)( +/.*$|$)").expect("valid pattern"))
}

fn rule_output_simple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^,()]+)$").expect("valid pattern"))
}

fn rule_output_variants_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\((.+,.+)\)$").expect("valid pattern"))
}

fn context_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ +/ +((?:[^_>]+)?) *_ *((?:[^_>]+)?)$").expect("valid pattern")
    })
}

fn braced_var_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|[^\\])\{([^},\\]+)\}").expect("valid pattern"))
}

fn context_var_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9]+$").expect("valid pattern"))
}

fn g2p_keyword_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(CHARACTER_SET|TEST|DEFAULT_PHONEME|FILTER|PREFILTER|VAR|DOWNCASE_INPUT) ")
            .expect("valid pattern")
    })
}

/// The empty-set glyph authors use for silent graphemes
const EMPTY_OUTPUT: &str = "∅";

pub(crate) fn is_comment(line: &str) -> bool {
    line.starts_with("//")
}

/// Strips a trailing `//…` comment; the marker needs a preceding non-`/`
/// character, so `//` inside a quoted value is left alone
pub(crate) fn trim_comment(line: &str) -> String {
    comment_at_end_re()
        .replace(line, "$1")
        .trim()
        .to_string()
}

pub(crate) fn split_spaces(value: &str) -> Vec<String> {
    multi_space_re()
        .split(value)
        .map(str::to_string)
        .collect()
}

pub(crate) fn split_commas(value: &str) -> Vec<String> {
    comma_split_re()
        .split(value)
        .map(str::to_string)
        .collect()
}

pub(crate) fn is_phoneme_delimiter(line: &str) -> bool {
    line.starts_with("PHONEME_DELIMITER ")
}

pub(crate) fn parse_phoneme_delimiter(
    line: &str,
    line_number: usize,
) -> Result<String, GrammarError> {
    let caps = phoneme_delimiter_re()
        .captures(line)
        .ok_or(GrammarError::InvalidLine {
            kind: "PHONEME_DELIMITER",
            line: line_number,
            text: line.to_string(),
        })?;
    Ok(caps[1].to_string())
}

pub(crate) fn is_phoneme_set(line: &str) -> bool {
    line.starts_with("PHONEME_SET ")
}

pub(crate) fn parse_phoneme_set_symbols(
    line: &str,
    line_number: usize,
) -> Result<Vec<String>, GrammarError> {
    let caps = phoneme_set_re()
        .captures(line)
        .ok_or(GrammarError::InvalidLine {
            kind: "PHONEME_SET",
            line: line_number,
            text: line.to_string(),
        })?;
    Ok(split_spaces(caps[1].trim()))
}

/// True for lines the grammar loader owns; the standalone syllabifier loader
/// skips these
pub(crate) fn is_g2p_line(line: &str) -> bool {
    g2p_keyword_line_re().is_match(line) || rule_re().is_match(line)
}

enum ConstDecl {
    CharacterSet(Vec<String>),
    DefaultPhoneme(String),
    DowncaseInput(bool),
}

fn parse_const(line: &str, line_number: usize) -> Result<ConstDecl, GrammarError> {
    let invalid = || GrammarError::InvalidLine {
        kind: "constant",
        line: line_number,
        text: line.to_string(),
    };
    let caps = const_re().captures(line).ok_or_else(invalid)?;
    let value = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
        .ok_or_else(invalid)?;
    match &caps[1] {
        "CHARACTER_SET" => Ok(ConstDecl::CharacterSet(
            value.chars().map(|c| c.to_string()).collect(),
        )),
        "DEFAULT_PHONEME" => Ok(ConstDecl::DefaultPhoneme(value.to_string())),
        "DOWNCASE_INPUT" => match value {
            "true" | "TRUE" | "1" => Ok(ConstDecl::DowncaseInput(true)),
            "false" | "FALSE" | "0" => Ok(ConstDecl::DowncaseInput(false)),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

fn parse_var(line: &str, line_number: usize) -> Result<(String, String), GrammarError> {
    let invalid = || GrammarError::InvalidLine {
        kind: "VAR",
        line: line_number,
        text: line.to_string(),
    };
    let caps = var_re().captures(line).ok_or_else(invalid)?;
    let name = caps[1].to_string();
    let mut value = caps[2].trim().to_string();
    if name.contains('_') {
        return Err(invalid());
    }
    if value.starts_with('=') {
        return Err(invalid());
    }
    if let Some(quoted) = quoted_value_re().captures(&value) {
        value = quoted[1].to_string();
    }
    if let Err(source) = Regex::new(&value) {
        return Err(GrammarError::InvalidRegex {
            pattern: value,
            line: line_number,
            source: Box::new(source),
        });
    }
    Ok((name, value))
}

fn parse_test(line: &str, line_number: usize) -> Result<TestCase, GrammarError> {
    let invalid = || GrammarError::InvalidLine {
        kind: "TEST",
        line: line_number,
        text: line.to_string(),
    };
    let caps = test_simple_re()
        .captures(line)
        .or_else(|| test_variants_re().captures(line))
        .ok_or_else(invalid)?;
    let output = caps[2].to_string();
    if output.contains("->") {
        return Err(invalid());
    }
    Ok(TestCase {
        input: caps[1].to_string(),
        expected: split_commas(output.trim()),
    })
}

/// Replaces `{NAME}` references; an unreplaced reference (unless escaped) is
/// an error
fn expand_braced_vars(
    pattern: &str,
    vars: &HashMap<String, String>,
    used: &mut HashSet<String>,
) -> Result<String, GrammarError> {
    let mut res = pattern.to_string();
    for (name, value) in vars {
        let reference = format!("{{{}}}", name);
        if res.contains(&reference) {
            res = res.replace(&reference, value);
            used.insert(name.clone());
        }
    }
    if let Some(caps) = braced_var_re().captures(&res) {
        return Err(GrammarError::UndefinedVariable {
            name: caps[1].to_string(),
            context: pattern.to_string(),
        });
    }
    Ok(res)
}

fn parse_filter(
    line: &str,
    line_number: usize,
    kind: &'static str,
    vars: &HashMap<String, String>,
    used: &mut HashSet<String>,
) -> Result<Filter, GrammarError> {
    let invalid = || GrammarError::InvalidLine {
        kind,
        line: line_number,
        text: line.to_string(),
    };
    let re = if kind == "PREFILTER" {
        prefilter_re()
    } else {
        filter_re()
    };
    let caps = re.captures(line).ok_or_else(invalid)?;
    let replacement = caps[2].replace("\\\"", "\"");
    if replacement.contains("->") {
        return Err(invalid());
    }
    let pattern = expand_braced_vars(&caps[1], vars, used)?;
    let compiled = Regex::new(&pattern).map_err(|source| GrammarError::InvalidRegex {
        pattern: pattern.clone(),
        line: line_number,
        source: Box::new(source),
    })?;
    Ok(Filter::new(compiled, replacement))
}

/// Compiles one side of a rule context: `#` becomes an anchor, whole tokens
/// are substituted from the variable table, and the result is suffix-anchored
/// (left) or prefix-anchored (right)
fn compile_context(
    source: &str,
    is_left: bool,
    line_number: usize,
    vars: &HashMap<String, String>,
    used: &mut HashSet<String>,
) -> Result<Context, GrammarError> {
    let anchored = if is_left {
        source.replace('#', "^")
    } else {
        source.replace('#', "$")
    };
    let mut parts: Vec<String> = Vec::new();
    for token in anchored.split(' ') {
        let trimmed = token.trim();
        if let Some(value) = vars.get(trimmed) {
            parts.push(value.clone());
            used.insert(trimmed.to_string());
        } else {
            if context_var_token_re().is_match(trimmed) {
                return Err(GrammarError::UndefinedVariable {
                    name: trimmed.to_string(),
                    context: source.to_string(),
                });
            }
            parts.push(token.to_string());
        }
    }
    let joined = parts.concat();
    let pattern = if is_left {
        format!("{}$", joined)
    } else {
        format!("^{}", joined)
    };
    let compiled = Regex::new(&pattern).map_err(|source| GrammarError::InvalidRegex {
        pattern: pattern.clone(),
        line: line_number,
        source: Box::new(source),
    })?;
    Ok(Context::new(source, compiled))
}

fn parse_contexts(
    section: &str,
    line: &str,
    line_number: usize,
    vars: &HashMap<String, String>,
    used: &mut HashSet<String>,
) -> Result<(Context, Context), GrammarError> {
    if section.trim().is_empty() {
        return Ok((Context::undefined(), Context::undefined()));
    }
    let caps = context_re()
        .captures(section)
        .ok_or(GrammarError::InvalidLine {
            kind: "context",
            line: line_number,
            text: line.to_string(),
        })?;
    let left_source = caps[1].trim().to_string();
    let right_source = caps[2].trim().to_string();
    let left = if left_source.is_empty() {
        Context::undefined()
    } else {
        compile_context(&left_source, true, line_number, vars, used)?
    };
    let right = if right_source.is_empty() {
        Context::undefined()
    } else {
        compile_context(&right_source, false, line_number, vars, used)?
    };
    Ok((left, right))
}

fn parse_rule_output(
    section: &str,
    line: &str,
    line_number: usize,
) -> Result<Vec<String>, GrammarError> {
    let invalid = || GrammarError::InvalidLine {
        kind: "rule output",
        line: line_number,
        text: line.to_string(),
    };
    let section = section.trim();
    let caps = rule_output_simple_re()
        .captures(section)
        .or_else(|| rule_output_variants_re().captures(section))
        .ok_or_else(invalid)?;
    let output = caps[1].to_string();
    if output.contains("->") {
        return Err(invalid());
    }
    Ok(split_commas(&output.replace(EMPTY_OUTPUT, "")))
}

fn parse_rule(
    line: &str,
    line_number: usize,
    vars: &HashMap<String, String>,
    used: &mut HashSet<String>,
) -> Result<Rule, GrammarError> {
    let caps = rule_re().captures(line).ok_or(GrammarError::InvalidLine {
        kind: "rule",
        line: line_number,
        text: line.to_string(),
    })?;
    let mut input = caps[1].to_string();
    if input == "\u{00a0}" {
        input = " ".to_string();
    }
    let output = parse_rule_output(&caps[2], line, line_number)?;
    let context_section = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    let (left_context, right_context) =
        parse_contexts(context_section, line, line_number, vars, used)?;
    Ok(Rule {
        input,
        output,
        left_context,
        right_context,
        line_number,
    })
}

/// Expands variable references inside variable values until nothing changes.
/// References still unresolved after that (cycles included) are an error.
fn expand_vars_fixpoint(vars: &mut HashMap<String, String>) -> Result<(), GrammarError> {
    const MAX_ROUNDS: usize = 10;
    for _ in 0..MAX_ROUNDS {
        let snapshot = vars.clone();
        let mut changed = false;
        for (name, value) in vars.iter_mut() {
            for (other, replacement) in &snapshot {
                if other == name {
                    continue;
                }
                let reference = format!("{{{}}}", other);
                if value.contains(&reference) {
                    *value = value.replace(&reference, replacement);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    for (name, value) in vars.iter() {
        if let Some(caps) = braced_var_re().captures(value) {
            return Err(GrammarError::UndefinedVariable {
                name: caps[1].to_string(),
                context: format!("VAR {} {}", name, value),
            });
        }
    }
    Ok(())
}

/// Parses a grammar from its textual content. `path` is used in diagnostics
/// only.
pub fn parse(content: &str, path: &str) -> Result<RuleSet, GrammarError> {
    let mut rule_set = RuleSet::new();
    let mut downcase: Option<bool> = None;
    let mut syll_def_lines: Vec<(usize, String)> = Vec::new();
    let mut syll_tests: Vec<SyllTest> = Vec::new();
    let mut filter_lines: Vec<(usize, String)> = Vec::new();
    let mut prefilter_lines: Vec<(usize, String)> = Vec::new();
    let mut rule_lines: Vec<(usize, String)> = Vec::new();
    let mut phoneme_set_line: Option<(usize, String)> = None;
    let mut content_lines: Vec<String> = Vec::new();
    let mut used_vars: HashSet<String> = HashSet::new();

    for (n, raw) in content.lines().enumerate() {
        let line_number = n + 1;
        let original = raw.trim().to_string();
        let line = trim_comment(&original);
        content_lines.push(original);
        if line.is_empty() || is_comment(&line) {
            continue;
        }
        if is_phoneme_delimiter(&line) {
            rule_set.phoneme_delimiter = parse_phoneme_delimiter(&line, line_number)?;
        } else if is_phoneme_set(&line) {
            phoneme_set_line = Some((line_number, line));
        } else if is_const_re().is_match(&line) {
            match parse_const(&line, line_number)? {
                ConstDecl::CharacterSet(chars) => rule_set.character_set = chars,
                ConstDecl::DefaultPhoneme(p) => rule_set.default_phoneme = p,
                ConstDecl::DowncaseInput(b) => downcase = Some(b),
            }
        } else if line.starts_with("VAR ") {
            let (name, value) = parse_var(&line, line_number)?;
            rule_set.vars.insert(name, value);
        } else if sylldef::is_syll_test(&line) {
            syll_tests.push(sylldef::parse_syll_test(&line, line_number)?);
        } else if sylldef::is_sylldef_line(&line) {
            syll_def_lines.push((line_number, line));
        } else if line.starts_with("PREFILTER ") {
            prefilter_lines.push((line_number, line));
        } else if line.starts_with("FILTER ") {
            filter_lines.push((line_number, line));
        } else if line.starts_with("TEST ") {
            rule_set.tests.push(parse_test(&line, line_number)?);
        } else {
            rule_lines.push((line_number, line));
        }
    }

    rule_set.downcase_input = downcase.unwrap_or(true);
    expand_vars_fixpoint(&mut rule_set.vars)?;

    let syll_def = if syll_def_lines.is_empty() {
        None
    } else {
        Some(sylldef::load_syll_def(
            &syll_def_lines,
            &rule_set.phoneme_delimiter,
        )?)
    };

    let (syllable_delimiter, include_phoneme_delimiter) = match &syll_def {
        Some(def) => (
            def.syllable_delimiter().to_string(),
            def.include_phoneme_delimiter(),
        ),
        None => (String::new(), true),
    };
    if let Some((line_number, line)) = &phoneme_set_line {
        let symbols = parse_phoneme_set_symbols(line, *line_number)?;
        rule_set.phoneme_set = PhonemeSet::new(
            symbols,
            &rule_set.phoneme_delimiter,
            &syllable_delimiter,
            include_phoneme_delimiter,
        )?;
    }
    if let Some(def) = syll_def {
        if rule_set.phoneme_delimiter.is_empty() && def.syllable_delimiter().is_empty() {
            return Err(GrammarError::EmptyDelimiters);
        }
        let mut syllabifier = Syllabifier::new(def, rule_set.phoneme_set.clone());
        syllabifier.tests = syll_tests;
        rule_set.syllabifier = Some(syllabifier);
    }

    for (line_number, line) in &prefilter_lines {
        let filter = parse_filter(line, *line_number, "PREFILTER", &rule_set.vars, &mut used_vars)?;
        rule_set.prefilters.push(filter);
    }
    for (line_number, line) in &filter_lines {
        let filter = parse_filter(line, *line_number, "FILTER", &rule_set.vars, &mut used_vars)?;
        rule_set.filters.push(filter);
    }

    for (line_number, line) in &rule_lines {
        let rule = parse_rule(line, *line_number, &rule_set.vars, &mut used_vars)?;
        if let Some(existing) = rule_set.rules.iter().find(|r| r.same_matcher(&rule)) {
            return Err(GrammarError::DuplicateRule {
                path: path.to_string(),
                first: existing.to_string(),
                first_line: existing.line_number,
                second: rule.to_string(),
                second_line: rule.line_number,
            });
        }
        rule_set.rules.push(rule);
    }

    if rule_set.character_set.is_empty() {
        return Err(GrammarError::MissingCharacterSet {
            path: path.to_string(),
        });
    }

    let mut unused: Vec<&String> = rule_set
        .vars
        .keys()
        .filter(|name| !used_vars.contains(*name))
        .collect();
    if !unused.is_empty() {
        unused.sort();
        return Err(GrammarError::UnusedVariables {
            names: unused
                .into_iter()
                .cloned()
                .collect::<Vec<String>>()
                .join(", "),
            path: path.to_string(),
        });
    }

    rule_set.content = content_lines.join("\n");
    Ok(rule_set)
}
