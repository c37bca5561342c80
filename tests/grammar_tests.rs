//! Integration tests for grammar loading and the rewrite engine

use graphon::{parse_rule_set, GrammarError};
use std::io::Write;

const SWEDISH_LIKE: &str = r#"
// small Swedish-flavoured test grammar
CHARACTER_SET "abcdehistu"
PHONEME_SET "a b d e h i s t u S"
DEFAULT_PHONEME "_"
PHONEME_DELIMITER " "

VAR VOWEL [aeiou]

sch -> S
a -> a
b -> b
c -> s
d -> d
e -> e
h -> h
i -> i
s -> s
t -> d / VOWEL _ #
t -> t
u -> u

TEST hit -> h i d
TEST dusch -> d u S
TEST stas -> s t a s
"#;

#[test]
fn loads_and_passes_embedded_tests() {
    let rs = parse_rule_set(SWEDISH_LIKE, "sv.g2p").unwrap();
    let report = rs.test();
    assert!(report.errors.is_empty(), "errors: {:?}", report.errors);
    assert!(
        report.failed_tests.is_empty(),
        "failed: {:?}",
        report.failed_tests
    );
}

#[test]
fn load_rule_set_reads_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SWEDISH_LIKE.as_bytes()).unwrap();
    let rs = graphon::load_rule_set(file.path()).unwrap();
    assert_eq!(rs.apply("hit").transcriptions, vec!["h i d"]);
}

#[test]
fn alternatives_expand_rightmost_fastest() {
    let grammar = "CHARACTER_SET \"abc\"\na -> A\nb -> B\nc -> (K, S)\n";
    let rs = parse_rule_set(grammar, "abc.g2p").unwrap();
    assert_eq!(rs.apply("abc").transcriptions, vec!["A B K", "A B S"]);
}

#[test]
fn output_count_is_product_of_fired_alternatives() {
    let grammar = "CHARACTER_SET \"abc\"\na -> (A, a)\nb -> B\nc -> (K, S, s)\n";
    let rs = parse_rule_set(grammar, "abc.g2p").unwrap();
    let outcome = rs.apply("abc");
    assert_eq!(outcome.transcriptions.len(), 6);
    assert_eq!(outcome.transcriptions[0], "A B K");
    assert_eq!(outcome.transcriptions[1], "A B S");
    assert_eq!(outcome.transcriptions[3], "a B K");
}

#[test]
fn context_rule_wins_over_later_plain_rule() {
    let grammar = "CHARACTER_SET \"hit\"\nh -> h\ni -> i\nt -> d / i _ #\nt -> t\n";
    let rs = parse_rule_set(grammar, "hit.g2p").unwrap();
    assert_eq!(rs.apply("hit").transcriptions, vec!["h i d"]);
    assert_eq!(rs.apply("tit").transcriptions, vec!["t i d"]);
    // The word-final anchor keeps the context rule from firing mid-word.
    assert_eq!(rs.apply("itt").transcriptions, vec!["i t t"]);
}

#[test]
fn word_initial_anchor_in_left_context() {
    let grammar = "CHARACTER_SET \"ah\"\nh -> ∅ / # _\nh -> h\na -> a\n";
    let rs = parse_rule_set(grammar, "h.g2p").unwrap();
    assert_eq!(rs.apply("ha").transcriptions, vec!["a"]);
    assert_eq!(rs.apply("aha").transcriptions, vec!["a h a"]);
}

#[test]
fn prefilter_marks_word_start() {
    let grammar = "CHARACTER_SET \"a\"\nPREFILTER \"^\" -> \"#\"\n# -> ?\na -> a\n";
    let rs = parse_rule_set(grammar, "pre.g2p").unwrap();
    let outcome = rs.apply("a");
    assert_eq!(outcome.transcriptions, vec!["? a"]);
    assert!(outcome.fully_mapped());
}

#[test]
fn filter_rewrites_rendered_transcription() {
    let grammar =
        "CHARACTER_SET \"ej\"\ne -> e\nj -> j\nFILTER \"e j\" -> \"E\"\nTEST ej -> E\n";
    let rs = parse_rule_set(grammar, "f.g2p").unwrap();
    assert_eq!(rs.apply("ej").transcriptions, vec!["E"]);
    assert!(!rs.test().failed());
}

#[test]
fn unmappable_characters_get_default_phoneme() {
    let grammar = "CHARACTER_SET \"hi\"\nDEFAULT_PHONEME \"?\"\nh -> h\ni -> i\n";
    let rs = parse_rule_set(grammar, "u.g2p").unwrap();
    let outcome = rs.apply("hiß");
    assert_eq!(outcome.transcriptions, vec!["h i ?"]);
    let diag = outcome.unmappable.expect("expected unmappable diagnostic");
    assert_eq!(diag.symbols, vec!["ß"]);
    assert!(diag.to_string().contains("hiß"));
}

#[test]
fn empty_input_gives_empty_output() {
    let rs = parse_rule_set("CHARACTER_SET \"a\"\na -> A\n", "e.g2p").unwrap();
    let outcome = rs.apply("");
    assert!(outcome.transcriptions.is_empty());
    assert!(outcome.fully_mapped());
}

#[test]
fn downcase_input_defaults_to_true() {
    let rs = parse_rule_set("CHARACTER_SET \"a\"\na -> A\n", "d.g2p").unwrap();
    assert_eq!(rs.apply("A").transcriptions, vec!["A"]);

    let rs = parse_rule_set(
        "CHARACTER_SET \"a\"\nDOWNCASE_INPUT false\na -> A\n",
        "d.g2p",
    )
    .unwrap();
    assert!(!rs.apply("A").fully_mapped());
}

#[test]
fn multi_character_rule_input_is_code_point_aware() {
    let grammar = "CHARACTER_SET \"åäö\"\nåä -> Å\nö -> Ö\nå -> A\nä -> E\n";
    let rs = parse_rule_set(grammar, "sv.g2p").unwrap();
    assert_eq!(rs.apply("åäö").transcriptions, vec!["Å Ö"]);
    assert_eq!(rs.apply("äö").transcriptions, vec!["E Ö"]);
}

#[test]
fn variable_in_context_and_filter() {
    let grammar = r#"
CHARACTER_SET "abp"
VAR VOICELESS [ptksf]
VAR VOWEL [aeiou]
a -> a
b -> p / _ VOICELESS
b -> b
p -> p
FILTER "({VOWEL}) p p" -> "$1 p"
"#;
    let rs = parse_rule_set(grammar, "v.g2p").unwrap();
    assert_eq!(rs.apply("abp").transcriptions, vec!["a p"]);
    assert_eq!(rs.apply("ab").transcriptions, vec!["a b"]);
}

#[test]
fn round_trip_split_recovers_phonemes() {
    let rs = parse_rule_set(SWEDISH_LIKE, "sv.g2p").unwrap();
    let outcome = rs.apply("dusch");
    let tokens = rs
        .phoneme_set
        .split_transcription(&outcome.transcriptions[0])
        .unwrap();
    assert_eq!(tokens, vec!["d", "u", "S"]);
}

#[test]
fn empty_phoneme_delimiter_renders_compact_output() {
    let grammar =
        "CHARACTER_SET \"ab\"\nPHONEME_DELIMITER \"\"\na -> A\nb -> B\nTEST ab -> AB\n";
    let rs = parse_rule_set(grammar, "c.g2p").unwrap();
    assert_eq!(rs.apply("ab").transcriptions, vec!["AB"]);
    assert!(!rs.test().failed());
}

#[test]
fn rule_fire_counts_accumulate_per_rule() {
    let rs = parse_rule_set("CHARACTER_SET \"ab\"\na -> A\nb -> B\n", "c.g2p").unwrap();
    rs.apply("abab");
    rs.apply("a");
    let counts = rs.rules_applied();
    assert_eq!(counts.get("a -> A /  _ "), Some(&3));
    assert_eq!(counts.get("b -> B /  _ "), Some(&2));
}

#[test]
fn load_error_on_missing_character_set() {
    let err = parse_rule_set("a -> A\n", "x.g2p").unwrap_err();
    assert!(err.to_string().contains("no character set defined"));
}

#[test]
fn load_error_on_duplicate_rules() {
    let err = parse_rule_set(
        "CHARACTER_SET \"a\"\na -> A / # _\na -> B / # _\n",
        "x.g2p",
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate rules"));
}

#[test]
fn load_error_on_unused_variable() {
    let err = parse_rule_set(
        "CHARACTER_SET \"a\"\nVAR VOWEL [aeiou]\na -> A\n",
        "x.g2p",
    )
    .unwrap_err();
    assert!(err.to_string().contains("unused variable(s) VOWEL"));
}

#[test]
fn load_error_on_undefined_context_variable() {
    let err = parse_rule_set("CHARACTER_SET \"a\"\na -> A / _ VOWEL\n", "x.g2p").unwrap_err();
    assert!(err.to_string().contains("undefined variable VOWEL"));
}

#[test]
fn load_error_on_invalid_variable_regex() {
    let err = parse_rule_set(
        "CHARACTER_SET \"a\"\nVAR VOWEL [aeiou\na -> A / _ VOWEL\n",
        "x.g2p",
    )
    .unwrap_err();
    match err {
        graphon::G2pError::Grammar(GrammarError::InvalidRegex { line, .. }) => {
            assert_eq!(line, 2);
        }
        other => panic!("expected InvalidRegex, got {:?}", other),
    }
}

#[test]
fn comment_lines_and_trailing_comments_are_ignored() {
    let grammar = "// header\nCHARACTER_SET \"a\" // chars\n\na -> A // vowel rule\n";
    let rs = parse_rule_set(grammar, "c.g2p").unwrap();
    assert_eq!(rs.apply("a").transcriptions, vec!["A"]);
}

#[test]
fn grammar_with_sylldef_syllabifies_apply_output() {
    let grammar = r#"
CHARACTER_SET "adku"
PHONEME_SET "a d k u 1 ."
a -> a
d -> d
k -> k
u -> 1 u / d _
u -> u
SYLLDEF TYPE MOP
SYLLDEF ONSETS "d, k"
SYLLDEF SYLLABIC "u a"
SYLLDEF STRESS "1"
SYLLDEF DELIMITER "."
SYLLDEF STRESS_PLACEMENT BeforeSyllabic
TEST duka -> d 1 u . k a
"#;
    let rs = parse_rule_set(grammar, "s.g2p").unwrap();
    assert_eq!(rs.apply("duka").transcriptions, vec!["d 1 u . k a"]);
    let report = rs.test();
    assert!(!report.failed(), "{:?}", report);
}

#[test]
fn duplicate_test_lines_are_accepted() {
    let grammar = "CHARACTER_SET \"a\"\na -> A\nTEST a -> A\nTEST a -> A\n";
    let rs = parse_rule_set(grammar, "t.g2p").unwrap();
    assert_eq!(rs.tests.len(), 2);
    assert!(!rs.test().failed());
}
