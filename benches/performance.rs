//! Performance benchmarks for graphon
//!
//! These benchmarks measure the performance of key operations:
//! - Grammar loading (parsing, variable expansion, regex compilation)
//! - Rule application on single words
//! - Cartesian expansion with many output alternatives
//! - MOP syllabification
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench apply
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graphon::syllable::def::{MopSyllDef, SyllDef};
use graphon::syllable::Syllabifier;
use graphon::{parse_rule_set, PhonemeSet, RuleSet, StressPlacement};

const GRAMMAR: &str = r#"
CHARACTER_SET "abcdefghijklmnopqrstuvwxyz"
PHONEME_SET "a b d e f g h i j k l m n o p r s t u v S tS _"
VAR VOWEL [aeiou]
sch -> S
ch -> tS
a -> a
b -> b
c -> k / _ VOWEL
c -> s
d -> d
e -> e
f -> f
g -> g
h -> h
i -> i
j -> j
k -> k
l -> l
m -> m
n -> n
o -> o
p -> p
q -> k
r -> r
s -> s
t -> d / VOWEL _ #
t -> t
u -> u
v -> v
w -> v
x -> (k s, s)
y -> i
z -> s
"#;

fn load_grammar() -> RuleSet {
    parse_rule_set(GRAMMAR, "bench.g2p").expect("benchmark grammar loads")
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("load_grammar", |b| b.iter(load_grammar));
}

fn bench_apply(c: &mut Criterion) {
    let rs = load_grammar();
    c.bench_function("apply_short_word", |b| {
        b.iter(|| rs.apply(black_box("hit")))
    });
    c.bench_function("apply_long_word", |b| {
        b.iter(|| rs.apply(black_box("charmschoolexperiment")))
    });
    c.bench_function("apply_with_alternatives", |b| {
        b.iter(|| rs.apply(black_box("xylophonetaxextra")))
    });
}

fn bench_syllabify(c: &mut Criterion) {
    let def = SyllDef::Mop(MopSyllDef {
        onsets: ["p", "b", "t", "d", "k", "g", "r", "s", "p r", "s t r", "g r"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        syllabic: ["a", "e", "i", "o", "u"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        stress: vec!["\"".to_string()],
        phoneme_delimiter: " ".to_string(),
        syllable_delimiter: ".".to_string(),
        include_phoneme_delimiter: true,
        stress_placement: StressPlacement::FirstInSyllable,
    });
    let syllabifier = Syllabifier::new(def, PhonemeSet::default());
    let phonemes: Vec<String> = "s t r a \" t o s p e r a g r a d u s"
        .split(' ')
        .map(|s| s.to_string())
        .collect();
    c.bench_function("syllabify_from_phonemes", |b| {
        b.iter(|| syllabifier.from_phonemes(black_box(&phonemes)))
    });
}

criterion_group!(benches, bench_load, bench_apply, bench_syllabify);
criterion_main!(benches);
