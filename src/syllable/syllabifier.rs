#![forbid(unsafe_code)]

//! The syllabification walk and output rendering
//!
//! Boundary positions are decided by a single left-to-right pass, moving one
//! phoneme at a time from the remainder to the consumed side and asking the
//! syllable definition whether a split is valid at each step. Rendering then
//! serializes the syllables under the configured stress-placement policy.

use crate::error::G2pError;
use crate::phonemes::PhonemeSet;
use crate::syllable::def::SyllDef;
use crate::syllable::stress::{parse_syllables, StressPlacement};
use crate::types::{GraphemePhonemes, SyllTest, TestReport, Trans};

/// A syllable boundary, addressed by grapheme record and phoneme offset
/// within that record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Boundary {
    grapheme: usize,
    phoneme: usize,
}

/// A syllabified transcription: the underlying records plus boundary indices
#[derive(Debug, Clone)]
pub struct SylledTrans {
    trans: Trans,
    boundaries: Vec<Boundary>,
}

impl SylledTrans {
    fn is_boundary(&self, grapheme: usize, phoneme: usize) -> bool {
        self.boundaries
            .iter()
            .any(|b| b.grapheme == grapheme && b.phoneme == phoneme)
    }

    /// The flat phoneme sequence
    pub fn list_phonemes(&self) -> Vec<String> {
        self.trans.list_phonemes()
    }

    /// Groups the phonemes into syllables at the recorded boundaries
    pub fn syllables(&self) -> Vec<Vec<String>> {
        let mut res = Vec::with_capacity(self.boundaries.len() + 1);
        let mut current = Vec::new();
        for (gi, gp) in self.trans.phonemes.iter().enumerate() {
            for (pi, p) in gp.phonemes.iter().enumerate() {
                if self.is_boundary(gi, pi) && !current.is_empty() {
                    res.push(std::mem::take(&mut current));
                }
                current.push(p.clone());
            }
        }
        if !current.is_empty() {
            res.push(current);
        }
        res
    }
}

/// Divides transcriptions into syllables and serializes them
#[derive(Debug, Clone)]
pub struct Syllabifier {
    pub def: SyllDef,
    pub phoneme_set: PhonemeSet,
    pub tests: Vec<SyllTest>,
    pub debug: bool,
}

impl Syllabifier {
    pub fn new(def: SyllDef, phoneme_set: PhonemeSet) -> Self {
        Syllabifier {
            def,
            phoneme_set,
            tests: Vec::new(),
            debug: false,
        }
    }

    /// True if the contained definition can actually syllabify
    pub fn is_defined(&self) -> bool {
        self.def.is_defined()
    }

    /// Syllabifies a plain phoneme sequence and renders the output string
    pub fn from_phonemes(&self, phonemes: &[String]) -> String {
        let trans = Trans {
            phonemes: phonemes
                .iter()
                .map(|p| GraphemePhonemes {
                    grapheme: String::new(),
                    phonemes: vec![p.clone()],
                })
                .collect(),
        };
        self.syllabify_trans(&trans)
    }

    /// Splits a serialized transcription into phonemes, syllabifies, and
    /// renders the output string
    pub fn from_string(&self, transcription: &str) -> Result<String, G2pError> {
        let phonemes = self.phoneme_set.split_transcription(transcription)?;
        Ok(self.from_phonemes(&phonemes))
    }

    /// Syllabifies an expanded transcription and renders it
    pub(crate) fn syllabify_trans(&self, trans: &Trans) -> String {
        let sylled = self.syllabify(trans);
        let res = self.render(&sylled);
        if self.debug {
            eprintln!("SYLLABIFY\t{:?}\t{:?}\t{}", trans, sylled.boundaries, res);
        }
        res
    }

    /// Walks the phoneme sequence once, inserting a boundary wherever a
    /// valid split separates two syllabic stretches. The consumed side is
    /// reset at each boundary so it covers the current syllable only.
    fn syllabify(&self, trans: &Trans) -> SylledTrans {
        let all = trans.list_phonemes();
        let mut boundaries = Vec::new();
        let mut left: Vec<String> = Vec::new();
        let mut consumed = 0usize;
        for (gi, gp) in trans.phonemes.iter().enumerate() {
            for (pi, p) in gp.phonemes.iter().enumerate() {
                let right = &all[consumed..];
                if !left.is_empty()
                    && self.def.valid_split(&left, right)
                    && self.def.contains_syllabic(&left)
                    && self.def.contains_syllabic(right)
                {
                    boundaries.push(Boundary {
                        grapheme: gi,
                        phoneme: pi,
                    });
                    left.clear();
                }
                left.push(p.clone());
                consumed += 1;
            }
        }
        SylledTrans {
            trans: trans.clone(),
            boundaries,
        }
    }

    /// Serializes the syllables, applying the stress-placement policy
    fn render(&self, sylled: &SylledTrans) -> String {
        let rendered: Vec<String> = match self.def.stress_placement() {
            StressPlacement::Undefined => sylled
                .syllables()
                .into_iter()
                .map(|syll| syll.join(self.def.phoneme_delimiter()))
                .collect(),
            placement => parse_syllables(&self.def, sylled)
                .into_iter()
                .map(|syll| {
                    let mut out: Vec<&str> = Vec::with_capacity(syll.phonemes.len() + 1);
                    let stress = syll.stress.as_deref();
                    if placement == StressPlacement::FirstInSyllable {
                        if let Some(stress) = stress {
                            out.push(stress);
                        }
                    }
                    let mut nucleus_seen = false;
                    for p in &syll.phonemes {
                        let is_nucleus = !nucleus_seen && self.def.is_syllabic(p);
                        if is_nucleus && placement == StressPlacement::BeforeSyllabic {
                            if let Some(stress) = stress {
                                out.push(stress);
                            }
                        }
                        out.push(p.as_str());
                        if is_nucleus && placement == StressPlacement::AfterSyllabic {
                            if let Some(stress) = stress {
                                out.push(stress);
                            }
                        }
                        nucleus_seen = nucleus_seen || is_nucleus;
                    }
                    out.join(self.def.phoneme_delimiter())
                })
                .collect(),
        };
        let phn = self.def.phoneme_delimiter();
        let syll = self.def.syllable_delimiter();
        if self.def.include_phoneme_delimiter() {
            rendered.join(&format!("{}{}{}", phn, syll, phn))
        } else {
            rendered.join(syll)
        }
    }

    /// Runs the embedded `SYLLDEF TEST` lines
    pub fn test(&self) -> TestReport {
        let mut report = TestReport::default();
        for test in &self.tests {
            match self.from_string(&test.input) {
                Ok(res) => {
                    if res != test.expected {
                        report.failed_tests.push(format!(
                            "from /{}/ expected /{}/, found /{}/",
                            test.input, test.expected, res
                        ));
                    }
                }
                Err(err) => {
                    report.errors.push(format!(
                        "found error in test input (couldn't split) /{}/ : {}",
                        test.input, err
                    ));
                }
            }
        }
        report
    }
}
