#![forbid(unsafe_code)]

//! Syllable definitions
//!
//! [`SyllDef`] is a tagged variant over syllabification strategies. Maximum
//! Onset Principle (MOP) is the only strategy currently implemented; new
//! strategies extend the enum.

use crate::syllable::stress::StressPlacement;

/// A syllabification strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyllDef {
    /// Maximum Onset Principle
    Mop(MopSyllDef),
}

/// Maximum Onset Principle syllable definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MopSyllDef {
    /// Admissible onsets, each a phoneme sequence joined by the phoneme
    /// delimiter
    pub onsets: Vec<String>,

    /// Phonemes that can serve as syllable nuclei
    pub syllabic: Vec<String>,

    /// Stress-marker tokens
    pub stress: Vec<String>,

    /// Delimiter between phonemes (inherited from the rule set)
    pub phoneme_delimiter: String,

    /// Delimiter between syllables in serialized output
    pub syllable_delimiter: String,

    /// Whether a rendered syllable boundary is flanked by phoneme delimiters
    pub include_phoneme_delimiter: bool,

    /// Where stress tokens are rendered
    pub stress_placement: StressPlacement,
}

impl SyllDef {
    /// True if the definition is complete enough to syllabify with
    pub fn is_defined(&self) -> bool {
        match self {
            SyllDef::Mop(def) => !def.onsets.is_empty(),
        }
    }

    pub fn phoneme_delimiter(&self) -> &str {
        match self {
            SyllDef::Mop(def) => &def.phoneme_delimiter,
        }
    }

    pub fn syllable_delimiter(&self) -> &str {
        match self {
            SyllDef::Mop(def) => &def.syllable_delimiter,
        }
    }

    pub fn include_phoneme_delimiter(&self) -> bool {
        match self {
            SyllDef::Mop(def) => def.include_phoneme_delimiter,
        }
    }

    pub fn stress_placement(&self) -> StressPlacement {
        match self {
            SyllDef::Mop(def) => def.stress_placement,
        }
    }

    /// True if the symbol is a declared stress marker
    pub fn is_stress(&self, symbol: &str) -> bool {
        match self {
            SyllDef::Mop(def) => def.stress.iter().any(|s| s == symbol),
        }
    }

    /// True if the phoneme is a declared nucleus
    pub fn is_syllabic(&self, phoneme: &str) -> bool {
        match self {
            SyllDef::Mop(def) => def.syllabic.iter().any(|s| s == phoneme),
        }
    }

    /// True if any phoneme in the slice is syllabic
    pub fn contains_syllabic(&self, phonemes: &[String]) -> bool {
        phonemes.iter().any(|p| self.is_syllabic(p))
    }

    /// Decides whether a syllable boundary may be placed between `left` and
    /// `right`.
    ///
    /// The maximal onset on the right (up to the first syllabic) must be a
    /// declared onset, and no longer onset formed by prepending trailing
    /// non-syllabic phonemes of `left` may also be declared. Stress tokens
    /// are not onset material, except under `AfterSyllabic` where they sit
    /// between boundary and nucleus.
    pub fn valid_split(&self, left: &[String], right: &[String]) -> bool {
        match self {
            SyllDef::Mop(def) => def.valid_split(left, right),
        }
    }
}

impl MopSyllDef {
    fn valid_onset(&self, onset: &str) -> bool {
        onset.is_empty() || self.onsets.iter().any(|o| o == onset)
    }

    fn is_syllabic(&self, phoneme: &str) -> bool {
        self.syllabic.iter().any(|s| s == phoneme)
    }

    fn is_stress(&self, symbol: &str) -> bool {
        self.stress.iter().any(|s| s == symbol)
    }

    fn valid_split(&self, left: &[String], right: &[String]) -> bool {
        let mut onset: Vec<&str> = Vec::new();
        for p in right {
            if self.is_syllabic(p) {
                break;
            }
            if self.is_stress(p) {
                if self.stress_placement == StressPlacement::AfterSyllabic {
                    onset.push(p.as_str());
                }
            } else {
                onset.push(p.as_str());
            }
        }
        if !self.valid_onset(&onset.join(&self.phoneme_delimiter)) {
            return false;
        }
        // MOP: reject the split if pulling consonants over from the left
        // still forms a declared onset.
        let mut test = onset;
        for p in left.iter().rev() {
            if self.is_syllabic(p) {
                break;
            }
            test.insert(0, p.as_str());
            if self.valid_onset(&test.join(&self.phoneme_delimiter)) {
                return false;
            }
        }
        true
    }
}
