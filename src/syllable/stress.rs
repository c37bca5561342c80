#![forbid(unsafe_code)]

//! Stress placement policies and stress-aware syllable parsing

use crate::syllable::def::SyllDef;
use crate::syllable::syllabifier::SylledTrans;
use std::str::FromStr;

/// Where a stress token is rendered relative to the syllable's nucleus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StressPlacement {
    /// Stress tokens stay where the input put them
    #[default]
    Undefined,

    /// Before the syllable's first phoneme
    FirstInSyllable,

    /// Before the first syllabic phoneme
    BeforeSyllabic,

    /// After the first syllabic phoneme
    AfterSyllabic,
}

impl FromStr for StressPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "firstinsyllable" => Ok(StressPlacement::FirstInSyllable),
            "beforesyllabic" => Ok(StressPlacement::BeforeSyllabic),
            "aftersyllabic" => Ok(StressPlacement::AfterSyllabic),
            _ => Err(format!("invalid stress placement: {}", s)),
        }
    }
}

/// A parsed syllable: its phonemes with the stress token factored out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Syllable {
    pub phonemes: Vec<String>,
    pub stress: Option<String>,
}

/// Splits a syllabified transcription into syllables, extracting stress
/// tokens. When a syllable carries several stress tokens the last one wins.
pub(crate) fn parse_syllables(def: &SyllDef, sylled: &SylledTrans) -> Vec<Syllable> {
    sylled
        .syllables()
        .into_iter()
        .map(|phonemes| {
            let mut syllable = Syllable::default();
            for p in phonemes {
                if def.is_stress(&p) {
                    syllable.stress = Some(p);
                } else {
                    syllable.phonemes.push(p);
                }
            }
            syllable
        })
        .collect()
}
