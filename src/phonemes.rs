//! Phoneme inventory and transcription splitting

pub mod set;
pub mod splitter;

pub use set::PhonemeSet;
pub use splitter::split_into_phonemes;
