//! Longest-match tokenizer for transcriptions without a phoneme delimiter
//!
//! Used by [`crate::phonemes::PhonemeSet`] when the phoneme delimiter is the
//! empty string: the transcription is consumed greedily, always taking the
//! longest known phoneme that prefixes the remainder. Code points covered by
//! no known phoneme are consumed one at a time and reported as unknown.

/// Splits `transcription` into phoneme tokens using longest-prefix matching
/// against `known_phonemes`.
///
/// Returns the ordered token list and the list of unknown tokens. Unknown
/// tokens also appear in the token list, in position.
pub fn split_into_phonemes(
    known_phonemes: &[String],
    transcription: &str,
) -> (Vec<String>, Vec<String>) {
    // Discard phonemes that cannot occur, then prefer longer matches. The
    // sort is stable so equal-length phonemes keep their inventory order.
    let mut known: Vec<&str> = known_phonemes
        .iter()
        .filter(|ph| !ph.is_empty() && transcription.contains(ph.as_str()))
        .map(|ph| ph.as_str())
        .collect();
    known.sort_by_key(|ph| std::cmp::Reverse(ph.len()));

    let mut phonemes = Vec::new();
    let mut unknown = Vec::new();
    let mut rest = transcription;
    while !rest.is_empty() {
        match consume(&mut known, rest) {
            Some(prefix) => {
                phonemes.push(prefix.to_string());
                rest = &rest[prefix.len()..];
            }
            None => {
                let Some(ch) = rest.chars().next() else {
                    break;
                };
                let token = ch.to_string();
                phonemes.push(token.clone());
                unknown.push(token);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    (phonemes, unknown)
}

/// Takes the longest known phoneme prefixing `rest`, pruning phonemes that no
/// longer occur anywhere in the remainder.
fn consume<'a>(known: &mut Vec<&'a str>, rest: &str) -> Option<&'a str> {
    let mut found: Option<&'a str> = None;
    for &ph in known.iter() {
        if rest.starts_with(ph) {
            found = Some(ph);
            break;
        }
    }
    known.retain(|ph| rest.contains(ph));
    found
}
