//! Mandarin G2P (grapheme-to-phoneme) conversion.
//!
//! Every character gets one romanized reading from the pinyin lookup;
//! characters without a reading (punctuation, embedded Latin text) pass
//! through as literal phonemes. A romanized syllable decomposes into an
//! optional initial and a tone-tagged final, so one character yields one
//! or two phonemes.

use pinyin::ToPinyin;

/// Tone digit used when the romanization carries no explicit tone.
/// Neutral-tone syllables are normalized to tone five.
pub const NEUTRAL_TONE: char = '5';

/// Pinyin initials, two-letter clusters first so prefix matching is
/// longest-first. `y` and `w` count as initials per the non-strict
/// decomposition convention.
pub const INITIALS: &[&str] = &[
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r",
    "z", "c", "s", "y", "w",
];

/// Phoneme symbols for a text plus the per-character phoneme counts the
/// feature aligner consumes. `word2ph[i]` is how many entries of `phones`
/// the i-th input character produced.
#[derive(Debug, Default, Clone)]
pub struct PhonemeSequence {
    pub phones: Vec<String>,
    pub word2ph: Vec<usize>,
}

impl PhonemeSequence {
    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }
}

/// Split a bare (toneless) syllable into its initial and final parts.
/// The initial may be empty for vowel-onset syllables like "er".
pub fn split_syllable(syllable: &str) -> (&'static str, &str) {
    for &initial in INITIALS {
        if let Some(final_part) = syllable.strip_prefix(initial) {
            return (initial, final_part);
        }
    }
    ("", syllable)
}

/// Convert one romanized syllable with a trailing tone digit into its
/// phoneme symbols, appending them to `phones`. Returns how many symbols
/// were emitted.
fn push_syllable(phones: &mut Vec<String>, syllable_with_tone: &str) -> usize {
    let (base, tone) = match syllable_with_tone.chars().last() {
        Some(last) if last.is_ascii_digit() => {
            let tone = if last == '0' { NEUTRAL_TONE } else { last };
            (&syllable_with_tone[..syllable_with_tone.len() - 1], tone)
        }
        _ => (syllable_with_tone, NEUTRAL_TONE),
    };

    let (initial, final_part) = split_syllable(base);

    let mut emitted = 0;
    if !initial.is_empty() {
        phones.push(initial.to_string());
        emitted += 1;
    }
    if !final_part.is_empty() {
        phones.push(format!("{}{}", final_part, tone));
        emitted += 1;
    }
    emitted
}

/// Convert Chinese text into an ordered phoneme sequence, one entry of
/// `word2ph` per input character.
pub fn g2p(text: &str) -> PhonemeSequence {
    let mut seq = PhonemeSequence::default();

    for ch in text.chars() {
        let emitted = match ch.to_pinyin() {
            Some(p) => push_syllable(&mut seq.phones, p.with_tone_num_end()),
            None => {
                // No romanization: the character itself is the phoneme.
                seq.phones.push(ch.to_string());
                1
            }
        };
        seq.word2ph.push(emitted);
    }

    seq
}
