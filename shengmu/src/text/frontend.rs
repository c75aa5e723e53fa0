//! Front-end entry points: language routing for the splitter and the
//! combined phoneme-id / aligned-feature pipeline for Chinese text.

use ndarray::Array2;

use crate::onn::TextEncoder;
use crate::text::align::{align_features, AlignConfig};
use crate::text::g2p;
use crate::text::segmentation::SentenceSplitter;
use crate::text::symbols::MANDARIN_SYMBOLS;

/// Check if text contains Chinese characters.
pub fn text_is_chinese(text: &str) -> bool {
    text.chars().any(|c| {
        let cp = c as u32;
        (0x4E00..=0x9FFF).contains(&cp) ||  // CJK Unified Ideographs
        (0x3400..=0x4DBF).contains(&cp) ||  // CJK Extension A
        (0x3000..=0x303F).contains(&cp) // CJK Punctuation
    })
}

/// Decide which splitter variant fits the text: CJK character inspection
/// first, then statistical detection as a fallback for short or ambiguous
/// inputs.
pub fn detect_script(text: &str) -> &'static str {
    if text_is_chinese(text) {
        return "zh";
    }
    let trimmed = text.trim();
    // Very short texts make detection unreliable; default to Latin.
    if trimmed.chars().count() < 10 {
        return "en";
    }
    match whatlang::detect(trimmed) {
        Some(info) if info.lang() == whatlang::Lang::Cmn => "zh",
        _ => "en",
    }
}

/// Split text into utterance chunks, routing to the Chinese or Latin
/// splitter by detected script.
pub fn split_auto(text: &str) -> Vec<String> {
    match detect_script(text) {
        "zh" => SentenceSplitter::chinese().split(text),
        _ => SentenceSplitter::latin().split(text),
    }
}

/// Convert Chinese text straight to phoneme ids. Symbols outside the
/// vocabulary resolve to the UNK id, so this never fails.
pub fn chinese_to_phones(text: &str) -> Vec<i64> {
    g2p::g2p(text)
        .phones
        .iter()
        .map(|ph| MANDARIN_SYMBOLS.resolve(ph))
        .collect()
}

/// Produce the phoneme-id sequence and the phoneme-aligned feature matrix
/// for Chinese text. The id array is shaped `1 x N`; the feature matrix is
/// `N x target_dim` with one row per phoneme, whatever the encoder's token
/// count turned out to be.
pub fn phones_and_features(
    text: &str,
    encoder: &dyn TextEncoder,
    config: &AlignConfig,
) -> Result<(Array2<i64>, Array2<f32>), Box<dyn std::error::Error>> {
    let seq = g2p::g2p(text);
    let ids: Vec<i64> = seq
        .phones
        .iter()
        .map(|ph| MANDARIN_SYMBOLS.resolve(ph))
        .collect();

    let embeddings = encoder.encode(text)?;
    let features = align_features(&seq.word2ph, embeddings.view(), config);

    let ids = Array2::from_shape_vec((1, seq.phones.len()), ids)?;
    Ok((ids, features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    struct FixedEncoder {
        rows: usize,
        cols: usize,
    }

    impl TextEncoder for FixedEncoder {
        fn encode(&self, _text: &str) -> Result<Array2<f32>, Box<dyn std::error::Error>> {
            Ok(Array2::from_shape_fn((self.rows, self.cols), |(r, _)| {
                r as f32
            }))
        }
    }

    #[test]
    fn test_text_is_chinese() {
        assert!(text_is_chinese("你好"));
        assert!(text_is_chinese("hello 世界"));
        assert!(!text_is_chinese("hello world"));
    }

    #[test]
    fn test_detect_script() {
        assert_eq!(detect_script("今天天气很好"), "zh");
        assert_eq!(detect_script("The weather is lovely today."), "en");
        assert_eq!(detect_script("hi"), "en");
    }

    #[test]
    fn test_split_auto_routes_by_script() {
        let zh = split_auto("今天的天气真不错。我们一起出去走走吧！");
        assert_eq!(zh.len(), 2);
        let en = split_auto("This is a proper English sentence for the splitter to chew on.");
        assert_eq!(en.len(), 1);
    }

    #[test]
    fn test_chinese_to_phones_empty() {
        assert!(chinese_to_phones("").is_empty());
    }

    #[test]
    fn test_chinese_to_phones_known_symbols() {
        let ids = chinese_to_phones("你好");
        assert_eq!(ids.len(), 4);
        let unk = MANDARIN_SYMBOLS.unk_id();
        assert!(ids.iter().all(|&id| id != unk));
    }

    #[test]
    fn test_unknown_passthrough_maps_to_unk() {
        // The snowman has no romanization and is not in the vocabulary.
        let ids = chinese_to_phones("☃");
        assert_eq!(ids, vec![MANDARIN_SYMBOLS.unk_id()]);
    }

    #[test]
    fn test_phones_and_features_alignment_invariant() {
        let encoder = FixedEncoder { rows: 9, cols: 8 };
        let cfg = AlignConfig { target_dim: 16 };
        let (ids, features) = phones_and_features("你好世界", &encoder, &cfg).unwrap();
        assert_eq!(ids.shape(), &[1, 8]);
        assert_eq!(features.shape(), &[8, 16]);
    }

    #[test]
    fn test_phones_and_features_with_short_encoder_output() {
        // Fewer usable encoder tokens than characters: alignment falls
        // back instead of truncating or failing.
        let encoder = FixedEncoder { rows: 3, cols: 8 };
        let cfg = AlignConfig { target_dim: 16 };
        let (ids, features) = phones_and_features("你好世界", &encoder, &cfg).unwrap();
        assert_eq!(ids.shape()[1], features.shape()[0]);
    }
}
