//! Length-aware sentence segmentation for streaming TTS.
//!
//! Long input text is cut at sentence punctuation and the resulting
//! fragments are merged back together until each chunk carries enough
//! "meaningful" characters to be worth a synthesis call. The Chinese and
//! Latin variants are two configurations of the same boundary scanner.

/// Minimum meaningful-character count per Chinese chunk.
pub const ZH_MIN_SENTENCE_LENGTH: usize = 5;
/// Minimum meaningful-character count per Latin-script chunk.
pub const EN_MIN_SENTENCE_LENGTH: usize = 15;
/// Relaxed minimum for the very first Latin-script chunk. A shorter first
/// chunk reaches the synthesizer sooner and cuts perceived latency.
pub const EN_MIN_FIRST_SENTENCE_LENGTH: usize = 10;

/// Sentence terminators for Chinese text (full-width and half-width).
const ZH_TERMINATORS: &str = "，。！？…,.?!";
/// Standard sentence terminators for Latin-script text.
const EN_TERMINATORS: &str = ".!?";
/// Terminators accepted for the first Latin-script chunk only. Includes
/// comma and semicolon for a quicker first split.
const EN_FIRST_TERMINATORS: &str = ",.!?;";
/// Punctuation that may trail a terminator, like quotes or brackets.
const CLOSING_PUNCTUATION: &str = "\"'`\u{201D}\u{2019})}]";

fn is_meaningful_zh(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)          // CJK ideographs
        || c.is_ascii_alphanumeric()
        || ('\u{FF21}'..='\u{FF3A}').contains(&c)   // full-width A-Z
        || ('\u{FF41}'..='\u{FF5A}').contains(&c)   // full-width a-z
        || ('\u{FF10}'..='\u{FF19}').contains(&c)   // full-width 0-9
}

fn is_meaningful_latin(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Splitter tuning for one script. Constructed once and passed into
/// [`SentenceSplitter::new`]; nothing here is process-wide state.
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    /// Characters that end a sentence.
    pub terminators: &'static str,
    /// Wider terminator set used only while searching for the first chunk.
    pub first_terminators: Option<&'static str>,
    /// Characters allowed to trail a terminator run (quotes, brackets).
    pub closing: &'static str,
    /// Minimum chunk weight for the merge pass.
    pub min_len: usize,
    /// Relaxed weight threshold for the first chunk.
    pub first_min_len: Option<usize>,
    /// Re-insert a space when concatenating fragments (word-spaced scripts).
    pub join_with_space: bool,
    /// Predicate deciding which characters count towards a chunk's weight.
    pub is_meaningful: fn(char) -> bool,
}

impl SplitConfig {
    /// Configuration for Chinese text: one merge pass, no first-chunk
    /// relaxation, fragments concatenate without spaces.
    pub fn chinese() -> Self {
        Self {
            terminators: ZH_TERMINATORS,
            first_terminators: None,
            closing: "",
            min_len: ZH_MIN_SENTENCE_LENGTH,
            first_min_len: None,
            join_with_space: false,
            is_meaningful: is_meaningful_zh,
        }
    }

    /// Configuration for Latin-script text: relaxed first chunk, higher
    /// merge threshold, fragments re-join with a space.
    pub fn latin() -> Self {
        Self {
            terminators: EN_TERMINATORS,
            first_terminators: Some(EN_FIRST_TERMINATORS),
            closing: CLOSING_PUNCTUATION,
            min_len: EN_MIN_SENTENCE_LENGTH,
            first_min_len: Some(EN_MIN_FIRST_SENTENCE_LENGTH),
            join_with_space: true,
            is_meaningful: is_meaningful_latin,
        }
    }
}

/// Splits long text into utterance-sized chunks for incremental synthesis.
pub struct SentenceSplitter {
    config: SplitConfig,
}

impl SentenceSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn chinese() -> Self {
        Self::new(SplitConfig::chinese())
    }

    pub fn latin() -> Self {
        Self::new(SplitConfig::latin())
    }

    /// Count the characters that carry pronunciation weight. Punctuation
    /// and whitespace contribute nothing.
    pub fn weight(&self, text: &str) -> usize {
        text.chars().filter(|&c| (self.config.is_meaningful)(c)).count()
    }

    /// Split `text` into ordered chunks. Every chunk except possibly the
    /// last meets the configured minimum weight; no text is dropped.
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let mut result = Vec::new();
        let remainder = match self.take_first_chunk(text) {
            Some((first, rest)) => {
                result.push(first);
                rest
            }
            None => text.to_string(),
        };

        let raw = scan_chunks(&remainder, self.config.terminators, self.config.closing);
        result.extend(self.merge(raw));
        result
    }

    /// Latin-only relaxed pass: accept the earliest boundary (on the wider
    /// terminator set) whose prefix already meets the relaxed threshold.
    /// Returns the first chunk and the untouched remainder, or `None` when
    /// no prefix qualifies.
    fn take_first_chunk(&self, text: &str) -> Option<(String, String)> {
        let first_terms = self.config.first_terminators?;
        let first_min = self.config.first_min_len?;

        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if !first_terms.contains(chars[i]) {
                i += 1;
                continue;
            }
            let mut end = i;
            while end + 1 < chars.len() && first_terms.contains(chars[end + 1]) {
                end += 1;
            }
            while end + 1 < chars.len() && self.config.closing.contains(chars[end + 1]) {
                end += 1;
            }
            while end + 1 < chars.len() && chars[end + 1].is_whitespace() {
                end += 1;
            }
            let candidate: String = chars[..=end].iter().collect();
            if self.weight(&candidate) >= first_min {
                let rest: String = chars[end + 1..].iter().collect();
                return Some((candidate.trim().to_string(), rest.trim().to_string()));
            }
            i = end + 1;
        }
        None
    }

    /// Merge raw fragments in order, flushing the buffer once it carries
    /// enough weight. A trailing under-weight buffer is appended to the
    /// previous chunk instead of being emitted (or dropped) on its own.
    fn merge(&self, raw: Vec<String>) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for fragment in raw {
            if buffer.is_empty() {
                buffer = fragment;
            } else if self.config.join_with_space {
                buffer.push(' ');
                buffer.push_str(fragment.trim_start());
            } else {
                buffer.push_str(&fragment);
            }
            if self.weight(&buffer) >= self.config.min_len {
                merged.push(std::mem::take(&mut buffer));
            }
        }

        if !buffer.is_empty() {
            if let Some(last) = merged.last_mut() {
                if self.config.join_with_space {
                    last.push(' ');
                }
                last.push_str(&buffer);
            } else {
                merged.push(buffer);
            }
        }

        merged
    }
}

/// Cut `text` after every terminator run (plus trailing closing punctuation
/// and whitespace). The unterminated tail becomes a final fragment.
fn scan_chunks(text: &str, terminators: &str, closing: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut current = String::new();

    let mut i = 0;
    while i < chars.len() {
        current.push(chars[i]);
        if terminators.contains(chars[i]) {
            while i + 1 < chars.len() && terminators.contains(chars[i + 1]) {
                i += 1;
                current.push(chars[i]);
            }
            while i + 1 < chars.len() && closing.contains(chars[i + 1]) {
                i += 1;
                current.push(chars[i]);
            }
            while i + 1 < chars.len() && chars[i + 1].is_whitespace() {
                i += 1;
                current.push(chars[i]);
            }
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
            current.clear();
        }
        i += 1;
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace() {
        assert!(SentenceSplitter::chinese().split("").is_empty());
        assert!(SentenceSplitter::chinese().split("   \t\n  ").is_empty());
        assert!(SentenceSplitter::latin().split("").is_empty());
        assert!(SentenceSplitter::latin().split("   ").is_empty());
    }

    #[test]
    fn test_no_terminator_single_chunk() {
        let result = SentenceSplitter::latin()
            .split("This is a single long sentence without any ending punctuation");
        assert_eq!(
            result,
            vec!["This is a single long sentence without any ending punctuation"]
        );

        let result = SentenceSplitter::chinese().split("今天天气真的非常好");
        assert_eq!(result, vec!["今天天气真的非常好"]);
    }

    #[test]
    fn test_chinese_short_sentences_merge() {
        // Both sentences are below the length-5 minimum, so they merge.
        let result = SentenceSplitter::chinese().split("你好。世界！");
        assert_eq!(result, vec!["你好。世界！"]);
    }

    #[test]
    fn test_chinese_long_sentences_stay_separate() {
        let result = SentenceSplitter::chinese().split("今天的天气真不错。我们一起出去走走吧！");
        assert_eq!(result, vec!["今天的天气真不错。", "我们一起出去走走吧！"]);
    }

    #[test]
    fn test_chinese_trailing_fragment_joins_previous() {
        // The final "好。" is under weight and must be appended to the
        // previous chunk rather than emitted alone.
        let result = SentenceSplitter::chinese().split("今天的天气真不错。好。");
        assert_eq!(result, vec!["今天的天气真不错。好。"]);
    }

    #[test]
    fn test_chinese_mixed_width_punctuation() {
        let result = SentenceSplitter::chinese().split("第一句话说完了.第二句话也说完了!");
        assert_eq!(result, vec!["第一句话说完了.", "第二句话也说完了!"]);
    }

    #[test]
    fn test_latin_first_chunk_comma_split() {
        let result = SentenceSplitter::latin().split(
            "Hello there, this is a test to see how the initial splitting works. The rest of the text follows after it.",
        );
        assert_eq!(result[0], "Hello there,");
        assert!(result.len() >= 2);
    }

    #[test]
    fn test_latin_first_comma_too_short() {
        // "Yes," carries only three meaningful characters, so the relaxed
        // pass must skip it and accept the full first sentence instead.
        let result = SentenceSplitter::latin()
            .split("Yes, but this entire sentence is the one. It should not split after yes.");
        assert_eq!(result[0], "Yes, but this entire sentence is the one.");
    }

    #[test]
    fn test_latin_merges_short_sentences() {
        let splitter = SentenceSplitter::latin();
        let result = splitter.split("Yes. No. Maybe. I don't know. Let's think about it.");
        // The relaxed pass soaks up the leading one-word sentences.
        assert_eq!(result[0], "Yes. No. Maybe.");
        assert!(splitter.weight(&result[0]) >= EN_MIN_FIRST_SENTENCE_LENGTH);
        // Everything after the first chunk obeys the standard threshold,
        // except possibly the terminal fragment.
        for chunk in &result[1..result.len().saturating_sub(1)] {
            assert!(splitter.weight(chunk) >= EN_MIN_SENTENCE_LENGTH);
        }
    }

    #[test]
    fn test_latin_quote_after_terminator() {
        let result = SentenceSplitter::latin()
            .split("She said \"I will be there tomorrow.\" Then she left without another word.");
        assert!(result[0].ends_with('"'));
    }

    #[test]
    fn test_punctuation_only_does_not_panic() {
        let result = SentenceSplitter::latin().split(".?!,;...");
        // Zero-weight input is preserved verbatim, never dropped or panicked on.
        assert_eq!(result, vec![".?!,;..."]);
    }

    #[test]
    fn test_no_character_loss() {
        let splitter = SentenceSplitter::chinese();
        let input = "春眠不觉晓，处处闻啼鸟。夜来风雨声，花落知多少。";
        let chunks = splitter.split(input);
        let rejoined: String = chunks.concat();
        assert_eq!(rejoined, input);
    }

    #[test]
    fn test_latin_min_threshold_holds() {
        let splitter = SentenceSplitter::latin();
        let chunks = splitter.split(
            "First, we need to gather the requirements. Second, we design the system. Third, we implement it.",
        );
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                splitter.weight(chunk) >= EN_MIN_FIRST_SENTENCE_LENGTH,
                "chunk below threshold: {}",
                chunk
            );
        }
    }
}
