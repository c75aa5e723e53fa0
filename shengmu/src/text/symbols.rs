//! Closed phoneme vocabulary and symbol-to-id resolution.
//!
//! The table is built once at startup from the Mandarin initial/final
//! inventory plus punctuation literals. Lookup is total: symbols outside
//! the vocabulary resolve to the `UNK` id instead of failing, so the
//! mapping step can never error out mid-synthesis.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::text::g2p::INITIALS;

/// Fallback symbol for anything outside the vocabulary.
pub const UNK_SYMBOL: &str = "UNK";

const PAD: &str = "_";
const SP: &str = "SP";

/// Punctuation literals that survive G2P as passthrough phonemes, in both
/// ASCII and full-width Chinese forms.
const PUNCTUATION: &[&str] = &[
    "!", "?", "…", ",", ".", "'", "-", ";", ":", " ", "！", "？", "，", "。", "、", "；", "：",
    "“", "”", "‘", "’", "（", "）", "《", "》", "「", "」", "【", "】",
];

/// Pinyin finals (toneless). Crossed with tones 1-5 to form the
/// tone-tagged final symbols.
const FINALS: &[&str] = &[
    "a", "ai", "an", "ang", "ao", "e", "ei", "en", "eng", "er", "i", "ia", "ian", "iang", "iao",
    "ie", "in", "ing", "iong", "iu", "o", "ong", "ou", "u", "ua", "uai", "uan", "uang", "ui",
    "un", "uo", "v", "van", "ve", "vn",
];

/// Total symbol-to-id mapping over a finite closed vocabulary.
pub struct SymbolTable {
    symbol_to_id: HashMap<String, i64>,
    unk_id: i64,
}

impl SymbolTable {
    /// Build the Mandarin vocabulary: pad, punctuation, initials,
    /// finals crossed with tones, then the trailing SP/UNK entries.
    pub fn mandarin() -> Self {
        let mut symbols: Vec<String> = Vec::new();
        symbols.push(PAD.to_string());
        symbols.extend(PUNCTUATION.iter().map(|s| s.to_string()));
        symbols.extend(INITIALS.iter().map(|s| s.to_string()));
        for final_part in FINALS {
            for tone in 1..=5 {
                symbols.push(format!("{}{}", final_part, tone));
            }
        }
        symbols.push(SP.to_string());
        symbols.push(UNK_SYMBOL.to_string());

        let symbol_to_id: HashMap<String, i64> = symbols
            .into_iter()
            .enumerate()
            .map(|(idx, symbol)| (symbol, idx as i64))
            .collect();
        let unk_id = symbol_to_id[UNK_SYMBOL];

        Self {
            symbol_to_id,
            unk_id,
        }
    }

    /// Map a symbol to its id, substituting the UNK id for anything
    /// outside the vocabulary. Never fails.
    pub fn resolve(&self, symbol: &str) -> i64 {
        self.symbol_to_id
            .get(symbol)
            .copied()
            .unwrap_or(self.unk_id)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_id.contains_key(symbol)
    }

    pub fn unk_id(&self) -> i64 {
        self.unk_id
    }

    pub fn len(&self) -> usize {
        self.symbol_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_to_id.is_empty()
    }
}

lazy_static! {
    /// Shared Mandarin vocabulary instance.
    pub static ref MANDARIN_SYMBOLS: SymbolTable = SymbolTable::mandarin();
}
