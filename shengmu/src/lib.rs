//! Text front-end for GPT-SoVITS style speech synthesis.
//!
//! Turns raw written text into utterance-sized chunks for incremental
//! synthesis, and turns Chinese text into a phoneme-id sequence aligned
//! row-for-row with contextual embedding vectors from an external
//! RoBERTa-style encoder.
//!
//! The pieces compose left to right: [`text::segmentation`] cuts text
//! into chunks, [`text::g2p`] decomposes each Chinese character into
//! pinyin phonemes, [`text::symbols`] maps phonemes to ids with a total
//! UNK-fallback lookup, and [`text::align`] expands per-character
//! encoder embeddings onto the phoneme sequence. [`text::frontend`]
//! wires them together.

pub mod onn;
pub mod text;
pub mod utils;

pub use onn::TextEncoder;
pub use text::align::{AlignConfig, TARGET_FEATURE_DIM};
pub use text::frontend::{chinese_to_phones, phones_and_features, split_auto};
pub use text::segmentation::{SentenceSplitter, SplitConfig};
