//! Phoneme/feature alignment.
//!
//! The encoder emits one embedding row per token, with the first and last
//! rows reserved for the sequence-start and sequence-end markers. The
//! phonemizer emits one or two phonemes per character. Alignment walks
//! both sequences in step: each character claims the next interior
//! embedding row and repeats it once per phoneme it produced, so the
//! output matrix always has exactly one row per phoneme. Once the interior
//! rows run out (tokenization artifacts can make the token count disagree
//! with the character count), the last valid interior row is reused
//! instead of advancing.

use ndarray::{s, Array2, ArrayView2};

/// Fixed feature width of the aligned output matrix. Narrower encoder
/// outputs are zero-padded, wider ones truncated.
pub const TARGET_FEATURE_DIM: usize = 1024;

/// Alignment tuning, passed in explicitly rather than read from globals.
#[derive(Debug, Clone, Copy)]
pub struct AlignConfig {
    pub target_dim: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            target_dim: TARGET_FEATURE_DIM,
        }
    }
}

/// Expand per-token embeddings onto the phoneme sequence.
///
/// `word2ph[i]` is the phoneme count of the i-th character; `embeddings`
/// is the raw encoder output including both boundary-marker rows. The
/// result has `sum(word2ph)` rows of exactly `config.target_dim` columns.
/// Degenerate inputs (fewer than two embedding rows) yield zero vectors
/// rather than an error.
pub fn align_features(
    word2ph: &[usize],
    embeddings: ArrayView2<'_, f32>,
    config: &AlignConfig,
) -> Array2<f32> {
    let total: usize = word2ph.iter().sum();
    let mut aligned = Array2::<f32>::zeros((total, config.target_dim));

    let rows = embeddings.nrows();
    if rows < 2 {
        return aligned;
    }

    let copy_width = embeddings.ncols().min(config.target_dim);
    let mut cursor = 1; // skip the sequence-start marker
    let mut out_row = 0;

    for &count in word2ph {
        // Interior rows are [1, rows - 1); past that, fall back to the
        // second-to-last row (the last valid interior one) and stop
        // advancing.
        let src = if cursor < rows - 1 {
            let row = cursor;
            cursor += 1;
            row
        } else {
            rows - 2
        };

        let source = embeddings.row(src);
        for _ in 0..count {
            aligned
                .row_mut(out_row)
                .slice_mut(s![..copy_width])
                .assign(&source.slice(s![..copy_width]));
            out_row += 1;
        }
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Embedding matrix whose row r is filled with the value r, making
    /// row provenance visible in assertions.
    fn numbered_embeddings(rows: usize, cols: usize) -> Array2<f32> {
        Array2::from_shape_fn((rows, cols), |(r, _)| r as f32)
    }

    #[test]
    fn test_row_count_matches_phoneme_count() {
        let emb = numbered_embeddings(6, 8); // markers + 4 interior rows
        let word2ph = [2, 1, 2, 2];
        let cfg = AlignConfig { target_dim: 8 };
        let aligned = align_features(&word2ph, emb.view(), &cfg);
        assert_eq!(aligned.nrows(), 7);
        assert_eq!(aligned.ncols(), 8);
    }

    #[test]
    fn test_rows_repeat_per_character() {
        let emb = numbered_embeddings(4, 4); // markers + interior rows 1, 2
        let word2ph = [2, 2];
        let cfg = AlignConfig { target_dim: 4 };
        let aligned = align_features(&word2ph, emb.view(), &cfg);
        // First character repeats interior row 1, second repeats row 2.
        assert_eq!(aligned[[0, 0]], 1.0);
        assert_eq!(aligned[[1, 0]], 1.0);
        assert_eq!(aligned[[2, 0]], 2.0);
        assert_eq!(aligned[[3, 0]], 2.0);
    }

    #[test]
    fn test_cursor_overrun_reuses_last_interior_row() {
        // Three characters but only one interior row: the second and third
        // fall back to the second-to-last row without advancing.
        let emb = numbered_embeddings(3, 4);
        let word2ph = [1, 1, 2];
        let cfg = AlignConfig { target_dim: 4 };
        let aligned = align_features(&word2ph, emb.view(), &cfg);
        assert_eq!(aligned.nrows(), 4);
        for row in 0..4 {
            assert_eq!(aligned[[row, 0]], 1.0);
        }
    }

    #[test]
    fn test_narrow_embeddings_zero_padded() {
        let emb = numbered_embeddings(4, 8);
        let word2ph = [1];
        let cfg = AlignConfig { target_dim: 16 };
        let aligned = align_features(&word2ph, emb.view(), &cfg);
        assert_eq!(aligned.ncols(), 16);
        assert_eq!(aligned[[0, 7]], 1.0);
        assert_eq!(aligned[[0, 8]], 0.0);
        assert_eq!(aligned[[0, 15]], 0.0);
    }

    #[test]
    fn test_wide_embeddings_truncated() {
        let emb = numbered_embeddings(4, 32);
        let word2ph = [1, 1];
        let cfg = AlignConfig { target_dim: 16 };
        let aligned = align_features(&word2ph, emb.view(), &cfg);
        assert_eq!(aligned.ncols(), 16);
        assert_eq!(aligned[[0, 15]], 1.0);
    }

    #[test]
    fn test_default_width_is_fixed_regardless_of_native_width() {
        let cfg = AlignConfig::default();
        for native in [768, 2048] {
            let emb = numbered_embeddings(5, native);
            let aligned = align_features(&[2, 1, 2], emb.view(), &cfg);
            assert_eq!(aligned.ncols(), 1024);
            assert_eq!(aligned.nrows(), 5);
        }
    }

    #[test]
    fn test_degenerate_embeddings_yield_zeros() {
        let emb = Array2::<f32>::zeros((0, 0));
        let word2ph = [1, 2];
        let cfg = AlignConfig::default();
        let aligned = align_features(&word2ph, emb.view(), &cfg);
        assert_eq!(aligned.nrows(), 3);
        assert_eq!(aligned.ncols(), TARGET_FEATURE_DIM);
    }

    #[test]
    fn test_empty_word2ph_yields_empty_matrix() {
        let emb = numbered_embeddings(4, 8);
        let cfg = AlignConfig::default();
        let aligned = align_features(&[], emb.view(), &cfg);
        assert_eq!(aligned.nrows(), 0);
    }
}
