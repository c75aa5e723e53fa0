//! ONNX-backed contextual text encoder.
//!
//! Loads a RoBERTa-style model exported to ONNX plus its HuggingFace
//! tokenizer from one directory and exposes them as a [`TextEncoder`].
//! The tokenizer runs with special tokens enabled, so the output matrix
//! always carries the start/end marker rows the aligner expects.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tokenizers::Tokenizer;

use crate::onn::TextEncoder;
use crate::utils::resources;

/// Model file expected inside the encoder directory.
pub const ENCODER_MODEL_FILE: &str = "model.onnx";
/// Tokenizer file expected inside the encoder directory.
pub const ENCODER_TOKENIZER_FILE: &str = "tokenizer.json";

pub struct OrtBert {
    tokenizer: Tokenizer,
    session: Session,
}

impl OrtBert {
    /// Load the encoder from a directory holding `model.onnx` and
    /// `tokenizer.json`. Missing files fail fast with a descriptive
    /// error rather than surfacing later mid-inference.
    pub fn new(model_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let model_path = model_dir.join(ENCODER_MODEL_FILE);
        let tokenizer_path = model_dir.join(ENCODER_TOKENIZER_FILE);
        resources::ensure_exists(&model_path, "encoder model")
            .map_err(|e| e as Box<dyn std::error::Error>)?;
        resources::ensure_exists(&tokenizer_path, "encoder tokenizer")
            .map_err(|e| e as Box<dyn std::error::Error>)?;

        let tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| e as Box<dyn std::error::Error>)?;
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(&model_path)?;

        Ok(Self { tokenizer, session })
    }
}

impl TextEncoder for OrtBert {
    fn encode(&self, text: &str) -> Result<Array2<f32>, Box<dyn std::error::Error>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| e as Box<dyn std::error::Error>)?;
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&v| v as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&v| v as i64)
            .collect();
        let tokens = ids.len();

        let outputs = self.session.run(ort::inputs![
            "input_ids" => Tensor::from_array(([1, tokens], ids))?,
            "attention_mask" => Tensor::from_array(([1, tokens], mask))?
        ])?;

        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        let (rows, cols) = match dims.as_slice() {
            [1, rows, cols] => (*rows, *cols),
            [rows, cols] => (*rows, *cols),
            other => {
                return Err(format!("unexpected encoder output shape {:?}", other).into());
            }
        };

        Ok(Array2::from_shape_vec((rows, cols), data.to_vec())?)
    }
}
