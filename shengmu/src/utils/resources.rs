//! Encoder resource resolution.
//!
//! The contextual encoder lives in one directory holding `model.onnx`
//! and `tokenizer.json`. Resolution order: explicit path, then the
//! environment override, then the per-user cache (downloaded on demand
//! from the Hugging Face hub). Required paths that are missing fail fast
//! with a descriptive error; nothing is resolved lazily mid-call.

use std::path::{Path, PathBuf};

use dirs::cache_dir;
use hf_hub::api::tokio::Api;

/// Hugging Face repository the encoder is fetched from.
const HF_ENCODER_REPO: &str = "hfl/chinese-roberta-wwm-ext";
/// Files fetched from the repository, with the cached name each lands
/// under inside the encoder directory.
const ENCODER_FILES: &[(&str, &str)] = &[
    ("onnx/model.onnx", "model.onnx"),
    ("tokenizer.json", "tokenizer.json"),
];

/// Environment variable overriding the encoder directory.
pub const ENCODER_DIR_ENV: &str = "SHENGMU_ENCODER_DIR";

/// Fail fast when a required resource path is missing, naming the path
/// and the remediation.
pub fn ensure_exists(path: &Path, name: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if path.exists() {
        return Ok(());
    }
    Err(format!(
        "Required directory or file '{}' was not found at: {}\n\
         Run `shuo features` once with network access to download the pretrained encoder, \
         or set the {} environment variable to a directory containing model.onnx and tokenizer.json.",
        name,
        path.display(),
        ENCODER_DIR_ENV
    )
    .into())
}

/// Per-user cache directory the encoder is downloaded into.
pub fn get_encoder_cache_dir() -> PathBuf {
    cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shengmu")
        .join("encoder")
}

/// Resolve the encoder directory without touching the network. Explicit
/// and environment-supplied paths must already exist.
pub fn resolve_encoder_dir(
    custom_path: Option<&str>,
) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(path) = custom_path {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(format!("Custom encoder path does not exist: {}", path.display()).into());
        }
        return Ok(path);
    }

    if let Ok(dir) = std::env::var(ENCODER_DIR_ENV) {
        let path = PathBuf::from(dir);
        ensure_exists(&path, ENCODER_DIR_ENV)?;
        return Ok(path);
    }

    Ok(get_encoder_cache_dir())
}

/// Ensure the encoder files are present, downloading into the cache when
/// the resolved directory is the cache and files are missing. Returns the
/// directory to load the encoder from.
pub async fn ensure_encoder_available(
    custom_path: Option<&str>,
) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    let dir = resolve_encoder_dir(custom_path)?;

    // Explicit or environment-supplied directories are used as-is; only
    // the cache directory is populated on demand.
    if custom_path.is_some() || std::env::var(ENCODER_DIR_ENV).is_ok() {
        return Ok(dir);
    }

    let missing = ENCODER_FILES
        .iter()
        .any(|&(_, cached)| !dir.join(cached).exists());
    if !missing {
        println!("Using cached encoder: {}", dir.display());
        return Ok(dir);
    }

    println!("Downloading encoder from Hugging Face: {}", HF_ENCODER_REPO);
    std::fs::create_dir_all(&dir)?;
    let api = Api::new()?;
    let repo = api.model(HF_ENCODER_REPO.to_string());

    for &(remote, cached) in ENCODER_FILES {
        let target = dir.join(cached);
        if target.exists() {
            continue;
        }
        println!("   Fetching {}", remote);
        let fetched = repo.get(remote).await?;
        std::fs::copy(&fetched, &target)?;
    }

    println!("Encoder cached at: {}", dir.display());
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_exists_reports_path_and_remedy() {
        let err = ensure_exists(Path::new("/nonexistent/model.onnx"), "encoder model")
            .unwrap_err()
            .to_string();
        assert!(err.contains("/nonexistent/model.onnx"));
        assert!(err.contains("encoder model"));
        assert!(err.contains(ENCODER_DIR_ENV));
    }

    #[test]
    fn test_missing_custom_path_is_an_error() {
        let err = resolve_encoder_dir(Some("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here"));
    }
}
