//! Configuration management for the shuo CLI
//!
//! Configuration priority (highest to lowest):
//! 1. Command line arguments
//! 2. Config file specified via --config flag
//! 3. Environment variables (SHUO_*)
//! 4. Local config file (./config.toml)
//! 5. Global config file ($XDG_CONFIG_HOME/shuo/config.toml or ~/.config/shuo/config.toml)

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Script routing for the splitter: "auto", "zh" or "en"
    pub language: String,

    /// Directory for generated output files (.npy matrices)
    pub output_dir: String,

    /// Path to a directory holding the encoder model.onnx + tokenizer.json
    /// (optional, defaults to the per-user cache with on-demand download)
    pub encoder_dir: Option<String>,

    /// Rewrite Arabic digits as Chinese numerals before G2P
    pub normalize: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            output_dir: "tmp".to_string(),
            encoder_dir: None,
            normalize: false,
        }
    }
}

/// Get the XDG config directory ($XDG_CONFIG_HOME or ~/.config)
/// Checks environment variable first on all platforms
pub fn xdg_config_home() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    // Fallback to ~/.config on all platforms
    dirs::home_dir()
        .map(|h| h.join(".config"))
        .unwrap_or_else(|| PathBuf::from(".config"))
}

impl AppConfig {
    /// Get the global config directory path for shuo
    pub fn global_config_dir() -> PathBuf {
        xdg_config_home().join("shuo")
    }

    /// Get the global config file path
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Get the local config file path (current directory)
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Load configuration with proper priority chain
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Start with defaults (lowest priority)
        builder = builder.add_source(config::File::from_str(
            include_str!("default_config.toml"),
            config::FileFormat::Toml,
        ));

        // Global config file
        let global_path = Self::global_config_path();
        if global_path.exists() {
            builder = builder.add_source(File::from(global_path).required(false));
        }

        // Local config file (./config.toml)
        let local_path = Self::local_config_path();
        if local_path.exists() {
            builder = builder.add_source(File::from(local_path).required(false));
        }

        // Environment variables (SHUO_*)
        builder = builder.add_source(
            Environment::with_prefix("SHUO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Config file specified via --config flag (highest priority)
        if let Some(config_path) = config_file {
            let expanded = expand_path(config_path);
            builder = builder.add_source(File::with_name(&expanded).required(true));
        }

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Ensure the global config directory exists and create default config if needed
    pub fn ensure_config_exists() -> std::io::Result<()> {
        let config_dir = Self::global_config_dir();
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            std::fs::write(&config_path, include_str!("default_config.toml"))?;
            eprintln!("Created default config at: {}", config_path.display());
        }
        Ok(())
    }

    /// Get the output path for a given filename
    pub fn output_path(&self, filename: &str) -> String {
        let expanded_dir = expand_path(&self.output_dir);
        format!("{}/{}", expanded_dir, filename)
    }

    /// Print the current configuration paths (useful for debugging)
    pub fn print_paths() {
        eprintln!("Configuration paths:");
        eprintln!("  Config dir:  {}", Self::global_config_dir().display());
        eprintln!("  Config file: {}", Self::global_config_path().display());
        eprintln!("  Local file:  {}", Self::local_config_path().display());
    }
}

/// Expand shell-like paths (~ and environment variables)
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.language, "auto");
        assert_eq!(config.output_dir, "tmp");
        assert!(config.encoder_dir.is_none());
        assert!(!config.normalize);
    }

    #[test]
    fn test_expand_path() {
        // Test that ~ expansion works
        let expanded = expand_path("~/test");
        assert!(!expanded.starts_with('~'));
    }
}
