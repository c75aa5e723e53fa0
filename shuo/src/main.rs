use clap::{Parser, Subcommand};
use shengmu::onn::ort_bert::OrtBert;
use shengmu::text::frontend;
use shengmu::text::g2p;
use shengmu::text::normalize::spell_out_numbers;
use shengmu::text::segmentation::SentenceSplitter;
use shengmu::utils::resources::ensure_encoder_available;
use shengmu::AlignConfig;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

mod config;
use config::{expand_path, AppConfig};

#[derive(Subcommand, Debug, Clone)]
enum Mode {
    /// Split text into utterance-sized chunks, one per line
    #[command(alias = "s")]
    Split {
        /// Text to split
        text: String,
    },

    /// Print the phoneme symbols for a Chinese text
    #[command(alias = "p")]
    Phonemes {
        /// Chinese text to convert
        text: String,
    },

    /// Print the phoneme ids for a Chinese text
    #[command(alias = "i")]
    Ids {
        /// Chinese text to convert
        text: String,
    },

    /// Compute phoneme ids plus the aligned encoder feature matrix
    #[command(alias = "f")]
    Features {
        /// Chinese text to convert
        text: String,

        /// Path to write the aligned feature matrix as .npy
        /// Default: {output_dir}/features.npy (from config)
        #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
        save_path: Option<String>,
    },

    /// Read stdin to completion, split it and write one chunk per line
    #[command(aliases = ["stdin", "-"])]
    Pipe,

    /// Show configuration paths and current settings
    #[command(name = "config", alias = "cfg")]
    Config {
        /// Show all configuration paths
        #[arg(long)]
        paths: bool,

        /// Initialize config file in global config directory
        #[arg(long)]
        init: bool,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "shuo")]
#[command(version)]
#[command(author = "Tommy Falkowski")]
#[command(about = "Text front-end CLI for GPT-SoVITS style speech synthesis")]
#[command(after_help = "Configuration files are loaded from (highest to lowest priority):
  1. --config <file>
  2. Environment variables (SHUO_*)
  3. ./config.toml (local)
  4. $XDG_CONFIG_HOME/shuo/config.toml (global)

Run 'shuo config --paths' to see configuration paths.
Run 'shuo config --init' to create a default config file.")]
struct Cli {
    /// Path to a custom config file (highest priority)
    #[arg(short = 'c', long = "config", value_name = "CONFIG_FILE", global = true)]
    config_file: Option<String>,

    /// Script routing for the splitter: auto, zh or en
    #[arg(short = 'l', long = "lan", value_name = "LANGUAGE", global = true)]
    lan: Option<String>,

    /// Path to a directory with the encoder model.onnx and tokenizer.json
    /// (optional, defaults to the per-user cache with on-demand download)
    #[arg(short = 'e', long = "encoder", value_name = "ENCODER_DIR", global = true)]
    encoder_dir: Option<String>,

    /// Rewrite Arabic digits as Chinese numerals before G2P
    #[arg(short = 'n', long = "normalize", global = true)]
    normalize: bool,

    #[command(subcommand)]
    mode: Mode,
}

fn split_for_language(text: &str, lan: &str) -> Vec<String> {
    match lan {
        "zh" => SentenceSplitter::chinese().split(text),
        "en" => SentenceSplitter::latin().split(text),
        _ => frontend::split_auto(text),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let cli = Cli::parse();

        // Handle config subcommand first (doesn't need anything loaded)
        if let Mode::Config { paths, init } = &cli.mode {
            if *paths {
                AppConfig::print_paths();
            }
            if *init {
                if let Err(e) = AppConfig::ensure_config_exists() {
                    eprintln!("Failed to create config: {}", e);
                    std::process::exit(1);
                }
            }
            if !*paths && !*init {
                AppConfig::print_paths();
                println!();
                match AppConfig::load(cli.config_file.as_deref()) {
                    Ok(config) => {
                        println!("Current configuration:");
                        println!("  language: {}", config.language);
                        println!("  output_dir: {}", config.output_dir);
                        println!("  normalize: {}", config.normalize);
                        println!(
                            "  encoder_dir: {}",
                            config.encoder_dir.as_deref().unwrap_or("(cache)")
                        );
                    }
                    Err(e) => {
                        eprintln!("Failed to load config: {}", e);
                    }
                }
            }
            return Ok(());
        }

        // Load configuration (CLI args override these)
        let app_config = match AppConfig::load(cli.config_file.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default configuration.");
                AppConfig::default()
            }
        };

        let lan = cli.lan.clone().unwrap_or_else(|| app_config.language.clone());
        let encoder_dir = cli.encoder_dir.clone().or_else(|| app_config.encoder_dir.clone());
        let normalize = cli.normalize || app_config.normalize;

        let prepare = |text: &str| -> String {
            if normalize {
                spell_out_numbers(text)
            } else {
                text.to_string()
            }
        };

        match cli.mode {
            Mode::Split { text } => {
                for chunk in split_for_language(&text, &lan) {
                    println!("{}", chunk);
                }
            }

            Mode::Phonemes { text } => {
                let seq = g2p::g2p(&prepare(&text));
                println!("{}", seq.phones.join(" "));
            }

            Mode::Ids { text } => {
                let ids = frontend::chinese_to_phones(&prepare(&text));
                let rendered: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                println!("{}", rendered.join(" "));
            }

            Mode::Features { text, save_path } => {
                let model_dir = ensure_encoder_available(encoder_dir.as_deref()).await?;
                let encoder = OrtBert::new(&model_dir)?;

                let text = prepare(&text);
                let (ids, features) =
                    frontend::phones_and_features(&text, &encoder, &AlignConfig::default())?;

                println!("phoneme ids: {} entries", ids.shape()[1]);
                println!(
                    "aligned features: {} x {}",
                    features.shape()[0],
                    features.shape()[1]
                );

                let save_path = save_path
                    .map(|p| expand_path(&p))
                    .unwrap_or_else(|| app_config.output_path("features.npy"));
                if let Some(parent) = Path::new(&save_path).parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                ndarray_npy::write_npy(&save_path, &features)?;
                println!("Wrote {}", save_path);
            }

            Mode::Pipe => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                for chunk in split_for_language(&buffer, &lan) {
                    println!("{}", chunk);
                }
            }

            // Handled before configuration is loaded.
            Mode::Config { .. } => {}
        }

        Ok(())
    })
}
