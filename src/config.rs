//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione dei due passaggi di manutenzione.
//!
//! ## Responsabilità:
//! - Definisce `ReplacerConfig` (sostituzione testi) e `OptimizerConfig` (immagini)
//! - Fornisce valori di default identici alle costanti storiche degli script
//! - Valida i parametri prima dell'esecuzione
//! - Supporta il caricamento da file JSON
//!
//! ## Preset immagini:
//! - `Preset::Webp` (default): `*.jpg` → WebP, lato lungo ≤ 1920, qualità 72, method 6
//! - `Preset::Jpeg`: 12 foto selezionate → JPEG, lato lungo ≤ 1600, qualità 74,
//!   orientamento EXIF applicato, report JSON dei byte risparmiati
//!
//! ## Esempio:
//! ```ignore
//! let config = OptimizerConfig {
//!     max_dimension: 1280,
//!     ..OptimizerConfig::preset(Preset::Webp)
//! };
//! config.validate()?;
//! ```

use crate::resize::ResizeAlgorithm;
use crate::rules::RuleSet;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const RAW_ENGAGEMENT_DIR: &str = "assets/photos/raw-engagement-2026-02-27";

/// Photos picked for the public engagement gallery
const ENGAGEMENT_SELECTION: &[&str] = &[
    "003bf600-3a4d-4f35-976b-0586379b6785.jpg",
    "053d97ba-331e-4d85-93f9-7986e70e2874.jpg",
    "092f4223-1508-45f6-8f3d-78ca5afbb6f1.jpg",
    "18419a0b-742d-4e06-b315-c83be4e25f68.jpg",
    "1e3ee16d-404f-48e2-b949-62ed57e96c6c.jpg",
    "36788f74-4b86-4550-bee9-6b2e5fbb19f5.jpg",
    "3a6534e7-adf1-44c5-a728-94c6f6fa646c.jpg",
    "3c011ec8-ec9e-4b90-99f8-22e12da880c8.jpg",
    "45fe54f7-a753-4e5d-9913-aff3951db84f.jpg",
    "46c6527f-aabe-48ef-87c0-bfdac05c571f.jpg",
    "46ec533f-9fdb-4c8d-8f52-759efe846352.jpg",
    "47fc5b76-b923-4d85-8bd1-df4cb9cebcb8.jpg",
];

/// Configuration for the template wording pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacerConfig {
    /// Directory scanned recursively for templates
    pub root: PathBuf,
    /// Extension selecting template files (without the dot)
    pub extension: String,
    /// Ordered substitution rules
    pub rules: RuleSet,
    /// Report files that would change without writing them
    pub dry_run: bool,
}

impl Default for ReplacerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("src/pages"),
            extension: "tsx".to_string(),
            rules: RuleSet::default(),
            dry_run: false,
        }
    }
}

impl ReplacerConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        validate_extension(&self.extension)?;

        if let Some(index) = self.rules.rules().iter().position(|r| r.search.is_empty()) {
            return Err(anyhow::anyhow!("Rule {} has an empty search string", index));
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let config: Self = load_json(path).await?;
        config.validate()?;
        Ok(config)
    }
}

/// Named optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Every `*.jpg` re-encoded as WebP for the archive
    Webp,
    /// The curated gallery selection re-encoded as JPEG
    Jpeg,
}

/// Encoder and parameters for derived images
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy WebP. `method` is the encoder effort, 0 (fast) to 6 (smallest).
    Webp { quality: f32, method: u8 },
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// File extension of derived assets
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Webp { .. } => "webp",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Webp { .. } => "WebP",
            OutputFormat::Jpeg { .. } => "JPEG",
        }
    }
}

/// Which files of the source directory are converted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSelection {
    /// Every regular file with this extension (case-sensitive, no dot)
    Extension(String),
    /// An explicit list of file names; each must exist
    Files(Vec<String>),
}

/// Configuration for the photo optimization pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Directory holding the original photographs (never modified)
    pub source_dir: PathBuf,
    /// Directory receiving derived images, created if absent
    pub output_dir: PathBuf,
    pub selection: SourceSelection,
    /// Longest allowed edge in pixels; smaller images are not upscaled
    pub max_dimension: u32,
    pub format: OutputFormat,
    #[serde(default)]
    pub filter: ResizeAlgorithm,
    /// Apply the EXIF orientation before resizing
    #[serde(default)]
    pub auto_orient: bool,
    /// Print a JSON savings report when the run completes
    #[serde(default)]
    pub report: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::preset(Preset::Webp)
    }
}

impl OptimizerConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Webp => Self {
                source_dir: PathBuf::from(RAW_ENGAGEMENT_DIR),
                output_dir: PathBuf::from("assets/photos/optimized-engagement-2026-02-28"),
                selection: SourceSelection::Extension("jpg".to_string()),
                max_dimension: 1920,
                format: OutputFormat::Webp {
                    quality: 72.0,
                    method: 6,
                },
                filter: ResizeAlgorithm::default(),
                auto_orient: false,
                report: false,
            },
            Preset::Jpeg => Self {
                source_dir: PathBuf::from(RAW_ENGAGEMENT_DIR),
                output_dir: PathBuf::from("public/photos/engagement"),
                selection: SourceSelection::Files(
                    ENGAGEMENT_SELECTION.iter().map(|name| name.to_string()).collect(),
                ),
                max_dimension: 1600,
                format: OutputFormat::Jpeg { quality: 74 },
                filter: ResizeAlgorithm::default(),
                auto_orient: true,
                report: true,
            },
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(anyhow::anyhow!("Maximum dimension must be greater than 0"));
        }

        match self.format {
            OutputFormat::Webp { quality, method } => {
                if !(0.0..=100.0).contains(&quality) {
                    return Err(anyhow::anyhow!("WebP quality must be between 0 and 100"));
                }
                if method > 6 {
                    return Err(anyhow::anyhow!("WebP method must be between 0 and 6"));
                }
            }
            OutputFormat::Jpeg { quality } => {
                if quality == 0 || quality > 100 {
                    return Err(anyhow::anyhow!("JPEG quality must be between 1 and 100"));
                }
            }
        }

        match &self.selection {
            SourceSelection::Extension(ext) => validate_extension(ext)?,
            SourceSelection::Files(files) => {
                if files.is_empty() {
                    return Err(anyhow::anyhow!("Explicit file selection is empty"));
                }
                if let Some(name) = files.iter().find(|name| {
                    let path = Path::new(name.as_str());
                    path.components().count() != 1 || path.file_name().is_none()
                }) {
                    return Err(anyhow::anyhow!(
                        "Selected file must be a plain file name: {}",
                        name
                    ));
                }
            }
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let config: Self = load_json(path).await?;
        config.validate()?;
        Ok(config)
    }
}

fn validate_extension(extension: &str) -> Result<()> {
    if extension.is_empty() {
        return Err(anyhow::anyhow!("File extension must not be empty"));
    }
    if extension.starts_with('.') {
        return Err(anyhow::anyhow!(
            "File extension must not start with a dot: {}",
            extension
        ));
    }
    Ok(())
}

/// Read a JSON file, falling back to the defaults when it does not exist
async fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        warn!("Config file not found, using defaults: {}", path.display());
        return Ok(T::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}
