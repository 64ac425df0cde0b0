//! # Site Upkeep - Main Entry Point
//!
//! Punto di ingresso della CLI di manutenzione del sito.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del logging con `tracing` (su stderr, stdout resta per i risultati)
//! - Costruzione della configurazione e avvio del passaggio richiesto
//!
//! ## Comandi:
//! - `ease-language`: riscrive la terminologia nei template `src/pages/**/*.tsx`
//! - `optimize-photos`: converte le foto dell'engagement in derivati web
//!
//! Senza flag, entrambi i comandi usano i path e i parametri storici.
//!
//! ## Esempio di utilizzo:
//! ```bash
//! site-upkeep ease-language --dry-run
//! site-upkeep optimize-photos --preset jpeg --verbose
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use site_upkeep::{
    OptimizerConfig, PhotoOptimizer, Preset, ReplacerConfig, RuleSet, TextReplacer,
};

#[derive(Parser)]
#[command(name = "site-upkeep")]
#[command(about = "Template wording cleanup and photo optimization for the site")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the wording replacement rules to page templates
    EaseLanguage {
        /// Directory scanned recursively for templates
        #[arg(long)]
        root: Option<PathBuf>,

        /// Template file extension (without the dot)
        #[arg(long)]
        extension: Option<String>,

        /// JSON file with an ordered list of {"search", "replacement"} rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// JSON configuration file (root, extension, rules)
        #[arg(long)]
        config: Option<PathBuf>,

        /// List files that would change without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert source photos into web-optimized derivatives
    OptimizePhotos {
        /// Named settings to start from
        #[arg(long, value_enum, default_value_t = Preset::Webp)]
        preset: Preset,

        /// JSON configuration file replacing the preset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory containing the original photos
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output directory for derived images (created if absent)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Longest allowed edge in pixels
        #[arg(long)]
        max_dimension: Option<u32>,

        /// Print a JSON report of bytes saved
        #[arg(long)]
        report: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::EaseLanguage {
            root,
            extension,
            rules,
            config,
            dry_run,
        } => {
            let mut config = match config {
                Some(path) => ReplacerConfig::from_file(&path).await?,
                None => ReplacerConfig::default(),
            };
            if let Some(root) = root {
                config.root = root;
            }
            if let Some(extension) = extension {
                config.extension = extension;
            }
            if let Some(path) = rules {
                let content = tokio::fs::read_to_string(&path).await?;
                config.rules = serde_json::from_str::<RuleSet>(&content)?;
                info!("Loaded {} rules from {}", config.rules.len(), path.display());
            }
            config.dry_run |= dry_run;

            for conflict in config.rules.conflicts() {
                warn!("Rule ordering: {}", config.rules.describe(&conflict));
            }

            TextReplacer::new(config)?.run().await?;
        }
        Command::OptimizePhotos {
            preset,
            config,
            source,
            output,
            max_dimension,
            report,
        } => {
            let mut config = match config {
                Some(path) => OptimizerConfig::from_file(&path).await?,
                None => OptimizerConfig::preset(preset),
            };
            if let Some(source) = source {
                config.source_dir = source;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(max_dimension) = max_dimension {
                config.max_dimension = max_dimension;
            }
            config.report |= report;

            PhotoOptimizer::new(config)?.run().await?;
        }
    }

    Ok(())
}
