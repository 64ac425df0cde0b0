//! # Site Upkeep Library
//!
//! Due passaggi di manutenzione indipendenti per il sito.
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione, preset e validazione parametri
//! - `error`: Tipi di errore per filesystem ed elaborazione immagini
//! - `rules`: Regole di sostituzione letterale e analisi dei conflitti di ordine
//! - `file_manager`: Discovery dei file, path dei derivati, scritture atomiche
//! - `text_replacer`: Semplificazione del linguaggio nei template
//! - `resize`: Calcolo delle dimensioni e filtri di ricampionamento
//! - `image_processor`: Decode, normalizzazione RGB, resize, encode
//! - `optimizer`: Conversione batch delle foto
//! - `progress`: Progress bar e statistiche dei byte
//! - `json_output`: Report JSON dei byte risparmiati
//!
//! ## Utilizzo:
//! ```ignore
//! use site_upkeep::{OptimizerConfig, PhotoOptimizer, ReplacerConfig, TextReplacer};
//!
//! let changed = TextReplacer::new(ReplacerConfig::default())?.run().await?;
//! let report = PhotoOptimizer::new(OptimizerConfig::default())?.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod json_output;
pub mod optimizer;
pub mod progress;
pub mod resize;
pub mod rules;
pub mod text_replacer;

pub use config::{OptimizerConfig, OutputFormat, Preset, ReplacerConfig, SourceSelection};
pub use error::UpkeepError;
pub use json_output::SavingsReport;
pub use optimizer::PhotoOptimizer;
pub use rules::{ReplacementRule, RuleConflict, RuleSet};
pub use text_replacer::TextReplacer;
