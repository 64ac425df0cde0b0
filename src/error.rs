//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore della libreria.
//!
//! ## Responsabilità:
//! - Definisce `UpkeepError` per gli errori di filesystem e di elaborazione immagini
//! - Conserva l'errore originale della piattaforma o della libreria come `source`
//! - Aggiunge solo il path coinvolto, senza reinterpretare l'errore
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, contenuto non UTF-8, etc.)
//! - `Walk`: Errori durante l'attraversamento ricorsivo delle directory
//! - `Decode`: Immagine sorgente illeggibile o corrotta
//! - `Encode`: Fallimento dell'encoder di output
//! - `MissingSource`: File elencato esplicitamente ma assente
//!
//! Nessun errore viene recuperato: il primo errore interrompe l'intera esecuzione.

use std::path::PathBuf;

/// Errors raised by the text replacement and image optimization passes
#[derive(thiserror::Error, Debug)]
pub enum UpkeepError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Image decode error in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{format} encode error for {}: {message}", path.display())]
    Encode {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Source image not found: {}", .0.display())]
    MissingSource(PathBuf),
}

impl UpkeepError {
    /// Builds a mapper that attaches `path` to an I/O error.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
