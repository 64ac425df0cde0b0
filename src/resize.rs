//! # Image Resize Module
//!
//! Questo modulo calcola le dimensioni di output e sceglie il filtro di ricampionamento.
//!
//! ## Caratteristiche
//! - **Solo riduzione**: un'immagine già entro il limite mantiene le sue dimensioni
//! - **Aspect ratio preservato**: il lato non vincolato viene arrotondato all'intero
//!   che approssima meglio il rapporto originale (minimo 1 pixel)
//! - **Filtro di default**: Lanczos3, il migliore per il downscaling fotografico
//!
//! ## Esempi
//! | Sorgente | Limite | Output |
//! |---|---|---|
//! | 4000x3000 | 1920 | 1920x1440 |
//! | 3000x4000 | 1920 | 1440x1920 |
//! | 800x600 | 1920 | 800x600 |

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Algoritmi di resize disponibili
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAlgorithm {
    /// Lanczos3 - Migliore qualità per downscaling (default)
    #[default]
    Lanczos,
    /// Catmull-Rom - buona qualità generale, più veloce
    Catrom,
    /// Gaussian - più morbido, attenua il rumore
    Gaussian,
    /// Triangle - veloce, qualità accettabile per anteprime
    Triangle,
    /// Nearest - pixel perfetto, nessuna interpolazione
    Nearest,
}

impl ResizeAlgorithm {
    /// Converte l'algoritmo nel filtro del crate `image`
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeAlgorithm::Lanczos => FilterType::Lanczos3,
            ResizeAlgorithm::Catrom => FilterType::CatmullRom,
            ResizeAlgorithm::Gaussian => FilterType::Gaussian,
            ResizeAlgorithm::Triangle => FilterType::Triangle,
            ResizeAlgorithm::Nearest => FilterType::Nearest,
        }
    }
}

/// Dimensions fitting `(width, height)` inside a `bound x bound` box.
///
/// Returns the input unchanged when both edges are already within the bound.
/// Otherwise the longer edge becomes `bound` and the other edge is the
/// integer (floor or ceil) whose ratio is closest to the source aspect ratio.
pub fn fit_within(width: u32, height: u32, bound: u32) -> (u32, u32) {
    if width <= bound && height <= bound {
        return (width, height);
    }

    let aspect = width as f64 / height as f64;
    let limit = bound as f64;

    if aspect <= 1.0 {
        let fitted = round_to_aspect(limit * aspect, |w| (aspect - w / limit).abs());
        (fitted, bound)
    } else {
        let fitted = round_to_aspect(limit / aspect, |h| {
            if h == 0.0 {
                0.0
            } else {
                (aspect - limit / h).abs()
            }
        });
        (bound, fitted)
    }
}

/// Floor or ceil of `value`, whichever has the smaller error (floor on ties), at least 1.
fn round_to_aspect(value: f64, error: impl Fn(f64) -> f64) -> u32 {
    let floor = value.floor();
    let ceil = value.ceil();
    let best = if error(ceil) < error(floor) { ceil } else { floor };
    best.max(1.0) as u32
}
