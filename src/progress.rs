//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di conversione.
//!
//! ## Responsabilità:
//! - Progress bar con `indicatif` su stderr (nascosta se stderr non è un terminale)
//! - Stampa su stdout dei nomi prodotti senza interferire con la barra
//! - Tracking dei byte letti e scritti per il report finale
//!
//! ## Visual feedback:
//! ```text
//! [00:00:12] [========================>---------------] 7/12 (58%) 36788f74.webp
//! ```

use crate::file_manager::FileManager;
use crate::json_output::SavingsReport;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages progress reporting for the photo optimizer
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        Self { bar }
    }

    /// Print a line to stdout, then advance the bar
    pub fn complete(&self, line: &str) {
        self.bar.suspend(|| println!("{}", line));
        self.bar.inc(1);
        self.bar.set_message(line.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Byte statistics for a conversion run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OptimizationStats {
    pub files_processed: usize,
    pub total_original_size: u64,
    pub total_output_size: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, original_size: u64, output_size: u64) {
        self.files_processed += 1;
        self.total_original_size += original_size;
        self.total_output_size += output_size;
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_output_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Converted: {} files | {} -> {} ({:.1}% saved)",
            self.files_processed,
            FileManager::format_size(self.total_original_size),
            FileManager::format_size(self.total_output_size),
            self.overall_reduction_percent()
        )
    }

    /// Savings report with the percentage rounded to one decimal
    pub fn to_report(&self) -> SavingsReport {
        let savings_pct = (self.total_original_size > 0)
            .then(|| round_one_decimal(self.overall_reduction_percent()));

        SavingsReport {
            files: self.files_processed,
            before_bytes: self.total_original_size,
            after_bytes: self.total_output_size,
            savings_pct,
        }
    }
}

/// Rounds the exact binary value to one decimal, ties away from zero.
///
/// Scaling by ten first would round the product instead: `0.15` is stored
/// just below 0.15 but `0.15 * 10.0` is exactly `1.5`.
fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let magnitude = value.abs();
    let exact = format!("{:.20}", magnitude);
    let mut fraction = exact
        .split_once('.')
        .map(|(_, digits)| digits.bytes())
        .into_iter()
        .flatten();
    let tenths = fraction.next().map_or(0, |d| d - b'0');
    let round_up = fraction.next().is_some_and(|d| d >= b'5');

    let scaled = magnitude.trunc() * 10.0 + f64::from(tenths) + f64::from(u8::from(round_up));
    (scaled / 10.0).copysign(value)
}
