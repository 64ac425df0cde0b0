//! # Photo Optimizer Orchestrator Module
//!
//! Questo modulo orchestra la conversione batch delle foto in derivati web.
//!
//! ## Flusso di esecuzione:
//! 1. **Output**: crea la directory di output (e i parent) se assente
//! 2. **Selezione**: risolve le foto sorgente, in ordine di nome
//! 3. **Conversione**: per ogni foto, in sequenza: lettura → `ImageProcessor` → scrittura atomica
//! 4. **Feedback**: stampa su stdout il nome di ogni file prodotto
//! 5. **Report**: statistiche dei byte e, se richiesto, report JSON su stdout
//!
//! ## Error handling:
//! - Il primo errore (decode, I/O) interrompe l'intera esecuzione
//! - I file già scritti restano validi: sono derivati e possono essere rigenerati
//! - Le foto sorgente non vengono mai modificate
//!
//! ## Esempio:
//! ```ignore
//! let optimizer = PhotoOptimizer::new(OptimizerConfig::preset(Preset::Webp))?;
//! let report = optimizer.run().await?;
//! ```

use crate::config::OptimizerConfig;
use crate::error::UpkeepError;
use crate::file_manager::FileManager;
use crate::image_processor::ImageProcessor;
use crate::json_output::SavingsReport;
use crate::progress::{OptimizationStats, ProgressManager};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sequential photo conversion run
pub struct PhotoOptimizer {
    config: OptimizerConfig,
    processor: ImageProcessor,
}

impl PhotoOptimizer {
    /// Create a new optimizer instance
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let processor = ImageProcessor::new(&config);
        Ok(Self { config, processor })
    }

    /// Convert every selected photo and return the byte totals
    pub async fn run(&self) -> Result<SavingsReport, UpkeepError> {
        let output_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(UpkeepError::io(output_dir))?;

        let sources = FileManager::select_images(&self.config.source_dir, &self.config.selection)?;
        info!(
            "Converting {} photos from {} to {} (max {}px, {:?})",
            sources.len(),
            self.config.source_dir.display(),
            output_dir.display(),
            self.config.max_dimension,
            self.config.format
        );

        let progress = ProgressManager::new(sources.len() as u64);
        let mut stats = OptimizationStats::new();

        for source in &sources {
            let (original_size, target) = self.convert(source).await?;
            let output_size = tokio::fs::metadata(&target)
                .await
                .map_err(UpkeepError::io(&target))?
                .len();
            stats.add(original_size, output_size);

            let name = target.file_name().unwrap_or_default().to_string_lossy();
            progress.complete(&name);
        }

        progress.finish(&stats.format_summary());
        info!("{}", stats.format_summary());

        let report = stats.to_report();
        if self.config.report {
            report.emit();
        }
        Ok(report)
    }

    /// Convert one photo; returns the source size and the written path
    async fn convert(&self, source: &Path) -> Result<(u64, PathBuf), UpkeepError> {
        let bytes = tokio::fs::read(source)
            .await
            .map_err(UpkeepError::io(source))?;

        let encoded = self.processor.process(source, &bytes)?;
        let target = self.output_path(source);
        debug!(
            "{} -> {} ({} -> {})",
            source.display(),
            target.display(),
            FileManager::format_size(bytes.len() as u64),
            FileManager::format_size(encoded.len() as u64)
        );

        FileManager::write_atomic(&target, encoded).await?;
        Ok((bytes.len() as u64, target))
    }

    /// Where the derived asset of `source` is written
    pub fn output_path(&self, source: &Path) -> PathBuf {
        FileManager::derived_path(source, &self.config.output_dir, self.config.format.extension())
    }
}
