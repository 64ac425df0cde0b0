//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei file e le scritture su disco.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva dei template per estensione
//! - Selezione piatta e ordinata delle foto sorgente
//! - Calcolo del path dei derivati (stesso nome base, nuova estensione)
//! - Scrittura atomica: file temporaneo nella stessa directory, poi rename
//! - Formattazione human-readable delle dimensioni
//!
//! ## Note:
//! - Il confronto delle estensioni è case-sensitive (`photo.JPG` non è `*.jpg`)
//! - Una directory radice inesistente produce zero file, con un warning
//! - I risultati sono sempre ordinati per nome, per esecuzioni deterministiche

use crate::config::SourceSelection;
use crate::error::UpkeepError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Manages file discovery and writes
pub struct FileManager;

impl FileManager {
    /// Find every regular file under `root` (recursively) with the given extension
    pub fn find_files_with_extension(
        root: &Path,
        extension: &str,
    ) -> Result<Vec<PathBuf>, UpkeepError> {
        Self::walk(root, extension, None)
    }

    /// Resolve the source images of `source_dir` according to `selection`, sorted by name
    pub fn select_images(
        source_dir: &Path,
        selection: &SourceSelection,
    ) -> Result<Vec<PathBuf>, UpkeepError> {
        match selection {
            SourceSelection::Extension(extension) => Self::walk(source_dir, extension, Some(1)),
            SourceSelection::Files(names) => {
                let mut names: Vec<&String> = names.iter().collect();
                names.sort();
                names.dedup();

                names
                    .into_iter()
                    .map(|name| {
                        let path = source_dir.join(name);
                        if path.is_file() {
                            Ok(path)
                        } else {
                            Err(UpkeepError::MissingSource(path))
                        }
                    })
                    .collect()
            }
        }
    }

    fn walk(
        root: &Path,
        extension: &str,
        max_depth: Option<usize>,
    ) -> Result<Vec<PathBuf>, UpkeepError> {
        if !root.is_dir() {
            warn!("Directory does not exist, nothing to do: {}", root.display());
            return Ok(Vec::new());
        }

        let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && Self::has_extension(entry.path(), extension) {
                files.push(entry.into_path());
            }
        }

        debug!(
            "Found {} .{} files in {}",
            files.len(),
            extension,
            root.display()
        );
        Ok(files)
    }

    /// Exact (case-sensitive) extension match
    pub fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension().is_some_and(|ext| ext == extension)
    }

    /// Path of the derived asset: same base name, new extension, inside `output_dir`
    pub fn derived_path(source: &Path, output_dir: &Path, extension: &str) -> PathBuf {
        let stem = source.file_stem().unwrap_or_default();
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(extension);
        output_dir.join(file_name)
    }

    /// Replace `path` with `contents` in a single rename.
    ///
    /// The permissions of an existing file are carried over to the new one;
    /// a new file gets the umask default, as `std::fs::write` would give it.
    /// A symlink is written through: its target is replaced, the link stays.
    pub async fn write_atomic(path: &Path, contents: Vec<u8>) -> Result<(), UpkeepError> {
        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::write_atomic_blocking(&target, &contents))
            .await
            .map_err(|e| UpkeepError::io(path)(std::io::Error::other(e)))?
    }

    fn write_atomic_blocking(path: &Path, contents: &[u8]) -> Result<(), UpkeepError> {
        let target = match std::fs::symlink_metadata(path) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                std::fs::canonicalize(path).map_err(UpkeepError::io(path))?
            }
            _ => path.to_path_buf(),
        };
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        #[cfg_attr(not(unix), allow(unused_mut))]
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // 0o666 is masked by the process umask at creation
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }

        let mut temp = builder.tempfile_in(dir).map_err(UpkeepError::io(path))?;
        temp.write_all(contents).map_err(UpkeepError::io(path))?;
        temp.as_file().sync_all().map_err(UpkeepError::io(path))?;

        if let Ok(metadata) = std::fs::metadata(&target) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(UpkeepError::io(path))?;
        }

        temp.persist(&target)
            .map_err(|e| UpkeepError::io(path)(e.error))?;
        Ok(())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
