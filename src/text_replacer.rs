//! # Text Replacer Module
//!
//! Passaggio di semplificazione del linguaggio sui template delle pagine.
//!
//! ## Flusso di esecuzione:
//! 1. Trova ricorsivamente i file con l'estensione configurata (ordinati)
//! 2. Legge ogni file come UTF-8 (un file non decodificabile interrompe l'esecuzione)
//! 3. Applica tutte le regole in ordine
//! 4. Riscrive il file solo se il contenuto è cambiato (scrittura atomica)
//! 5. Stampa su stdout il path di ogni file modificato
//!
//! Un file invariato non viene mai riscritto: mtime e permessi restano intatti.
//! Eseguire due volte lo stesso passaggio non modifica nulla la seconda volta,
//! purché nessun testo sostitutivo contenga un testo cercato.

use crate::config::ReplacerConfig;
use crate::error::UpkeepError;
use crate::file_manager::FileManager;
use anyhow::Result;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Applies the configured rule set to every template under the root
pub struct TextReplacer {
    config: ReplacerConfig,
}

impl TextReplacer {
    pub fn new(config: ReplacerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the pass and return the modified files, in the order they were printed
    pub async fn run(&self) -> Result<Vec<PathBuf>, UpkeepError> {
        let files =
            FileManager::find_files_with_extension(&self.config.root, &self.config.extension)?;
        info!(
            "Checking {} .{} files under {} against {} rules",
            files.len(),
            self.config.extension,
            self.config.root.display(),
            self.config.rules.len()
        );

        let mut modified = Vec::new();
        for path in files {
            if self.rewrite_file(&path).await? {
                println!("{}", path.display());
                modified.push(path);
            }
        }

        if self.config.dry_run {
            info!("Dry run: {} files would change", modified.len());
        } else {
            info!("Updated {} files", modified.len());
        }
        Ok(modified)
    }

    /// Apply the rules to one file; returns whether its content changed.
    pub async fn rewrite_file(&self, path: &Path) -> Result<bool, UpkeepError> {
        let original = tokio::fs::read_to_string(path)
            .await
            .map_err(UpkeepError::io(path))?;

        let updated = match self.config.rules.apply(&original) {
            Cow::Borrowed(_) => {
                debug!("Unchanged: {}", path.display());
                return Ok(false);
            }
            Cow::Owned(text) if text == original => return Ok(false),
            Cow::Owned(text) => text,
        };

        if !self.config.dry_run {
            FileManager::write_atomic(path, updated.into_bytes()).await?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn replacer(root: &Path, rules: RuleSet) -> TextReplacer {
        TextReplacer::new(ReplacerConfig {
            root: root.to_path_buf(),
            rules,
            ..ReplacerConfig::default()
        })
        .unwrap()
    }

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn backdate(path: &Path) -> SystemTime {
        let past = SystemTime::now() - Duration::from_secs(3600);
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(past).unwrap();
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[tokio::test]
    async fn test_rewrites_only_matching_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(&root.join("page.tsx"), "<Button>Generate checklist</Button>");
        write(&root.join("guests/List.tsx"), "<p>Guest list</p>");
        write(&root.join("helpers.ts"), "// Generate ids");

        let modified = replacer(root, RuleSet::default()).run().await.unwrap();

        assert_eq!(modified, vec![root.join("page.tsx")]);
        assert_eq!(
            std::fs::read_to_string(root.join("page.tsx")).unwrap(),
            "<Button>Create checklist</Button>"
        );
        assert_eq!(
            std::fs::read_to_string(root.join("helpers.ts")).unwrap(),
            "// Generate ids"
        );
    }

    #[tokio::test]
    async fn test_nested_files_are_rewritten() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(&root.join("dashboard/rsvp/Stats.tsx"), "Track CTR and KPI");

        let modified = replacer(root, RuleSet::default()).run().await.unwrap();

        assert_eq!(modified.len(), 1);
        assert_eq!(
            std::fs::read_to_string(root.join("dashboard/rsvp/Stats.tsx")).unwrap(),
            "Track click rate and snapshot"
        );
    }

    #[tokio::test]
    async fn test_unchanged_file_is_not_touched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("About.tsx");
        write(&path, "<p>Our story</p>");
        let before = backdate(&path);

        let modified = replacer(temp.path(), RuleSet::default()).run().await.unwrap();

        assert!(modified.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>Our story</p>");
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Settings.tsx");
        write(
            &path,
            "Event permissions, permissions and permissions. Dietary tracking, tracking.",
        );

        let tool = replacer(temp.path(), RuleSet::default());
        assert_eq!(tool.run().await.unwrap().len(), 1);
        let once = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            once,
            "Event access, access rules and access rules. Dietary details, updates."
        );

        assert!(tool.run().await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), once);
    }

    #[tokio::test]
    async fn test_rule_order_decides_overlapping_matches() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.tsx");
        write(&path, "Generate checklist");

        let specific_first = RuleSet::from_pairs([
            ("Generate checklist", "Create checklist"),
            ("Generate", "Create"),
        ]);
        replacer(temp.path(), specific_first).run().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Create checklist");

        write(&path, "Generate checklist");
        let general_first = RuleSet::from_pairs([
            ("Generate", "Create"),
            ("Generate checklist", "Build checklist"),
        ]);
        replacer(temp.path(), general_first).run().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Create checklist");
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.tsx");
        write(&path, "permissions");

        let tool = TextReplacer::new(ReplacerConfig {
            root: temp.path().to_path_buf(),
            dry_run: true,
            ..ReplacerConfig::default()
        })
        .unwrap();

        assert_eq!(tool.run().await.unwrap(), vec![path.clone()]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "permissions");
    }

    #[tokio::test]
    async fn test_non_utf8_file_aborts_the_run() {
        let temp = TempDir::new().unwrap();
        let bad = temp.path().join("a.tsx");
        let good = temp.path().join("b.tsx");
        std::fs::write(&bad, [0xff, 0xfe, 0x00, 0x41]).unwrap();
        write(&good, "permissions");

        let err = replacer(temp.path(), RuleSet::default()).run().await.unwrap_err();

        assert!(matches!(err, UpkeepError::Io { ref path, .. } if path == &bad));
        // Files after the failing one are left for the rerun.
        assert_eq!(std::fs::read_to_string(&good).unwrap(), "permissions");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_template_is_rewritten_through_the_link() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("pages");
        let shared = temp.path().join("shared/Banner.txt");
        write(&shared, "Track KPI");
        std::fs::create_dir_all(&root).unwrap();
        let link = root.join("Banner.tsx");
        std::os::unix::fs::symlink(&shared, &link).unwrap();

        let modified = replacer(&root, RuleSet::default()).run().await.unwrap();

        assert_eq!(modified, vec![link.clone()]);
        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&shared).unwrap(), "Track snapshot");
    }

    #[tokio::test]
    async fn test_missing_root_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let modified = replacer(&temp.path().join("absent"), RuleSet::default())
            .run()
            .await
            .unwrap();
        assert!(modified.is_empty());
    }

    #[tokio::test]
    async fn test_replacement_equal_to_search_is_not_a_change() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.tsx");
        write(&path, "KPI");

        let rules = RuleSet::from_pairs([("KPI", "KPI")]);
        let changed = replacer(temp.path(), rules).rewrite_file(&path).await.unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_empty_search_is_rejected() {
        let config = ReplacerConfig {
            rules: RuleSet::from_pairs([("", "x")]),
            ..ReplacerConfig::default()
        };
        assert!(TextReplacer::new(config).is_err());
    }
}
