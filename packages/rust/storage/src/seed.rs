//! Bulk import of seed JSON files into the catalog.
//!
//! A seed directory holds `*.json` files, each a JSON array of objects with
//! `Title`, `Link`, `Description`, `Tags`, `doc_type`, and `Authors` keys.

use std::path::{Path, PathBuf};

use biosearch_shared::{BiosearchError, DocumentEntry, Result, SeedItem};
use tracing::{info, instrument, warn};

use crate::Storage;

/// Counts from one seed import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Seed files read.
    pub files: usize,
    /// Items found across all files.
    pub items: usize,
    /// Rows newly inserted.
    pub inserted: usize,
    /// Items dropped for lacking a title or link.
    pub invalid: usize,
}

/// Import every `*.json` file in `dir` (sorted by name) with insert-or-ignore semantics.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn import_seed_dir(storage: &Storage, dir: &Path) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for path in seed_files(dir)? {
        let content =
            std::fs::read_to_string(&path).map_err(|e| BiosearchError::io(&path, e))?;
        let items: Vec<SeedItem> = serde_json::from_str(&content).map_err(|e| {
            BiosearchError::validation(format!("invalid seed file {}: {e}", path.display()))
        })?;

        stats.files += 1;
        stats.items += items.len();

        let mut entries: Vec<DocumentEntry> = Vec::with_capacity(items.len());
        for item in items {
            match item.into_entry() {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(file = %path.display(), "seed item without Title or Link, skipping");
                    stats.invalid += 1;
                }
            }
        }

        stats.inserted += storage.bulk_insert(&entries).await?;
    }

    info!(
        files = stats.files,
        items = stats.items,
        inserted = stats.inserted,
        invalid = stats.invalid,
        "seed import complete"
    );
    Ok(stats)
}

/// List `*.json` files directly inside `dir`, sorted for a stable import order.
fn seed_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| BiosearchError::io(dir, e))?;

    let mut files = Vec::new();
    for dir_entry in read_dir {
        let path = dir_entry.map_err(|e| BiosearchError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biosearch_shared::Summary;
    use uuid::Uuid;

    fn seed_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bs_seed_{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    async fn storage_in(dir: &Path) -> Storage {
        Storage::open(&dir.join("catalog.db")).await.expect("open db")
    }

    const SEED_A: &str = r#"[
        {"Title": "Paper A", "Link": "http://x/a", "Description": null, "Tags": null, "doc_type": null, "Authors": null},
        {"Title": "Paper B", "Link": "http://x/b"}
    ]"#;

    #[tokio::test]
    async fn imports_json_files_only() {
        let dir = seed_dir();
        std::fs::write(dir.join("a.json"), SEED_A).unwrap();
        std::fs::write(dir.join("b.json"), r#"[{"Title":"Paper C","Link":"http://x/c"}]"#)
            .unwrap();
        std::fs::write(dir.join("notes.txt"), "not a seed").unwrap();

        let storage = storage_in(&dir).await;
        let stats = import_seed_dir(&storage, &dir).await.expect("import");

        assert_eq!(stats.files, 2);
        assert_eq!(stats.items, 3);
        assert_eq!(stats.inserted, 3);
        assert_eq!(
            storage.list_titles().await.unwrap(),
            vec!["Paper A", "Paper B", "Paper C"]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn reimport_is_idempotent_and_keeps_enrichment() {
        let dir = seed_dir();
        std::fs::write(dir.join("a.json"), SEED_A).unwrap();
        let storage = storage_in(&dir).await;

        import_seed_dir(&storage, &dir).await.unwrap();
        storage
            .upsert_enrichment(
                "Paper A",
                &Summary {
                    description: Some("D".into()),
                    tags: Some(vec!["x".into()]),
                    authors: None,
                    doc_type: None,
                },
            )
            .await
            .unwrap();

        let stats = import_seed_dir(&storage, &dir).await.unwrap();
        assert_eq!(stats.inserted, 0);
        assert_eq!(storage.count().await.unwrap(), 2);

        let entry = storage.get("Paper A").await.unwrap();
        assert_eq!(entry.description.as_deref(), Some("D"));
        assert!(entry.is_enriched());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn items_without_title_are_counted_invalid() {
        let dir = seed_dir();
        std::fs::write(
            dir.join("a.json"),
            r#"[{"Link":"http://x/none"},{"Title":"Ok","Link":"http://x/ok"}]"#,
        )
        .unwrap();
        let storage = storage_in(&dir).await;

        let stats = import_seed_dir(&storage, &dir).await.unwrap();
        assert_eq!(stats.invalid, 1);
        assert_eq!(stats.inserted, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn malformed_seed_file_is_validation_error() {
        let dir = seed_dir();
        std::fs::write(dir.join("bad.json"), r#"{"Title": "not an array"}"#).unwrap();
        let storage = storage_in(&dir).await;

        let err = import_seed_dir(&storage, &dir).await.unwrap_err();
        assert!(matches!(err, BiosearchError::Validation { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_dir_is_io_error() {
        let dir = seed_dir();
        let storage = storage_in(&dir).await;
        let err = import_seed_dir(&storage, &dir.join("absent")).await.unwrap_err();
        assert!(matches!(err, BiosearchError::Io { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
