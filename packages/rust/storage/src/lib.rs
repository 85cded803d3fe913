//! libSQL storage layer for the document catalog.
//!
//! The [`Storage`] struct wraps a libSQL database holding the `dataset` table:
//! one row per document, keyed by title, with the four enrichment fields
//! (`Description`, `Tags`, `doc_type`, `Authors`) left `NULL` until enriched.
//!
//! **Access rules:**
//! - Server / in-process indexer: read-write via [`Storage::open`]
//! - HTTP-mode indexer: read-only via [`Storage::open_readonly`]

mod migrations;
mod seed;

use std::path::Path;

use biosearch_shared::{BiosearchError, DocumentEntry, Result, Summary};
use libsql::{Connection, Database, params};

pub use seed::{ImportStats, import_seed_dir};

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl Storage {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| BiosearchError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        let storage = Self {
            db,
            conn,
            readonly: false,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Open an existing database at `path` in read-only mode.
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BiosearchError::Storage(format!(
                "database not found at {}",
                path.display()
            )));
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn
                    .execute_batch(migration.sql)
                    .await
                    .map_err(|e| {
                        BiosearchError::Storage(format!(
                            "migration v{} failed: {e}",
                            migration.version
                        ))
                    })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(BiosearchError::Storage(
                "database is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Look up an entry by title, returning `None` if absent.
    pub async fn find(&self, title: &str) -> Result<Option<DocumentEntry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT Title, Link, Description, Tags, doc_type, Authors
                 FROM dataset WHERE Title = ?1",
                params![title],
            )
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_entry(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(BiosearchError::Storage(e.to_string())),
        }
    }

    /// Look up an entry by title, failing with `NotFound` if absent.
    pub async fn get(&self, title: &str) -> Result<DocumentEntry> {
        self.find(title)
            .await?
            .ok_or_else(|| BiosearchError::not_found(title))
    }

    /// All titles, enriched or not, in insertion order.
    pub async fn list_titles(&self) -> Result<Vec<String>> {
        self.query_titles("SELECT Title FROM dataset ORDER BY rowid")
            .await
    }

    /// Titles whose `Description` is still `NULL`, in insertion order.
    pub async fn list_unenriched(&self) -> Result<Vec<String>> {
        self.query_titles("SELECT Title FROM dataset WHERE Description IS NULL ORDER BY rowid")
            .await
    }

    /// Number of rows in the catalog.
    pub async fn count(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM dataset", params![])
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get::<u64>(0)
                .map_err(|e| BiosearchError::Storage(e.to_string())),
            Ok(None) => Ok(0),
            Err(e) => Err(BiosearchError::Storage(e.to_string())),
        }
    }

    async fn query_titles(&self, sql: &str) -> Result<Vec<String>> {
        let mut rows = self
            .conn
            .query(sql, params![])
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?
        {
            results.push(
                row.get::<String>(0)
                    .map_err(|e| BiosearchError::Storage(e.to_string()))?,
            );
        }
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Overwrite the four enrichment fields of an existing entry in one statement.
    ///
    /// This is the only write path for enrichment fields.
    pub async fn upsert_enrichment(&self, title: &str, summary: &Summary) -> Result<()> {
        self.check_writable()?;
        let tags = encode_list(summary.tags.as_deref())?;
        let authors = encode_list(summary.authors.as_deref())?;

        let changed = self
            .conn
            .execute(
                "UPDATE dataset SET Description = ?1, Tags = ?2, doc_type = ?3, Authors = ?4
                 WHERE Title = ?5",
                params![
                    summary.description.as_deref(),
                    tags.as_deref(),
                    summary.doc_type.as_deref(),
                    authors.as_deref(),
                    title,
                ],
            )
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        if changed == 0 {
            return Err(BiosearchError::not_found(title));
        }
        Ok(())
    }

    /// Insert entries, skipping any whose title already exists.
    ///
    /// Existing rows (and their enrichment) are never touched. Returns the
    /// number of rows actually inserted.
    pub async fn bulk_insert(&self, entries: &[DocumentEntry]) -> Result<usize> {
        self.check_writable()?;

        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;

        let mut inserted = 0;
        for entry in entries {
            let tags = encode_list(entry.tags.as_deref())?;
            let authors = encode_list(entry.authors.as_deref())?;
            let changed = tx
                .execute(
                    "INSERT OR IGNORE INTO dataset (Title, Link, Description, Tags, doc_type, Authors)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        entry.title.as_str(),
                        entry.link.as_str(),
                        entry.description.as_deref(),
                        tags.as_deref(),
                        entry.doc_type.as_deref(),
                        authors.as_deref(),
                    ],
                )
                .await
                .map_err(|e| BiosearchError::Storage(e.to_string()))?;
            inserted += changed as usize;
        }

        tx.commit()
            .await
            .map_err(|e| BiosearchError::Storage(e.to_string()))?;
        Ok(inserted)
    }
}

/// Serialize an optional string list to JSON array text (`None` stays `NULL`).
fn encode_list(list: Option<&[String]>) -> Result<Option<String>> {
    list.map(|l| serde_json::to_string(l).map_err(|e| BiosearchError::Storage(e.to_string())))
        .transpose()
}

/// Decode JSON array text. Empty text and a literal `null` both mean "absent".
fn decode_list(text: Option<String>) -> Result<Option<Vec<String>>> {
    match text.as_deref().map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(s) => serde_json::from_str(s)
            .map(Some)
            .map_err(|e| BiosearchError::Storage(format!("invalid list column {s:?}: {e}"))),
    }
}

/// Convert a database row to a [`DocumentEntry`].
fn row_to_entry(row: &libsql::Row) -> Result<DocumentEntry> {
    Ok(DocumentEntry {
        title: row
            .get::<String>(0)
            .map_err(|e| BiosearchError::Storage(e.to_string()))?,
        link: row.get::<String>(1).unwrap_or_default(),
        description: row.get::<String>(2).ok(),
        tags: decode_list(row.get::<String>(3).ok())?,
        doc_type: row.get::<String>(4).ok(),
        authors: decode_list(row.get::<String>(5).ok())?,
    })
}
