//! SQL migration definitions for the catalog database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a batch of SQL statements.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Initial schema: dataset catalog",
            sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Document catalog. Tags/Authors hold JSON array text.
CREATE TABLE IF NOT EXISTS dataset (
    Title       TEXT PRIMARY KEY,
    Link        TEXT,
    Description TEXT,
    Tags        TEXT,
    doc_type    TEXT,
    Authors     TEXT
);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
        },
        Migration {
            version: 2,
            description: "Partial index for unenriched entries",
            sql: r#"
CREATE INDEX IF NOT EXISTS idx_dataset_unenriched
    ON dataset(Title) WHERE Description IS NULL;

INSERT INTO schema_migrations (version) VALUES (2);
"#,
        },
    ]
}
