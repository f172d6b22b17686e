//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `plugin_store_rows` table (one JSON document per (plugin_name, key))
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS plugin_store_rows (
    id INTEGER PRIMARY KEY NOT NULL,
    plugin_name TEXT NOT NULL,
    key TEXT NOT NULL,
    type_name TEXT NOT NULL,
    value TEXT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL, -- RFC3339
    UNIQUE(plugin_name, key)
);

CREATE INDEX IF NOT EXISTS idx_plugin_store_rows_plugin_name ON plugin_store_rows(plugin_name);
"#;
