//! Content-addressed response cache
//!
//! SQLite table mapping a request fingerprint to the serialized response it
//! produced, shared across runs. The fingerprint is a SHA-256 over the
//! exact request payload (context text plus schema identity), so identical
//! requests always hit and any change misses.
//!
//! Read errors degrade to a miss and write errors are swallowed: a broken
//! cache must never abort a run, it only costs repeat service calls. Rows
//! are never evicted by the pipeline; `docent cache clear` is the operator
//! escape hatch.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors surfaced by cache maintenance commands.
///
/// Pipeline lookups never return these; they degrade to a miss instead.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not open cache database {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("could not create cache directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Compute the cache fingerprint for a request payload.
///
/// `schema_identity` is the serialized schema for structured requests and
/// empty for free-text requests; it is hashed with a separator so a context
/// that happens to end with schema text cannot collide.
pub fn fingerprint(context: &str, schema_identity: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(context.as_bytes());
    hasher.update([0u8]);
    hasher.update(schema_identity.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Durable fingerprint → response table.
#[derive(Debug)]
pub struct ResponseCache {
    path: PathBuf,
}

impl ResponseCache {
    /// Point the cache at a database file. The file and its parent
    /// directory are created lazily on first store.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path).map_err(|source| CacheError::Open {
            path: self.path.clone(),
            source,
        })?;
        // Concurrent runs sharing one table serialize on SQLite's lock.
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                fingerprint TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                created     TEXT NOT NULL
            )",
            [],
        )?;
        Ok(conn)
    }

    /// Look up a previously stored response. Any I/O or schema problem is
    /// treated as an empty table.
    pub fn lookup(&self, fingerprint: &str) -> Option<String> {
        let conn = self.open().ok()?;
        conn.query_row(
            "SELECT value FROM responses WHERE fingerprint = ?1",
            [fingerprint],
            |row| row.get(0),
        )
        .optional()
        .ok()
        .flatten()
    }

    /// Persist a response under its fingerprint. Failures are ignored; the
    /// next identical request simply misses.
    pub fn store(&self, fingerprint: &str, value: &str) {
        if let Ok(conn) = self.open() {
            let _ = conn.execute(
                "INSERT OR REPLACE INTO responses (fingerprint, value, created)
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![fingerprint, value, chrono::Utc::now().to_rfc3339()],
            );
        }
    }

    /// Number of cached responses, for `docent cache stats`.
    pub fn len(&self) -> Result<usize, CacheError> {
        let conn = self.open()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Drop every cached response, for `docent cache clear`.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let conn = self.open()?;
        let removed = conn.execute("DELETE FROM responses", [])?;
        Ok(removed)
    }
}
