//! Read-only access to the local facility sync cache.
//!
//! The cache is populated by a separate sync process that mirrors the
//! operator's facility documents into SQLite. Two relations matter here:
//!
//! - `facilities(id, doc_id, destination_code, ...)`: one row per facility,
//!   where `doc_id` is a composite key such as
//!   `wdw.facilities.1_0.en_us.attraction.80010208;entityType=Attraction`.
//! - `sync(id, body)`: the synchronized document for a `doc_id`, stored as JSON text.
//!
//! This crate never writes to either.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde_json::Value;

use crate::error::CacheError;

/// Read-only lookups the resolver needs from the sync cache.
pub trait FacilityCache {
    /// Find the document key ending in `<id>;entityType=<entity_type>`.
    ///
    /// When several keys match, whichever the store yields first wins.
    fn find_doc_id(&self, id: &str, entity_type: &str) -> Result<Option<String>, CacheError>;

    /// Raw JSON body of the synchronized document stored under `doc_id`.
    fn lookup_by_key(&self, doc_id: &str) -> Result<Option<String>, CacheError>;

    /// Destination code recorded for a facility id.
    fn lookup_by_id(&self, id: &str) -> Result<Option<String>, CacheError>;

    /// Fetch and parse the document stored under `doc_id`.
    fn document(&self, doc_id: &str) -> Result<Option<Value>, CacheError> {
        match self.lookup_by_key(doc_id)? {
            Some(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|source| CacheError::InvalidDocument {
                    doc_id: doc_id.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

impl<C: FacilityCache + ?Sized> FacilityCache for &C {
    fn find_doc_id(&self, id: &str, entity_type: &str) -> Result<Option<String>, CacheError> {
        (**self).find_doc_id(id, entity_type)
    }

    fn lookup_by_key(&self, doc_id: &str) -> Result<Option<String>, CacheError> {
        (**self).lookup_by_key(doc_id)
    }

    fn lookup_by_id(&self, id: &str) -> Result<Option<String>, CacheError> {
        (**self).lookup_by_id(id)
    }
}

impl<C: FacilityCache + ?Sized> FacilityCache for Box<C> {
    fn find_doc_id(&self, id: &str, entity_type: &str) -> Result<Option<String>, CacheError> {
        (**self).find_doc_id(id, entity_type)
    }

    fn lookup_by_key(&self, doc_id: &str) -> Result<Option<String>, CacheError> {
        (**self).lookup_by_key(doc_id)
    }

    fn lookup_by_id(&self, id: &str) -> Result<Option<String>, CacheError> {
        (**self).lookup_by_id(id)
    }
}

/// Suffix every matching document key must carry.
pub fn doc_id_suffix(id: &str, entity_type: &str) -> String {
    format!("{};entityType={}", id, entity_type)
}

/// SQLite-backed cache, opened read-only.
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Open an existing sync database.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::NotFound` if the file doesn't exist, or
    /// `CacheError::Sqlite` if it can't be opened.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if !path.exists() {
            return Err(CacheError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Wrap an already-open connection (e.g. an in-memory database in tests).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl FacilityCache for SqliteCache {
    fn find_doc_id(&self, id: &str, entity_type: &str) -> Result<Option<String>, CacheError> {
        let pattern = format!("%{}", escape_like(&doc_id_suffix(id, entity_type)));
        let doc_id = self
            .conn
            .query_row(
                "SELECT doc_id FROM facilities WHERE doc_id LIKE ?1 ESCAPE '\\'",
                [pattern],
                |row| row.get(0),
            )
            .optional()?;
        Ok(doc_id)
    }

    fn lookup_by_key(&self, doc_id: &str) -> Result<Option<String>, CacheError> {
        let body = self
            .conn
            .query_row("SELECT body FROM sync WHERE id = ?1", [doc_id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(body)
    }

    fn lookup_by_id(&self, id: &str) -> Result<Option<String>, CacheError> {
        // The column is nullable; a row with no code is the same as no row.
        let code: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT destination_code FROM facilities WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(code.flatten())
    }
}

/// Escape `LIKE` wildcards so ids are matched literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// In-memory cache with the same lookup semantics as [`SqliteCache`].
///
/// Keys iterate in sorted order, which stands in for the store's natural order.
/// The docId suffix match ignores ASCII case, as SQLite `LIKE` does.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    documents: BTreeMap<String, String>,
    destination_codes: BTreeMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a synchronized document under `doc_id`.
    pub fn with_document(mut self, doc_id: impl Into<String>, body: &Value) -> Self {
        self.documents.insert(doc_id.into(), body.to_string());
        self
    }

    /// Add a raw document body, which may not be valid JSON.
    pub fn with_raw_document(mut self, doc_id: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(doc_id.into(), body.into());
        self
    }

    /// Record the destination code of a facility id.
    pub fn with_destination_code(mut self, id: impl Into<String>, code: impl Into<String>) -> Self {
        self.destination_codes.insert(id.into(), code.into());
        self
    }
}

impl FacilityCache for MemoryCache {
    fn find_doc_id(&self, id: &str, entity_type: &str) -> Result<Option<String>, CacheError> {
        let suffix = doc_id_suffix(id, entity_type).to_ascii_lowercase();
        Ok(self
            .documents
            .keys()
            .find(|doc_id| doc_id.to_ascii_lowercase().ends_with(&suffix))
            .cloned())
    }

    fn lookup_by_key(&self, doc_id: &str) -> Result<Option<String>, CacheError> {
        Ok(self.documents.get(doc_id).cloned())
    }

    fn lookup_by_id(&self, id: &str) -> Result<Option<String>, CacheError> {
        Ok(self.destination_codes.get(id).cloned())
    }
}
