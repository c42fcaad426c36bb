//! Persistent storage using RocksDB.
//!
//! Records live under `{prefix}:{id}` as JSON. Operations that touch several
//! records (cascading deletes, a purchase plus its ledger entry) go through a
//! [`Batch`] so they land atomically.

use crate::error::{Error, Result};
use crate::models::{Record, Settings};
use rocksdb::{Options, WriteBatch, DB};
use std::path::Path;

fn record_key<R: Record>(id: &str) -> String {
    format!("{}:{}", R::PREFIX, id)
}

/// Storage backend for club data.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    // --- Records ---

    /// Store a record, replacing any previous version.
    pub fn put<R: Record>(&self, record: &R) -> Result<()> {
        let value = serde_json::to_vec(record)?;
        self.db.put(record_key::<R>(record.id()).as_bytes(), value)?;
        Ok(())
    }

    /// Get a record by ID.
    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        match self.db.get(record_key::<R>(id).as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Get a record by ID, failing with `NotFound` when it is missing.
    pub fn require<R: Record>(&self, id: &str) -> Result<R> {
        self.get(id)?.ok_or_else(|| Error::not_found(R::PREFIX, id))
    }

    pub fn exists<R: Record>(&self, id: &str) -> Result<bool> {
        Ok(self.db.get_pinned(record_key::<R>(id).as_bytes())?.is_some())
    }

    /// Delete a record. Deleting a missing record is a no-op.
    pub fn delete<R: Record>(&self, id: &str) -> Result<()> {
        self.db.delete(record_key::<R>(id).as_bytes())?;
        Ok(())
    }

    /// List all records of one kind, in key order.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        self.list_where(|_: &R| true)
    }

    /// List the records of one kind that match `keep`.
    pub fn list_where<R, F>(&self, keep: F) -> Result<Vec<R>>
    where
        R: Record,
        F: Fn(&R) -> bool,
    {
        let prefix = format!("{}:", R::PREFIX);
        let prefix = prefix.as_bytes();
        let mut records = Vec::new();

        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, value) = item?;
            if key.starts_with(prefix) {
                let record: R = serde_json::from_slice(&value)?;
                if keep(&record) {
                    records.push(record);
                }
            } else {
                break;
            }
        }

        Ok(records)
    }

    /// Start an atomic multi-record write.
    pub fn batch(&self) -> Batch<'_> {
        Batch {
            db: &self.db,
            batch: WriteBatch::default(),
        }
    }

    // --- Settings ---

    pub fn get_settings(&self) -> Result<Settings> {
        match self.db.get(Settings::KEY.as_bytes())? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Ok(Settings::default()),
        }
    }

    pub fn put_settings(&self, settings: &Settings) -> Result<()> {
        let value = serde_json::to_vec(settings)?;
        self.db.put(Settings::KEY.as_bytes(), value)?;
        Ok(())
    }

    /// Write default settings if none are stored yet.
    pub fn init_default_settings(&self) -> Result<()> {
        if self.db.get_pinned(Settings::KEY.as_bytes())?.is_none() {
            self.put_settings(&Settings::default())?;
        }
        Ok(())
    }
}

/// Pending writes, applied together by [`Batch::commit`].
pub struct Batch<'a> {
    db: &'a DB,
    batch: WriteBatch,
}

impl Batch<'_> {
    pub fn put<R: Record>(&mut self, record: &R) -> Result<()> {
        let value = serde_json::to_vec(record)?;
        self.batch.put(record_key::<R>(record.id()).as_bytes(), value);
        Ok(())
    }

    pub fn delete<R: Record>(&mut self, id: &str) {
        self.batch.delete(record_key::<R>(id).as_bytes());
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn commit(self) -> Result<()> {
        self.db.write(self.batch)?;
        Ok(())
    }
}
