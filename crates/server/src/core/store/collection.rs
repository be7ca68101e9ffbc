//! JSON document collections
//!
//! Each document lives in `<data_dir>/<collection>/<id>.json`, written
//! atomically (temp file + rename). The whole collection is loaded into
//! memory on open; every mutation runs under the collection's write lock
//! so a read-modify-write of one document is never interleaved with another.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// A type that can be stored in a [`Collection`]
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Directory name under the data dir
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

pub struct Collection<D: Document> {
    dir: PathBuf,
    docs: RwLock<HashMap<String, D>>,
}

impl<D: Document> Collection<D> {
    /// Open (creating if needed) the collection under `data_dir`
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let dir = data_dir.join(D::COLLECTION);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create collection dir {:?}", dir))?;

        let collection = Self {
            dir,
            docs: RwLock::new(HashMap::new()),
        };
        collection.load_existing().await?;

        info!(
            "Collection '{}' opened with {} documents",
            D::COLLECTION,
            collection.docs.read().await.len()
        );

        Ok(collection)
    }

    fn doc_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn load_existing(&self) -> Result<()> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut docs = self.docs.write().await;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match Self::read_doc(&path).await {
                Ok(doc) => {
                    docs.insert(doc.id().to_string(), doc);
                }
                Err(e) => {
                    warn!("Skipping unreadable document {:?}: {:#}", path, e);
                }
            }
        }

        Ok(())
    }

    async fn read_doc(path: &Path) -> Result<D> {
        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    async fn write_doc(&self, doc: &D) -> Result<()> {
        let path = self.doc_path(doc.id());
        let temp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&temp_path, json)
            .await
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        fs::rename(&temp_path, &path)
            .await
            .with_context(|| format!("Failed to move {:?} into place", path))?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> Option<D> {
        self.docs.read().await.get(id).cloned()
    }

    pub async fn find_one(&self, pred: impl Fn(&D) -> bool) -> Option<D> {
        self.docs.read().await.values().find(|d| pred(d)).cloned()
    }

    pub async fn all(&self) -> Vec<D> {
        self.docs.read().await.values().cloned().collect()
    }

    pub async fn count(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Insert `doc` unless some stored document matches `conflicts`.
    /// Returns `false` (and writes nothing) on conflict.
    pub async fn insert_unless(&self, doc: D, conflicts: impl Fn(&D) -> bool) -> Result<bool> {
        let mut docs = self.docs.write().await;
        if docs.values().any(|d| conflicts(d)) {
            return Ok(false);
        }
        self.write_doc(&doc).await?;
        docs.insert(doc.id().to_string(), doc);
        Ok(true)
    }

    /// Update the first document matching `pred` in place, or insert `create()`.
    /// Returns the stored result.
    pub async fn upsert(
        &self,
        pred: impl Fn(&D) -> bool,
        update: impl FnOnce(&mut D),
        create: impl FnOnce() -> D,
    ) -> Result<D> {
        let mut docs = self.docs.write().await;
        let doc = match docs.values().find(|d| pred(d)) {
            Some(existing) => {
                let mut doc = existing.clone();
                update(&mut doc);
                doc
            }
            None => create(),
        };
        self.write_doc(&doc).await?;
        docs.insert(doc.id().to_string(), doc.clone());
        Ok(doc)
    }

    /// Apply `f` to a copy of the document with `id` and persist it if `f` succeeds.
    ///
    /// `Ok(None)` means no such document. An `Err` from `f` leaves the
    /// stored document untouched.
    pub async fn update<T, E>(
        &self,
        id: &str,
        f: impl FnOnce(&mut D) -> std::result::Result<T, E>,
    ) -> std::result::Result<Option<(D, T)>, E>
    where
        E: From<anyhow::Error>,
    {
        self.update_where(|d| d.id() == id, f).await
    }

    /// Like [`Collection::update`], addressing the first document matching `pred`
    pub async fn update_where<T, E>(
        &self,
        pred: impl Fn(&D) -> bool,
        f: impl FnOnce(&mut D) -> std::result::Result<T, E>,
    ) -> std::result::Result<Option<(D, T)>, E>
    where
        E: From<anyhow::Error>,
    {
        let mut docs = self.docs.write().await;
        let Some(mut doc) = docs.values().find(|d| pred(d)).cloned() else {
            return Ok(None);
        };
        let out = f(&mut doc)?;
        self.write_doc(&doc).await?;
        docs.insert(doc.id().to_string(), doc.clone());
        Ok(Some((doc, out)))
    }

    /// Delete by id, returning the removed document
    pub async fn delete(&self, id: &str) -> Result<Option<D>> {
        let mut docs = self.docs.write().await;
        if !docs.contains_key(id) {
            return Ok(None);
        }
        self.remove_file(id).await?;
        Ok(docs.remove(id))
    }

    /// Delete every document matching `pred`, returning how many were removed
    pub async fn delete_where(&self, pred: impl Fn(&D) -> bool) -> Result<usize> {
        let mut docs = self.docs.write().await;
        let ids: Vec<String> = docs
            .values()
            .filter(|d| pred(d))
            .map(|d| d.id().to_string())
            .collect();
        for id in &ids {
            self.remove_file(id).await?;
            docs.remove(id);
        }
        Ok(ids.len())
    }

    async fn remove_file(&self, id: &str) -> Result<()> {
        let path = self.doc_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {:?}", path)),
        }
    }
}
