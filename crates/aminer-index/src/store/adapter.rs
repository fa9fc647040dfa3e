//! Index store adapter: typed index entries over a [`KeyValueStore`].
//!
//! Every entry is written as JSON under a namespaced key (see
//! [`crate::config::keys`]). Maps are ordered, so the same index always
//! produces the same bytes. Reads distinguish three states:
//!
//! - `Ok(None)`: the key was never written
//! - `Ok(Some(_))`: the entry decoded cleanly
//! - `Err(IndexError::Corrupt)`: bytes exist but cannot be decoded
//!
//! A subject dropped by a later ingestion is overwritten with `null`, which
//! reads back as `Ok(None)`.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::KeyValueStore;
use crate::config::keys;
use crate::error::{IndexError, IndexResult};
use crate::ingest::IngestManifest;
use crate::models::{Adjacency, AuthorId, AuthorProfile, SubjectEntry};

/// Typed access to the persisted indexes.
#[derive(Clone)]
pub struct IndexStore {
    kv: Arc<dyn KeyValueStore>,
}

impl IndexStore {
    /// Wrap a store handle owned by the caller.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Write an author profile under `author:<id>`.
    ///
    /// A profile whose own index differs from `id` is refused.
    pub async fn put_author(&self, id: AuthorId, profile: &AuthorProfile) -> IndexResult<()> {
        let key = keys::author(id);
        if profile.id != id {
            return Err(IndexError::mismatch(
                key,
                format!("profile index {} does not match key", profile.id),
            ));
        }
        self.put(key, profile).await
    }

    /// Read an author profile.
    pub async fn get_author(&self, id: AuthorId) -> IndexResult<Option<AuthorProfile>> {
        let key = keys::author(id);
        let profile: Option<AuthorProfile> = self.fetch(&key).await?;

        match profile {
            Some(profile) if profile.id != id => Err(IndexError::corrupt(
                key,
                format!("stored index {} does not match key", profile.id),
            )),
            other => Ok(other),
        }
    }

    /// Write an author's coauthor adjacency under `coauthors:<id>`.
    pub async fn put_coauthors(&self, id: AuthorId, adjacency: &Adjacency) -> IndexResult<()> {
        self.put(keys::coauthors(id), adjacency).await
    }

    /// Read an author's coauthor adjacency.
    pub async fn get_coauthors(&self, id: AuthorId) -> IndexResult<Option<Adjacency>> {
        self.fetch(&keys::coauthors(id)).await
    }

    /// Write a subject entry under `subject:<name>`.
    pub async fn put_subject(&self, name: &str, entry: &SubjectEntry) -> IndexResult<()> {
        self.put(keys::subject(name), entry).await
    }

    /// Read a subject entry. A retired subject reads as absent.
    pub async fn get_subject(&self, name: &str) -> IndexResult<Option<SubjectEntry>> {
        let entry: Option<Option<SubjectEntry>> = self.fetch(&keys::subject(name)).await?;
        Ok(entry.flatten())
    }

    /// Mark a subject that is no longer listed by any author.
    pub async fn retire_subject(&self, name: &str) -> IndexResult<()> {
        self.put(keys::subject(name), &Option::<SubjectEntry>::None).await
    }

    /// Write the list of every ingested subject.
    pub async fn put_subject_list(&self, subjects: &[String]) -> IndexResult<()> {
        self.put(keys::SUBJECT_LIST.to_string(), subjects).await
    }

    /// Read the list of every ingested subject.
    pub async fn get_subject_list(&self) -> IndexResult<Option<Vec<String>>> {
        self.fetch(keys::SUBJECT_LIST).await
    }

    /// Write the ingestion manifest.
    pub async fn put_manifest(&self, manifest: &IngestManifest) -> IndexResult<()> {
        self.put(keys::MANIFEST.to_string(), manifest).await
    }

    /// Read the ingestion manifest.
    pub async fn get_manifest(&self) -> IndexResult<Option<IngestManifest>> {
        self.fetch(keys::MANIFEST).await
    }

    async fn put<T: Serialize + ?Sized>(&self, key: String, value: &T) -> IndexResult<()> {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(source) => return Err(IndexError::Encode { key, source }),
        };
        self.kv.set(&key, bytes).await?;
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> IndexResult<Option<T>> {
        let Some(bytes) = self.kv.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| IndexError::corrupt(key, e))
    }
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore").finish_non_exhaustive()
    }
}
