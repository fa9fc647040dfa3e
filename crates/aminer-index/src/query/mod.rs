//! Query service over the persisted indexes.
//!
//! Reads go through the [`IndexStore`]. A corrupt entry is logged at `error`
//! and answered as if the key were absent; a store failure aborts the query.
//!
//! The optional profile cache is tied to `meta:manifest`: [`QueryService::sync_cache`]
//! drops every cached profile once the stored manifest differs from the one
//! seen at the previous check.

pub mod ranking;

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use moka::future::Cache;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{IndexError, IndexResult, QueryError, QueryResult};
use crate::ingest::IngestManifest;
use crate::models::{
    AuthorDetail, AuthorId, AuthorProfile, RankedAuthor, RankedCoauthor, SubjectHit,
};
use crate::store::IndexStore;

/// Ranked lookups by subject and by author.
#[derive(Clone)]
pub struct QueryService {
    store: IndexStore,

    /// Profile cache, `None` when disabled.
    profiles: Option<ProfileCache>,

    lookup_concurrency: usize,
}

/// Cached profiles and the manifest they were read under.
#[derive(Clone)]
struct ProfileCache {
    entries: Cache<AuthorId, AuthorProfile>,
    seen: Arc<Mutex<Option<IngestManifest>>>,
}

impl QueryService {
    /// Create a query service over `store`.
    #[must_use]
    pub fn new(store: IndexStore, config: &Config) -> Self {
        let profiles = config.cache_enabled().then(|| ProfileCache {
            entries: Cache::builder()
                .max_capacity(config.cache_max_size)
                .time_to_live(config.cache_ttl)
                .build(),
            seen: Arc::new(Mutex::new(None)),
        });

        Self {
            store,
            profiles,
            lookup_concurrency: config.lookup_concurrency.max(1),
        }
    }

    /// The store this service reads from.
    #[must_use]
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Authors listing `subject` as an interest, by h-index descending.
    ///
    /// # Errors
    ///
    /// `NotFound` if the subject was never ingested (or its entry is corrupt),
    /// `StoreUnavailable` if the store fails.
    pub async fn rank_authors_by_subject(&self, subject: &str) -> QueryResult<Vec<RankedAuthor>> {
        let entry = or_miss(self.store.get_subject(subject).await)?
            .ok_or_else(|| QueryError::not_found(format!("subject '{subject}'")))?;

        Ok(ranking::rank_subject(&entry))
    }

    /// Ranked subject search with display names for the returned page.
    pub async fn search_subject(
        &self,
        subject: &str,
        limit: Option<usize>,
    ) -> QueryResult<Vec<SubjectHit>> {
        let mut ranked = self.rank_authors_by_subject(subject).await?;
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }

        let ids = ranked.iter().map(|r| r.author_id).collect();
        let names = self.display_names(ids).await?;
        Ok(ranked
            .into_iter()
            .zip(names)
            .map(|(r, name)| SubjectHit {
                author_id: r.author_id,
                h_index: r.h_index,
                name,
            })
            .collect())
    }

    /// An author's profile with coauthors by collaboration count descending.
    ///
    /// A missing coauthor entry yields an empty list. Coauthors whose profile
    /// is missing or corrupt keep their place with no name.
    ///
    /// # Errors
    ///
    /// `NotFound` if the author has no readable profile, `StoreUnavailable`
    /// if any read fails at the store.
    pub async fn get_author_detail(&self, id: AuthorId) -> QueryResult<AuthorDetail> {
        let profile = self
            .profile(id)
            .await?
            .ok_or_else(|| QueryError::not_found(format!("author {id}")))?;

        let adjacency = or_miss(self.store.get_coauthors(id).await)?;
        let ranked = ranking::rank_coauthors(&adjacency.unwrap_or_default());

        let ids = ranked.iter().map(|&(coauthor, _)| coauthor).collect();
        let names = self.display_names(ids).await?;
        let coauthors = ranked
            .into_iter()
            .zip(names)
            .map(|((author_id, weight), name)| RankedCoauthor {
                author_id,
                weight,
                name,
            })
            .collect();

        let detail = AuthorDetail { profile, coauthors };
        tracing::debug!(
            id,
            coauthors = detail.coauthors.len(),
            unresolved = detail.unresolved_count(),
            "Author detail resolved"
        );
        Ok(detail)
    }

    /// Every subject written by the last ingestion, sorted. Empty before any ingestion.
    pub async fn list_subjects(&self) -> QueryResult<Vec<String>> {
        let subjects = or_miss(self.store.get_subject_list().await)?;
        Ok(subjects.unwrap_or_default())
    }

    /// Manifest of the last completed ingestion.
    ///
    /// `None` before any ingestion and while a run is in progress or after one
    /// failed partway.
    pub async fn manifest(&self) -> QueryResult<Option<IngestManifest>> {
        let manifest = self.sync_cache().await?;
        Ok(manifest.filter(IngestManifest::is_complete))
    }

    /// Check the stored manifest and drop every cached profile if it changed
    /// since the last check. Returns the stored manifest, complete or not.
    pub async fn sync_cache(&self) -> QueryResult<Option<IngestManifest>> {
        let manifest = or_miss(self.store.get_manifest().await)?;

        if let Some(cache) = &self.profiles {
            let mut seen = cache.seen.lock().await;
            if *seen != manifest {
                cache.entries.invalidate_all();
                tracing::info!(
                    complete = manifest.as_ref().is_some_and(IngestManifest::is_complete),
                    "Manifest changed, profile cache invalidated"
                );
                seen.clone_from(&manifest);
            }
        }
        Ok(manifest)
    }

    /// Whether profiles are cached.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.profiles.is_some()
    }

    /// Drop every cached profile.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.profiles {
            cache.entries.invalidate_all();
            tracing::info!("Profile cache invalidated");
        }
    }

    async fn profile(&self, id: AuthorId) -> QueryResult<Option<AuthorProfile>> {
        if let Some(cache) = &self.profiles {
            if let Some(profile) = cache.entries.get(&id).await {
                tracing::debug!(id, "Profile cache hit");
                return Ok(Some(profile));
            }
        }

        let profile = or_miss(self.store.get_author(id).await)?;
        if let (Some(cache), Some(profile)) = (&self.profiles, &profile) {
            cache.entries.insert(id, profile.clone()).await;
        }
        Ok(profile)
    }

    /// Names for `ids`, in order, with bounded concurrency.
    async fn display_names(&self, ids: Vec<AuthorId>) -> QueryResult<Vec<Option<String>>> {
        let lookups = ids.into_iter().map(|id| async move {
            Ok::<_, QueryError>(self.profile(id).await?.map(|p| p.name))
        });

        stream::iter(lookups)
            .buffered(self.lookup_concurrency)
            .try_collect()
            .await
    }
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("cache_enabled", &self.cache_enabled())
            .field("lookup_concurrency", &self.lookup_concurrency)
            .finish_non_exhaustive()
    }
}

/// Treat a corrupt entry as absent, logging it; pass store failures through.
fn or_miss<T>(result: IndexResult<Option<T>>) -> QueryResult<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(IndexError::Corrupt { key, reason }) => {
            tracing::error!(%key, %reason, "Corrupt index entry treated as missing");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
