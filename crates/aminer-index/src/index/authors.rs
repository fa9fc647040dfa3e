//! Author profile table and subject index.

use std::collections::BTreeMap;

use futures::{TryStreamExt, stream};

use super::{Progress, concurrency_limit};
use crate::error::{IndexError, IndexResult};
use crate::models::{AuthorId, AuthorProfile, SubjectEntry};
use crate::store::IndexStore;

/// Author profiles plus the subject → author → h-index mapping derived from them.
///
/// Invariant: an author appears in a subject's entry iff that subject is one
/// of the author's current research interests. Re-inserting a profile id
/// replaces the profile and withdraws the old profile's memberships.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorIndex {
    profiles: BTreeMap<AuthorId, AuthorProfile>,
    subjects: BTreeMap<String, SubjectEntry>,
}

impl AuthorIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a profile and register it under each of its interests.
    pub fn insert_profile(&mut self, profile: AuthorProfile) {
        if let Some(previous) = self.profiles.remove(&profile.id) {
            self.withdraw(&previous);
        }

        for subject in &profile.research_interests {
            self.subjects
                .entry(subject.clone())
                .or_default()
                .insert(profile.id, profile.h_index);
        }
        self.profiles.insert(profile.id, profile);
    }

    fn withdraw(&mut self, previous: &AuthorProfile) {
        for subject in &previous.research_interests {
            if let Some(entry) = self.subjects.get_mut(subject) {
                entry.remove(&previous.id);
                if entry.is_empty() {
                    self.subjects.remove(subject);
                }
            }
        }
    }

    #[must_use]
    pub fn profile(&self, id: AuthorId) -> Option<&AuthorProfile> {
        self.profiles.get(&id)
    }

    #[must_use]
    pub fn subject(&self, name: &str) -> Option<&SubjectEntry> {
        self.subjects.get(name)
    }

    /// Every distinct subject, sorted.
    pub fn subject_names(&self) -> impl Iterator<Item = &str> {
        self.subjects.keys().map(String::as_str)
    }

    #[must_use]
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Write every `author:<id>` and `subject:<name>` entry, then the subject list.
    ///
    /// Subjects listed by the previous ingestion but absent from this index
    /// are retired, so they read back as absent. Returns the number of
    /// profile and subject entries written.
    pub async fn persist(
        &self,
        store: &IndexStore,
        write_concurrency: usize,
        progress_interval: usize,
    ) -> IndexResult<(usize, usize)> {
        let limit = concurrency_limit(write_concurrency);

        let progress = Progress::new("authors", progress_interval, Some(self.profile_count()));
        let progress = &progress;
        stream::iter(self.profiles.iter().map(Ok::<_, IndexError>))
            .try_for_each_concurrent(limit, |(id, profile)| async move {
                store.put_author(*id, profile).await?;
                progress.tick();
                Ok(())
            })
            .await?;

        let progress = Progress::new("subjects", progress_interval, Some(self.subject_count()));
        let progress = &progress;
        stream::iter(self.subjects.iter().map(Ok::<_, IndexError>))
            .try_for_each_concurrent(limit, |(name, entry)| async move {
                store.put_subject(name, entry).await?;
                progress.tick();
                Ok(())
            })
            .await?;

        let retired = self.retire_vanished(store, limit).await?;

        let names: Vec<String> = self.subjects.keys().cloned().collect();
        store.put_subject_list(&names).await?;

        tracing::info!(
            authors = self.profile_count(),
            subjects = self.subject_count(),
            retired,
            "Author and subject indexes written"
        );
        Ok((self.profile_count(), self.subject_count()))
    }

    async fn retire_vanished(
        &self,
        store: &IndexStore,
        limit: Option<usize>,
    ) -> IndexResult<usize> {
        let previous = match store.get_subject_list().await {
            Ok(previous) => previous.unwrap_or_default(),
            Err(IndexError::Corrupt { key, reason }) => {
                tracing::warn!(
                    %key,
                    %reason,
                    "Previous subject list unreadable, nothing retired"
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let vanished: Vec<&String> = previous
            .iter()
            .filter(|name| !self.subjects.contains_key(name.as_str()))
            .collect();

        stream::iter(vanished.iter().map(Ok::<_, IndexError>))
            .try_for_each_concurrent(limit, |name| async move {
                store.retire_subject(name).await
            })
            .await?;
        Ok(vanished.len())
    }
}

impl Extend<AuthorProfile> for AuthorIndex {
    fn extend<T: IntoIterator<Item = AuthorProfile>>(&mut self, profiles: T) {
        for profile in profiles {
            self.insert_profile(profile);
        }
    }
}

impl FromIterator<AuthorProfile> for AuthorIndex {
    fn from_iter<T: IntoIterator<Item = AuthorProfile>>(profiles: T) -> Self {
        let mut index = Self::new();
        index.extend(profiles);
        index
    }
}
