//! Coauthor adjacency index.

use std::collections::BTreeMap;

use futures::{TryStreamExt, stream};

use super::{Progress, concurrency_limit};
use crate::error::{IndexError, IndexResult};
use crate::models::{Adjacency, AuthorId, CoauthorEdge};
use crate::store::IndexStore;

/// Symmetric coauthor adjacency: author → coauthor → collaboration count.
///
/// Inserting `(a, b, w)` sets both `a → b` and `b → a` to `w`, replacing any
/// earlier weight for the pair. Counts are never summed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoauthorIndex {
    adjacency: BTreeMap<AuthorId, Adjacency>,
}

impl CoauthorIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge in both directions.
    pub fn insert_edge(&mut self, edge: CoauthorEdge) {
        for CoauthorEdge {
            author1,
            author2,
            weight,
        } in [edge, edge.reversed()]
        {
            self.adjacency
                .entry(author1)
                .or_default()
                .insert(author2, weight);
        }
    }

    /// Coauthors of `id`.
    #[must_use]
    pub fn get(&self, id: AuthorId) -> Option<&Adjacency> {
        self.adjacency.get(&id)
    }

    /// Collaboration count between two authors.
    #[must_use]
    pub fn weight(&self, author1: AuthorId, author2: AuthorId) -> Option<u32> {
        self.adjacency.get(&author1)?.get(&author2).copied()
    }

    /// Number of authors with at least one coauthor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Write one `coauthors:<id>` entry per author.
    ///
    /// Writes for different authors are independent and run up to
    /// `write_concurrency` at a time (0 = unbounded). Returns the number of
    /// entries written.
    pub async fn persist(
        &self,
        store: &IndexStore,
        write_concurrency: usize,
        progress_interval: usize,
    ) -> IndexResult<usize> {
        let limit = concurrency_limit(write_concurrency);
        let progress = Progress::new("coauthors", progress_interval, Some(self.len()));
        let progress = &progress;

        stream::iter(self.adjacency.iter().map(Ok::<_, IndexError>))
            .try_for_each_concurrent(limit, |(id, adjacency)| async move {
                store.put_coauthors(*id, adjacency).await?;
                progress.tick();
                Ok(())
            })
            .await?;

        tracing::info!(entries = self.len(), "Coauthor index written");
        Ok(self.len())
    }
}

impl Extend<CoauthorEdge> for CoauthorIndex {
    fn extend<T: IntoIterator<Item = CoauthorEdge>>(&mut self, edges: T) {
        for edge in edges {
            self.insert_edge(edge);
        }
    }
}

impl FromIterator<CoauthorEdge> for CoauthorIndex {
    fn from_iter<T: IntoIterator<Item = CoauthorEdge>>(edges: T) -> Self {
        let mut index = Self::new();
        index.extend(edges);
        index
    }
}
