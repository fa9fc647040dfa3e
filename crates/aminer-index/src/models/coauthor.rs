//! Coauthor edges and index entry shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// AMiner author index.
pub type AuthorId = u64;

/// Per-author mapping from coauthor id to collaboration count.
pub type Adjacency = BTreeMap<AuthorId, u32>;

/// Per-subject mapping from author id to that author's h-index.
pub type SubjectEntry = BTreeMap<AuthorId, u32>;

/// One line of the AMiner coauthor file: two authors and how often they collaborated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoauthorEdge {
    /// First author.
    pub author1: AuthorId,

    /// Second author.
    pub author2: AuthorId,

    /// Number of collaborations.
    pub weight: u32,
}

impl CoauthorEdge {
    /// Create an edge.
    #[must_use]
    pub const fn new(author1: AuthorId, author2: AuthorId, weight: u32) -> Self {
        Self {
            author1,
            author2,
            weight,
        }
    }

    /// The same edge seen from the other author.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            author1: self.author2,
            author2: self.author1,
            weight: self.weight,
        }
    }
}
