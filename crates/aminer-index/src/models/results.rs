//! Ranked query results.

use serde::{Deserialize, Serialize};

use super::{AuthorId, AuthorProfile};

/// An author ranked within a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedAuthor {
    /// Author index.
    pub author_id: AuthorId,

    /// The author's h-index at ingestion time.
    pub h_index: u32,
}

/// A subject search hit with the author's display name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectHit {
    /// Author index.
    pub author_id: AuthorId,

    /// The author's h-index.
    pub h_index: u32,

    /// Display name, `None` when the profile is missing.
    #[serde(default)]
    pub name: Option<String>,
}

impl SubjectHit {
    /// Get the author name, falling back to "Unknown" if not resolved.
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// A coauthor ranked by collaboration count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCoauthor {
    /// Coauthor index.
    pub author_id: AuthorId,

    /// Number of collaborations.
    pub weight: u32,

    /// Display name, `None` when the coauthor's profile is missing.
    #[serde(default)]
    pub name: Option<String>,
}

impl RankedCoauthor {
    /// Get the coauthor name, falling back to "Unknown" if not resolved.
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Check whether the coauthor's profile was found.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.name.is_some()
    }
}

/// An author's profile together with their ranked coauthors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetail {
    /// The author's profile.
    pub profile: AuthorProfile,

    /// Coauthors, most frequent collaborator first.
    pub coauthors: Vec<RankedCoauthor>,
}

impl AuthorDetail {
    /// Number of coauthors whose profile could not be resolved.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.coauthors.iter().filter(|c| !c.is_resolved()).count()
    }
}
