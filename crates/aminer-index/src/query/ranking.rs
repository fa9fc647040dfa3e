//! Deterministic orderings for query results.

use std::cmp::Reverse;

use crate::models::{Adjacency, AuthorId, RankedAuthor, SubjectEntry};

/// Authors of a subject by h-index descending, ties by ascending id.
#[must_use]
pub fn rank_subject(entry: &SubjectEntry) -> Vec<RankedAuthor> {
    let mut ranked: Vec<RankedAuthor> = entry
        .iter()
        .map(|(&author_id, &h_index)| RankedAuthor { author_id, h_index })
        .collect();
    ranked.sort_by_key(|r| (Reverse(r.h_index), r.author_id));
    ranked
}

/// Coauthors by collaboration count descending, ties by ascending id.
#[must_use]
pub fn rank_coauthors(adjacency: &Adjacency) -> Vec<(AuthorId, u32)> {
    let mut ranked: Vec<(AuthorId, u32)> = adjacency
        .iter()
        .map(|(&id, &weight)| (id, weight))
        .collect();
    ranked.sort_by_key(|&(id, weight)| (Reverse(weight), id));
    ranked
}
