//! Output formatting for query results.
//!
//! Each result renders as Markdown (human readable) or compact JSON.

pub mod json;
pub mod markdown;

pub use json::{author_detail_json, subject_hits_json};
pub use markdown::{format_author_markdown, format_subject_markdown};

use crate::models::{AuthorDetail, ResponseFormat, SubjectHit};

/// Render subject search results.
#[must_use]
pub fn render_subject(subject: &str, hits: &[SubjectHit], format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Markdown => format_subject_markdown(subject, hits),
        ResponseFormat::Json => format!("{:#}", subject_hits_json(subject, hits)),
    }
}

/// Render an author detail.
#[must_use]
pub fn render_author(detail: &AuthorDetail, format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Markdown => format_author_markdown(detail),
        ResponseFormat::Json => format!("{:#}", author_detail_json(detail)),
    }
}
