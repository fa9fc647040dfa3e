//! JSON output formatting.

use serde_json::{Value, json};

use crate::models::{AuthorDetail, AuthorProfile, RankedCoauthor, SubjectHit};

/// Create a compact profile representation for JSON output.
#[must_use]
fn compact_profile(profile: &AuthorProfile) -> Value {
    let mut obj = json!({
        "index": profile.id,
        "name": profile.name,
        "hIndex": profile.h_index,
        "citations": profile.citation_count,
        "papers": profile.publication_count,
        "pIndexEqual": profile.p_index_equal,
        "pIndexUnequal": profile.p_index_unequal,
    });

    if !profile.affiliation.is_empty() {
        obj["affiliation"] = json!(profile.affiliation);
    }

    let interests: Vec<&String> = profile
        .research_interests
        .iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !interests.is_empty() {
        obj["interests"] = json!(interests);
    }

    obj
}

fn compact_coauthor(coauthor: &RankedCoauthor) -> Value {
    json!({
        "index": coauthor.author_id,
        "name": coauthor.name_or_default(),
        "collaborations": coauthor.weight,
    })
}

/// Subject search results as JSON.
#[must_use]
pub fn subject_hits_json(subject: &str, hits: &[SubjectHit]) -> Value {
    let authors: Vec<Value> = hits
        .iter()
        .map(|hit| {
            json!({
                "index": hit.author_id,
                "name": hit.name_or_default(),
                "hIndex": hit.h_index,
            })
        })
        .collect();

    json!({
        "subject": subject,
        "total": authors.len(),
        "authors": authors,
    })
}

/// Author detail as JSON.
#[must_use]
pub fn author_detail_json(detail: &AuthorDetail) -> Value {
    let mut obj = compact_profile(&detail.profile);
    let coauthors: Vec<Value> = detail.coauthors.iter().map(compact_coauthor).collect();
    obj["coauthors"] = json!(coauthors);
    obj
}
