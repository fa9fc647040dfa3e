//! Markdown output formatting.

use crate::models::{AuthorDetail, AuthorProfile, SubjectHit};

/// Format ranked subject hits as Markdown.
#[must_use]
pub fn format_subject_markdown(subject: &str, hits: &[SubjectHit]) -> String {
    if hits.is_empty() {
        return format!("No authors found for \"{subject}\".");
    }

    let mut output = format!("# {subject} ({} authors)\n\n", hits.len());

    for (i, hit) in hits.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}](/getinfo?index={}) | **h-index**: {}\n",
            i + 1,
            hit.name_or_default(),
            hit.author_id,
            hit.h_index
        ));
    }

    output
}

/// Format an author profile and their coauthors as Markdown.
#[must_use]
pub fn format_author_markdown(detail: &AuthorDetail) -> String {
    let profile = &detail.profile;
    let mut output = format_profile_markdown(profile);

    output.push_str(&format!(
        "\n### Coauthors of {} ({})\n\n",
        profile.name,
        detail.coauthors.len()
    ));

    if detail.coauthors.is_empty() {
        output.push_str("No coauthors recorded.\n");
        return output;
    }

    for coauthor in &detail.coauthors {
        output.push_str(&format!(
            "- [{}](/getinfo?index={}) | **Collaborations**: {}\n",
            coauthor.name_or_default(),
            coauthor.author_id,
            coauthor.weight
        ));
    }

    output
}

fn format_profile_markdown(profile: &AuthorProfile) -> String {
    let mut output = format!("## {}\n\n", profile.name);

    output.push_str(&format!("**Index**: {}\n\n", profile.id));

    if !profile.affiliation.is_empty() {
        output.push_str(&format!("**Affiliation**: {}\n\n", profile.affiliation));
    }

    // Metrics
    let metrics = [
        format!("**h-index**: {}", profile.h_index),
        format!("**Citations**: {}", profile.citation_count),
        format!("**Papers**: {}", profile.publication_count),
    ];
    output.push_str(&format!("{}\n\n", metrics.join(" | ")));

    output.push_str(&format!(
        "**P-index**: {} (equal A-index) | {} (unequal A-index)\n\n",
        profile.p_index_equal, profile.p_index_unequal
    ));

    let interests: Vec<&str> = profile
        .research_interests
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if !interests.is_empty() {
        output.push_str(&format!(
            "**Research interests**: {}\n",
            interests.join(", ")
        ));
    }

    output
}
