//! Author profile model matching the AMiner author record.

use serde::{Deserialize, Serialize};

use super::AuthorId;

/// Separator between subjects in an author's research interests.
pub const INTEREST_DELIMITER: char = ';';

/// An author profile from the AMiner author dump.
///
/// Created once per ingestion from a 9-line record block and always replaced
/// wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// AMiner author index.
    #[serde(rename = "index")]
    pub id: AuthorId,

    /// Author name.
    pub name: String,

    /// Affiliation(s), as a single free-text field.
    #[serde(rename = "af")]
    pub affiliation: String,

    /// Number of published papers.
    #[serde(rename = "pc")]
    pub publication_count: u32,

    /// Total number of citations.
    #[serde(rename = "cn")]
    pub citation_count: u64,

    /// h-index.
    #[serde(rename = "hi")]
    pub h_index: u32,

    /// P-index with equal A-index.
    #[serde(rename = "pi")]
    pub p_index_equal: f64,

    /// P-index with unequal A-index.
    #[serde(rename = "upi")]
    pub p_index_unequal: f64,

    /// Research interests in authored order.
    ///
    /// Stored as one `;`-joined string, so an empty list is read back as a
    /// single empty subject, the same thing splitting an empty interests line
    /// produces.
    #[serde(rename = "t", with = "joined_interests")]
    pub research_interests: Vec<String>,
}

impl AuthorProfile {
    /// Split a raw interests field into subjects. Tokens are kept verbatim.
    #[must_use]
    pub fn split_interests(raw: &str) -> Vec<String> {
        raw.split(INTEREST_DELIMITER).map(str::to_string).collect()
    }
}

mod joined_interests {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{AuthorProfile, INTEREST_DELIMITER};

    pub fn serialize<S>(interests: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0u8; 4];
        let joined = interests.join(INTEREST_DELIMITER.encode_utf8(&mut buf));
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(AuthorProfile::split_interests(&raw))
    }
}
