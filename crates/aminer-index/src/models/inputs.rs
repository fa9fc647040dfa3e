//! Query parameters accepted by the HTTP surface.
//!
//! Parameters arrive as raw strings and are validated here, so the query
//! service only ever sees a subject string and a numeric author id.

use serde::{Deserialize, Serialize};

use super::{AuthorId, ResponseFormat};
use crate::error::{QueryError, QueryResult};

/// Parameters for a ranked subject search (`/search`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectSearchInput {
    /// Subject name, used verbatim.
    #[serde(default)]
    pub subject: Option<String>,

    /// Maximum authors to return (all when absent).
    #[serde(default)]
    pub limit: Option<usize>,

    /// Output format.
    #[serde(default)]
    pub format: ResponseFormat,
}

impl SubjectSearchInput {
    /// Return the subject, rejecting a missing or empty parameter.
    pub fn validated_subject(&self) -> QueryResult<&str> {
        match self.subject.as_deref() {
            Some(subject) if !subject.is_empty() => Ok(subject),
            _ => Err(QueryError::validation("subject", "is required")),
        }
    }
}

/// Parameters for an author detail lookup (`/getinfo`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorDetailInput {
    /// Author index as sent by the caller.
    #[serde(default)]
    pub index: Option<String>,

    /// Output format.
    #[serde(default)]
    pub format: ResponseFormat,
}

impl AuthorDetailInput {
    /// Parse the author index, rejecting a missing or non-numeric parameter.
    pub fn validated_index(&self) -> QueryResult<AuthorId> {
        let raw = self
            .index
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| QueryError::validation("index", "is required"))?;

        raw.parse::<AuthorId>()
            .map_err(|_| QueryError::validation("index", "must be a non-negative integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_required() {
        let input = SubjectSearchInput::default();
        assert!(input.validated_subject().is_err());

        let input = SubjectSearchInput {
            subject: Some(String::new()),
            ..Default::default()
        };
        assert!(input.validated_subject().is_err());

        let input = SubjectSearchInput {
            subject: Some("data mining".to_string()),
            ..Default::default()
        };
        assert_eq!(input.validated_subject().unwrap(), "data mining");
    }

    #[test]
    fn test_index_parsing() {
        let input = AuthorDetailInput {
            index: Some("481437".to_string()),
            ..Default::default()
        };
        assert_eq!(input.validated_index().unwrap(), 481_437);

        for bad in ["", "-1", "abc", "1.5"] {
            let input = AuthorDetailInput {
                index: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(
                input.validated_index().is_err(),
                "{bad:?} should be rejected"
            );
        }

        assert!(AuthorDetailInput::default().validated_index().is_err());
    }

    #[test]
    fn test_inputs_deserialize_defaults() {
        let raw = serde_json::json!({"subject": "ai", "format": "json"});
        let input: SubjectSearchInput = serde_json::from_value(raw).unwrap();
        assert_eq!(input.format, ResponseFormat::Json);
        assert!(input.limit.is_none());
    }
}
