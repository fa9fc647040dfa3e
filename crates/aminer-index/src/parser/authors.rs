//! Author record parsing.
//!
//! An author record is nine tagged lines:
//!
//! ```text
//! #index 1
//! #n Jane Smith
//! #a MIT
//! #pc 50
//! #cn 1000
//! #hi 7
//! #pi 12.5000
//! #upi 10.2500
//! #t data mining;machine learning
//! ```
//!
//! Long fields may wrap onto following untagged lines; those are folded back
//! onto the tagged line before the block is read.

use std::iter::{Enumerate, Peekable};
use std::str::FromStr;

use super::{RECORD_MARKER, is_blank, strip_line_ending};
use crate::error::MalformedRecord;
use crate::models::AuthorProfile;

/// Number of tagged lines in an author record.
pub const BLOCK_LINES: usize = 9;

const BLOCK_START_TAG: &str = "#index";

/// A tagged line with its continuation lines folded on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TaggedLine {
    line: usize,
    text: String,
}

impl TaggedLine {
    fn tag(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    fn starts_block(&self) -> bool {
        self.tag() == BLOCK_START_TAG
    }

    /// Everything after the tag, trimmed. A bare tag has an empty value.
    fn value(&self) -> &str {
        self.text
            .split_once(' ')
            .map_or("", |(_, rest)| rest.trim())
    }
}

/// Folds continuation lines onto the preceding `#` line and drops untagged text.
struct TaggedLines<I>
where
    I: Iterator,
{
    lines: Peekable<Enumerate<I>>,
}

impl<I> Iterator for TaggedLines<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = TaggedLine;

    fn next(&mut self) -> Option<TaggedLine> {
        loop {
            let (idx, first) = self.lines.next()?;
            let mut text = strip_line_ending(first.as_ref()).to_string();

            while let Some((_, next)) = self.lines.peek() {
                let next = next.as_ref();
                if is_blank(next) || next.starts_with(RECORD_MARKER) {
                    break;
                }
                if let Some((_, continuation)) = self.lines.next() {
                    text.push_str(strip_line_ending(continuation.as_ref()));
                }
            }

            if text.starts_with(RECORD_MARKER) {
                return Some(TaggedLine {
                    line: idx + 1,
                    text,
                });
            }
        }
    }
}

/// Lazy author profile parser over text lines.
///
/// Tagged lines are grouped into blocks that start at `#index`; every block
/// yields one profile or one [`MalformedRecord`].
pub struct ProfileRecords<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    tagged: Peekable<TaggedLines<I>>,
}

impl<I> Iterator for ProfileRecords<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<AuthorProfile, MalformedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.tagged.next()?;
        let mut block = vec![first];

        while let Some(next) = self.tagged.peek() {
            if next.starts_block() {
                break;
            }
            block.extend(self.tagged.next());
        }

        Some(read_block(&block))
    }
}

/// Parse author profiles from text lines.
pub fn parse_profiles<I>(lines: I) -> ProfileRecords<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let tagged = TaggedLines {
        lines: lines.into_iter().enumerate().peekable(),
    };
    ProfileRecords {
        tagged: tagged.peekable(),
    }
}

fn read_block(block: &[TaggedLine]) -> Result<AuthorProfile, MalformedRecord> {
    let first = &block[0];
    let malformed = |reason: String| MalformedRecord::new(first.line, reason, first.text.clone());

    if !first.starts_block() {
        return Err(malformed(format!(
            "record block does not start with {BLOCK_START_TAG}"
        )));
    }
    if block.len() != BLOCK_LINES {
        return Err(malformed(format!(
            "expected {BLOCK_LINES} field lines, found {}",
            block.len()
        )));
    }

    let p_index_equal = number::<f64>(&block[6], "pi").map_err(&malformed)?;
    let p_index_unequal = number::<f64>(&block[7], "upi").map_err(&malformed)?;
    for (value, field) in [(p_index_equal, "pi"), (p_index_unequal, "upi")] {
        if !value.is_finite() || value < 0.0 {
            return Err(malformed(format!(
                "{field} must be a non-negative number, got {value}"
            )));
        }
    }

    Ok(AuthorProfile {
        id: number(&block[0], "index").map_err(&malformed)?,
        name: block[1].value().to_string(),
        affiliation: block[2].value().to_string(),
        publication_count: number(&block[3], "pc").map_err(&malformed)?,
        citation_count: number(&block[4], "cn").map_err(&malformed)?,
        h_index: number(&block[5], "hi").map_err(&malformed)?,
        p_index_equal,
        p_index_unequal,
        research_interests: AuthorProfile::split_interests(block[8].value()),
    })
}

fn number<T: FromStr>(line: &TaggedLine, field: &str) -> Result<T, String> {
    let value = line.value();
    value
        .parse()
        .map_err(|_| format!("invalid {field} {value:?} at line {}", line.line))
}
