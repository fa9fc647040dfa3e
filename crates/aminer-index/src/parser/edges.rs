//! Coauthor edge-list parsing: `#<author1>\t<author2>\t<count>`.

use std::iter::Enumerate;

use super::{RECORD_MARKER, is_blank, strip_line_ending};
use crate::error::MalformedRecord;
use crate::models::CoauthorEdge;

/// Parse one edge line.
///
/// The `#` marker is stripped, tabs become single spaces and the first three
/// space-separated fields are read as integers. Extra fields are ignored.
pub fn parse_edge_line(line: &str) -> Result<CoauthorEdge, String> {
    let line = strip_line_ending(line);
    let body = line
        .strip_prefix(RECORD_MARKER)
        .ok_or_else(|| format!("missing leading '{RECORD_MARKER}' marker"))?;

    let normalized = body.replace('\t', " ");
    let fields: Vec<&str> = normalized.split(' ').collect();
    if fields.len() < 3 {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    }

    let author1 = fields[0]
        .parse()
        .map_err(|_| format!("invalid author1 {:?}", fields[0]))?;
    let author2 = fields[1]
        .parse()
        .map_err(|_| format!("invalid author2 {:?}", fields[1]))?;
    let weight = fields[2]
        .parse()
        .map_err(|_| format!("invalid count {:?}", fields[2]))?;

    Ok(CoauthorEdge::new(author1, author2, weight))
}

/// Lazy edge parser over text lines. Blank lines are skipped.
#[derive(Debug)]
pub struct EdgeRecords<I> {
    lines: Enumerate<I>,
}

impl<I, S> Iterator for EdgeRecords<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<CoauthorEdge, MalformedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let line = line.as_ref();
            if is_blank(line) {
                continue;
            }
            let record = parse_edge_line(line)
                .map_err(|reason| MalformedRecord::new(idx + 1, reason, line));
            return Some(record);
        }
        None
    }
}

/// Parse coauthor edges from text lines.
pub fn parse_edges<I>(lines: I) -> EdgeRecords<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    EdgeRecords {
        lines: lines.into_iter().enumerate(),
    }
}
