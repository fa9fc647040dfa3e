//! Record parsers for the AMiner source files.
//!
//! Both parsers are lazy iterators over text lines yielding
//! `Result<record, MalformedRecord>`. A malformed line or block never stops
//! the iteration; callers skip it and keep the warning.

mod authors;
mod edges;

use std::io::{self, BufRead};

pub use authors::{BLOCK_LINES, ProfileRecords, parse_profiles};
pub use edges::{EdgeRecords, parse_edge_line, parse_edges};

/// Leading marker of every record line in both source files.
pub const RECORD_MARKER: char = '#';

/// Strip a trailing `\n` / `\r\n`.
pub(crate) fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(|c| c == '\n' || c == '\r')
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Lines of a reader, decoded as UTF-8 with lossy replacement.
///
/// The AMiner dumps are not reliably UTF-8, so invalid bytes are replaced
/// rather than failing the whole pass. An I/O error ends the iteration and is
/// reported by [`LossyLines::finish`].
#[derive(Debug)]
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
    error: Option<io::Error>,
    done: bool,
}

impl<R: BufRead> LossyLines<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            error: None,
            done: false,
        }
    }

    /// Surface the I/O error that ended iteration early, or hand back the reader.
    pub fn finish(self) -> io::Result<R> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.reader),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buf);
                Some(strip_line_ending(&line).to_string())
            }
            Err(e) => {
                self.error = Some(e);
                self.done = true;
                None
            }
        }
    }
}
