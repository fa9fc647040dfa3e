//! MD5 digests of source files, computed while they are parsed.

use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::{IngestError, IngestResult};

/// Reader adapter that hashes every byte read through it.
pub struct Md5Reader<R> {
    inner: R,
    hasher: Md5,
}

impl<R> Md5Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Md5::new(),
        }
    }

    /// Lowercase hex digest of everything read so far.
    #[must_use]
    pub fn hex_digest(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

impl<R: Read> Read for Md5Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Compare a computed digest with the expected one, ignoring case and surrounding whitespace.
pub fn verify(path: &Path, expected: Option<&str>, actual: &str) -> IngestResult<()> {
    match expected.map(str::trim) {
        Some(expected) if !expected.eq_ignore_ascii_case(actual) => {
            Err(IngestError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: expected.to_ascii_lowercase(),
                actual: actual.to_string(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn digest_of(bytes: &[u8]) -> String {
        let mut reader = Md5Reader::new(Cursor::new(bytes.to_vec()));
        io::copy(&mut reader, &mut io::sink()).unwrap();
        reader.hex_digest()
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(digest_of(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(digest_of(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_verify() {
        let path = Path::new("AMiner-Coauthor.txt");
        let actual = "900150983cd24fb0d6963f7d28e17f72";

        assert!(verify(path, None, actual).is_ok());
        let padded = " 900150983CD24FB0D6963F7D28E17F72\n";
        assert!(verify(path, Some(padded), actual).is_ok());

        let empty = "d41d8cd98f00b204e9800998ecf8427e";
        let err = verify(path, Some(empty), actual).unwrap_err();
        assert!(matches!(err, IngestError::ChecksumMismatch { .. }));
        assert!(err.to_string().contains("AMiner-Coauthor.txt"));
    }
}
