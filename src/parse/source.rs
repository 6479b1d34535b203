use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::diagnostic::Location;

#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    /// Byte offsets where each line starts (0-indexed into content)
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_vec(path.to_path_buf(), content))
    }

    /// Create a SourceFile from a string, using the given path for display purposes.
    pub fn from_string(path: PathBuf, content: String) -> Self {
        Self::from_vec(path, content.into_bytes())
    }

    /// Create a SourceFile from raw bytes and a path.
    pub fn from_vec(path: PathBuf, content: Vec<u8>) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            path,
            content,
            line_starts,
        }
    }

    /// Create a SourceFile from raw bytes (for testing).
    #[cfg(test)]
    pub fn from_bytes(path: &str, content: Vec<u8>) -> Self {
        Self::from_vec(PathBuf::from(path), content)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Source text, if the file is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Returns an iterator over lines as byte slices (without newline terminators).
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.content.split(|&b| b == b'\n')
    }

    /// The raw bytes of a 1-indexed line, without the newline terminator.
    pub fn line(&self, line: usize) -> Option<&[u8]> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line - 1];
        let end = if line < self.line_starts.len() {
            self.line_starts[line] - 1
        } else {
            self.content.len()
        };
        Some(&self.content[start..end.max(start)])
    }

    /// Convert a byte offset into a (1-indexed line, 0-indexed column) pair.
    /// Column is a character offset (UTF-8 codepoint count) within the line.
    pub fn offset_to_line_col(&self, byte_offset: usize) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_bytes = &self.content[self.line_starts[line_idx]..byte_offset];
        // Count bytes that are NOT UTF-8 continuation bytes (0x80..0xBF).
        // This equals the number of UTF-8 character starts, and works correctly
        // even for partial or invalid UTF-8.
        let col = line_bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count();
        (line_idx + 1, col)
    }

    /// 1-indexed line containing a byte offset.
    pub fn line_of(&self, byte_offset: usize) -> usize {
        self.offset_to_line_col(byte_offset).0
    }

    /// Convert a byte offset into our diagnostic Location.
    pub fn location(&self, byte_offset: usize) -> Location {
        let (line, column) = self.offset_to_line_col(byte_offset);
        Location { line, column }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap_or("<non-utf8 path>")
    }
}

fn compute_line_starts(content: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, &byte) in content.iter().enumerate() {
        if byte == b'\n' && i + 1 < content.len() {
            starts.push(i + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(s: &str) -> SourceFile {
        SourceFile::from_bytes("test.js", s.as_bytes().to_vec())
    }

    #[test]
    fn line_starts_single_line() {
        let sf = source("hello");
        assert_eq!(sf.line_starts, vec![0]);
    }

    #[test]
    fn line_starts_multiple_lines() {
        // "abc\ndef\nghi"
        // 0123 4567 89..
        let sf = source("abc\ndef\nghi");
        assert_eq!(sf.line_starts, vec![0, 4, 8]);
    }

    #[test]
    fn line_starts_trailing_newline() {
        let sf = source("abc\n");
        assert_eq!(sf.line_starts, vec![0]);
    }

    #[test]
    fn offset_to_line_col_first_char() {
        let sf = source("abc\ndef\nghi");
        assert_eq!(sf.offset_to_line_col(0), (1, 0));
    }

    #[test]
    fn offset_to_line_col_second_line_start() {
        let sf = source("abc\ndef\nghi");
        assert_eq!(sf.offset_to_line_col(4), (2, 0));
    }

    #[test]
    fn offset_to_line_col_third_line() {
        let sf = source("abc\ndef\nghi");
        assert_eq!(sf.offset_to_line_col(9), (3, 1));
    }

    #[test]
    fn line_accessor() {
        let sf = source("abc\ndef\nghi");
        assert_eq!(sf.line(1), Some(b"abc".as_slice()));
        assert_eq!(sf.line(2), Some(b"def".as_slice()));
        assert_eq!(sf.line(3), Some(b"ghi".as_slice()));
        assert_eq!(sf.line(0), None);
        assert_eq!(sf.line(4), None);
    }

    #[test]
    fn line_accessor_empty_lines() {
        let sf = source("a\n\nb\n");
        assert_eq!(sf.line(1), Some(b"a".as_slice()));
        assert_eq!(sf.line(2), Some(b"".as_slice()));
        assert_eq!(sf.line(3), Some(b"b".as_slice()));
    }

    #[test]
    fn lines_iterator() {
        let sf = source("abc\ndef\nghi");
        let lines: Vec<&[u8]> = sf.lines().collect();
        assert_eq!(lines, vec![b"abc", b"def", b"ghi"]);
    }

    #[test]
    fn as_str_utf8() {
        let sf = source("const x = 1;");
        assert_eq!(sf.as_str(), Some("const x = 1;"));
    }

    #[test]
    fn as_str_invalid_utf8() {
        let sf = SourceFile::from_bytes("bad.js", vec![0xff, 0xfe]);
        assert_eq!(sf.as_str(), None);
    }

    #[test]
    fn from_path_reads_file() {
        let dir = std::env::temp_dir().join("importcop_test_source");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("test.js");
        std::fs::write(&file, b"x = 1\n").unwrap();
        let sf = SourceFile::from_path(&file).unwrap();
        assert_eq!(sf.as_bytes(), b"x = 1\n");
        assert_eq!(sf.path, file);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn from_path_nonexistent() {
        let result = SourceFile::from_path(Path::new("/nonexistent/file.js"));
        assert!(result.is_err());
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn line_starts_first_is_zero(content in prop::collection::vec(any::<u8>(), 0..500)) {
                let starts = compute_line_starts(&content);
                prop_assert_eq!(starts[0], 0, "first line start must be 0");
            }

            #[test]
            fn line_starts_are_strictly_increasing(content in prop::collection::vec(any::<u8>(), 0..500)) {
                let starts = compute_line_starts(&content);
                for pair in starts.windows(2) {
                    prop_assert!(pair[0] < pair[1],
                        "line starts not strictly increasing: {} >= {}", pair[0], pair[1]);
                }
            }

            #[test]
            fn line_starts_follow_newlines(content in prop::collection::vec(any::<u8>(), 0..500)) {
                let starts = compute_line_starts(&content);
                for &start in &starts[1..] {
                    prop_assert!(start > 0 && content[start - 1] == b'\n',
                        "line start {} is not preceded by newline", start);
                }
            }

            #[test]
            fn offset_to_line_col_is_monotonic(content in prop::collection::vec(any::<u8>(), 1..500)) {
                let sf = SourceFile::from_bytes("test.js", content.clone());
                let mut prev = (0usize, 0usize);
                for offset in 0..content.len() {
                    let cur = sf.offset_to_line_col(offset);
                    prop_assert!(cur >= prev,
                        "monotonicity violated: offset {} -> {:?} but previous was {:?}",
                        offset, cur, prev);
                    prev = cur;
                }
            }

            #[test]
            fn line_of_in_range(content in prop::collection::vec(any::<u8>(), 1..500)) {
                let sf = SourceFile::from_bytes("test.js", content.clone());
                for offset in 0..content.len() {
                    let line = sf.line_of(offset);
                    prop_assert!(line >= 1 && line <= sf.line_count());
                }
            }
        }
    }
}
