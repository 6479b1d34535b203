//! Full-extent computation and text edits for reorder and spacing fixes.
//!
//! A statement's "full extent" widens its source range to include trailing
//! same-line comments plus the terminating newline, and leading horizontal
//! whitespace on its own line, so edits never split a statement from its
//! comment or leave partial-line artifacts.

use regex::Regex;

use crate::correction::Correction;
use crate::parse::scanner::{Comment, ImportStmt, ScanResult};
use crate::parse::source::SourceFile;

use super::order::Direction;

/// End offset of `stmt` extended over trailing comments on its end line.
/// Stops before trailing whitespace and the newline.
pub fn end_of_trailing_comments(source: &SourceFile, scan: &ScanResult, stmt: &ImportStmt) -> usize {
    let end_line = source.line_of(stmt.end);
    let bytes = source.as_bytes();
    let mut cursor = stmt.end;
    loop {
        let mut k = cursor;
        while k < bytes.len() && (bytes[k] == b' ' || bytes[k] == b'\t') {
            k += 1;
        }
        match comment_starting_at(scan, k) {
            Some(c) if c.line_start == end_line && c.line_end == end_line => cursor = c.end,
            _ => break,
        }
    }
    cursor
}

/// Full-extent end: trailing same-line comments, trailing horizontal
/// whitespace, and the newline that terminates the line.
pub fn end_of_line_with_comments(source: &SourceFile, scan: &ScanResult, stmt: &ImportStmt) -> usize {
    let cursor = end_of_trailing_comments(source, scan, stmt);
    let bytes = source.as_bytes();
    let mut result = cursor;
    let mut i = cursor;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                result = i + 1;
                break;
            }
            b' ' | b'\t' | b'\r' => result = i + 1,
            _ => break,
        }
        i += 1;
    }
    result
}

/// Full-extent start: leading comments on the statement's end line, then
/// leading horizontal whitespace. The first byte of the file is never
/// absorbed as whitespace.
pub fn start_of_line_with_comments(
    source: &SourceFile,
    scan: &ScanResult,
    stmt: &ImportStmt,
) -> usize {
    let end_line = source.line_of(stmt.end);
    let bytes = source.as_bytes();
    let mut cursor = stmt.start;
    loop {
        let mut k = cursor;
        while k > 0 && (bytes[k - 1] == b' ' || bytes[k - 1] == b'\t') {
            k -= 1;
        }
        match comment_ending_at(scan, k) {
            Some(c) if c.line_start == end_line && c.line_end == end_line => cursor = c.start,
            _ => break,
        }
    }
    let mut result = cursor;
    let mut i = cursor;
    while i > 1 {
        let b = bytes[i - 1];
        if b != b' ' && b != b'\t' {
            break;
        }
        result = i - 1;
        i -= 1;
    }
    result
}

/// Whether reorder fixes may cross everything between two recognized
/// statements (inclusive): the endpoints and every import statement between
/// them must be plain, and the remaining gap content must be nothing but
/// whitespace and comments — a conditional block or side-effecting
/// statement in between disables the fix.
pub fn can_reorder(source: &SourceFile, scan: &ScanResult, first: usize, second: usize) -> bool {
    let (lo, hi) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    if scan.statements[lo..=hi].iter().any(|s| !s.is_reorderable()) {
        return false;
    }
    gap_is_crossable(
        source,
        scan,
        scan.statements[lo].end,
        scan.statements[hi].start,
    )
}

fn gap_is_crossable(source: &SourceFile, scan: &ScanResult, start: usize, end: usize) -> bool {
    let bytes = source.as_bytes();
    let mut i = start;
    while i < end {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if let Some(c) = comment_starting_at(scan, i) {
            i = c.end;
            continue;
        }
        if let Some(s) = statement_starting_at(scan, i) {
            i = s.end;
            continue;
        }
        return false;
    }
    true
}

fn comment_starting_at(scan: &ScanResult, offset: usize) -> Option<&Comment> {
    scan.comments
        .binary_search_by_key(&offset, |c| c.start)
        .ok()
        .map(|idx| &scan.comments[idx])
}

fn comment_ending_at(scan: &ScanResult, offset: usize) -> Option<&Comment> {
    scan.comments.iter().find(|c| c.end == offset)
}

fn statement_starting_at(scan: &ScanResult, offset: usize) -> Option<&ImportStmt> {
    scan.statements
        .binary_search_by_key(&offset, |s| s.start)
        .ok()
        .map(|idx| &scan.statements[idx])
}

/// Build the single range-replace that moves the flagged statement to the
/// other side of the anchor. `first` is the anchor statement, `second` the
/// flagged one, as in the diagnostic message. Returns None when the
/// reachability check forbids the edit.
pub fn reorder_correction(
    source: &SourceFile,
    scan: &ScanResult,
    first: usize,
    second: usize,
    direction: Direction,
) -> Option<Correction> {
    if !can_reorder(source, scan, first, second) {
        return None;
    }
    let text = source.as_str()?;
    let first_stmt = &scan.statements[first];
    let second_stmt = &scan.statements[second];

    let first_start = start_of_line_with_comments(source, scan, first_stmt);
    let first_end = end_of_line_with_comments(source, scan, first_stmt);
    let second_start = start_of_line_with_comments(source, scan, second_stmt);
    let second_end = end_of_line_with_comments(source, scan, second_stmt);

    let mut new_code = text.get(second_start..second_end)?.to_string();
    if !new_code.ends_with('\n') {
        new_code.push('\n');
    }

    match direction {
        Direction::Before => Some(Correction {
            start: first_start,
            end: second_end,
            replacement: format!("{new_code}{}", text.get(first_start..second_start)?),
        }),
        Direction::After => Some(Correction {
            start: second_start,
            end: first_end,
            replacement: format!("{}{new_code}", text.get(second_end..first_end)?),
        }),
    }
}

/// Insert a newline immediately after the statement's trailing same-line
/// comments, opening a blank line before whatever follows.
pub fn insert_blank_line_after(
    source: &SourceFile,
    scan: &ScanResult,
    stmt: &ImportStmt,
) -> Correction {
    let at = end_of_trailing_comments(source, scan, stmt);
    Correction {
        start: at,
        end: at,
        replacement: "\n".to_string(),
    }
}

/// Delete the span between the full extents of two statements — but only
/// when that span is pure whitespace; a comment in between makes the fix
/// unsafe, so the violation is reported without one.
pub fn remove_blank_lines_between(
    source: &SourceFile,
    scan: &ScanResult,
    previous: &ImportStmt,
    current: &ImportStmt,
) -> Option<Correction> {
    let start = end_of_line_with_comments(source, scan, previous);
    let end = start_of_line_with_comments(source, scan, current);
    if start >= end {
        return None;
    }
    let text = source.as_str()?;
    let span = text.get(start..end)?;
    let whitespace_only = Regex::new(r"^\s*$").ok()?;
    if !whitespace_only.is_match(span) {
        return None;
    }
    Some(Correction {
        start,
        end,
        replacement: String::new(),
    })
}
