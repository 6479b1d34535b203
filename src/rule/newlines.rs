use crate::config::NewlinesBetween;
use crate::parse::source::SourceFile;

use super::ImportEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingIssue {
    /// Ranks differ but no blank line separates the statements.
    MissingBetweenGroups,
    /// Same rank with a blank line, under plain `always`.
    ExtraInsideGroup,
    /// Any blank line, under `never`.
    ExtraBetweenGroups,
}

impl SpacingIssue {
    pub fn message(self) -> &'static str {
        match self {
            SpacingIssue::MissingBetweenGroups => {
                "There should be at least one empty line between import groups"
            }
            SpacingIssue::ExtraInsideGroup => {
                "There should be no empty line within import group"
            }
            SpacingIssue::ExtraBetweenGroups => {
                "There should be no empty line between import groups"
            }
        }
    }
}

/// One spacing violation between consecutive entries; indices into the
/// entry list. Violations are reported on the previous entry's node.
#[derive(Debug, Clone, Copy)]
pub struct SpacingViolation {
    pub previous: usize,
    pub current: usize,
    pub issue: SpacingIssue,
}

/// Walk consecutive entry pairs and flag spacing violations for the given
/// mode. Runs on pre-alphabetization ranks: rank equality here means "same
/// group", which alphabetization would otherwise destroy.
pub fn check_spacing(
    source: &SourceFile,
    entries: &[ImportEntry],
    mode: NewlinesBetween,
) -> Vec<SpacingViolation> {
    let mut violations = Vec::new();
    if mode == NewlinesBetween::Ignore {
        return violations;
    }
    for current in 1..entries.len() {
        let previous = current - 1;
        let empty = empty_lines_between(source, &entries[previous], &entries[current]);
        match mode {
            NewlinesBetween::Always | NewlinesBetween::AlwaysAndInsideGroups => {
                if entries[current].rank != entries[previous].rank && empty == 0 {
                    violations.push(SpacingViolation {
                        previous,
                        current,
                        issue: SpacingIssue::MissingBetweenGroups,
                    });
                } else if entries[current].rank == entries[previous].rank
                    && empty > 0
                    && mode == NewlinesBetween::Always
                {
                    violations.push(SpacingViolation {
                        previous,
                        current,
                        issue: SpacingIssue::ExtraInsideGroup,
                    });
                }
            }
            NewlinesBetween::Never => {
                if empty > 0 {
                    violations.push(SpacingViolation {
                        previous,
                        current,
                        issue: SpacingIssue::ExtraBetweenGroups,
                    });
                }
            }
            NewlinesBetween::Ignore => {}
        }
    }
    violations
}

/// Count lines that are empty after trimming, strictly between the end line
/// of `previous` and the start line of `current`.
fn empty_lines_between(source: &SourceFile, previous: &ImportEntry, current: &ImportEntry) -> usize {
    let prev_end_line = source.line_of(previous.node_span.1.saturating_sub(1));
    let curr_start_line = source.line_of(current.node_span.0);
    if curr_start_line <= prev_end_line + 1 {
        return 0;
    }
    (prev_end_line + 1..curr_start_line)
        .filter(|&line| {
            source
                .line(line)
                .is_some_and(|bytes| bytes.iter().all(u8::is_ascii_whitespace))
        })
        .count()
}
