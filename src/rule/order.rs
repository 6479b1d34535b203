use super::ImportEntry;

/// Which side of the anchor the flagged import should move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Before => "before",
            Direction::After => "after",
        }
    }
}

/// One ordering violation: `flagged` should move before/after `anchor`.
/// Both are indices into the entry list handed to `find_violations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub flagged: usize,
    pub anchor: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy)]
struct Ranked {
    idx: usize,
    rank: f64,
}

/// Indices of entries whose rank falls below the running maximum of all
/// preceding ranks (forward scan).
pub fn find_out_of_order(entries: &[ImportEntry]) -> Vec<usize> {
    scan(&ranked(entries)).into_iter().map(|r| r.idx).collect()
}

/// Pair every out-of-order entry with its nearest higher-ranked anchor,
/// scanning forward and backward and reporting whichever direction flags
/// fewer entries. Ties go to the forward scan and the `before` direction.
pub fn find_violations(entries: &[ImportEntry]) -> Vec<Violation> {
    let forward_list = ranked(entries);
    let forward = scan(&forward_list);
    if forward.is_empty() {
        return Vec::new();
    }

    let backward_list = reversed(&forward_list);
    let backward = scan(&backward_list);

    let (list, flagged, direction) = if backward.len() < forward.len() {
        (&backward_list, backward, Direction::After)
    } else {
        (&forward_list, forward, Direction::Before)
    };

    let mut violations = Vec::with_capacity(flagged.len());
    for f in flagged {
        // First entry in the scanned list with a strictly greater rank.
        // One always exists for a flagged entry; skip defensively if not.
        let Some(anchor) = list.iter().find(|item| item.rank > f.rank) else {
            continue;
        };
        violations.push(Violation {
            flagged: f.idx,
            anchor: anchor.idx,
            direction,
        });
    }
    violations
}

fn ranked(entries: &[ImportEntry]) -> Vec<Ranked> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, e)| Ranked { idx, rank: e.rank })
        .collect()
}

/// Reverse element order and negate each rank, so the same forward scan
/// detects violations in the opposite direction.
fn reversed(list: &[Ranked]) -> Vec<Ranked> {
    list.iter()
        .rev()
        .map(|r| Ranked {
            idx: r.idx,
            rank: -r.rank,
        })
        .collect()
}

fn scan(list: &[Ranked]) -> Vec<Ranked> {
    let Some(&first) = list.first() else {
        return Vec::new();
    };
    let mut max_seen = first;
    let mut out = Vec::new();
    for &item in list {
        if item.rank < max_seen.rank {
            out.push(item);
        }
        if max_seen.rank < item.rank {
            max_seen = item;
        }
    }
    out
}
