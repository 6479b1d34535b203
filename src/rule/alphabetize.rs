use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::{Alphabetize, AlphabetizeOrder};

use super::ImportEntry;

/// Re-rank entries so that, within each existing rank group, specifiers are
/// in lexicographic order. Runs before out-of-order detection so the
/// detector sees the alphabetized ranks.
///
/// New ranks are globally unique: groups are visited in ascending order of
/// their original rank, and a single counter increments per entry across
/// the whole file, so `original_rank + counter` preserves group order while
/// interleaving alphabetical order within ties.
pub fn alphabetize_ranks(entries: &mut [ImportEntry], options: &Alphabetize) {
    if options.order == AlphabetizeOrder::Ignore || entries.is_empty() {
        return;
    }

    let mut by_rank: Vec<usize> = (0..entries.len()).collect();
    by_rank.sort_by(|&a, &b| cmp_rank(entries[a].rank, entries[b].rank));

    // Entries are keyed by (specifier, type-only) so a type import and a
    // value import of the same path are re-ranked independently.
    let mut new_ranks: HashMap<(String, bool), f64> = HashMap::new();
    let mut counter = 0.0;

    let mut i = 0;
    while i < by_rank.len() {
        let group_rank = entries[by_rank[i]].rank;
        let mut j = i;
        while j < by_rank.len() && entries[by_rank[j]].rank == group_rank {
            j += 1;
        }
        let mut group: Vec<usize> = by_rank[i..j].to_vec();
        group.sort_by(|&a, &b| compare_specifiers(&entries[a], &entries[b], options));
        for &idx in &group {
            new_ranks.insert(key(&entries[idx]), group_rank + counter);
            counter += 1.0;
        }
        i = j;
    }

    for entry in entries.iter_mut() {
        if let Some(&rank) = new_ranks.get(&key(entry)) {
            entry.rank = rank;
        }
    }
}

fn key(entry: &ImportEntry) -> (String, bool) {
    (entry.value.clone(), entry.type_only)
}

fn cmp_rank(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn compare_specifiers(a: &ImportEntry, b: &ImportEntry, options: &Alphabetize) -> Ordering {
    let ord = if options.case_insensitive {
        a.value.to_lowercase().cmp(&b.value.to_lowercase())
    } else {
        a.value.cmp(&b.value)
    };
    match options.order {
        AlphabetizeOrder::Asc => ord,
        AlphabetizeOrder::Desc => ord.reverse(),
        AlphabetizeOrder::Ignore => Ordering::Equal,
    }
}
