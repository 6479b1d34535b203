use std::collections::HashSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::kind::ImportKind;
use super::ranks::{ConfigError, RankTable};
use super::{DeclForm, ImportEntry};

/// Rank penalty for `require()` forms, placing all CommonJS imports after
/// all ES-module imports of equal base rank. Fixed constant: configurations
/// with 100 or more groups can collide with it (see the collision test).
pub const REQUIRE_RANK_PENALTY: f64 = 100.0;

/// Node.js core modules, sorted for binary search. `node:`-prefixed
/// specifiers are stripped before lookup.
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// The default import-kind oracle. Classifies by specifier shape alone —
/// no module resolution — with an optional glob list promoting matching
/// specifiers to `internal`.
#[derive(Debug)]
pub struct KindResolver {
    internal: Option<GlobSet>,
}

impl KindResolver {
    pub fn new(internal_patterns: &[String]) -> Result<Self, ConfigError> {
        if internal_patterns.is_empty() {
            return Ok(Self { internal: None });
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in internal_patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.kind().to_string(),
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: internal_patterns.join(", "),
            message: e.kind().to_string(),
        })?;
        Ok(Self {
            internal: Some(set),
        })
    }

    pub fn resolve(&self, specifier: &str) -> ImportKind {
        if specifier.is_empty() {
            return ImportKind::Unknown;
        }
        let bare = specifier.strip_prefix("node:").unwrap_or(specifier);
        if NODE_BUILTINS.binary_search(&bare).is_ok() {
            return ImportKind::Builtin;
        }
        if is_index(specifier) {
            return ImportKind::Index;
        }
        if specifier.starts_with("./") {
            return ImportKind::Sibling;
        }
        if specifier == ".." || specifier.starts_with("../") {
            return ImportKind::Parent;
        }
        if let Some(set) = &self.internal {
            if set.is_match(specifier) {
                return ImportKind::Internal;
            }
        }
        if specifier.starts_with('/') {
            return ImportKind::Unknown;
        }
        if is_module_name(specifier) {
            return ImportKind::External;
        }
        ImportKind::Unknown
    }
}

fn is_index(specifier: &str) -> bool {
    if specifier == "." || specifier == "./" {
        return true;
    }
    match specifier.strip_prefix("./index") {
        Some("") => true,
        Some(rest) => rest.starts_with('.') && !rest.contains('/'),
        None => false,
    }
}

fn is_module_name(specifier: &str) -> bool {
    specifier
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '@' || c == '_')
}

/// Compute the rank for one recorded import.
///
/// The entry's own tags win first (`object` for import-equals object
/// references, `type` for type-only imports); otherwise the oracle
/// classifies the specifier. Path groups are consulted only for kinds
/// outside the exclusion set, in declared order, first match wins.
pub fn compute_rank(
    table: &RankTable,
    resolver: &KindResolver,
    entry: &ImportEntry,
    excluded: &HashSet<ImportKind>,
) -> f64 {
    let imp_kind = if entry.form == DeclForm::ImportObject {
        ImportKind::Object
    } else if entry.type_only {
        ImportKind::Type
    } else {
        resolver.resolve(&entry.value)
    };

    let mut rank = if excluded.contains(&imp_kind) {
        None
    } else {
        table.path_rank(&entry.value)
    }
    .unwrap_or_else(|| table.base_rank(imp_kind));

    if entry.form == DeclForm::Require {
        rank += REQUIRE_RANK_PENALTY;
    }
    rank
}
