use std::collections::HashMap;
use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::config::{GroupSpec, PathGroupSpec, Position};

use super::kind::ImportKind;

/// Group order applied when the `groups` option is omitted.
pub const DEFAULT_GROUPS: &[&str] = &["builtin", "external", "parent", "sibling", "index"];

/// A malformed rule configuration. Fatal for the file being analyzed:
/// reported once at the file root, and no import analysis runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownType(String),
    DuplicateType(String),
    InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownType(name) => {
                write!(f, "Incorrect configuration of the rule: Unknown type `{name:?}`")
            }
            ConfigError::DuplicateType(name) => {
                write!(f, "Incorrect configuration of the rule: `{name}` is duplicated")
            }
            ConfigError::InvalidPattern { pattern, message } => {
                write!(
                    f,
                    "Incorrect configuration of the rule: invalid pattern `{pattern}`: {message}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A compiled path-group override: imports whose specifier matches `pattern`
/// rank at `group`'s base rank shifted by `position / max_position`.
#[derive(Debug)]
pub struct PathGroupRule {
    pub pattern: String,
    matcher: GlobMatcher,
    pub group: ImportKind,
    pub position: i32,
}

/// The per-file rank lookup table: a base rank for every kind, plus the
/// ordered path-group overrides.
#[derive(Debug)]
pub struct RankTable {
    groups: [i32; ImportKind::COUNT],
    path_groups: Vec<PathGroupRule>,
    max_position: i32,
}

impl RankTable {
    pub fn build(
        groups: Option<&[GroupSpec]>,
        path_groups: &[PathGroupSpec],
    ) -> Result<Self, ConfigError> {
        let default_specs: Vec<GroupSpec>;
        let groups = match groups {
            Some(specs) => specs,
            None => {
                default_specs = DEFAULT_GROUPS
                    .iter()
                    .map(|&k| GroupSpec::Single(k.to_string()))
                    .collect();
                &default_specs
            }
        };
        let base = convert_groups_to_ranks(groups)?;
        let (rules, max_position) = convert_path_groups_for_ranks(path_groups)?;
        Ok(Self {
            groups: base,
            path_groups: rules,
            max_position,
        })
    }

    pub fn base_rank(&self, kind: ImportKind) -> f64 {
        f64::from(self.groups[kind.index()])
    }

    /// Rank from the first path group whose pattern matches, or None.
    /// Declaration order is significant: first match wins.
    pub fn path_rank(&self, value: &str) -> Option<f64> {
        for rule in &self.path_groups {
            if rule.matcher.is_match(value) {
                return Some(
                    self.base_rank(rule.group)
                        + f64::from(rule.position) / f64::from(self.max_position),
                );
            }
        }
        None
    }

    pub fn max_position(&self) -> i32 {
        self.max_position
    }

    pub fn path_groups(&self) -> &[PathGroupRule] {
        &self.path_groups
    }
}

/// Walk `groups` in order, assigning each kind its group index as rank.
/// Kinds absent from the configuration all receive rank `groups.len()`.
fn convert_groups_to_ranks(groups: &[GroupSpec]) -> Result<[i32; ImportKind::COUNT], ConfigError> {
    let mut assigned: [Option<i32>; ImportKind::COUNT] = [None; ImportKind::COUNT];
    for (index, spec) in groups.iter().enumerate() {
        for name in spec.members() {
            let kind = ImportKind::parse(name)
                .ok_or_else(|| ConfigError::UnknownType(name.to_string()))?;
            if assigned[kind.index()].is_some() {
                return Err(ConfigError::DuplicateType(name.to_string()));
            }
            assigned[kind.index()] = Some(index as i32);
        }
    }
    let omitted = groups.len() as i32;
    Ok(assigned.map(|rank| rank.unwrap_or(omitted)))
}

/// Resolve declared positions into signed offsets. `before` entries count
/// down so the first declared is the most preceding; `after` entries count
/// up from 1 per target group. `max_position` is at least 10 and rounds up
/// to the next power of 10, so `position / max_position` stays within the
/// group's integer rank band.
fn convert_path_groups_for_ranks(
    path_groups: &[PathGroupSpec],
) -> Result<(Vec<PathGroupRule>, i32), ConfigError> {
    let mut after: HashMap<ImportKind, i32> = HashMap::new();
    let mut before: HashMap<ImportKind, Vec<usize>> = HashMap::new();
    let mut rules = Vec::with_capacity(path_groups.len());

    for (index, spec) in path_groups.iter().enumerate() {
        let group = ImportKind::parse(&spec.group)
            .ok_or_else(|| ConfigError::UnknownType(spec.group.clone()))?;
        let mut position = 0;
        match spec.position {
            Some(Position::After) => {
                let counter = after.entry(group).or_insert(0);
                *counter += 1;
                position = *counter;
            }
            Some(Position::Before) => before.entry(group).or_default().push(index),
            None => {}
        }
        let glob = GlobBuilder::new(&spec.pattern)
            .literal_separator(true)
            .case_insensitive(spec.pattern_options.nocase)
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: spec.pattern.clone(),
                message: e.kind().to_string(),
            })?;
        rules.push(PathGroupRule {
            pattern: spec.pattern.clone(),
            matcher: glob.compile_matcher(),
            group,
            position,
        });
    }

    let mut max_position = 1;
    for indices in before.values() {
        let len = indices.len() as i32;
        for (i, &rule_idx) in indices.iter().enumerate() {
            rules[rule_idx].position = -(len - i as i32);
        }
        max_position = max_position.max(len);
    }
    for &counter in after.values() {
        max_position = max_position.max(counter);
    }

    let max_position = if max_position > 10 {
        next_power_of_10(max_position)
    } else {
        10
    };
    Ok((rules, max_position))
}

fn next_power_of_10(n: i32) -> i32 {
    let mut power = 10;
    while power < n {
        power *= 10;
    }
    power
}
