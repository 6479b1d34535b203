use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".importcop.json";

/// One entry of the `groups` option: a kind name, or a list of kind names
/// that share a rank.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GroupSpec {
    Single(String),
    Many(Vec<String>),
}

impl GroupSpec {
    pub fn members(&self) -> Vec<&str> {
        match self {
            GroupSpec::Single(s) => vec![s.as_str()],
            GroupSpec::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Before,
    After,
}

/// Options forwarded to the glob matcher for one path group. Only `nocase`
/// changes behavior here; `nocomment` and `dot` are accepted for
/// compatibility (`#` is never a comment marker for this matcher, and
/// dotfiles always match).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PatternOptions {
    #[serde(default)]
    pub nocase: bool,
    #[serde(default)]
    pub nocomment: bool,
    #[serde(default)]
    pub dot: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathGroupSpec {
    pub pattern: String,
    #[serde(default, rename = "patternOptions")]
    pub pattern_options: PatternOptions,
    pub group: String,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewlinesBetween {
    #[default]
    Ignore,
    Always,
    AlwaysAndInsideGroups,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetizeOrder {
    #[default]
    Ignore,
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alphabetize {
    #[serde(default)]
    pub order: AlphabetizeOrder,
    #[serde(default, rename = "caseInsensitive")]
    pub case_insensitive: bool,
}

/// The rule's options object — the top-level content of `.importcop.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    #[serde(default)]
    pub groups: Option<Vec<GroupSpec>>,
    #[serde(default, rename = "pathGroups")]
    pub path_groups: Vec<PathGroupSpec>,
    #[serde(default, rename = "pathGroupsExcludedImportTypes")]
    pub path_groups_excluded_import_types: Option<Vec<String>>,
    #[serde(default, rename = "newlines-between")]
    pub newlines_between: NewlinesBetween,
    #[serde(default)]
    pub alphabetize: Alphabetize,
    #[serde(default, rename = "warnOnUnassignedImports")]
    pub warn_on_unassigned_imports: bool,
    /// Glob patterns classified as `internal` by the default import-kind
    /// resolver (stands in for resolver-based internal detection).
    #[serde(default, rename = "internalPatterns")]
    pub internal_patterns: Vec<String>,
}

/// Load options from the given path, or from `.importcop.json` in the
/// current directory. Returns defaults if the file doesn't exist.
pub fn load_options(path: Option<&Path>) -> Result<Options> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => Path::new(DEFAULT_CONFIG_FILE).to_path_buf(),
    };

    if !config_path.exists() {
        return Ok(Options::default());
    }

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let options: Options = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(options)
}
