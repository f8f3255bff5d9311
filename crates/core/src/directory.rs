//! Directory listing view models
//!
//! Pure functions that turn the flat list of packages, commands, and nested
//! modules found under a unit into the two-level tree rendered on unit pages.
//! Entries are grouped by the first segment of their suffix; the group whose
//! prefix names an entry directly carries that entry as its `root`.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Package record as returned by the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub synopsis: String,
}

/// One package, command, or nested module relative to a containing unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub suffix: String,
    pub url: String,
    pub synopsis: String,
    pub is_module: bool,
    pub is_internal: bool,
    #[serde(default)]
    pub is_command: bool,
}

impl DirectoryEntry {
    pub fn package(
        suffix: impl Into<String>,
        url: impl Into<String>,
        synopsis: impl Into<String>,
    ) -> Self {
        let suffix = suffix.into();
        Self {
            is_internal: is_internal_suffix(&suffix),
            suffix,
            url: url.into(),
            synopsis: synopsis.into(),
            is_module: false,
            is_command: false,
        }
    }

    pub fn module(suffix: impl Into<String>, url: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self {
            is_internal: is_internal_suffix(&suffix),
            suffix,
            url: url.into(),
            synopsis: String::new(),
            is_module: true,
            is_command: false,
        }
    }

    pub fn command(mut self, is_command: bool) -> Self {
        self.is_command = is_command;
        self
    }
}

/// Node of the directory tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryGroup {
    pub prefix: String,
    pub root: Option<DirectoryEntry>,
    pub children: Vec<DirectoryEntry>,
}

impl DirectoryGroup {
    fn new(prefix: String) -> Self {
        Self {
            prefix,
            root: None,
            children: Vec::new(),
        }
    }

    /// True when neither the root nor any child is outside an `internal` path.
    ///
    /// The renderer collapses such groups by default.
    pub fn is_all_internal(&self) -> bool {
        self.root.iter().chain(self.children.iter()).all(|e| e.is_internal)
    }

    /// Number of entries in the group, root included
    pub fn len(&self) -> usize {
        self.children.len() + usize::from(self.root.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Directory listing of a unit, split into library packages and commands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directories {
    pub packages: Vec<DirectoryGroup>,
    pub commands: Vec<DirectoryGroup>,
}

impl Directories {
    /// Split entries on `is_command` and build a tree for each side
    pub fn assemble(entries: Vec<DirectoryEntry>) -> Self {
        let (commands, packages): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.is_command);

        Self {
            packages: build_directory_tree(packages),
            commands: build_directory_tree(commands),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.commands.is_empty()
    }
}

/// Whether a suffix has a path segment named exactly `internal`
pub fn is_internal_suffix(suffix: &str) -> bool {
    suffix == "internal"
        || suffix.starts_with("internal/")
        || suffix.ends_with("/internal")
        || suffix.contains("/internal/")
}

/// Group entries into a two-level tree keyed by the first suffix segment
///
/// Groups come back sorted by prefix. Children keep the order in which they
/// were supplied; no secondary sort is applied. When two entries name the
/// same prefix exactly, the last one becomes the root.
pub fn build_directory_tree(entries: Vec<DirectoryEntry>) -> Vec<DirectoryGroup> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut groups: HashMap<String, DirectoryGroup> = HashMap::new();

    for mut entry in entries {
        entry.is_internal = is_internal_suffix(&entry.suffix);

        let (prefix, rest) = match entry.suffix.split_once('/') {
            Some((prefix, rest)) => (prefix.to_string(), Some(rest.to_string())),
            None => (entry.suffix.clone(), None),
        };

        let group = groups
            .entry(prefix.clone())
            .or_insert_with(|| DirectoryGroup::new(prefix));

        match rest {
            Some(rest) => {
                entry.suffix = rest;
                group.children.push(entry);
            }
            None => {
                if let Some(previous) = &group.root {
                    log::debug!(
                        "directory root {:?} replaced by {:?}",
                        previous.url,
                        entry.url
                    );
                }
                group.root = Some(entry);
            }
        }
    }

    let mut groups: Vec<DirectoryGroup> = groups.into_values().collect();
    groups.sort_by(|a, b| a.prefix.cmp(&b.prefix));
    groups
}

/// Link target for a unit, pinned to `version` when one was requested
pub fn unit_url(path: &str, version: Option<&str>) -> String {
    match version {
        Some(version) if !version.is_empty() => format!("/{path}@{version}"),
        _ => format!("/{path}"),
    }
}

/// Split a request path into a unit path and an optional version
///
/// Accepts `path@version` and `module@version/sub/dir`. Leading and trailing
/// slashes are ignored.
pub fn parse_unit_path(raw: &str) -> Result<(String, Option<String>), CoreError> {
    let raw = raw.trim_matches('/');
    if raw.is_empty() {
        return Err(CoreError::InvalidArgument("empty unit path".to_string()));
    }

    let Some((before, after)) = raw.split_once('@') else {
        return Ok((raw.to_string(), None));
    };

    let (version, rest) = match after.split_once('/') {
        Some((version, rest)) => (version, Some(rest)),
        None => (after, None),
    };

    if before.is_empty() || version.is_empty() {
        return Err(CoreError::InvalidArgument(format!(
            "malformed unit path: {raw}"
        )));
    }

    let path = match rest {
        Some(rest) if !rest.is_empty() => format!("{before}/{rest}"),
        _ => before.to_string(),
    };

    Ok((path, Some(version.to_string())))
}

/// Strip `unit_path` from `full_path`
///
/// Returns an empty suffix for the unit itself and `None` when `full_path`
/// does not live under `unit_path`.
pub fn suffix_of<'a>(full_path: &'a str, unit_path: &str) -> Option<&'a str> {
    if full_path == unit_path {
        return Some("");
    }
    full_path
        .strip_prefix(unit_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}

/// Convert package records under `unit_path` into directory entries
///
/// The unit itself and paths outside of it are skipped. Packages named
/// `main` are flagged as commands.
pub fn entries_from_packages(
    unit_path: &str,
    version: Option<&str>,
    packages: &[PackageInfo],
) -> Vec<DirectoryEntry> {
    packages
        .iter()
        .filter_map(|pkg| {
            let suffix = suffix_of(&pkg.path, unit_path)?;
            if suffix.is_empty() {
                return None;
            }
            let url = unit_url(&pkg.path, version);
            Some(
                DirectoryEntry::package(suffix, url, pkg.synopsis.clone())
                    .command(pkg.name == "main"),
            )
        })
        .collect()
}

/// Convert nested module paths under `unit_path` into directory entries
///
/// Nested modules are versioned independently, so their links are never
/// pinned to the requested version.
pub fn entries_from_modules(unit_path: &str, module_paths: &[String]) -> Vec<DirectoryEntry> {
    module_paths
        .iter()
        .filter_map(|path| {
            let suffix = suffix_of(path, unit_path)?;
            if suffix.is_empty() {
                return None;
            }
            Some(DirectoryEntry::module(suffix, unit_url(path, None)))
        })
        .collect()
}
