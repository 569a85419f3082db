//! Line-oriented input lists: community strings and range specifications.
//!
//! One entry per line. Range files are trimmed and allow blank lines and
//! `#` comments. Community strings are taken verbatim since whitespace and
//! `#` are legal inside a community; only empty lines are skipped.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{DiscoverError, Result};

/// Read community strings in priority order, first occurrence wins.
pub fn read_communities(path: &Path) -> Result<Vec<String>> {
    let entries = read_entries(path, community_lines)?;
    let mut seen = HashSet::new();
    let mut communities = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(entry.clone()) {
            communities.push(entry);
        } else {
            tracing::debug!(community = %entry, "Duplicate community string dropped");
        }
    }
    Ok(communities)
}

/// Read range specifications. Validation happens when the target set is built.
pub fn read_ranges(path: &Path) -> Result<Vec<String>> {
    read_entries(path, range_lines)
}

fn read_entries(path: &Path, parse: fn(&str) -> Vec<String>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| DiscoverError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse(&text);
    if entries.is_empty() {
        return Err(DiscoverError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), entries = entries.len(), "Input list loaded");
    Ok(entries)
}

fn range_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

fn community_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
