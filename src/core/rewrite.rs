//! Project text rewrites.
//!
//! Every function here is text in, text out. The orchestrator in `migrate`
//! owns all I/O.
//!
//! Two stages run in order:
//! 1. `rewrite_sources` — exact `Include="<file>"` matches from the source table
//! 2. `normalize_headers` — every `Include="*.h"` into the canonical header directory

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

use crate::layout::{file_name, parent_dir, Rules};

static HEADER_INCLUDE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Include="([^"]+\.h)""#).unwrap());

static INCLUDE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Include="([^"]+)""#).unwrap());

/// Output of one rewrite stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    pub replacements: usize,
}

/// Output of the full two-stage transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub content: String,
    pub source_rewrites: usize,
    pub header_rewrites: usize,
    pub changed: bool,
}

/// A compiled-source reference whose directory disagrees with the layout.
///
/// These are never rewritten; the exact-match rule only touches bare filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleReference {
    /// Line number (1-indexed).
    pub line: usize,
    /// The value as found.
    pub value: String,
    /// Where the layout says it belongs.
    pub expected: String,
}

fn include_attr(value: &str) -> String {
    format!("Include=\"{}\"", value)
}

// ============================================================================
// Sources
// ============================================================================

/// Redirect bare compiled-source entries into their layout directory.
///
/// Only a value that is exactly the filename matches, so an entry that already
/// carries a directory is left alone and a second pass is a no-op.
pub fn rewrite_sources(content: &str, rules: &Rules) -> Rewritten {
    let mut content = content.to_string();
    let mut replacements = 0;

    for (filename, dir) in rules.sources.iter() {
        let old = include_attr(filename);
        let count = content.matches(old.as_str()).count();
        if count == 0 {
            continue;
        }

        let new = include_attr(&rules.source_path(dir, filename));
        content = content.replace(&old, &new);
        replacements += count;
    }

    Rewritten {
        content,
        replacements,
    }
}

/// Report mapped sources that already carry a different directory prefix.
pub fn find_stale_sources(content: &str, rules: &Rules) -> Vec<StaleReference> {
    let mut stale = Vec::new();

    for caps in INCLUDE_PATTERN.captures_iter(content) {
        let Some(value) = caps.get(1) else {
            continue;
        };
        let Some(dir) = parent_dir(value.as_str()) else {
            continue;
        };
        let filename = file_name(value.as_str());
        let Some(expected_dir) = rules.sources.directory_for(filename) else {
            continue;
        };
        if Rules::same_dir(dir, expected_dir) {
            continue;
        }

        stale.push(StaleReference {
            line: content[..value.start()].matches('\n').count() + 1,
            value: value.as_str().to_string(),
            expected: rules.source_path(expected_dir, filename),
        });
    }

    stale
}

// ============================================================================
// Headers
// ============================================================================

/// Decide the new value for one header reference. `None` leaves it as is.
pub fn rewrite_header_value(value: &str, rules: &Rules) -> Option<String> {
    if rules.headers.is_canonical(value) {
        return None;
    }

    let filename = file_name(value);
    if rules.headers.is_excluded(filename) {
        return None;
    }

    let new_value = rules.header_path(filename);
    (new_value != value).then_some(new_value)
}

/// Flatten every `.h` reference into the canonical header directory.
pub fn normalize_headers(content: &str, rules: &Rules) -> Rewritten {
    let mut replacements = 0;

    let replaced = HEADER_INCLUDE_PATTERN.replace_all(content, |caps: &Captures| {
        match rewrite_header_value(&caps[1], rules) {
            Some(new_value) => {
                replacements += 1;
                include_attr(&new_value)
            }
            None => caps[0].to_string(),
        }
    });

    Rewritten {
        content: replaced.into_owned(),
        replacements,
    }
}

// ============================================================================
// Full transform
// ============================================================================

/// Run both stages over one project file's text.
pub fn transform(content: &str, rules: &Rules) -> Transform {
    let sources = rewrite_sources(content, rules);
    let headers = normalize_headers(&sources.content, rules);
    let changed = headers.content != content;

    Transform {
        content: headers.content,
        source_rewrites: sources.replacements,
        header_rewrites: headers.replacements,
        changed,
    }
}
