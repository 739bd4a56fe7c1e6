//! Dotted namespace paths and template name resolution
//!
//! A template name starting with `.` is relative to the file's namespace
//! (`.foo` in `{namespace a.b}` is `a.b.foo`). Any other name is already
//! fully qualified.

use once_cell::sync::Lazy;
use regex::Regex;

static DOTTED_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("dotted path pattern is valid")
});

/// Check that `path` is a non-empty, dot-separated list of identifiers
pub fn is_dotted_path(path: &str) -> bool {
    DOTTED_PATH.is_match(path)
}

/// Split a dotted path into its segments
pub fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}

/// Fully qualify `name` against `namespace`
pub fn resolve_template_name<S: AsRef<str>>(name: &str, namespace: &[S]) -> String {
    if !is_relative(name) {
        return name.to_string();
    }
    let relative = &name[1..];
    if namespace.is_empty() {
        relative.to_string()
    } else {
        format!("{}.{}", join_path(namespace), relative)
    }
}

/// Whether `name` is written relative to the enclosing namespace
pub fn is_relative(name: &str) -> bool {
    name.starts_with('.')
}
