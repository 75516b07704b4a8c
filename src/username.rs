//! Best-effort username inference from export archive file names.
//!
//! Exports are usually named `letterboxd-<username>-YYYY-MM-DD-HH-MM-utc.zip` or
//! `letterboxd-<username>-YYYY-MM-DD.zip`, but nothing guarantees it. Usernames that contain `-`
//! are only recovered when the name carries more than six dash-separated parts after the prefix;
//! pass an explicit username for those.

use std::path::Path;

/// Returns `username` verbatim when given and non-empty, otherwise infers one from the archive's
/// file name.
pub fn resolve(path: &Path, username: Option<&str>, prefix: &str) -> String {
    match username {
        Some(username) if !username.is_empty() => username.to_owned(),
        _ => from_file_name(path, prefix),
    }
}

pub fn from_file_name(path: &Path, prefix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let rest = stem.strip_prefix(prefix).unwrap_or(&stem);
    let parts: Vec<&str> = rest.split('-').collect();

    if parts.len() >= 3 {
        if parts.len() > 6 {
            parts[..parts.len() - 6].join("-")
        } else {
            parts[0].to_owned()
        }
    } else {
        match parts.first() {
            Some(first) => (*first).to_owned(),
            None => stem.clone(),
        }
    }
}
