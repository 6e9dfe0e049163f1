//! Candidate extraction: pull one representative token out of a dump file.
//!
//! Dump lines are usually `user:hash` or bare hashes with comments mixed in.
//! The extractor takes the first line that yields anything and picks its most
//! hash-like field. Everything here is soft: a missing or unreadable file is
//! `None`, never an error, so callers can just ask again with another path.
use std::path::Path;

use log::debug;

use crate::io::{self, DEFAULT_MMAP_THRESHOLD_BYTES, LineSource};

/// Pick the most promising field from one dump line: the longest (by
/// character count), first field winning ties. Blank lines and `#` comments
/// yield `None`.
pub fn extract_candidate(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut best: Option<&str> = None;
    let mut best_len = 0usize;
    for field in line.split(':') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let len = field.chars().count();
        if len > best_len {
            best = Some(field);
            best_len = len;
        }
    }
    best.map(str::to_string)
}

/// Scan `path` (with `~` expanded) for the first line carrying a usable
/// token. Each call starts from the top of the file and stops at the first
/// hit.
pub fn sample_from_file<P: AsRef<Path>>(path: P) -> Option<String> {
    sample_from_file_with_threshold(path, DEFAULT_MMAP_THRESHOLD_BYTES)
}

pub fn sample_from_file_with_threshold<P: AsRef<Path>>(
    path: P,
    mmap_threshold_bytes: u64,
) -> Option<String> {
    let path = io::expand_tilde(path.as_ref());
    if !path.is_file() {
        debug!("sample source {} is not a readable file", path.display());
        return None;
    }
    let lines = match LineSource::open(&path, mmap_threshold_bytes) {
        Ok(lines) => lines,
        Err(e) => {
            debug!("sample source {} unreadable: {e:#}", path.display());
            return None;
        }
    };
    for line in lines {
        let Ok(line) = line else {
            debug!("read error in {}; giving up on sampling", path.display());
            return None;
        };
        if let Some(token) = extract_candidate(&line) {
            return Some(token);
        }
    }
    None
}
