//! Optional reference catalog backing the comprehensive classification
//! strategy.
//!
//! A reference catalog is a JSON prototype database in the name-that-hash
//! shape: an ordered array of `{ pattern, ignore_case, modes }` entries where
//! each mode carries a display name, an optional hashcat mode number, and an
//! optional description. When a catalog is present the detector consults it
//! instead of the builtin rules; when it is absent or broken the detector
//! degrades to the builtin rules, so a catalog is never required for the tool
//! to work.
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

/// Environment variable naming an explicit catalog file.
pub const CATALOG_ENV_VAR: &str = "HASHSCOUT_CATALOG";

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("reference backend failure: {0}")]
    Backend(String),
}

/// One match record from a reference classifier. Most-likely-first ordering
/// is the classifier's responsibility.
#[derive(Debug, Clone)]
pub struct ReferenceMatch {
    pub name: String,
    /// Hashcat mode key, when the record maps to one.
    pub mode: Option<String>,
    pub description: Option<String>,
}

/// A comprehensive format classifier the detector can delegate to.
pub trait ReferenceClassifier: Send + Sync {
    /// Ordered match records for `token`. An empty `Ok` is a real answer;
    /// `Err` tells the detector to fall back to its builtin rules.
    fn identify(&self, token: &str) -> Result<Vec<ReferenceMatch>, ReferenceError>;

    /// Short description of the backend for diagnostics.
    fn describe(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct PrototypeDef {
    pattern: String,
    #[serde(default)]
    ignore_case: bool,
    modes: Vec<ModeDef>,
}

#[derive(Debug, Deserialize)]
struct ModeDef {
    name: String,
    #[serde(default)]
    hashcat: Option<u32>,
    #[serde(default)]
    description: Option<String>,
}

struct Prototype {
    regex: Regex,
    modes: Vec<ModeDef>,
}

/// JSON-file-backed reference classifier. Patterns are compiled once at load
/// time and trusted to carry their own anchors, per the database convention.
pub struct ReferenceCatalog {
    path: PathBuf,
    prototypes: Vec<Prototype>,
}

impl ReferenceCatalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref().to_path_buf();
        let raw = fs::read_to_string(&path).map_err(|source| ReferenceError::Read {
            path: path.clone(),
            source,
        })?;
        let defs: Vec<PrototypeDef> =
            serde_json::from_str(&raw).map_err(|source| ReferenceError::Parse {
                path: path.clone(),
                source,
            })?;
        let mut prototypes = Vec::with_capacity(defs.len());
        for def in defs {
            let regex = RegexBuilder::new(&def.pattern)
                .case_insensitive(def.ignore_case)
                .build()
                .map_err(|source| ReferenceError::Pattern {
                    pattern: def.pattern.clone(),
                    source,
                })?;
            prototypes.push(Prototype {
                regex,
                modes: def.modes,
            });
        }
        Ok(Self { path, prototypes })
    }

    pub fn prototype_count(&self) -> usize {
        self.prototypes.len()
    }
}

impl ReferenceClassifier for ReferenceCatalog {
    fn identify(&self, token: &str) -> Result<Vec<ReferenceMatch>, ReferenceError> {
        let mut records = Vec::new();
        for proto in &self.prototypes {
            if proto.regex.is_match(token) {
                for mode in &proto.modes {
                    records.push(ReferenceMatch {
                        name: mode.name.clone(),
                        mode: mode.hashcat.map(|m| m.to_string()),
                        description: mode.description.clone(),
                    });
                }
            }
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        format!(
            "{} ({} prototypes)",
            self.path.display(),
            self.prototypes.len()
        )
    }
}

/// Locate and load a reference catalog: the `HASHSCOUT_CATALOG` override
/// first, then the platform data directory. Unusable candidates are logged
/// and skipped; the builtin rules cover the `None` case.
pub fn probe() -> Option<ReferenceCatalog> {
    for path in candidate_paths() {
        if !path.exists() {
            continue;
        }
        match ReferenceCatalog::load(&path) {
            Ok(catalog) => {
                info!(
                    "loaded reference catalog {} ({} prototypes)",
                    path.display(),
                    catalog.prototype_count()
                );
                return Some(catalog);
            }
            Err(e) => warn!("reference catalog {} unusable: {e}", path.display()),
        }
    }
    None
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(p) = std::env::var(CATALOG_ENV_VAR) {
        if !p.is_empty() {
            paths.push(PathBuf::from(p));
        }
    }
    if let Some(data) = dirs::data_dir() {
        paths.push(data.join("hashscout").join("reference.json"));
    }
    paths
}
