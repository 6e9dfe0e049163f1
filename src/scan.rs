//! Batch drivers: run extraction and classification over many dump files.
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::detect::Detector;
use crate::guess::HashGuess;
use crate::sample;

/// Outcome of triaging one source (a dump file or a literal token).
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: String,
    pub sample: Option<String>,
    pub guesses: Vec<HashGuess>,
}

impl FileReport {
    /// Triage a literal token given on the command line.
    pub fn for_token(detector: &Detector, token: &str) -> Self {
        let token = token.trim();
        Self {
            source: "<sample>".to_string(),
            sample: (!token.is_empty()).then(|| token.to_string()),
            guesses: detector.detect_hash_modes(token),
        }
    }

    /// Sample one dump file and triage whatever comes out.
    pub fn for_file(detector: &Detector, path: &Path, mmap_threshold_bytes: u64) -> Self {
        let sample = sample::sample_from_file_with_threshold(path, mmap_threshold_bytes);
        let guesses = sample
            .as_deref()
            .map(|token| detector.detect_hash_modes(token))
            .unwrap_or_default();
        Self {
            source: path.display().to_string(),
            sample,
            guesses,
        }
    }

    /// Highest-confidence guess, if any.
    pub fn top(&self) -> Option<&HashGuess> {
        self.guesses.first()
    }
}

/// Triage `paths` in order.
pub fn scan_files(
    detector: &Detector,
    paths: &[PathBuf],
    mmap_threshold_bytes: u64,
) -> Vec<FileReport> {
    paths
        .iter()
        .map(|p| FileReport::for_file(detector, p, mmap_threshold_bytes))
        .collect()
}

/// Rayon variant of [`scan_files`]; reports still come back in input order.
pub fn scan_files_parallel(
    detector: &Detector,
    paths: &[PathBuf],
    mmap_threshold_bytes: u64,
) -> Vec<FileReport> {
    paths
        .par_iter()
        .map(|p| FileReport::for_file(detector, p, mmap_threshold_bytes))
        .collect()
}
