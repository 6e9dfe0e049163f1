//! Guess data model: one ranked hypothesis about a hash sample's format.
//!
//! `HashGuess` values are produced fresh on every classification call; `mode`
//! is the hashcat mode key the guess maps to. The helpers here enforce the two
//! result invariants shared by both classification strategies: at most one
//! guess per mode, and a stable highest-confidence-first ordering.
use std::collections::HashSet;

use serde::Serialize;

/// A candidate hash format with a confidence score in `[0, 1]` and a short
/// human-readable justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashGuess {
    pub name: String,
    pub mode: String,
    pub confidence: f64,
    pub reason: String,
}

impl HashGuess {
    pub fn new(
        name: impl Into<String>,
        mode: impl Into<String>,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mode: mode.into(),
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }

    /// Confidence as a whole percentage for display.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round() as u8
    }
}

/// Stable sort by descending confidence; equal confidences keep their
/// relative (registration) order.
pub fn sort_by_confidence(guesses: &mut [HashGuess]) {
    guesses.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

/// Drop any guess repeating an earlier guess's mode, preserving order.
pub fn dedup_by_mode(guesses: Vec<HashGuess>) -> Vec<HashGuess> {
    let mut seen: HashSet<String> = HashSet::new();
    guesses
        .into_iter()
        .filter(|g| seen.insert(g.mode.clone()))
        .collect()
}
