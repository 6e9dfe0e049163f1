//! Hash format classification.
//!
//! `Detector` fixes its strategy once at construction: with a reference
//! catalog loaded it delegates to the comprehensive classifier and ranks the
//! returned records positionally; without one (or whenever a reference call
//! errors) the builtin rule catalog answers. Classification never fails: bad
//! input or a broken reference backend degrades to fewer, possibly zero,
//! guesses.
use std::collections::HashSet;

use log::debug;

use crate::catalog::{self, RuleTier};
use crate::guess::{self, HashGuess};
use crate::reference::{self, ReferenceClassifier, ReferenceMatch};

/// Most reference records ranked for a single token.
const REFERENCE_MATCH_LIMIT: usize = 10;

pub struct Detector {
    reference: Option<Box<dyn ReferenceClassifier>>,
}

impl Detector {
    /// Builtin rules only.
    pub fn builtin() -> Self {
        Self { reference: None }
    }

    /// Probe the environment for a reference catalog, falling back to the
    /// builtin rules when none loads.
    pub fn from_env() -> Self {
        match reference::probe() {
            Some(catalog) => Self::with_reference(Box::new(catalog)),
            None => Self::builtin(),
        }
    }

    pub fn with_reference(reference: Box<dyn ReferenceClassifier>) -> Self {
        Self {
            reference: Some(reference),
        }
    }

    /// Whether the comprehensive (reference-backed) strategy is active.
    pub fn is_comprehensive(&self) -> bool {
        self.reference.is_some()
    }

    /// Diagnostics line for the active reference backend, if any.
    pub fn reference_description(&self) -> Option<String> {
        self.reference.as_ref().map(|r| r.describe())
    }

    /// Rank candidate hash formats for `sample`, best first. Empty for blank
    /// or unrecognized input; never an error.
    pub fn detect_hash_modes(&self, sample: &str) -> Vec<HashGuess> {
        let token = sample.trim();
        if token.is_empty() {
            return Vec::new();
        }
        if let Some(reference) = &self.reference {
            match reference.identify(token) {
                Ok(records) => return rank_reference_matches(records),
                Err(e) => {
                    debug!("reference classifier failed ({e}); using builtin rules for this token");
                }
            }
        }
        rule_guesses(token)
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Positional ranking for reference records: keep the first ten that map to a
/// hashcat mode, step confidence down from 0.95 by 0.05 per rank with a 0.5
/// floor, then drop repeated modes.
fn rank_reference_matches(records: Vec<ReferenceMatch>) -> Vec<HashGuess> {
    let mut guesses: Vec<HashGuess> = Vec::new();
    for record in records {
        if guesses.len() == REFERENCE_MATCH_LIMIT {
            break;
        }
        let Some(mode) = record.mode else { continue };
        let rank = guesses.len() as u32;
        // integer hundredths keep the ladder exact
        let hundredths = 95u32.saturating_sub(5 * rank).max(50);
        let reason = record
            .description
            .unwrap_or_else(|| format!("Detected as {}", record.name));
        guesses.push(HashGuess::new(
            record.name,
            mode,
            f64::from(hundredths) / 100.0,
            reason,
        ));
    }
    guess::dedup_by_mode(guesses)
}

/// Two-pass rule matching: the named/special tier first, then the simple
/// hex-length tier minus any mode the named pass already claimed.
fn rule_guesses(token: &str) -> Vec<HashGuess> {
    let mut guesses: Vec<HashGuess> = Vec::new();
    let mut named_modes: HashSet<&'static str> = HashSet::new();
    for rule in catalog::rules()
        .iter()
        .filter(|r| r.tier == RuleTier::Named)
    {
        if rule.matches(token) {
            named_modes.insert(rule.mode);
            guesses.push(rule.to_guess());
        }
    }
    for rule in catalog::rules()
        .iter()
        .filter(|r| r.tier == RuleTier::Simple)
    {
        if named_modes.contains(rule.mode) {
            continue;
        }
        if rule.matches(token) {
            guesses.push(rule.to_guess());
        }
    }
    guess::sort_by_confidence(&mut guesses);
    guess::dedup_by_mode(guesses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceError;

    const MD5_SAMPLE: &str = "5f4dcc3b5aa765d61d8327deb882cf99";
    const SHA1_SAMPLE: &str = "356a192b7913b04c54574d18c28d46e6395428ab";
    const SHA256_SAMPLE: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const BCRYPT_SAMPLE: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";
    const SHA512CRYPT_SAMPLE: &str = "$6$52450745$k5ka2p8bFuSmoVT1tzOyyuaREkkKBcCNqoDKzYiJL9RaE8yMnPgh2XzzF0NDrUhgrcLwg78xs1w5pJiypEdFX/";
    const KRB5TGS_SAMPLE: &str = "$krb5tgs$23$*user$realm$test/spn*$63386d22d359fe42230300d56852c9eb$891ad31d09ab89c6b3b8c5e5de6c06a7f49fd559d7a9a3c32576c8fedf705376";
    const NTLM_PAIR_SAMPLE: &str = "aad3b435b51404eeaad3b435b51404ee:8846f7eaee8fb117ad06bdd830b7586c";

    struct ScriptedReference(Vec<ReferenceMatch>);

    impl ReferenceClassifier for ScriptedReference {
        fn identify(&self, _token: &str) -> Result<Vec<ReferenceMatch>, ReferenceError> {
            Ok(self.0.clone())
        }
        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    struct FailingReference;

    impl ReferenceClassifier for FailingReference {
        fn identify(&self, _token: &str) -> Result<Vec<ReferenceMatch>, ReferenceError> {
            Err(ReferenceError::Backend("simulated outage".to_string()))
        }
        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn record(name: &str, mode: Option<&str>, description: Option<&str>) -> ReferenceMatch {
        ReferenceMatch {
            name: name.to_string(),
            mode: mode.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    fn assert_invariants(guesses: &[HashGuess]) {
        let mut modes = HashSet::new();
        for g in guesses {
            assert!(modes.insert(g.mode.clone()), "duplicate mode {}", g.mode);
            assert!((0.0..=1.0).contains(&g.confidence));
        }
        for pair in guesses.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn md5_hex_yields_mode_0_either_case() {
        let d = Detector::builtin();
        let upper = MD5_SAMPLE.to_uppercase();
        for sample in [MD5_SAMPLE, upper.as_str()] {
            let guesses = d.detect_hash_modes(sample);
            assert!(guesses.iter().any(|g| g.mode == "0"), "sample {sample}");
            assert_invariants(&guesses);
        }
    }

    #[test]
    fn blank_input_yields_nothing() {
        let d = Detector::builtin();
        assert!(d.detect_hash_modes("").is_empty());
        assert!(d.detect_hash_modes("   \t  ").is_empty());
        assert!(d.detect_hash_modes("not a hash").is_empty());
    }

    #[test]
    fn input_is_trimmed_before_matching() {
        let d = Detector::builtin();
        let guesses = d.detect_hash_modes(&format!("  {MD5_SAMPLE}\n"));
        assert!(guesses.iter().any(|g| g.mode == "0"));
    }

    #[test]
    fn results_hold_invariants_across_formats() {
        let d = Detector::builtin();
        for sample in [
            MD5_SAMPLE,
            SHA1_SAMPLE,
            SHA256_SAMPLE,
            BCRYPT_SAMPLE,
            SHA512CRYPT_SAMPLE,
            KRB5TGS_SAMPLE,
            NTLM_PAIR_SAMPLE,
        ] {
            assert_invariants(&d.detect_hash_modes(sample));
        }
    }

    #[test]
    fn bcrypt_outranks_any_length_guess() {
        let d = Detector::builtin();
        let guesses = d.detect_hash_modes(BCRYPT_SAMPLE);
        assert_eq!(guesses[0].mode, "3200");
        assert!(guesses[0].confidence > 0.9);
    }

    #[test]
    fn sha512crypt_is_top_guess_for_dollar_six() {
        let d = Detector::builtin();
        let guesses = d.detect_hash_modes(SHA512CRYPT_SAMPLE);
        assert_eq!(guesses[0].name, "sha512crypt");
        assert_eq!(guesses[0].mode, "1800");
    }

    #[test]
    fn kerberos_tgs_matches_without_a_reference_catalog() {
        let d = Detector::builtin();
        let guesses = d.detect_hash_modes(KRB5TGS_SAMPLE);
        assert!(guesses.iter().any(|g| g.mode == "13100"));
    }

    #[test]
    fn hex_digest_lengths_map_to_expected_modes() {
        let d = Detector::builtin();
        assert!(
            d.detect_hash_modes(SHA1_SAMPLE)
                .iter()
                .any(|g| g.mode == "100")
        );
        assert!(
            d.detect_hash_modes(SHA256_SAMPLE)
                .iter()
                .any(|g| g.mode == "1400")
        );
        let sha512 = "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e";
        assert!(d.detect_hash_modes(sha512).iter().any(|g| g.mode == "1700"));
    }

    #[test]
    fn bare_hex_reports_md5_ahead_of_ntlm() {
        let d = Detector::builtin();
        let guesses = d.detect_hash_modes(MD5_SAMPLE);
        let md5 = guesses.iter().position(|g| g.mode == "0").unwrap();
        let ntlm = guesses.iter().position(|g| g.mode == "1000").unwrap();
        assert!(md5 < ntlm);
    }

    #[test]
    fn ntlm_pair_reports_mode_1000_once() {
        let d = Detector::builtin();
        let guesses = d.detect_hash_modes(NTLM_PAIR_SAMPLE);
        assert_eq!(guesses.iter().filter(|g| g.mode == "1000").count(), 1);
        assert_eq!(guesses[0].reason, "LM:NT hash pair");
    }

    #[test]
    fn netntlm_layouts_are_recognized() {
        let d = Detector::builtin();
        let v1 = "u4-netntlm::kNS:338d08f8e26de93300000000000000000000000000000000:9526fb8c23a90751cdd619b6cea564742e1e4bf33006ba41:cb8086049ec4736c";
        let v2 = "admin::N46iSNekpT:08ca45b7d7ea58ee:88dcbe4446168966a153a0064958dac6:5c7830315c7830310000000000000b45c67103d07d7b95acd12ffa11230e0000000052920b85f78d013c31cdb3b92f5d765c783030";
        assert_eq!(d.detect_hash_modes(v1)[0].mode, "5500");
        assert_eq!(d.detect_hash_modes(v2)[0].mode, "5600");
    }

    #[test]
    fn reference_ladder_caps_at_ten_and_floors_at_half() {
        let records: Vec<ReferenceMatch> = (0..12)
            .map(|i| record(&format!("fmt{i}"), Some(i.to_string().as_str()), None))
            .collect();
        let d = Detector::with_reference(Box::new(ScriptedReference(records)));
        let guesses = d.detect_hash_modes(MD5_SAMPLE);
        assert_eq!(guesses.len(), 10);
        assert_eq!(guesses[0].confidence, 0.95);
        assert_eq!(guesses[1].confidence, 0.9);
        assert_eq!(guesses[9].confidence, 0.5);
        assert_invariants(&guesses);
    }

    #[test]
    fn reference_records_without_modes_are_skipped() {
        let records = vec![
            record("CRC-16", None, None),
            record("MD5", Some("0"), Some("raw MD5 digest")),
        ];
        let d = Detector::with_reference(Box::new(ScriptedReference(records)));
        let guesses = d.detect_hash_modes(MD5_SAMPLE);
        assert_eq!(guesses.len(), 1);
        assert_eq!(guesses[0].mode, "0");
        assert_eq!(guesses[0].confidence, 0.95);
        assert_eq!(guesses[0].reason, "raw MD5 digest");
    }

    #[test]
    fn reference_reason_defaults_to_detected_as() {
        let d = Detector::with_reference(Box::new(ScriptedReference(vec![record(
            "MD4",
            Some("900"),
            None,
        )])));
        let guesses = d.detect_hash_modes(MD5_SAMPLE);
        assert_eq!(guesses[0].reason, "Detected as MD4");
    }

    #[test]
    fn reference_duplicate_modes_keep_first_record() {
        let records = vec![
            record("MD5 Crypt", Some("500"), None),
            record("Cisco-IOS(MD5)", Some("500"), None),
            record("MD5", Some("0"), None),
        ];
        let d = Detector::with_reference(Box::new(ScriptedReference(records)));
        let guesses = d.detect_hash_modes(MD5_SAMPLE);
        assert_eq!(guesses.len(), 2);
        assert_eq!(guesses[0].name, "MD5 Crypt");
        assert_eq!(guesses[1].mode, "0");
        assert_invariants(&guesses);
    }

    #[test]
    fn reference_empty_answer_does_not_fall_back() {
        let d = Detector::with_reference(Box::new(ScriptedReference(Vec::new())));
        // the builtin rules would have matched this token
        assert!(d.detect_hash_modes(MD5_SAMPLE).is_empty());
    }

    #[test]
    fn reference_failure_falls_back_to_rules_per_call() {
        let d = Detector::with_reference(Box::new(FailingReference));
        assert!(d.is_comprehensive());
        let guesses = d.detect_hash_modes(MD5_SAMPLE);
        assert!(guesses.iter().any(|g| g.mode == "0"));
        assert_invariants(&guesses);
    }

    #[test]
    fn capability_signal_tracks_strategy() {
        assert!(!Detector::builtin().is_comprehensive());
        assert!(Detector::builtin().reference_description().is_none());
        let d = Detector::with_reference(Box::new(FailingReference));
        assert_eq!(d.reference_description().as_deref(), Some("failing"));
    }
}
