//! Builtin pattern rules for hash format recognition.
//!
//! The catalog is a fixed, registration-ordered table compiled once on first
//! use. Named/special rules (crypt(3) prefixes, challenge/response layouts,
//! Kerberos tickets) come before the simple rules that recognize bare hex
//! digests by length alone, and simple rules never score above the named tier.
//! Every pattern is anchored so a rule only ever matches a whole token; hex
//! character classes accept both cases while structured prefixes like `$2a$`
//! stay case-sensitive.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::guess::HashGuess;

/// Which pass of the rule-based classifier a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTier {
    /// Structurally distinctive formats.
    Named,
    /// Bare hex digests recognized by length.
    Simple,
}

struct RuleDef {
    name: &'static str,
    mode: &'static str,
    confidence: f64,
    reason: &'static str,
    tier: RuleTier,
    pattern: &'static str,
}

static RULE_DEFS: &[RuleDef] = &[
    RuleDef {
        name: "bcrypt",
        mode: "3200",
        confidence: 0.95,
        reason: "starts with $2*$",
        tier: RuleTier::Named,
        pattern: r"^\$2[aby]\$\d{2}\$[./A-Za-z0-9]{53}$",
    },
    RuleDef {
        name: "md5crypt",
        mode: "500",
        confidence: 0.85,
        reason: "starts with $1$",
        tier: RuleTier::Named,
        pattern: r"^\$1\$[./A-Za-z0-9]{1,8}\$[./A-Za-z0-9]{22}$",
    },
    RuleDef {
        name: "sha256crypt",
        mode: "7400",
        confidence: 0.85,
        reason: "starts with $5$",
        tier: RuleTier::Named,
        pattern: r"^\$5\$(?:rounds=\d+\$)?[./A-Za-z0-9]{1,16}\$[./A-Za-z0-9]{43}$",
    },
    RuleDef {
        name: "sha512crypt",
        mode: "1800",
        confidence: 0.85,
        reason: "starts with $6$",
        tier: RuleTier::Named,
        pattern: r"^\$6\$(?:rounds=\d+\$)?[./A-Za-z0-9]{1,16}\$[./A-Za-z0-9]{86}$",
    },
    RuleDef {
        name: "Kerberos 5 TGS-REP etype 23",
        mode: "13100",
        confidence: 0.9,
        reason: "starts with $krb5tgs$23$",
        tier: RuleTier::Named,
        pattern: r"^\$krb5tgs\$23\$\*[^*]+\*\$[a-fA-F0-9]+(?:\$[a-fA-F0-9]+)*$",
    },
    RuleDef {
        name: "NetNTLMv1",
        mode: "5500",
        confidence: 0.9,
        reason: "NTLMv1 challenge-response layout",
        tier: RuleTier::Named,
        pattern: r"^[^:]+::[^:]+:[a-fA-F0-9]{48}:[a-fA-F0-9]{48}:[a-fA-F0-9]{16}$",
    },
    RuleDef {
        name: "NetNTLMv2",
        mode: "5600",
        confidence: 0.9,
        reason: "NTLMv2 challenge-response layout",
        tier: RuleTier::Named,
        pattern: r"^[^:]+::[^:]+:[a-fA-F0-9]{16}:[a-fA-F0-9]{32}:[a-fA-F0-9]+$",
    },
    RuleDef {
        name: "NTLM",
        mode: "1000",
        confidence: 0.9,
        reason: "LM:NT hash pair",
        tier: RuleTier::Named,
        pattern: r"^[a-fA-F0-9]{32}:[a-fA-F0-9]{32}$",
    },
    RuleDef {
        name: "MD5",
        mode: "0",
        confidence: 0.85,
        reason: "32 hex chars",
        tier: RuleTier::Simple,
        pattern: r"^[a-fA-F0-9]{32}$",
    },
    RuleDef {
        name: "NTLM",
        mode: "1000",
        confidence: 0.7,
        reason: "32 hex chars (NT hash length)",
        tier: RuleTier::Simple,
        pattern: r"^[a-fA-F0-9]{32}$",
    },
    RuleDef {
        name: "SHA-1",
        mode: "100",
        confidence: 0.8,
        reason: "40 hex chars",
        tier: RuleTier::Simple,
        pattern: r"^[a-fA-F0-9]{40}$",
    },
    RuleDef {
        name: "SHA-224",
        mode: "1300",
        confidence: 0.7,
        reason: "56 hex chars",
        tier: RuleTier::Simple,
        pattern: r"^[a-fA-F0-9]{56}$",
    },
    RuleDef {
        name: "SHA-256",
        mode: "1400",
        confidence: 0.8,
        reason: "64 hex chars",
        tier: RuleTier::Simple,
        pattern: r"^[a-fA-F0-9]{64}$",
    },
    RuleDef {
        name: "SHA-384",
        mode: "10800",
        confidence: 0.6,
        reason: "96 hex chars",
        tier: RuleTier::Simple,
        pattern: r"^[a-fA-F0-9]{96}$",
    },
    RuleDef {
        name: "SHA-512",
        mode: "1700",
        confidence: 0.8,
        reason: "128 hex chars",
        tier: RuleTier::Simple,
        pattern: r"^[a-fA-F0-9]{128}$",
    },
];

/// A compiled catalog entry.
pub struct PatternRule {
    pub name: &'static str,
    pub mode: &'static str,
    pub confidence: f64,
    pub reason: &'static str,
    pub tier: RuleTier,
    regex: Regex,
}

impl PatternRule {
    /// Whole-token match against `token`.
    pub fn matches(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    pub fn to_guess(&self) -> HashGuess {
        HashGuess::new(self.name, self.mode, self.confidence, self.reason)
    }
}

static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    RULE_DEFS
        .iter()
        .map(|def| PatternRule {
            name: def.name,
            mode: def.mode,
            confidence: def.confidence,
            reason: def.reason,
            tier: def.tier,
            regex: Regex::new(def.pattern).expect("valid builtin rule pattern"),
        })
        .collect()
});

/// The registration-ordered rule catalog: named tier first, then simple tier.
pub fn rules() -> &'static [PatternRule] {
    &RULES
}
