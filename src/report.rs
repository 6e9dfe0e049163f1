//! Terminal rendering of triage results.
//!
//! Produces a colored report: a banner line naming the active classification
//! backend, then one block per source with the sampled token and its ranked
//! guesses.
use colored::*;

use crate::scan::FileReport;

fn visible_len(s: &str) -> usize {
    // Strip ANSI escape sequences (\x1b[ ... m) to compute printable width
    let mut len = 0;
    let mut iter = s.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\u{1b}' {
            if let Some('[') = iter.peek().cloned() {
                let _ = iter.next();
            }
            for c in iter.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

fn section_header(title: &str) -> String {
    let len = visible_len(title);
    let mut s = String::new();
    s.push('\n');
    s.push_str(title);
    s.push('\n');
    s.push_str(&"─".repeat(len));
    s.push_str("\n\n");
    s
}

fn abbreviate(token: &str, max_chars: usize) -> String {
    if token.chars().count() <= max_chars {
        return token.to_string();
    }
    let head: String = token.chars().take(max_chars).collect();
    format!("{head}...")
}

/// Render reports for the terminal. `backend` is the reference catalog
/// description when the comprehensive strategy is active; `top_limit` caps
/// the guesses shown per source.
pub fn render_reports(reports: &[FileReport], backend: Option<&str>, top_limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        "HashScout: Hash Format Triage".bold().cyan()
    ));
    match backend {
        Some(desc) => out.push_str(&format!("Reference catalog: {desc}\n")),
        None => out.push_str(&format!(
            "{}\n",
            "Builtin rules only (no reference catalog configured)".yellow()
        )),
    }
    for report in reports {
        out.push_str(&section_header(&report.source.bold().yellow().to_string()));
        let Some(token) = &report.sample else {
            out.push_str("(no sample found)\n");
            continue;
        };
        out.push_str(&format!("Sample: {}\n", abbreviate(token, 64)));
        if report.guesses.is_empty() {
            out.push_str("(no matching formats)\n");
            continue;
        }
        for (i, g) in report.guesses.iter().take(top_limit).enumerate() {
            out.push_str(&format!(
                "  {}. {} (mode {}) [{}%] {}\n",
                i + 1,
                g.name.bold(),
                g.mode,
                g.confidence_percent(),
                g.reason.dimmed()
            ));
        }
        let hidden = report.guesses.len().saturating_sub(top_limit);
        if hidden > 0 {
            out.push_str(&format!("  (+{hidden} more)\n"));
        }
    }
    out
}
