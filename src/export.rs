//! Export helpers for writing triage results to CSV and plain text files.
//!
//! - `save_guesses_csv` writes one row per guess with its source and rank.
//! - `save_top_modes_txt` writes `source:mode` for each source's best guess,
//!   ready to hand to a cracking wrapper.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::Writer;

use crate::scan::FileReport;

pub fn save_guesses_csv<P: AsRef<Path>>(reports: &[FileReport], path: P) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["Source", "Sample", "Rank", "Name", "Mode", "Confidence", "Reason"])?;
    for report in reports {
        let sample = report.sample.as_deref().unwrap_or("");
        for (i, g) in report.guesses.iter().enumerate() {
            let rank = (i + 1).to_string();
            let confidence = format!("{:.2}", g.confidence);
            wtr.write_record([
                report.source.as_str(),
                sample,
                rank.as_str(),
                g.name.as_str(),
                g.mode.as_str(),
                confidence.as_str(),
                g.reason.as_str(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_top_modes_txt<P: AsRef<Path>>(reports: &[FileReport], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    for report in reports {
        if let Some(top) = report.top() {
            writeln!(f, "{}:{}", report.source, top.mode)?;
        }
    }
    Ok(())
}
