//! CLI entrypoint for `hashscout`.
//!
//! Parses command-line arguments, builds the detector (probing for an
//! optional reference catalog), triages each input, prints a colored report
//! or JSON, and optionally writes CSV/TXT exports when an output directory is
//! provided.
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use hashscout::{
    detect::Detector,
    export::{save_guesses_csv, save_top_modes_txt},
    io::DEFAULT_MMAP_THRESHOLD_BYTES,
    reference::ReferenceCatalog,
    report::render_reports,
    scan::{self, FileReport},
};
use log::{LevelFilter, error, warn};

#[derive(Parser, Debug)]
#[command(
    name = "hashscout",
    version,
    about = "Hash dump triage: rank hashcat mode candidates"
)]
struct Args {
    /// Hash dump file(s) to sample and classify
    #[arg(short = 'f', long = "hashfiles")]
    hashfiles: Vec<PathBuf>,

    /// Classify a literal token instead of (or besides) files
    #[arg(short = 's', long = "sample")]
    sample: Option<String>,

    /// Explicit reference catalog path (JSON prototype database)
    #[arg(long = "catalog")]
    catalog: Option<PathBuf>,

    /// Skip the reference catalog probe and use builtin rules only
    #[arg(long = "no-catalog", conflicts_with = "catalog")]
    no_catalog: bool,

    /// Path to the output directory
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Override mmap threshold in bytes. If zero, disable mmap.
    #[arg(long = "mmap-threshold", default_value_t = DEFAULT_MMAP_THRESHOLD_BYTES)]
    mmap_threshold: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Triage input files in parallel
    #[arg(long = "parallel")]
    parallel: bool,

    /// Limit number of guesses shown per sample
    #[arg(long = "top", default_value_t = 10)]
    top_limit: usize,

    /// Print reports as JSON instead of the colored summary
    #[arg(long = "json")]
    json: bool,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress terminal output (still writes exports if -o is provided)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

const ASCII_TITLE: &str = r#"
  _               _                       _
 | |__   __ _ ___| |__  ___  ___ ___  _  _| |_
 | '_ \ / _` / __| '_ \/ __|/ __/ _ \ | | | __|
 | | | | (_| \__ \ | | \__ \ (_| (_) | |_| | |_
 |_| |_|\__,_|___/_| |_|___/\___\___/ \__,_|\__|
"#;

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn verify_inputs(args: &Args) -> Result<()> {
    if args.hashfiles.is_empty() && args.sample.is_none() {
        bail!("no inputs provided (-f/--hashfiles or -s/--sample)");
    }
    for p in &args.hashfiles {
        if !p.exists() {
            warn!("hash file not found: {} (continuing)", p.display());
        }
    }
    Ok(())
}

fn build_detector(args: &Args) -> Detector {
    if args.no_catalog {
        return Detector::builtin();
    }
    if let Some(path) = &args.catalog {
        return match ReferenceCatalog::load(path) {
            Ok(catalog) => Detector::with_reference(Box::new(catalog)),
            Err(e) => {
                warn!("reference catalog unusable: {e} (using builtin rules)");
                Detector::builtin()
            }
        };
    }
    Detector::from_env()
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    // Configure color policy
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }
    if let Err(e) = verify_inputs(&args) {
        error!("{}", e);
        std::process::exit(2);
    }

    let detector = build_detector(&args);
    if !detector.is_comprehensive() {
        warn!("no reference catalog loaded; builtin rules cover fewer formats");
    }
    let threshold = if args.mmap_threshold == 0 {
        u64::MAX
    } else {
        args.mmap_threshold
    };

    let mut reports: Vec<FileReport> = Vec::new();
    if let Some(token) = &args.sample {
        reports.push(FileReport::for_token(&detector, token));
    }
    reports.extend(if args.parallel {
        scan::scan_files_parallel(&detector, &args.hashfiles, threshold)
    } else {
        scan::scan_files(&detector, &args.hashfiles, threshold)
    });

    if !args.quiet {
        if args.json {
            match serde_json::to_string_pretty(&reports) {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    error!("failed to encode reports as JSON: {}", e);
                    std::process::exit(3);
                }
            }
        } else {
            println!("{}", ASCII_TITLE.bold().green());
            let backend = detector.reference_description();
            println!(
                "{}",
                render_reports(&reports, backend.as_deref(), args.top_limit)
            );
        }
    }

    if let Some(outdir) = args.output {
        if let Err(e) = fs::create_dir_all(&outdir) {
            error!(
                "failed to create output directory {}: {}",
                outdir.display(),
                e
            );
            std::process::exit(4);
        }
        let ts = chrono::Local::now().format("%Y.%m.%d_%H.%M.%S");
        let csv = outdir.join(format!("hashscout_guesses_{}.csv", ts));
        let txt = outdir.join(format!("hashscout_modes_{}.txt", ts));
        if let Err(e) = save_guesses_csv(&reports, &csv) {
            error!("failed to write {}: {}", csv.display(), e);
            std::process::exit(5);
        }
        if let Err(e) = save_top_modes_txt(&reports, &txt) {
            error!("failed to write {}: {}", txt.display(), e);
            std::process::exit(6);
        }
    }

    if reports.iter().all(|r| r.guesses.is_empty()) {
        warn!("no hash formats identified");
        std::process::exit(1);
    }
}
