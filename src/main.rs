//! CLI batch converter
//!
//! Walks an input tree for FIT/TCX recordings and converts every file to GPX
//! across a bounded worker pool, one independent task per file.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use track_converter::{convert_file, discover_input_files, ConvertOptions, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskStatus {
    Converted,
    Skipped,
    Failed,
}

fn main() -> Result<()> {
    let matches = Command::new("Track Converter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert FIT and TCX activity recordings to GPX track files.")
        .arg(
            Arg::new("input")
                .help("Input directory scanned recursively for .fit/.tcx files (case-insensitive, glob patterns supported)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Directory the generated .gpx files are written into")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("workers")
                .help("Maximum number of parallel conversion workers (default: all cores)")
                .value_parser(clap::value_parser!(usize))
                .index(3),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed decoding information")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let input = matches.get_one::<String>("input").cloned().unwrap_or_default();
    let output = matches.get_one::<String>("output").cloned().unwrap_or_default();
    let workers = matches.get_one::<usize>("workers").copied().unwrap_or(0);
    let debug = matches.get_flag("debug");

    let mut options = ConvertOptions::new(&output);
    options.debug = debug;

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory '{}'", output))?;

    let found = discover_input_files(&input)?;

    for path in &found.unsupported {
        println!("⚠️  Unsupported file type: {}", display_name(path));
    }

    println!("🧮 Found {} files to convert", found.supported.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;

    if debug {
        println!("Worker pool size: {}", pool.current_num_threads());
    }

    // One task per file; a failing task reports itself and never takes
    // its siblings down
    let statuses: Vec<TaskStatus> = pool.install(|| {
        found
            .supported
            .par_iter()
            .map(|path| run_task(path, &options))
            .collect()
    });

    let converted = statuses.iter().filter(|s| **s == TaskStatus::Converted).count();
    let failed = statuses.iter().filter(|s| **s == TaskStatus::Failed).count();
    let skipped = statuses.len() - converted - failed + found.unsupported.len();

    println!(
        "✅ All conversions complete. ({} converted, {} skipped, {} failed)",
        converted, skipped, failed
    );

    Ok(())
}

fn run_task(path: &Path, options: &ConvertOptions) -> TaskStatus {
    let filename = display_name(path);

    match convert_file(path, options) {
        Ok(Outcome::Converted {
            output_name,
            activity_type,
            ..
        }) => {
            println!("✅ {} → {} ({})", filename, output_name, activity_type);
            TaskStatus::Converted
        }
        Ok(Outcome::Skipped(reason)) => {
            println!("⏭️  Skipping {} ({})", filename, reason);
            TaskStatus::Skipped
        }
        Err(e) => {
            eprintln!("❌ Error converting {}: {}", filename, e);
            TaskStatus::Failed
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}
