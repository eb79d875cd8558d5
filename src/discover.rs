//! Input discovery
//!
//! Recursively expands an input directory (or glob pattern) into the list of
//! convertible source files, protecting against symlink cycles and runaway
//! recursion depth. Unsupported files encountered along the way are collected
//! separately so the caller can report them.

use anyhow::Result;
use glob::glob;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum recursion depth to prevent stack overflow
const MAX_RECURSION_DEPTH: usize = 100;

/// Source file extensions the converter accepts, lower-cased
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["fit", "tcx"];

/// Files found under an input root, split by whether they can be converted
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    /// Files with a supported extension, sorted for deterministic ordering
    pub supported: Vec<PathBuf>,
    /// Everything else, reported as unsupported skips
    pub unsupported: Vec<PathBuf>,
}

/// Whether a path carries one of the supported source extensions
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lowered = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lowered.as_str())
        })
        .unwrap_or(false)
}

/// Expand an input argument to the files to convert.
///
/// A plain path is walked recursively; a pattern containing glob
/// metacharacters is expanded first and each match walked the same way.
pub fn discover_input_files(input: &str) -> Result<DiscoveredFiles> {
    let mut found = DiscoveredFiles::default();
    let mut visited = HashSet::new();

    if input.contains('*') || input.contains('?') || input.contains('[') {
        let matches = glob(input)
            .map_err(|e| anyhow::anyhow!("Invalid glob pattern '{}': {}", input, e))?;
        for entry in matches {
            let path =
                entry.map_err(|e| anyhow::anyhow!("Error expanding glob '{}': {}", input, e))?;
            collect_path(&path, &mut found, &mut visited, 0)?;
        }
    } else {
        let path = Path::new(input);
        if !path.exists() {
            anyhow::bail!("Input path not found: {}", input);
        }
        collect_path(path, &mut found, &mut visited, 0)?;
    }

    found.supported.sort();
    found.unsupported.sort();
    Ok(found)
}

fn collect_path(
    path: &Path,
    found: &mut DiscoveredFiles,
    visited: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<()> {
    if depth > MAX_RECURSION_DEPTH {
        anyhow::bail!(
            "Maximum recursion depth exceeded in directory traversal ({})",
            MAX_RECURSION_DEPTH
        );
    }

    let canonical = match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(e) => {
            eprintln!(
                "Warning: Failed to canonicalize path '{}': {}",
                path.display(),
                e
            );
            return Ok(());
        }
    };

    if !visited.insert(canonical.clone()) {
        // Already visited, skip to avoid symlink cycles
        return Ok(());
    }

    if canonical.is_file() {
        if has_supported_extension(&canonical) {
            found.supported.push(canonical);
        } else {
            found.unsupported.push(canonical);
        }
        return Ok(());
    }

    if canonical.is_dir() {
        let entries = match fs::read_dir(&canonical) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!(
                    "Warning: Cannot read directory '{}': {}",
                    canonical.display(),
                    e
                );
                return Ok(());
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    eprintln!(
                        "Warning: Cannot read entry in directory '{}': {}",
                        canonical.display(),
                        e
                    );
                    continue;
                }
            };
            collect_path(&entry.path(), found, visited, depth + 1)?;
        }
    }

    Ok(())
}
