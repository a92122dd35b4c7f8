//! Checks that a course's hole directories contain the three JSON inputs
//! a build needs (`config.json`, `boundary.json`, `contours.json`)
//! before `tools/reconstruct` is run against them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

const REQUIRED_FILES: &[&str] = &["config.json", "boundary.json", "contours.json"];

#[derive(Parser, Debug)]
#[command(name = "validate", about = "Validate a course's hole directories have the required build inputs")]
struct Args {
    /// Course directory containing Hole_* subdirectories.
    course_dir: PathBuf,
}

fn discover_holes(course_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut holes: Vec<PathBuf> = fs::read_dir(course_dir)
        .with_context(|| format!("reading {}", course_dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("Hole_"))
        })
        .collect();
    holes.sort();
    Ok(holes)
}

fn missing_files(hole_dir: &Path) -> Vec<String> {
    REQUIRED_FILES
        .iter()
        .filter(|&&name| !hole_dir.join(name).is_file())
        .map(|name| format!("{name} ({})", hole_dir.join(name).display()))
        .collect()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let holes = match discover_holes(&args.course_dir) {
        Ok(h) => h,
        Err(err) => {
            log::error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    if holes.is_empty() {
        log::warn!("no Hole_* directories found in {}", args.course_dir.display());
        return ExitCode::SUCCESS;
    }

    let mut all_valid = true;
    for hole_dir in &holes {
        let missing = missing_files(hole_dir);
        if missing.is_empty() {
            log::info!("{}: OK", hole_dir.display());
        } else {
            all_valid = false;
            log::error!("{}: missing {}", hole_dir.display(), missing.join(", "));
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
