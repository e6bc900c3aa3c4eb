//! # Student Processing
//!
//! Offline counterpart of `POST /update`.
//!
//! ## Flow
//! 1. Load the current data file if there is one, to report what changed.
//!
//! 2. Ask the spreadsheet script for a fresh dataset with the given field mapping.
//!
//! 3. Write it over the data file (staging file + rename, same as the server).
//!
//! 4. Print record, course, added and removed counts.
//!
//! ## Notes
//! - A failed fetch leaves the old file untouched.
//! - Column overrides (`--map "Class Name=Enrolled Class"`) cover sheets whose
//!   headers drifted from the canonical names.
use std::{path::Path, time::Duration};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use roster::{AppsScriptSource, FieldMapping, get_dataset, refresh_dataset};

pub mod utils;

use utils::summarize;

pub async fn load_students(
    url: &str,
    data_file: &Path,
    timeout: Duration,
    mapping: &FieldMapping,
) -> anyhow::Result<()> {
    let old = match get_dataset(data_file).await {
        Ok(dataset) => {
            println!("Loaded Students: {}\n", dataset.len());
            dataset
        }
        Err(e) => {
            println!("No usable dataset yet ({e}), starting fresh\n");
            Vec::new()
        }
    };

    let source = AppsScriptSource::new(url, timeout)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {msg}",
    )?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Fetching {}", source.url()));

    let result = refresh_dataset(&source, mapping, data_file).await;
    pb.finish_and_clear();

    let new = result.with_context(|| format!("Failed to refresh {}", data_file.display()))?;
    let summary = summarize(&old, &new);

    println!("Total Students: {}", summary.records);
    println!("Total Courses: {}", summary.courses);
    println!("New Students: {}", summary.added);
    println!("Removed Students: {}\n", summary.removed);
    println!("Wrote {}", data_file.display());

    Ok(())
}
