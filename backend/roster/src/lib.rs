//! # Roster
//!
//! Student dataset shared by the lookup server and the refresh tooling.
//!
//! ## Storage
//! - Single JSON file, default `data/student-data.json`
//! - Read wholesale on every request, no cache
//! - Replaced wholesale on refresh, never patched
//! - Each write stages into its own temp file in the same directory, then renames over the target
//!
//! ## Refresh
//! - Ask the [`RecordSource`] for a fresh dataset
//! - Only a fully parsed dataset is written, so a failed refresh leaves the old file in place
use std::{
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tokio::{fs, task};
use tracing::info;

pub mod error;
pub mod records;
pub mod remote;

pub use error::{RefreshError, StorageError, UpstreamError};
pub use records::{Dataset, FieldMapping, StudentRecord};
pub use remote::{AppsScriptSource, RecordSource};

pub const DEFAULT_DATA_FILE: &str = "data/student-data.json";

pub async fn get_dataset(path: &Path) -> Result<Dataset, StorageError> {
    let data = fs::read(path).await.map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn write_dataset(path: &Path, dataset: &[StudentRecord]) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec(dataset).map_err(StorageError::Encode)?;
    let target = path.to_path_buf();

    task::spawn_blocking(move || stage_and_persist(&target, &bytes))
        .await
        .map_err(io::Error::other)
        .and_then(|result| result)
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}

// Each call stages into its own temp file next to the target, so overlapping
// writers never share a staging file and the last persist wins.
fn stage_and_persist(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let directory = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            directory
        }
        None => Path::new("."),
    };

    let mut staging = NamedTempFile::new_in(directory)?;
    staging.write_all(bytes)?;
    staging.as_file().sync_all()?;
    staging.persist(path).map_err(|e| e.error)?;

    Ok(())
}

pub async fn refresh_dataset<S>(
    source: &S,
    mapping: &FieldMapping,
    path: &Path,
) -> Result<Dataset, RefreshError>
where
    S: RecordSource + ?Sized,
{
    let dataset = source.fetch(mapping).await?;
    write_dataset(path, &dataset).await?;

    info!("Wrote {} records to {}", dataset.len(), path.display());

    Ok(dataset)
}
