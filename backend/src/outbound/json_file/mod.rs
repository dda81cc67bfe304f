//! Results store backed by a single pretty-printed JSON array on disk.
//!
//! Appends are read-modify-write cycles serialised by an async mutex and
//! committed with an atomic rename. Content that is not a JSON array reads
//! as empty; the next append moves it aside to `<name>.corrupt` (numbered
//! `.corrupt.1`, `.corrupt.2` when earlier copies exist) before the fresh
//! array is written. Array elements that are not recognisable records
//! are skipped on read but preserved on write.

mod atomic_io;
mod legacy;

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::AssessmentRecord;
use crate::domain::ports::{ResultsRepository, ResultsRepositoryError};

const CORRUPT_SUFFIX: &str = ".corrupt";

/// Raw file state as seen by a single read.
#[derive(Debug)]
enum FileContents {
    Entries(Vec<Value>),
    Corrupt,
}

/// JSON file adapter for [`ResultsRepository`].
#[derive(Clone)]
pub struct JsonFileResultsRepository {
    dir: Arc<Dir>,
    file_name: String,
    path: Utf8PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileResultsRepository {
    /// Open the store at `path`, creating its parent directory if needed.
    ///
    /// The file itself is created lazily on the first append.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, ResultsRepositoryError> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .ok_or_else(|| {
                ResultsRepositoryError::connection(format!("{path} does not name a file"))
            })?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        let dir = Dir::create_ambient_dir_all(&parent, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(&parent, ambient_authority()))
            .map_err(|err| ResultsRepositoryError::connection(format!("{parent}: {err}")))?;

        Ok(Self {
            dir: Arc::new(dir),
            file_name,
            path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Location of the results file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    async fn read_contents(&self) -> Result<FileContents, ResultsRepositoryError> {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let text = tokio::task::spawn_blocking(move || match dir.read_to_string(&file_name) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(err),
        })
        .await
        .map_err(|err| ResultsRepositoryError::query(err.to_string()))?
        .map_err(|err| self.io_error(&err))?;

        if text.trim().is_empty() {
            return Ok(FileContents::Entries(Vec::new()));
        }
        match serde_json::from_str::<Vec<Value>>(&text) {
            Ok(entries) => Ok(FileContents::Entries(entries)),
            Err(err) => {
                warn!(path = %self.path, error = %err, "results file is malformed; treating as empty");
                Ok(FileContents::Corrupt)
            }
        }
    }

    fn io_error(&self, err: &io::Error) -> ResultsRepositoryError {
        ResultsRepositoryError::query(format!("{}: {err}", self.path))
    }

    fn decode(&self, index: usize, entry: Value) -> Option<AssessmentRecord> {
        match serde_json::from_value::<AssessmentRecord>(entry.clone()) {
            Ok(record) => Some(record),
            Err(current_err) => match legacy::decode(&entry) {
                Some(record) => Some(record),
                None => {
                    warn!(
                        path = %self.path,
                        index,
                        error = %current_err,
                        "skipping unreadable results entry"
                    );
                    None
                }
            },
        }
    }
}

#[async_trait]
impl ResultsRepository for JsonFileResultsRepository {
    async fn append(&self, record: &AssessmentRecord) -> Result<(), ResultsRepositoryError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_contents().await? {
            FileContents::Entries(entries) => entries,
            FileContents::Corrupt => {
                let stem = format!("{}{CORRUPT_SUFFIX}", self.file_name);
                let dir = Arc::clone(&self.dir);
                let source = self.file_name.clone();
                let moved_to =
                    tokio::task::spawn_blocking(move || atomic_io::move_aside(&dir, &source, &stem))
                        .await
                        .map_err(|err| ResultsRepositoryError::query(err.to_string()))?
                        .map_err(|err| self.io_error(&err))?;
                warn!(path = %self.path, moved_to = %moved_to, "moved malformed results file aside");
                Vec::new()
            }
        };

        let value = serde_json::to_value(record)
            .map_err(|err| ResultsRepositoryError::query(format!("encode record: {err}")))?;
        entries.push(value);
        let body = encode_pretty(&entries)
            .map_err(|err| ResultsRepositoryError::query(format!("encode results: {err}")))?;

        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        tokio::task::spawn_blocking(move || atomic_io::write_atomic(&dir, &file_name, &body))
            .await
            .map_err(|err| ResultsRepositoryError::query(err.to_string()))?
            .map_err(|err| self.io_error(&err))?;
        debug!(path = %self.path, count = entries.len(), "results file updated");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AssessmentRecord>, ResultsRepositoryError> {
        let entries = match self.read_contents().await? {
            FileContents::Entries(entries) => entries,
            FileContents::Corrupt => return Ok(Vec::new()),
        };
        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| self.decode(index, entry))
            .collect())
    }
}

/// Pretty-print with four-space indentation, matching existing results files.
fn encode_pretty(entries: &[Value]) -> Result<Vec<u8>, serde_json::Error> {
    let mut body = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut body, formatter);
    entries.serialize(&mut serializer)?;
    body.push(b'\n');
    Ok(body)
}

#[cfg(test)]
mod tests;
