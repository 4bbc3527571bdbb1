use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::HistoryRecorder;
use super::model::HistoryEntry;
use crate::error::PersistenceError;

/// One line of the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub played_at: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: HistoryEntry,
}

/// Appends every notification as a JSON object on its own line.
#[derive(Debug, Clone)]
pub struct JsonlHistoryRecorder {
    path: PathBuf,
}

impl JsonlHistoryRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &HistoryRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Read back every well-formed record, oldest first.
    ///
    /// A missing file is an empty history; lines that fail to parse are
    /// skipped.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRecord>(&line) {
                Ok(r) => records.push(r),
                Err(e) => debug!(line = lineno + 1, error = %e, "skipping malformed history line"),
            }
        }
        Ok(records)
    }
}

impl HistoryRecorder for JsonlHistoryRecorder {
    fn notify(&mut self, entry: HistoryEntry) {
        let record = HistoryRecord {
            played_at: Utc::now(),
            entry,
        };
        if let Err(e) = self.append(&record) {
            warn!(path = %self.path.display(), error = %e, "failed to record play history");
        }
    }
}
