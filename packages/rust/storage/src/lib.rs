//! Append-only JSONL store for keyword matches.
//!
//! The [`MatchStore`] owns the path of `keyword_matches.jsonl`. Each record
//! is written as one JSON object followed by `\n`.
//!
//! **Access rules:**
//! - The file is truncated once at the start of a sweep via [`MatchStore::truncate`]
//! - Every append opens, writes, and closes the file; no handle outlives a call
//! - Records are never rewritten; triage happens downstream

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use pastewatch_shared::{MatchRecord, PastewatchError, Result};

/// Handle to the JSONL match file.
#[derive(Debug, Clone)]
pub struct MatchStore {
    path: PathBuf,
}

impl MatchStore {
    /// Point a store at `path`. Nothing is touched on disk until a write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the JSONL file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file, or empty it if it already exists.
    pub fn truncate(&self) -> Result<()> {
        File::create(&self.path).map_err(|e| PastewatchError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "match file truncated");
        Ok(())
    }

    /// Append one record as a single newline-terminated JSON line.
    pub fn append(&self, record: &MatchRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| PastewatchError::Storage(format!("failed to serialize record: {e}")))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PastewatchError::io(&self.path, e))?;

        file.write_all(line.as_bytes())
            .map_err(|e| PastewatchError::io(&self.path, e))?;

        tracing::info!(
            paste_id = %record.paste_id,
            keywords = ?record.keywords_found,
            "Saved match for paste {} with keywords {:?}",
            record.paste_id,
            record.keywords_found
        );
        Ok(())
    }

    /// Read every record back, in file order. Blank lines are skipped.
    pub fn read_all(&self) -> Result<Vec<MatchRecord>> {
        let file = File::open(&self.path).map_err(|e| PastewatchError::io(&self.path, e))?;

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| PastewatchError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                PastewatchError::Storage(format!(
                    "{}:{}: invalid match record: {e}",
                    self.path.display(),
                    index + 1
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}
