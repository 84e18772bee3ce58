use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::APP_DIR;
use crate::errors::DispatchResult;
use crate::operation::types::NormalizedOperation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub ts: i64,
    /// Operation name as received, even when it failed to resolve.
    pub operation: String,
    pub normalized: Option<NormalizedOperation>,
    /// `"ok"` or the error message.
    pub outcome: String,
}

impl JournalEntry {
    pub fn new(
        operation: impl Into<String>,
        normalized: Option<NormalizedOperation>,
        outcome: Result<(), String>,
    ) -> Self {
        Self {
            ts: chrono::Utc::now().timestamp_millis(),
            operation: operation.into(),
            normalized,
            outcome: outcome.err().unwrap_or_else(|| "ok".to_string()),
        }
    }
}

/// Append-only JSONL record of one dispatch session.
pub struct DispatchJournal {
    pub session_id: String,
    file_path: PathBuf,
}

impl DispatchJournal {
    pub fn new(dir: Option<&Path>) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        let dir = dir.map(Path::to_path_buf).unwrap_or_else(data_dir_or_cwd);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot create journal dir");
        }
        let file_path = dir.join(format!("session_{session_id}.jsonl"));
        Self {
            session_id,
            file_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn record(&self, entry: &JournalEntry) -> DispatchResult<()> {
        let line = serde_json::to_string(entry)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        writeln!(file, "{}", line)?;
        tracing::debug!(path = %self.file_path.display(), "journal entry written");
        Ok(())
    }
}

/// `<data_local_dir>/grounded-dispatch/sessions`, falling back to the
/// current working directory.
fn data_dir_or_cwd() -> PathBuf {
    match dirs::data_local_dir() {
        Some(base) => base.join(APP_DIR).join("sessions"),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
