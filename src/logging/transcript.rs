// Session transcript: every collaborator exchange appended as JSONL

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single recorded exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: String,

    /// Shared by every entry written during one run
    pub session_id: String,

    pub timestamp: DateTime<Utc>,

    /// What was sent (initial task state or the user's progress update)
    pub message: String,

    /// Raw collaborator reply, before any parsing
    pub reply: String,

    pub model: String,
}

/// Buffered JSONL writer for one run's exchanges
pub struct TranscriptLogger {
    log_path: PathBuf,
    session_id: String,
    buffer: Vec<TranscriptEntry>,
    flush_threshold: usize,
}

impl TranscriptLogger {
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create transcript directory")?;
        }

        Ok(Self {
            log_path,
            session_id: uuid::Uuid::new_v4().to_string(),
            buffer: Vec::new(),
            flush_threshold: 5,
        })
    }

    /// Logger writing to today's `session-YYYY-MM-DD.jsonl` inside `dir`
    pub fn in_dir(dir: &Path) -> Result<Self> {
        let file_name = format!("session-{}.jsonl", Utc::now().format("%Y-%m-%d"));
        Self::new(dir.join(file_name))
    }

    /// Buffer one exchange, flushing when the threshold is reached
    pub fn log_exchange(&mut self, message: &str, reply: &str, model: &str) -> Result<String> {
        let entry = TranscriptEntry {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: self.session_id.clone(),
            timestamp: Utc::now(),
            message: message.to_string(),
            reply: reply.to_string(),
            model: model.to_string(),
        };

        let id = entry.id.clone();
        self.buffer.push(entry);

        if self.buffer.len() >= self.flush_threshold {
            self.flush()?;
        }

        Ok(id)
    }

    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        debug!("Flushing {} transcript entries to {}", self.buffer.len(), self.log_path.display());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .context("Failed to open transcript file")?;

        for entry in &self.buffer {
            let json = serde_json::to_string(entry).context("Failed to serialize transcript entry")?;
            writeln!(file, "{}", json).context("Failed to write transcript entry")?;
        }

        self.buffer.clear();
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for TranscriptLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Failed to flush transcript on exit: {:#}", e);
        }
    }
}
