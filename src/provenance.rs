//! Processing provenance log.
//!
//! Every operation a pipeline applies to a record is recorded with a
//! timestamp, a sequence number, and a description, so a processed record
//! can be traced back to its raw input. The log exports as human-readable
//! text or JSON.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// A single recorded operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Sequential operation number (1-based).
    pub sequence: usize,
    pub timestamp: DateTime<Local>,
    /// Short operation name.
    pub operation: String,
    /// Parameter values and outcome details.
    pub description: String,
}

impl LogEntry {
    pub fn to_text(&self) -> String {
        format!(
            "[{:03}] {} | {} | {}",
            self.sequence,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.description
        )
    }
}

/// Ordered record of every operation in a processing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceLog {
    pub session_id: String,
    pub session_start: DateTime<Local>,
    /// Identifier of the record being processed (station, event, file).
    pub source: String,
    pub software_version: String,
    pub entries: Vec<LogEntry>,
}

impl ProvenanceLog {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            source: String::new(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: Vec::new(),
        }
    }

    pub fn set_source(&mut self, source: &str) {
        self.source = source.to_string();
    }

    pub fn add_entry(&mut self, operation: &str, description: &str) {
        let seq = self.entries.len() + 1;
        self.entries.push(LogEntry {
            sequence: seq,
            timestamp: Local::now(),
            operation: operation.to_string(),
            description: description.to_string(),
        });
        log::info!("[LOG {:03}] {} — {}", seq, operation, description);
    }

    /// Remove the last entry (for undo).
    pub fn pop_entry(&mut self) -> Option<LogEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export as human-readable text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Waveform processing log (seismowave v{})\n",
            self.software_version
        ));
        out.push_str(&format!(
            "Session {} started {}\n",
            self.session_id,
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!(
            "Source: {} ({} operations)\n\n",
            self.source,
            self.entries.len()
        ));

        for entry in &self.entries {
            out.push_str(&entry.to_text());
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    pub fn save_text(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_text())
    }

    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_json())
    }
}

impl Default for ProvenanceLog {
    fn default() -> Self {
        Self::new()
    }
}
