// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event tailer: incrementally reads new [`NormalizedEvent`] lines appended
//! to `events/<pane>.jsonl` files (spec.md §2, §6).

use genie_core::NormalizedEvent;
use genie_storage::GenieLayout;
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TailerError {
    #[error("failed to read events directory {path}: {source}")]
    ReadDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read event file {path}: {source}")]
    ReadFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tracks a byte offset per pane event file and yields only the lines
/// appended since the last poll. A line without a trailing newline (a
/// write still in flight) is left unconsumed until it completes.
#[derive(Default)]
pub struct EventTailer {
    offsets: HashMap<String, u64>,
}

impl EventTailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `layout`'s events directory and return newly-appended,
    /// well-formed events across every pane file, in file-name order.
    /// Malformed lines are skipped rather than failing the whole poll —
    /// a single corrupt record must not stall every other pane.
    pub fn poll(&mut self, layout: &GenieLayout) -> Result<Vec<NormalizedEvent>, TailerError> {
        let dir = layout.events_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TailerError::ReadDir { path: dir, source: e }),
        };

        let mut paths: Vec<_> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("jsonl"))
            .collect();
        paths.sort();

        let mut events = Vec::new();
        for path in paths {
            events.extend(self.poll_file(&path)?);
        }
        Ok(events)
    }

    fn poll_file(&mut self, path: &std::path::Path) -> Result<Vec<NormalizedEvent>, TailerError> {
        let key = path.display().to_string();
        let offset = self.offsets.get(&key).copied().unwrap_or(0);

        let mut file = std::fs::File::open(path).map_err(|e| TailerError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let len = file
            .metadata()
            .map_err(|e| TailerError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();
        if len <= offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(offset))
            .map_err(|e| TailerError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
        let mut buf = String::new();
        file.read_to_string(&mut buf).map_err(|e| TailerError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Only complete (newline-terminated) lines are consumed; a
        // trailing partial line is re-read on the next poll.
        let complete_len = buf.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let consumed = &buf[..complete_len];
        self.offsets.insert(key, offset + consumed.len() as u64);

        let events = consumed
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| NormalizedEvent::from_line(line).ok())
            .collect();
        Ok(events)
    }
}

#[cfg(test)]
#[path = "tailer_tests.rs"]
mod tests;
