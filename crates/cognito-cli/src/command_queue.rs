//! File-backed command queue.
//!
//! The queue file holds a JSON array of `{"key": "a", "timestamp": 1700000000.5}`
//! records, where `timestamp` is Unix time in seconds. Producers append; the
//! consumer drains from the front. A missing, unreadable or malformed file is
//! treated as an empty queue.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use cognito_engine::Action;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable overriding the queue file path.
pub const CMD_FILE_ENV: &str = "COGNITO_CMD_FILE";
pub const DEFAULT_CMD_FILE: &str = "command_queue.json";

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CommandQueueError {
    #[display("invalid key {_0:?}; expected one of w, a, s, d, \" \" or space")]
    #[from(skip)]
    InvalidKey(#[error(not(source))] String),
    #[display("failed to write command queue: {_0}")]
    Io(io::Error),
    #[display("failed to encode command queue: {_0}")]
    Json(serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub key: String,
    pub timestamp: f64,
}

impl CommandRecord {
    /// Record for `action` at `at`; `None` for [`Action::Noop`], which has no key.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(action: Action, at: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            key: action.key()?.to_owned(),
            timestamp: at.timestamp_micros() as f64 / 1e6,
        })
    }

    #[must_use]
    pub fn action(&self) -> Option<Action> {
        Action::from_key(&self.key)
    }

    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros((self.timestamp * 1e6).round() as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandQueue {
    path: PathBuf,
}

impl CommandQueue {
    #[must_use]
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    /// Queue at `$COGNITO_CMD_FILE`, or `command_queue.json` in the working directory.
    #[must_use]
    pub fn from_env() -> Self {
        let path = env::var_os(CMD_FILE_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CMD_FILE), PathBuf::from);
        Self::new(path)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Vec<CommandRecord> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return vec![],
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    %err,
                    "unreadable command queue, starting empty"
                );
                return vec![];
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|err| {
            warn!(
                path = %self.path.display(),
                %err,
                "malformed command queue, starting empty"
            );
            vec![]
        })
    }

    fn store(&self, records: &[CommandRecord]) -> Result<(), CommandQueueError> {
        let json = serde_json::to_string(records)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Appends a record for the host key `key` (`"space"` is accepted for `" "`).
    pub fn send(&self, key: &str) -> Result<CommandRecord, CommandQueueError> {
        let record = Action::from_key(key)
            .and_then(|action| CommandRecord::new(action, Utc::now()))
            .ok_or_else(|| CommandQueueError::InvalidKey(key.to_owned()))?;
        let mut records = self.load();
        records.push(record.clone());
        self.store(&records)?;
        Ok(record)
    }

    /// Removes and returns up to `limit` records from the front, or all of them.
    pub fn drain(&self, limit: Option<usize>) -> Result<Vec<CommandRecord>, CommandQueueError> {
        let mut records = self.load();
        let count = limit.map_or(records.len(), |limit| limit.min(records.len()));
        let rest = records.split_off(count);
        if !records.is_empty() {
            self.store(&rest)?;
        }
        Ok(records)
    }
}
