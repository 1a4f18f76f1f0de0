use std::path::PathBuf;

use chrono::{DateTime, Utc};
use cognito_engine::Action;
use serde::Serialize;

use crate::{
    command_queue::{CommandQueue, CommandRecord},
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SendArg {
    /// Host key: w, a, s, d, " " or space
    key: String,
    /// Queue file [default: $COGNITO_CMD_FILE or command_queue.json]
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DrainArg {
    /// Remove at most this many records
    #[arg(long)]
    limit: Option<usize>,
    /// Queue file [default: $COGNITO_CMD_FILE or command_queue.json]
    #[arg(long)]
    file: Option<PathBuf>,
}

fn open_queue(file: Option<&PathBuf>) -> CommandQueue {
    file.map_or_else(CommandQueue::from_env, CommandQueue::new)
}

pub(crate) fn run_send(arg: &SendArg) -> anyhow::Result<()> {
    let SendArg { key, file } = arg;
    let queue = open_queue(file.as_ref());
    let record = queue.send(key)?;
    eprintln!("Queued {:?} to {}", record.key, queue.path().display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct DrainedRecord<'a> {
    #[serde(flatten)]
    record: &'a CommandRecord,
    action: Option<Action>,
    recorded_at: Option<DateTime<Utc>>,
}

impl<'a> DrainedRecord<'a> {
    fn new(record: &'a CommandRecord) -> Self {
        Self {
            record,
            action: record.action(),
            recorded_at: record.recorded_at(),
        }
    }
}

pub(crate) fn run_drain(arg: &DrainArg) -> anyhow::Result<()> {
    let DrainArg { limit, file } = arg;
    let queue = open_queue(file.as_ref());
    let records = queue.drain(*limit)?;
    let mut output = Output::stdout();
    for record in &records {
        output.write_json_line(&DrainedRecord::new(record))?;
    }
    eprintln!(
        "Drained {} records from {}",
        records.len(),
        queue.path().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drained_record_carries_action_and_time() {
        let at = DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap();
        let record = CommandRecord::new(Action::Rotate, at).unwrap();
        let json = serde_json::to_value(DrainedRecord::new(&record)).unwrap();
        assert_eq!(json["key"], "w");
        assert_eq!(json["action"], "rotate");
        assert_eq!(json["recorded_at"], "2023-11-14T22:13:20.250Z");
    }

    #[test]
    fn test_drained_record_with_unknown_key() {
        let record = CommandRecord {
            key: "q".to_owned(),
            timestamp: 1_700_000_000.0,
        };
        let json = serde_json::to_value(DrainedRecord::new(&record)).unwrap();
        assert!(json["action"].is_null());
        assert_eq!(json["recorded_at"], "2023-11-14T22:13:20Z");
    }
}
