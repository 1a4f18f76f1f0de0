use std::{io, path::PathBuf};

use anyhow::Context;
use cognito_engine::Action;
use cognito_evaluator::{
    decision::{DecisionEngine, Observation},
    placement_search::Target,
};
use serde::{Deserialize as _, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DecideArg {
    /// Weights file (JSON array of 6 numbers) [default: baseline weights]
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Observation JSON file [default: a stream of observations on stdin]
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DecisionOutput {
    action: Action,
    /// Host key token; `null` for no-op.
    key: Option<&'static str>,
    target: Option<Target>,
}

impl DecisionOutput {
    const NOOP: Self = Self {
        action: Action::Noop,
        key: None,
        target: None,
    };
}

fn decide(engine: &DecisionEngine<'_>, observation: &Observation) -> DecisionOutput {
    match engine.try_decide(observation) {
        Ok(decision) => DecisionOutput {
            action: decision.action,
            key: decision.action.key(),
            target: Some(decision.target),
        },
        Err(err) => {
            warn!(%err, "unusable observation, answering no-op");
            DecisionOutput::NOOP
        }
    }
}

/// Decides for well-formed JSON whose fields may still have the wrong types.
fn decide_value(engine: &DecisionEngine<'_>, value: Value) -> DecisionOutput {
    match Observation::deserialize(value) {
        Ok(observation) => decide(engine, &observation),
        Err(err) => {
            warn!(%err, "mistyped observation, answering no-op");
            DecisionOutput::NOOP
        }
    }
}

/// Answers every JSON value in `reader`; only a JSON syntax error ends the stream early.
fn answer_stream<R, F>(engine: &DecisionEngine<'_>, reader: R, mut answer: F) -> anyhow::Result<()>
where
    R: io::Read,
    F: FnMut(DecisionOutput) -> anyhow::Result<()>,
{
    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<Value>();
    for value in stream {
        let value = value.context("Failed to parse observation from stdin")?;
        answer(decide_value(engine, value))?;
    }
    Ok(())
}

pub(crate) fn run(arg: &DecideArg) -> anyhow::Result<()> {
    let DecideArg { weights, input } = arg;
    let engine = DecisionEngine::new(util::load_weights(weights.as_deref())?);
    let mut output = Output::stdout();

    if let Some(path) = input {
        let value: Value = util::read_json_file("observation", path)?;
        return output.write_json(&decide_value(&engine, value));
    }

    answer_stream(&engine, io::stdin().lock(), |answer| output.write_json_line(&answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(input: &str) -> anyhow::Result<Vec<DecisionOutput>> {
        let engine = DecisionEngine::default();
        let mut answers = vec![];
        answer_stream(&engine, input.as_bytes(), |answer| {
            answers.push(answer);
            Ok(())
        })?;
        Ok(answers)
    }

    #[test]
    fn test_mistyped_observation_answers_noop_and_continues() {
        let input = concat!(
            r#"{"grid": [[0, 0]], "current_piece": {"type": "O", "rotation": -1}}"#,
            "\n",
            r#"{"level": -3}"#,
            "\n",
            r#"{"grid": [[0, 256]]}"#,
            "\n",
            "{}\n",
        );
        let answers = answers(input).unwrap();
        assert_eq!(answers.len(), 4);
        for answer in &answers {
            assert_eq!(answer.action, Action::Noop);
            assert_eq!(answer.key, None);
            assert_eq!(answer.target, None);
        }
    }

    #[test]
    fn test_usable_observation_after_mistyped_one() {
        let mut grid = vec![vec![0u8; 15]; 19];
        for (r, c) in [(0, 6), (0, 7), (1, 6), (1, 7)] {
            grid[r][c] = 3;
        }
        let good = serde_json::json!({
            "grid": grid,
            "current_piece": {
                "type": "O",
                "x": 5,
                "y": 0,
                "rotation": 0,
                "cells": [[0, 6], [0, 7], [1, 6], [1, 7]],
            },
        });
        let input = format!(r#"{{"current_piece": {{"x": "left"}}}} {good}"#);
        let answers = answers(&input).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].action, Action::Noop);
        assert_eq!(answers[1].action, Action::ShiftLeft);
        assert_eq!(answers[1].key, Action::ShiftLeft.key());
        assert!(answers[1].target.is_some());
    }

    #[test]
    fn test_syntax_error_ends_stream() {
        let engine = DecisionEngine::default();
        let mut count = 0;
        let result = answer_stream(&engine, "{} {\"grid\": [".as_bytes(), |_| {
            count += 1;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(count, 1);
    }
}
