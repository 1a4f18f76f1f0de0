use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;
use cognito_evaluator::weights::PlacementWeights;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, warn};

/// Where a command writes its JSON results: stdout, or a file it creates.
pub struct Output {
    writer: Box<dyn io::Write>,
    name: String,
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout when `None`.
    pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let mut output = match path {
            Some(path) => Output::create(path)?,
            None => Output::stdout(),
        };
        output.write_json(value)
    }

    pub fn stdout() -> Self {
        Self {
            writer: Box::new(io::stdout().lock()),
            name: "stdout".to_owned(),
        }
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            name: path.display().to_string(),
        })
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.name))?;
        self.finish_line()
    }

    /// Writes `value` as one compact JSON line, for streamed answers.
    pub fn write_json_line<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.name))?;
        self.finish_line()
    }

    fn finish_line(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write to {}", self.name))
    }
}

pub fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Loads a weights artifact, or the baseline weights when no path is given.
///
/// Falling back to the baseline is logged at `warn`, since a trained artifact
/// is normally expected. A missing or malformed artifact is an error.
pub fn load_weights(path: Option<&Path>) -> anyhow::Result<PlacementWeights> {
    let Some(path) = path else {
        warn!("no weights file given, using baseline weights");
        return Ok(PlacementWeights::BASELINE);
    };
    let weights = PlacementWeights::from_json_file(path)
        .with_context(|| format!("Failed to load weights file: {}", path.display()))?;
    info!(path = %path.display(), ?weights, "loaded weights");
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;

    #[test]
    fn test_load_weights() {
        assert_eq!(load_weights(None).unwrap(), PlacementWeights::BASELINE);

        let dir = env::temp_dir().join(format!("cognito-util-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let missing = dir.join("missing.json");
        let err = load_weights(Some(missing.as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to load weights file"));

        let malformed = dir.join("malformed.json");
        fs::write(&malformed, "[1, 2, 3]").unwrap();
        assert!(load_weights(Some(malformed.as_path())).is_err());

        let saved = dir.join("saved.json");
        fs::write(&saved, "[-1, -2, -3, -4, -5, -6]").unwrap();
        let weights = load_weights(Some(saved.as_path())).unwrap();
        assert_eq!(weights.as_array(), [-1.0, -2.0, -3.0, -4.0, -5.0, -6.0]);
        fs::remove_dir_all(&dir).unwrap();
    }
}
