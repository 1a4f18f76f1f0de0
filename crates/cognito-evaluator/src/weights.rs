//! Heuristic weight vector and its JSON artifact.
//!
//! A weights artifact is a plain JSON array of six numbers in
//! [`FEATURE_NAMES`](crate::board_analysis::FEATURE_NAMES) order:
//!
//! ```json
//! [-0.510066, -0.35663, -0.184483, -0.18, -0.15, -0.3]
//! ```

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write as _},
    iter,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::board_analysis::{BoardFeatures, FEATURE_COUNT};

/// Score added per cleared line, on top of the weighted features.
pub const LINE_CLEAR_BONUS: f32 = 0.760_666;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum WeightsError {
    #[display("failed to access weights file: {_0}")]
    Io(io::Error),
    #[display("weights file is not valid JSON: {_0}")]
    Json(serde_json::Error),
    #[display("weights file has {actual} values, expected {FEATURE_COUNT}")]
    #[from(skip)]
    WrongLength { actual: usize },
}

/// Coefficients applied to [`BoardFeatures`], in feature order.
///
/// The value is immutable once built; training produces new vectors rather
/// than editing one in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f32>", try_from = "Vec<f32>")]
pub struct PlacementWeights([f32; FEATURE_COUNT]);

impl PlacementWeights {
    /// Hand-tuned starting point for training and the default engine.
    pub const BASELINE: Self = Self([-0.510_066, -0.356_63, -0.184_483, -0.18, -0.15, -0.30]);

    #[must_use]
    pub const fn new(weights: [f32; FEATURE_COUNT]) -> Self {
        Self(weights)
    }

    #[must_use]
    pub const fn as_array(&self) -> [f32; FEATURE_COUNT] {
        self.0
    }

    /// Weighted feature sum, without the line-clear bonus.
    #[must_use]
    pub fn dot(&self, features: BoardFeatures) -> f32 {
        iter::zip(self.0, features.to_array())
            .map(|(w, f)| w * f)
            .sum()
    }

    pub fn from_json_file<P>(path: P) -> Result<Self, WeightsError>
    where
        P: AsRef<Path>,
    {
        let reader = BufReader::new(File::open(path)?);
        let weights = serde_json::from_reader::<_, Vec<f32>>(reader)?;
        Self::try_from(weights)
    }

    pub fn save_json_file<P>(&self, path: P) -> Result<(), WeightsError>
    where
        P: AsRef<Path>,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for PlacementWeights {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl TryFrom<Vec<f32>> for PlacementWeights {
    type Error = WeightsError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        let actual = values.len();
        let weights = <[f32; FEATURE_COUNT]>::try_from(values)
            .map_err(|_| WeightsError::WrongLength { actual })?;
        Ok(Self(weights))
    }
}

impl From<PlacementWeights> for Vec<f32> {
    fn from(weights: PlacementWeights) -> Self {
        weights.0.to_vec()
    }
}
