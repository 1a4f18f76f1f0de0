//! Per-tick decisions from a host observation.
//!
//! An [`Observation`] mirrors what the host hands its bot every decision
//! interval: the rendered grid (falling piece included), the falling piece's
//! descriptor and the level. Every field is optional on the wire; anything
//! missing or malformed makes [`DecisionEngine::decide`] answer
//! [`Action::Noop`].
//!
//! ```
//! use cognito_engine::{Action, GameConfig, GameSession};
//! use cognito_evaluator::decision::{DecisionEngine, Observation};
//!
//! let engine = DecisionEngine::default();
//! let session = GameSession::with_seed(GameConfig::default(), 1);
//! let action = engine.decide(&Observation::from_session(&session));
//! assert_ne!(action, Action::Noop);
//!
//! assert_eq!(engine.decide(&Observation::default()), Action::Noop);
//! ```

use std::path::Path;

use cognito_engine::{Action, Board, BoardShapeError, GameSession, Piece, PieceKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    action_translator::{ActionTranslator, TranslatorConfig},
    placement_evaluator::WeightedPlacementEvaluator,
    placement_search::{PlacementSearch, SearchMode, Target},
    weights::{PlacementWeights, WeightsError},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ObservationError {
    #[display("observation has no grid")]
    MissingBoard,
    #[display("observation has no current piece")]
    MissingPiece,
    #[display("observation grid is malformed: {_0}")]
    RaggedGrid(BoardShapeError),
    #[display("unknown piece type {_0:?}")]
    UnknownPieceType(#[error(not(source))] String),
    #[display("piece pose ({x}, {y}) is too far outside the board")]
    PoseOutOfRange { x: i32, y: i32 },
}

/// How far a reported anchor may sit outside the grid before it is rejected.
///
/// A 4x4 mask anchored this far out still has no cell on the board.
const POSE_MARGIN: i32 = 4;

fn pose_limit(cells: usize) -> i32 {
    i32::try_from(cells).map_or(i32::MAX, |n| n.saturating_add(POSE_MARGIN))
}

fn check_pose(board: &Board, x: i32, y: i32) -> Result<(), ObservationError> {
    let x_range = -POSE_MARGIN..=pose_limit(board.col_count());
    let y_range = -POSE_MARGIN..=pose_limit(board.row_count());
    if x_range.contains(&x) && y_range.contains(&y) {
        Ok(())
    } else {
        Err(ObservationError::PoseOutOfRange { x, y })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub grid: Option<Vec<Vec<u8>>>,
    #[serde(default)]
    pub current_piece: Option<PieceObservation>,
    #[serde(default)]
    pub level: Option<usize>,
}

/// Falling piece as reported by the host.
///
/// `cells` lists the `(row, col)` cells the piece occupies in `grid`; they are
/// removed before searching so the piece does not collide with itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceObservation {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub rotation: usize,
    #[serde(default)]
    pub cells: Vec<(i32, i32)>,
}

impl Observation {
    /// Builds the observation the host would send for `session`.
    #[must_use]
    pub fn from_session(session: &GameSession) -> Self {
        let piece = session.falling_piece();
        Self {
            grid: Some(session.render_board().to_grid()),
            current_piece: Some(PieceObservation {
                kind: Some(piece.kind().as_char().to_string()),
                x: piece.x(),
                y: piece.y(),
                rotation: piece.rotation(),
                cells: piece
                    .occupied_positions()
                    .into_iter()
                    .map(|(x, y)| (y, x))
                    .collect(),
            }),
            level: Some(session.level()),
        }
    }

    /// Level reported by the host; absent or zero is treated as 1.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level.filter(|&l| l > 0).unwrap_or(1)
    }
}

/// What the engine decided and where it is steering the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub target: Target,
}

/// Placement search plus action translation, answering one action per call.
#[derive(Debug)]
pub struct DecisionEngine<'a> {
    search: PlacementSearch<'a>,
    translator: ActionTranslator,
}

impl Default for DecisionEngine<'_> {
    fn default() -> Self {
        Self::new(PlacementWeights::BASELINE)
    }
}

impl<'a> DecisionEngine<'a> {
    /// Live engine: re-plans every call against the live pose, so reachability is not validated.
    #[must_use]
    pub fn new(weights: PlacementWeights) -> Self {
        Self::with_parts(
            PlacementSearch::new(
                Box::new(WeightedPlacementEvaluator::new(weights)),
                SearchMode::Unvalidated,
            ),
            ActionTranslator::new(TranslatorConfig::LIVE),
        )
    }

    /// Loads the weights artifact once; a missing or malformed file is an error.
    pub fn from_weights_file<P>(path: P) -> Result<Self, WeightsError>
    where
        P: AsRef<Path>,
    {
        Ok(Self::new(PlacementWeights::from_json_file(path)?))
    }

    #[must_use]
    pub fn with_parts(search: PlacementSearch<'a>, translator: ActionTranslator) -> Self {
        Self { search, translator }
    }

    /// Returns one action, or [`Action::Noop`] when the observation is unusable.
    #[must_use]
    pub fn decide(&self, observation: &Observation) -> Action {
        match self.try_decide(observation) {
            Ok(decision) => decision.action,
            Err(err) => {
                debug!(%err, "ignoring observation");
                Action::Noop
            }
        }
    }

    pub fn try_decide(&self, observation: &Observation) -> Result<Decision, ObservationError> {
        let grid = observation
            .grid
            .as_deref()
            .ok_or(ObservationError::MissingBoard)?;
        let current = observation
            .current_piece
            .as_ref()
            .ok_or(ObservationError::MissingPiece)?;
        let board = Board::from_grid(grid)
            .map_err(ObservationError::RaggedGrid)?
            .without_cells(current.cells.iter().copied());
        let name = current.kind.as_deref().unwrap_or_default();
        let kind = PieceKind::from_name(name)
            .ok_or_else(|| ObservationError::UnknownPieceType(name.to_owned()))?;
        check_pose(&board, current.x, current.y)?;

        let target = self.search.select(&board, kind).target();
        let piece = Piece::with_pose(kind, current.rotation, current.x, current.y);
        let level = observation.level();
        let action = self
            .translator
            .translate(&board, piece, target.rotation, target.x, level);
        debug!(?kind, ?target, level, %action, "decided");
        Ok(Decision { action, target })
    }
}
