//! Placement scoring, search and per-tick control for the falling-block autoplayer.
//!
//! The crate is layered bottom-up:
//!
//! 1. **Features** ([`board_analysis`]) - six board metrics: aggregate height,
//!    holes, bumpiness, max height, row transitions and column transitions.
//! 2. **Placement Evaluation** ([`placement_evaluator`]) - a weighted sum of
//!    the features plus a bonus per cleared line, using [`weights`].
//! 3. **Placement Search** ([`placement_search`]) - enumerates every
//!    hard-drop placement and keeps the best one, optionally filtered by
//!    [`reachability`].
//! 4. **Control** - [`action_translator`] turns a target into one action per
//!    tick. [`decision`] wires search and translation to host observations,
//!    and [`session_player`] drives whole simulated games for training.
//!
//! ```text
//! decision / session_player
//!     ↓ uses
//! placement_search ── reachability
//!     ↓ uses
//! placement_evaluator ── weights
//!     ↓ uses
//! placement_analysis ── board_analysis
//! ```
//!
//! # Example
//!
//! ```
//! use cognito_engine::{Board, PieceKind};
//! use cognito_evaluator::{
//!     placement_evaluator::WeightedPlacementEvaluator,
//!     placement_search::{PlacementSearch, SearchMode},
//! };
//!
//! let search = PlacementSearch::new(
//!     Box::new(WeightedPlacementEvaluator::default()),
//!     SearchMode::Validated,
//! );
//! let result = search.select(&Board::new(19, 15), PieceKind::T);
//! assert!(result.is_best());
//! ```

pub mod action_translator;
pub mod board_analysis;
pub mod decision;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod placement_search;
pub mod reachability;
pub mod session_player;
pub mod weights;
