//! Board model, shape registry and host-rule game simulation for the
//! falling-block autoplayer.
//!
//! # Example
//!
//! ```
//! use cognito_engine::{Action, GameConfig, GameSession};
//!
//! let mut session = GameSession::with_seed(GameConfig::default(), 7);
//! session.tick(Action::HardDrop);
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;
