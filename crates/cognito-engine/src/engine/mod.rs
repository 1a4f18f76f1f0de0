//! Host game rules.
//!
//! - [`GameSession`] - one game: board, falling piece, preview, statistics
//! - [`GameStats`] - lines, pieces and level
//! - [`PieceBuffer`] - seeded uniform piece generator with one preview
//! - [`Action`] and [`ActionQueue`] - per-tick inputs
//!
//! A session can be driven two ways: [`GameSession::tick`] applies one action
//! and one gravity step (used by simulated play), while
//! [`GameSession::advance_frame`] follows the host's frame-based gravity
//! cadence (used by the headless live loop).

pub use self::{action::*, game_session::*, game_stats::*, piece_buffer::*};

mod action;
mod game_session;
mod game_stats;
mod piece_buffer;
