//! Evolutionary tuning of placement weights.
//!
//! # How Training Works
//!
//! 1. **Population** - perturb a base weight vector into `population_size` individuals
//! 2. **Evaluation** - each individual plays a few capped simulated games
//!    ([`fitness`]); fitness is the mean number of lines cleared
//! 3. **Selection** - rank best first and keep the top `elite_count` unchanged
//! 4. **Reproduction** - fill the rest with crossover and mutation of elite pairs
//!    ([`genetic`], [`weights`])
//! 5. **Repeat** - for a fixed number of generations, keeping the best-ever vector
//!    ([`trainer`])
//!
//! ```text
//! Trainer
//!     ↓ evolves
//! Population of PlacementWeights
//!     ↓ played by
//! SessionPlayer (cognito-evaluator)
//!     ↓ produces
//! Fitness (mean lines, lines per piece)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cognito_engine::GameConfig;
//! use cognito_evaluator::weights::PlacementWeights;
//! use cognito_training::trainer::{Trainer, TrainingParams};
//!
//! let mut trainer = Trainer::new(
//!     TrainingParams::default(),
//!     GameConfig::default(),
//!     &PlacementWeights::BASELINE,
//! )?;
//! let best = trainer.run(|summary, _| eprintln!("{summary:?}"))?;
//! # Ok::<(), cognito_training::genetic::EvolverError>(())
//! ```

pub mod fitness;
pub mod genetic;
pub mod trainer;
pub mod weights;
