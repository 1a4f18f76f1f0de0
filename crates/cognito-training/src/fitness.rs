//! Fitness of a weight vector: mean lines cleared over simulated games.

use cognito_engine::GameConfig;
use cognito_evaluator::{
    session_player::{GameOutcome, SessionPlayer},
    weights::PlacementWeights,
};
use cognito_stats::descriptive;
use serde::Serialize;

/// Seed offset between consecutive games of one evaluation.
pub const GAME_SEED_STRIDE: u64 = 7919;
/// Seed offset between individuals of one generation.
pub const INDIVIDUAL_SEED_STRIDE: u64 = 101;
/// Seed offset between generations.
pub const GENERATION_SEED_STRIDE: u64 = 3571;

/// Base seed of individual `index` in `generation` (generations count from 1).
#[must_use]
pub fn individual_base_seed(run_seed: u64, index: usize, generation: usize) -> u64 {
    run_seed
        .wrapping_add(INDIVIDUAL_SEED_STRIDE.wrapping_mul(index as u64))
        .wrapping_add(GENERATION_SEED_STRIDE.wrapping_mul(generation as u64))
}

/// Seed of game `game` of an evaluation starting at `base_seed`.
#[must_use]
pub fn game_seed(base_seed: u64, game: usize) -> u64 {
    base_seed.wrapping_add(GAME_SEED_STRIDE.wrapping_mul(game as u64))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Fitness {
    /// Mean lines cleared per game; the ranking key.
    pub mean_lines: f32,
    pub mean_lines_per_piece: f32,
}

impl Fitness {
    /// Averages a set of game outcomes; no games give zero fitness.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_outcomes(outcomes: &[GameOutcome]) -> Self {
        let lines = outcomes.iter().map(|o| o.lines as f32);
        let lines_per_piece = outcomes.iter().map(GameOutcome::lines_per_piece);
        Self {
            mean_lines: descriptive::mean(lines).unwrap_or(0.0),
            mean_lines_per_piece: descriptive::mean(lines_per_piece).unwrap_or(0.0),
        }
    }
}

/// Plays a fixed number of capped games per weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessEvaluator {
    pub game_config: GameConfig,
    pub games: usize,
    pub max_pieces: usize,
}

impl FitnessEvaluator {
    /// Plays one game per seed.
    #[must_use]
    pub fn play_seeds<I>(&self, weights: PlacementWeights, seeds: I) -> Vec<GameOutcome>
    where
        I: IntoIterator<Item = u64>,
    {
        let player = SessionPlayer::new(weights);
        seeds
            .into_iter()
            .map(|seed| player.play_game(self.game_config, seed, self.max_pieces))
            .collect()
    }

    /// Plays `games` games seeded from `base_seed` and averages them.
    #[must_use]
    pub fn evaluate(&self, weights: PlacementWeights, base_seed: u64) -> Fitness {
        let seeds = (0..self.games).map(|k| game_seed(base_seed, k));
        Fitness::from_outcomes(&self.play_seeds(weights, seeds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_schedule() {
        assert_eq!(individual_base_seed(0, 0, 1), 3571);
        assert_eq!(individual_base_seed(5, 2, 3), 5 + 202 + 10_713);
        assert_eq!(game_seed(100, 0), 100);
        assert_eq!(game_seed(100, 2), 100 + 15_838);
    }

    #[test]
    fn test_zero_games_is_zero_fitness() {
        assert_eq!(Fitness::from_outcomes(&[]), Fitness::default());
        let zero_pieces = [GameOutcome::default()];
        assert_eq!(Fitness::from_outcomes(&zero_pieces), Fitness::default());
    }

    #[test]
    fn test_fitness_averages_outcomes() {
        let outcomes = [
            GameOutcome {
                lines: 4,
                pieces: 20,
            },
            GameOutcome {
                lines: 8,
                pieces: 20,
            },
        ];
        let fitness = Fitness::from_outcomes(&outcomes);
        assert!((fitness.mean_lines - 6.0).abs() < f32::EPSILON);
        assert!((fitness.mean_lines_per_piece - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let evaluator = FitnessEvaluator {
            game_config: GameConfig::default(),
            games: 2,
            max_pieces: 30,
        };
        let first = evaluator.evaluate(PlacementWeights::BASELINE, 11);
        let second = evaluator.evaluate(PlacementWeights::BASELINE, 11);
        assert_eq!(first, second);
    }
}
