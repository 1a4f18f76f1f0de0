//! Training run: generations of evaluate, rank, report and evolve.

use cognito_engine::GameConfig;
use cognito_evaluator::{session_player::GameOutcome, weights::PlacementWeights};
use cognito_stats::{descriptive::DescriptiveStats, ranking::top_fraction};
use rand::SeedableRng;
use rand_distr::Normal;
use rand_pcg::Pcg32;
use serde::Serialize;
use tracing::debug;

use crate::{
    fitness::{Fitness, FitnessEvaluator},
    genetic::{EvolverError, Population, PopulationEvolver},
};

/// Fraction of the ranking reported as the top-decile score.
pub const TOP_DECILE: f32 = 0.1;
/// First seed of the post-training check.
pub const FINAL_CHECK_FIRST_SEED: u64 = 100_000;
pub const FINAL_CHECK_GAMES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingParams {
    pub population_size: usize,
    pub elite_count: usize,
    /// Per-coefficient mutation probability.
    pub mutation_rate: f64,
    pub mutation_sigma: f32,
    /// Noise applied to the base vector when seeding the first generation.
    pub init_sigma: f32,
    pub games_per_eval: usize,
    pub max_pieces: usize,
    pub generations: usize,
    pub seed: u64,
}

impl TrainingParams {
    pub const DEFAULT: Self = Self {
        population_size: 12,
        elite_count: 3,
        mutation_rate: 0.6,
        mutation_sigma: 0.15,
        init_sigma: 0.05,
        games_per_eval: 3,
        max_pieces: 800,
        generations: 10,
        seed: 0,
    };
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Report of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    /// 1-based generation number.
    pub generation: usize,
    pub mean: f32,
    pub median: f32,
    pub best: f32,
    pub top_decile: f32,
    /// Mean lines per piece over all individuals.
    pub mean_lines_per_piece: f32,
    pub best_weights: PlacementWeights,
}

impl GenerationSummary {
    /// Summarizes a ranked, evaluated population; `None` when it is empty.
    #[must_use]
    pub fn from_population(generation: usize, population: &Population) -> Option<Self> {
        let best = population.best()?;
        let stats = population.compute_fitness_stats()?;
        let ranked: Vec<f32> = population
            .individuals()
            .iter()
            .map(|ind| ind.fitness().mean_lines)
            .collect();
        let mean_lines_per_piece = cognito_stats::descriptive::mean(
            population
                .individuals()
                .iter()
                .map(|ind| ind.fitness().mean_lines_per_piece),
        )?;
        Some(Self {
            generation,
            mean: stats.mean,
            median: stats.median,
            best: best.fitness().mean_lines,
            top_decile: top_fraction(&ranked, TOP_DECILE)?,
            mean_lines_per_piece,
            best_weights: *best.weights(),
        })
    }
}

/// Best vector seen so far and the generation score that earned it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestWeights {
    pub weights: PlacementWeights,
    pub score: f32,
    pub generation: usize,
}

#[derive(Debug)]
pub struct Trainer {
    params: TrainingParams,
    evaluator: FitnessEvaluator,
    evolver: PopulationEvolver,
    rng: Pcg32,
    population: Population,
    generation: usize,
    best: Option<BestWeights>,
}

impl Trainer {
    /// Seeds the first generation around `base`.
    pub fn new(
        params: TrainingParams,
        game_config: GameConfig,
        base: &PlacementWeights,
    ) -> Result<Self, EvolverError> {
        let evolver = PopulationEvolver::new(
            params.elite_count,
            params.mutation_rate,
            params.mutation_sigma,
        )?;
        if params.population_size < params.elite_count {
            return Err(EvolverError::PopulationTooSmall {
                elite_count: params.elite_count,
                population: params.population_size,
            });
        }
        let init_noise = Normal::new(0.0, params.init_sigma).map_err(EvolverError::MutationSigma)?;
        let mut rng = Pcg32::seed_from_u64(params.seed);
        let population = Population::perturbed(base, params.population_size, init_noise, &mut rng);
        Ok(Self {
            params,
            evaluator: FitnessEvaluator {
                game_config,
                games: params.games_per_eval,
                max_pieces: params.max_pieces,
            },
            evolver,
            rng,
            population,
            generation: 0,
            best: None,
        })
    }

    #[must_use]
    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    #[must_use]
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Current population; ranked after [`Trainer::evaluate_generation`].
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Best-ever vector across all evaluated generations.
    #[must_use]
    pub fn best(&self) -> Option<&BestWeights> {
        self.best.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.generation >= self.params.generations
    }

    /// Evaluates and ranks the next generation, updating the best-ever vector
    /// when this generation's best is strictly better.
    pub fn evaluate_generation(&mut self) -> Option<GenerationSummary> {
        self.generation += 1;
        self.population
            .evaluate_fitness(&self.evaluator, self.params.seed, self.generation);
        let summary = GenerationSummary::from_population(self.generation, &self.population)?;
        if self.best.is_none_or(|best| summary.best > best.score) {
            self.best = Some(BestWeights {
                weights: summary.best_weights,
                score: summary.best,
                generation: self.generation,
            });
        }
        debug!(
            generation = summary.generation,
            mean = summary.mean,
            best = summary.best,
            "generation evaluated"
        );
        Some(summary)
    }

    /// Replaces the ranked population with its offspring.
    pub fn advance(&mut self) -> Result<(), EvolverError> {
        self.population = self.evolver.evolve(&self.population, &mut self.rng)?;
        Ok(())
    }

    /// Runs every remaining generation, calling `on_generation` with each
    /// summary and the ranked population, and returns the best-ever vector.
    pub fn run<F>(&mut self, mut on_generation: F) -> Result<Option<BestWeights>, EvolverError>
    where
        F: FnMut(&GenerationSummary, &Population),
    {
        while !self.is_finished() {
            if let Some(summary) = self.evaluate_generation() {
                on_generation(&summary, &self.population);
            }
            if !self.is_finished() {
                self.advance()?;
            }
        }
        Ok(self.best)
    }
}

/// Held-out evaluation of a weight vector over consecutive seeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalCheck {
    pub games: usize,
    pub mean_lines: f32,
    /// Population standard deviation of lines cleared.
    pub std_dev_lines: f32,
    pub mean_lines_per_piece: f32,
}

impl FinalCheck {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_outcomes(outcomes: &[GameOutcome]) -> Self {
        let fitness = Fitness::from_outcomes(outcomes);
        let std_dev_lines = DescriptiveStats::new(outcomes.iter().map(|o| o.lines as f32))
            .map_or(0.0, |stats| stats.std_dev);
        Self {
            games: outcomes.len(),
            mean_lines: fitness.mean_lines,
            std_dev_lines,
            mean_lines_per_piece: fitness.mean_lines_per_piece,
        }
    }

    /// Plays `games` games on seeds `first_seed..first_seed + games`.
    #[must_use]
    pub fn run(
        evaluator: &FitnessEvaluator,
        weights: PlacementWeights,
        first_seed: u64,
        games: usize,
    ) -> Self {
        let seeds = (first_seed..).take(games);
        Self::from_outcomes(&evaluator.play_seeds(weights, seeds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TrainingParams {
        TrainingParams {
            population_size: 4,
            elite_count: 2,
            games_per_eval: 1,
            max_pieces: 20,
            generations: 2,
            ..TrainingParams::DEFAULT
        }
    }

    fn small_trainer() -> Trainer {
        let base = PlacementWeights::BASELINE;
        Trainer::new(small_params(), GameConfig::default(), &base).unwrap()
    }

    #[test]
    fn test_rejects_population_smaller_than_elites() {
        let params = TrainingParams {
            population_size: 2,
            ..TrainingParams::DEFAULT
        };
        let result = Trainer::new(params, GameConfig::default(), &PlacementWeights::BASELINE);
        assert!(matches!(result, Err(EvolverError::PopulationTooSmall { .. })));
    }

    #[test]
    fn test_run_tracks_best_ever() {
        let mut trainer = small_trainer();
        let mut summaries = vec![];
        let best = trainer
            .run(|summary, population| {
                assert_eq!(population.individuals().len(), 4);
                summaries.push(summary.clone());
            })
            .unwrap()
            .unwrap();

        assert!(trainer.is_finished());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].generation, 1);
        let top = summaries.iter().map(|s| s.best).fold(f32::MIN, f32::max);
        assert!((best.score - top).abs() < f32::EPSILON);
        // the first generation holding the top score wins
        let first_top = summaries.iter().find(|s| s.best >= top).unwrap();
        assert_eq!(best.generation, first_top.generation);
        assert_eq!(best.weights, first_top.best_weights);
    }

    #[test]
    fn test_same_seed_same_training() {
        let run = || {
            let mut trainer = small_trainer();
            let mut summaries = vec![];
            trainer.run(|s, _| summaries.push(s.clone())).unwrap();
            summaries
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_summary_top_decile_is_best_for_small_populations() {
        let mut trainer = small_trainer();
        let summary = trainer.evaluate_generation().unwrap();
        assert!((summary.top_decile - summary.best).abs() < f32::EPSILON);
        assert!(summary.best >= summary.median);
    }

    #[test]
    fn test_final_check() {
        let outcomes = [
            GameOutcome {
                lines: 2,
                pieces: 10,
            },
            GameOutcome {
                lines: 6,
                pieces: 10,
            },
        ];
        let check = FinalCheck::from_outcomes(&outcomes);
        assert_eq!(check.games, 2);
        assert!((check.mean_lines - 4.0).abs() < f32::EPSILON);
        assert!((check.std_dev_lines - 2.0).abs() < 1e-6);

        let evaluator = FitnessEvaluator {
            game_config: GameConfig::default(),
            games: 1,
            max_pieces: 10,
        };
        let check = FinalCheck::run(&evaluator, PlacementWeights::BASELINE, 100_000, 3);
        assert_eq!(check.games, 3);
    }
}
