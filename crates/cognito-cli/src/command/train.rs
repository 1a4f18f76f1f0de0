use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use cognito_engine::GameConfig;
use cognito_evaluator::{session_player::SessionPlayer, weights::PlacementWeights};
use cognito_training::{
    genetic::Population,
    trainer::{
        BestWeights, FINAL_CHECK_FIRST_SEED, FINAL_CHECK_GAMES, FinalCheck, GenerationSummary,
        Trainer, TrainingParams,
    },
};
use serde::Serialize;

use crate::util::{self, Output};

const DEFAULTS: TrainingParams = TrainingParams::DEFAULT;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Individuals per generation
    #[arg(long, default_value_t = DEFAULTS.population_size)]
    population: usize,
    /// Individuals carried over unchanged
    #[arg(long, default_value_t = DEFAULTS.elite_count)]
    elites: usize,
    /// Per-coefficient mutation probability
    #[arg(long, default_value_t = DEFAULTS.mutation_rate)]
    mutation_rate: f64,
    /// Standard deviation of mutation noise
    #[arg(long, default_value_t = DEFAULTS.mutation_sigma)]
    mutation_sigma: f32,
    /// Standard deviation of the noise seeding the first generation
    #[arg(long, default_value_t = DEFAULTS.init_sigma)]
    init_sigma: f32,
    /// Games played per individual
    #[arg(long, default_value_t = DEFAULTS.games_per_eval)]
    games: usize,
    /// Piece cap per game
    #[arg(long, default_value_t = DEFAULTS.max_pieces)]
    max_pieces: usize,
    #[arg(long, default_value_t = DEFAULTS.generations)]
    generations: usize,
    #[arg(long, default_value_t = DEFAULTS.seed)]
    seed: u64,
    /// Weights file to start from [default: baseline weights]
    #[arg(long)]
    base: Option<PathBuf>,
    /// Where the best weights are written
    #[arg(long, default_value = "best_weights.json")]
    output: PathBuf,
    /// Also write a JSON training report to this path
    #[arg(long)]
    report: Option<PathBuf>,
    /// Skip the baseline game played before training
    #[arg(long)]
    no_smoke_test: bool,
    /// Games of the held-out check after training (0 to skip)
    #[arg(long, default_value_t = FINAL_CHECK_GAMES)]
    final_check_games: usize,
}

impl TrainArg {
    fn params(&self) -> TrainingParams {
        TrainingParams {
            population_size: self.population,
            elite_count: self.elites,
            mutation_rate: self.mutation_rate,
            mutation_sigma: self.mutation_sigma,
            init_sigma: self.init_sigma,
            games_per_eval: self.games,
            max_pieces: self.max_pieces,
            generations: self.generations,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingReport {
    trained_at: DateTime<Utc>,
    params: TrainingParams,
    generations: Vec<GenerationSummary>,
    best: Option<BestWeights>,
    final_check: Option<FinalCheck>,
}

fn rounded(weights: &PlacementWeights, digits: i32) -> Vec<f32> {
    let scale = 10f32.powi(digits);
    weights
        .as_array()
        .iter()
        .map(|w| (w * scale).round() / scale)
        .collect()
}

fn print_weight_stats(population: &Population) {
    let weight_stats = population.compute_weight_stats();
    eprintln!("  Weights Stats:");
    eprintln!(
        "    Min:        {:.3?}",
        weight_stats.iter().map(|s| s.min).collect::<Vec<_>>(),
    );
    eprintln!(
        "    Max:        {:.3?}",
        weight_stats.iter().map(|s| s.max).collect::<Vec<_>>(),
    );
    eprintln!(
        "    Mean:       {:.3?}",
        weight_stats.iter().map(|s| s.mean).collect::<Vec<_>>(),
    );
    eprintln!(
        "    NormStddev: {:.3?}",
        weight_stats
            .iter()
            .map(|s| s.normalized_std_dev)
            .collect::<Vec<_>>(),
    );
}

fn smoke_test(config: GameConfig, base: PlacementWeights, max_pieces: usize) {
    eprintln!("Smoke test: baseline one game...");
    let outcome = SessionPlayer::new(base).play_game(config, 0, max_pieces);
    eprintln!(
        "  baseline -> lines={}, pieces={}, LPP≈{:.3}",
        outcome.lines,
        outcome.pieces,
        outcome.lines_per_piece()
    );
    eprintln!();
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = arg.params();
    let config = GameConfig::default();
    let base = util::load_weights(arg.base.as_deref())?;

    if !arg.no_smoke_test {
        smoke_test(config, base, params.max_pieces);
    }

    let mut trainer = Trainer::new(params, config, &base).context("Invalid training parameters")?;
    let mut generations = vec![];
    let best = trainer.run(|summary, population| {
        let generation = summary.generation;
        eprintln!(
            "[gen {generation:02}] evaluated population of {}:",
            population.individuals().len()
        );
        for (i, ind) in population.individuals().iter().enumerate() {
            let fitness = ind.fitness();
            eprintln!(
                "  {i:2}: {:.3?} => lines={:.1}  LPP≈{:.3}",
                ind.weights().as_array(),
                fitness.mean_lines,
                fitness.mean_lines_per_piece
            );
        }
        eprintln!(
            "[gen {generation:02}] mean={:.2}  med={:.2}  best={:.2}  p90={:.2}  LPP≈{:.3}",
            summary.mean,
            summary.median,
            summary.best,
            summary.top_decile,
            summary.mean_lines_per_piece
        );
        let best_w = rounded(&summary.best_weights, 4);
        eprintln!("           best_w = {best_w:?}");
        print_weight_stats(population);
        eprintln!();
        generations.push(summary.clone());
    })?;

    let Some(best) = best else {
        anyhow::bail!("Training produced no evaluated generation");
    };
    best.weights
        .save_json_file(&arg.output)
        .with_context(|| format!("Failed to save weights file: {}", arg.output.display()))?;

    eprintln!();
    eprintln!("=== Training done ===");
    eprintln!("Best weights saved to {}", arg.output.display());
    eprintln!("  From generation: {}", best.generation);
    eprintln!("  Score: {:.2}", best.score);
    eprintln!("  Weights: {:?}", rounded(&best.weights, 6));

    let final_check = (arg.final_check_games > 0).then(|| {
        let check = FinalCheck::run(
            trainer.evaluator(),
            best.weights,
            FINAL_CHECK_FIRST_SEED,
            arg.final_check_games,
        );
        eprintln!(
            "Final check over {} seeds: avg lines={:.1} ± {:.1}, avg LPP={:.3}",
            check.games, check.mean_lines, check.std_dev_lines, check.mean_lines_per_piece
        );
        check
    });

    if let Some(path) = &arg.report {
        let report = TrainingReport {
            trained_at: Utc::now(),
            params,
            generations,
            best: Some(best),
            final_check,
        };
        Output::save_json(&report, Some(path.as_path()))?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}
