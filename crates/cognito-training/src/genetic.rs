//! Genetic algorithm over placement weight vectors.
//!
//! Each generation:
//!
//! 1. **Evaluate Fitness** - every individual plays a few capped simulated games
//!    on seeds derived from its index and the generation
//! 2. **Rank** - individuals are sorted by mean lines cleared, best first; the
//!    sort is stable, so ties keep population order
//! 3. **Elitism** - the top `elite_count` individuals are carried over unchanged
//! 4. **Reproduction** - the rest are filled with children of two distinct
//!    elites: single-point crossover followed by Gaussian mutation
//!
//! Fitness evaluation runs one scoped thread per individual. Game seeds depend
//! only on `(run seed, index, generation)`, so results do not depend on
//! scheduling.

use std::thread;

use cognito_evaluator::weights::PlacementWeights;
use cognito_stats::descriptive::DescriptiveStats;
use rand::Rng;
use rand_distr::{Normal, NormalError};

use crate::{
    fitness::{Fitness, FitnessEvaluator, individual_base_seed},
    weights,
};

/// A candidate weight vector and its fitness in the current generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    weights: PlacementWeights,
    fitness: Fitness,
}

impl Individual {
    #[must_use]
    pub fn new(weights: PlacementWeights) -> Self {
        Self {
            weights,
            fitness: Fitness::default(),
        }
    }

    #[must_use]
    pub fn weights(&self) -> &PlacementWeights {
        &self.weights
    }

    /// Fitness from the last evaluation; zero before the first one.
    #[must_use]
    pub fn fitness(&self) -> Fitness {
        self.fitness
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// `count` copies of `base`, each with independent per-coefficient noise.
    #[must_use]
    pub fn perturbed<R>(
        base: &PlacementWeights,
        count: usize,
        noise: Normal<f32>,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(weights::perturbed(base, noise, rng)))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Best individual; only meaningful after [`Population::evaluate_fitness`].
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Evaluates every individual in parallel, then ranks them best first.
    ///
    /// Individual `i` plays on seeds starting at
    /// [`individual_base_seed(run_seed, i, generation)`](individual_base_seed),
    /// where `i` is its position before ranking.
    pub fn evaluate_fitness(
        &mut self,
        evaluator: &FitnessEvaluator,
        run_seed: u64,
        generation: usize,
    ) {
        thread::scope(|s| {
            for (index, ind) in self.individuals.iter_mut().enumerate() {
                let base_seed = individual_base_seed(run_seed, index, generation);
                s.spawn(move || {
                    ind.fitness = evaluator.evaluate(ind.weights, base_seed);
                });
            }
        });

        // stable: equal scores keep population order
        self.individuals
            .sort_by(|a, b| b.fitness.mean_lines.total_cmp(&a.fitness.mean_lines));
    }

    /// Per-coefficient statistics across the population.
    #[must_use]
    pub fn compute_weight_stats(&self) -> Vec<DescriptiveStats> {
        (0..cognito_evaluator::board_analysis::FEATURE_COUNT)
            .filter_map(|i| {
                DescriptiveStats::new(self.individuals.iter().map(|ind| ind.weights.as_array()[i]))
            })
            .collect()
    }

    /// Statistics of mean lines cleared; `None` for an empty population.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness.mean_lines))
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolverError {
    #[display("elite count {_0} is below 2, so no parents can be paired")]
    TooFewElites(#[error(not(source))] usize),
    #[display("population of {population} cannot hold {elite_count} elites")]
    PopulationTooSmall {
        elite_count: usize,
        population: usize,
    },
    #[display("mutation rate {_0} is outside [0, 1]")]
    MutationRate(#[error(not(source))] f64),
    #[display("invalid mutation sigma: {_0}")]
    MutationSigma(NormalError),
}

/// Produces the next generation from a ranked population.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    elite_count: usize,
    mutation_rate: f64,
    mutation_noise: Normal<f32>,
}

impl PopulationEvolver {
    pub fn new(
        elite_count: usize,
        mutation_rate: f64,
        mutation_sigma: f32,
    ) -> Result<Self, EvolverError> {
        if elite_count < 2 {
            return Err(EvolverError::TooFewElites(elite_count));
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(EvolverError::MutationRate(mutation_rate));
        }
        let mutation_noise =
            Normal::new(0.0, mutation_sigma).map_err(EvolverError::MutationSigma)?;
        Ok(Self {
            elite_count,
            mutation_rate,
            mutation_noise,
        })
    }

    #[must_use]
    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    /// Builds a population of the same size as `population`.
    ///
    /// `population` must be ranked best first and hold at least
    /// `elite_count` individuals.
    pub fn evolve<R>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<Population, EvolverError>
    where
        R: Rng + ?Sized,
    {
        let size = population.individuals.len();
        if size < self.elite_count {
            return Err(EvolverError::PopulationTooSmall {
                elite_count: self.elite_count,
                population: size,
            });
        }
        debug_assert!(
            population
                .individuals
                .is_sorted_by(|a, b| a.fitness.mean_lines >= b.fitness.mean_lines)
        );

        let elites = &population.individuals[..self.elite_count];
        let mut next_individuals = Vec::with_capacity(size);
        next_individuals.extend(elites.iter().cloned());

        while next_individuals.len() < size {
            let (p1, p2) = choose_two(elites, rng);
            let child = weights::single_point_crossover(&p1.weights, &p2.weights, rng);
            let child = weights::mutated(&child, self.mutation_noise, self.mutation_rate, rng);
            next_individuals.push(Individual::new(child));
        }

        Ok(Population {
            individuals: next_individuals,
        })
    }
}

/// Two distinct elements in random order; `pool` needs at least two.
fn choose_two<'a, T, R>(pool: &'a [T], rng: &mut R) -> (&'a T, &'a T)
where
    R: Rng + ?Sized,
{
    let first = rng.random_range(0..pool.len());
    let mut second = rng.random_range(0..pool.len() - 1);
    if second >= first {
        second += 1;
    }
    (&pool[first], &pool[second])
}
