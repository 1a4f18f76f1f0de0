//! Weight vector operators used by [`PopulationEvolver`](crate::genetic::PopulationEvolver).
//!
//! - **Initialization**: [`perturbed`] adds Gaussian noise to every coefficient of a base vector
//! - **Crossover**: [`single_point_crossover`] joins one parent's prefix to the other's suffix
//! - **Mutation**: [`mutated`] adds Gaussian noise to each coefficient with a fixed probability
//!
//! Operators never modify their inputs; each returns a new [`PlacementWeights`].

use cognito_evaluator::{board_analysis::FEATURE_COUNT, weights::PlacementWeights};
use rand::Rng;
use rand_distr::Normal;

/// Builds a weight vector by applying `f` to each coefficient index.
///
/// ```
/// use cognito_training::weights;
///
/// let weights = weights::from_fn(|i| -(i as f32));
/// assert_eq!(weights.as_array(), [0.0, -1.0, -2.0, -3.0, -4.0, -5.0]);
/// ```
pub fn from_fn<F>(f: F) -> PlacementWeights
where
    F: FnMut(usize) -> f32,
{
    PlacementWeights::new(std::array::from_fn(f))
}

/// `base` with independent noise drawn from `noise` added to every coefficient.
pub fn perturbed<R>(base: &PlacementWeights, noise: Normal<f32>, rng: &mut R) -> PlacementWeights
where
    R: Rng + ?Sized,
{
    let base = base.as_array();
    from_fn(|i| base[i] + rng.sample(noise))
}

/// Takes `p1[..cut]` followed by `p2[cut..]`, with `cut` drawn uniformly from `1..6`.
///
/// Every child therefore carries at least one coefficient from each parent.
pub fn single_point_crossover<R>(
    p1: &PlacementWeights,
    p2: &PlacementWeights,
    rng: &mut R,
) -> PlacementWeights
where
    R: Rng + ?Sized,
{
    let cut = rng.random_range(1..FEATURE_COUNT);
    let (p1, p2) = (p1.as_array(), p2.as_array());
    from_fn(|i| if i < cut { p1[i] } else { p2[i] })
}

/// Adds noise from `noise` to each coefficient with probability `rate`.
pub fn mutated<R>(
    weights: &PlacementWeights,
    noise: Normal<f32>,
    rate: f64,
    rng: &mut R,
) -> PlacementWeights
where
    R: Rng + ?Sized,
{
    let weights = weights.as_array();
    from_fn(|i| {
        if rng.random::<f64>() < rate {
            weights[i] + rng.sample(noise)
        } else {
            weights[i]
        }
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    const A: PlacementWeights = PlacementWeights::new([1.0; FEATURE_COUNT]);
    const B: PlacementWeights = PlacementWeights::new([2.0; FEATURE_COUNT]);

    #[test]
    fn test_crossover_keeps_prefix_and_suffix() {
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..100 {
            let child = single_point_crossover(&A, &B, &mut rng).as_array();
            let cut = child.iter().position(|&w| w == 2.0).unwrap();
            assert!((1..FEATURE_COUNT).contains(&cut), "{child:?}");
            assert!(child[..cut].iter().all(|&w| w == 1.0));
            assert!(child[cut..].iter().all(|&w| w == 2.0));
        }
    }

    #[test]
    fn test_mutation_rate_bounds() {
        let noise = Normal::new(0.0, 0.15).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(mutated(&A, noise, 0.0, &mut rng), A);
        let all = mutated(&A, noise, 1.0, &mut rng).as_array();
        assert!(all.iter().all(|&w| w != 1.0), "{all:?}");
    }

    #[test]
    fn test_perturbed_stays_near_base() {
        let noise = Normal::new(0.0, 0.05).unwrap();
        let mut rng = Pcg32::seed_from_u64(2);
        let base = PlacementWeights::BASELINE;
        let weights = perturbed(&base, noise, &mut rng);
        assert_ne!(weights, base);
        for (w, b) in std::iter::zip(weights.as_array(), base.as_array()) {
            assert!((w - b).abs() < 0.5);
        }
    }
}
