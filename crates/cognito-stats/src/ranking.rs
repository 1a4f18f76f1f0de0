//! Rank lookups on descending rankings.

/// Value ranked at position `max(1, floor(fraction * len))` from the top of a
/// list sorted best-first (1-based).
///
/// With `fraction = 0.1` this is the "top decile" entry of a generation
/// report; for fewer than 20 entries it is the best value itself.
///
/// Returns `None` for an empty ranking.
///
/// ```
/// use cognito_stats::ranking::top_fraction;
///
/// let ranked: Vec<f32> = (1..=30).rev().map(|v| v as f32).collect();
/// assert_eq!(top_fraction(&ranked, 0.1), Some(28.0));
/// assert_eq!(top_fraction(&ranked[..12], 0.1), Some(30.0));
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn top_fraction(descending: &[f32], fraction: f32) -> Option<f32> {
    let rank = (fraction * descending.len() as f32).floor() as usize;
    descending.get(rank.saturating_sub(1)).copied()
}
